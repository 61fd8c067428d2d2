//! Persisted parameter record.
//!
//! Fixed 12-byte little-endian layout:
//!
//! ```text
//! [shape:1][reserved:1][frequency:2][amplitude:2][offset:2][magic:4]
//! ```
//!
//! A record is trusted only when the magic matches exactly. Flash that was
//! never written (all 0xFF) or holds a stale layout fails that check.

use crate::params::{Shape, WaveformParams, MAGIC};

/// Encoded record size in bytes.
pub const RECORD_LEN: usize = 12;

/// Record decoding errors.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecordError {
    /// Magic tag does not match (blank or corrupt flash)
    BadMagic,
    /// Magic matched but the shape code is unknown
    UnknownShape,
    /// Fewer than `RECORD_LEN` bytes were available
    Truncated,
}

impl RecordError {
    pub fn message(&self) -> &'static str {
        match self {
            Self::BadMagic => "magic mismatch",
            Self::UnknownShape => "unknown shape code",
            Self::Truncated => "record truncated",
        }
    }
}

impl core::fmt::Display for RecordError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.message())
    }
}

/// Raw byte image of a saved parameter set.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ParamRecord(pub [u8; RECORD_LEN]);

impl ParamRecord {
    /// Encode `params`. The magic is always stamped, whatever `params.magic` holds.
    pub fn encode(params: &WaveformParams) -> Self {
        let mut b = [0u8; RECORD_LEN];
        b[0] = params.shape.into();
        b[2..4].copy_from_slice(&params.frequency.to_le_bytes());
        b[4..6].copy_from_slice(&params.amplitude.to_le_bytes());
        b[6..8].copy_from_slice(&params.offset.to_le_bytes());
        b[8..12].copy_from_slice(&MAGIC.to_le_bytes());
        Self(b)
    }

    /// Decode and validate a record read from storage.
    ///
    /// Numeric fields of a valid record are clamped into their bounds.
    pub fn decode(bytes: &[u8]) -> Result<WaveformParams, RecordError> {
        if bytes.len() < RECORD_LEN {
            return Err(RecordError::Truncated);
        }

        let magic = u32::from_le_bytes([bytes[8], bytes[9], bytes[10], bytes[11]]);
        if magic != MAGIC {
            return Err(RecordError::BadMagic);
        }

        let shape = Shape::from_u8(bytes[0]).ok_or(RecordError::UnknownShape)?;

        let params = WaveformParams {
            shape,
            frequency: i16::from_le_bytes([bytes[2], bytes[3]]),
            amplitude: i16::from_le_bytes([bytes[4], bytes[5]]),
            offset: i16::from_le_bytes([bytes[6], bytes[7]]),
            magic,
        };
        Ok(params.clamped())
    }

    #[inline]
    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }
}
