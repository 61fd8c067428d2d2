//! Parameter persistence.
//!
//! The generator keeps exactly one record in non-volatile storage. Validity
//! is decided solely by the magic tag: whatever the backend returns before the
//! first save is decoded, rejected, and replaced by factory defaults.
//!
//! Write failures are reported to the caller once and never retried.
//!
//! # Example
//!
//! ```
//! use rust_wavegen::config::nvs::{load_params, save_params, LoadOutcome, MemoryStore};
//! use rust_wavegen::params::WaveformParams;
//!
//! let mut store = MemoryStore::blank();
//! let (params, outcome) = load_params(&mut store);
//! assert!(matches!(outcome, LoadOutcome::Defaulted(_)));
//!
//! save_params(&mut store, &params).unwrap();
//! assert_eq!(load_params(&mut store).1, LoadOutcome::Restored);
//! ```

use super::record::{ParamRecord, RecordError, RECORD_LEN};
use crate::params::{WaveformParams, MAGIC};

#[cfg(target_os = "espidf")]
use esp_idf_svc::nvs::{EspDefaultNvsPartition, EspNvs, NvsDefault};
#[cfg(target_os = "espidf")]
use esp_idf_svc::sys::EspError;

/// NVS namespace holding the generator record
pub const NVS_NAMESPACE: &str = "wavegen";

/// NVS key of the parameter blob
const RECORD_KEY: &str = "params";

/// Persistence errors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PersistError {
    /// Backend refused or failed the write
    WriteFailed,
    /// Storage not available on this platform
    NotAvailable,
    /// Raw backend error code
    Backend(i32),
}

impl PersistError {
    pub fn code(&self) -> &'static str {
        match self {
            Self::WriteFailed => "P01",
            Self::NotAvailable => "P02",
            Self::Backend(_) => "P03",
        }
    }

    pub fn message(&self) -> &'static str {
        match self {
            Self::WriteFailed => "write failed",
            Self::NotAvailable => "storage not available",
            Self::Backend(_) => "backend error",
        }
    }
}

impl core::fmt::Display for PersistError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::Backend(code) => write!(f, "{}: {} ({})", self.code(), self.message(), code),
            _ => write!(f, "{}: {}", self.code(), self.message()),
        }
    }
}

#[cfg(target_os = "espidf")]
impl From<EspError> for PersistError {
    fn from(e: EspError) -> Self {
        PersistError::Backend(e.code())
    }
}

/// Non-volatile storage collaborator.
pub trait Persistence {
    /// Fill `buf` with the stored bytes, returning how many were read.
    ///
    /// Content is untrusted; a backend with nothing stored may return
    /// garbage or zero bytes.
    fn read(&mut self, buf: &mut [u8]) -> usize;

    /// Replace the stored bytes with `buf`.
    fn write(&mut self, buf: &[u8]) -> Result<(), PersistError>;
}

/// Result of loading parameters at startup
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadOutcome {
    /// Valid record found and used
    Restored,
    /// Record rejected, factory defaults substituted
    Defaulted(RecordError),
}

/// Load the parameter set, substituting defaults on any validation failure.
///
/// Never fails: there is always a usable parameter set afterwards.
pub fn load_params<P: Persistence + ?Sized>(store: &mut P) -> (WaveformParams, LoadOutcome) {
    let mut buf = [0u8; RECORD_LEN];
    let n = store.read(&mut buf).min(RECORD_LEN);

    match ParamRecord::decode(&buf[..n]) {
        Ok(params) => (params, LoadOutcome::Restored),
        Err(e) => (WaveformParams::DEFAULT, LoadOutcome::Defaulted(e)),
    }
}

/// Stamp the magic tag and write the parameter set.
///
/// Returns the stamped copy that was written.
pub fn save_params<P: Persistence + ?Sized>(
    store: &mut P,
    params: &WaveformParams,
) -> Result<WaveformParams, PersistError> {
    let stamped = WaveformParams { magic: MAGIC, ..*params };
    let record = ParamRecord::encode(&stamped);
    store.write(record.as_bytes())?;
    Ok(stamped)
}

/// RAM-backed storage for host builds and tests.
///
/// Starts out like erased flash (all 0xFF).
#[derive(Debug, Clone)]
pub struct MemoryStore {
    data: [u8; RECORD_LEN],
    /// When set, every write fails with `PersistError::WriteFailed`.
    pub fail_writes: bool,
    /// Number of successful writes.
    pub writes: u32,
}

impl MemoryStore {
    /// Erased storage.
    pub const fn blank() -> Self {
        Self {
            data: [0xFF; RECORD_LEN],
            fail_writes: false,
            writes: 0,
        }
    }

    /// Storage preloaded with raw bytes (shorter input leaves the tail erased).
    pub fn with_bytes(bytes: &[u8]) -> Self {
        let mut store = Self::blank();
        let n = bytes.len().min(RECORD_LEN);
        store.data[..n].copy_from_slice(&bytes[..n]);
        store
    }

    /// Current raw content.
    pub fn bytes(&self) -> &[u8; RECORD_LEN] {
        &self.data
    }
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::blank()
    }
}

impl Persistence for MemoryStore {
    fn read(&mut self, buf: &mut [u8]) -> usize {
        let n = buf.len().min(RECORD_LEN);
        buf[..n].copy_from_slice(&self.data[..n]);
        n
    }

    fn write(&mut self, buf: &[u8]) -> Result<(), PersistError> {
        if self.fail_writes {
            return Err(PersistError::WriteFailed);
        }
        let n = buf.len().min(RECORD_LEN);
        self.data[..n].copy_from_slice(&buf[..n]);
        self.writes += 1;
        Ok(())
    }
}

/// ESP-IDF NVS backend.
#[cfg(target_os = "espidf")]
pub struct NvsStore {
    nvs: EspNvs<NvsDefault>,
}

#[cfg(target_os = "espidf")]
impl NvsStore {
    /// Open the generator namespace read/write.
    pub fn open(partition: EspDefaultNvsPartition) -> Result<Self, PersistError> {
        let nvs = EspNvs::new(partition, NVS_NAMESPACE, true)?;
        Ok(Self { nvs })
    }
}

#[cfg(target_os = "espidf")]
impl Persistence for NvsStore {
    fn read(&mut self, buf: &mut [u8]) -> usize {
        // Missing key or I/O error both mean "nothing valid stored".
        match self.nvs.get_raw(RECORD_KEY, buf) {
            Ok(Some(data)) => data.len(),
            _ => 0,
        }
    }

    fn write(&mut self, buf: &[u8]) -> Result<(), PersistError> {
        self.nvs.set_raw(RECORD_KEY, buf)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::params::Shape;

    #[test]
    fn test_blank_store_defaults() {
        let mut store = MemoryStore::blank();
        let (p, outcome) = load_params(&mut store);
        assert_eq!(p, WaveformParams::DEFAULT);
        assert_eq!(outcome, LoadOutcome::Defaulted(RecordError::BadMagic));
    }

    #[test]
    fn test_save_then_load() {
        let mut store = MemoryStore::blank();
        let p = WaveformParams {
            shape: Shape::Triangle,
            frequency: 440,
            amplitude: 2500,
            offset: -300,
            magic: 0,
        };
        let stamped = save_params(&mut store, &p).unwrap();
        assert_eq!(stamped.magic, MAGIC);
        assert_eq!(store.writes, 1);

        let (loaded, outcome) = load_params(&mut store);
        assert_eq!(outcome, LoadOutcome::Restored);
        assert_eq!(loaded, stamped);
    }

    #[test]
    fn test_write_failure_surfaces() {
        let mut store = MemoryStore::blank();
        store.fail_writes = true;
        assert_eq!(
            save_params(&mut store, &WaveformParams::DEFAULT),
            Err(PersistError::WriteFailed)
        );
        assert_eq!(store.writes, 0);
        assert_eq!(store.bytes(), &[0xFF; RECORD_LEN]);
    }
}
