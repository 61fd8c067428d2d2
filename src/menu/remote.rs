//! Decoded remote-control message.
//!
//! Framing and parsing belong to the protocol layer. This is the logical
//! content in both directions: a full parameter set plus the save flag.

use crate::params::{Shape, WaveformParams};

/// One remote message, inbound (save request) or outbound (save ack).
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct RemoteFrame {
    /// Raw shape code. Unknown codes leave the current shape untouched.
    pub shape_code: u8,
    pub frequency: i16,
    pub amplitude: i16,
    pub offset: i16,
    pub save: bool,
}

impl RemoteFrame {
    pub fn from_params(params: &WaveformParams, save: bool) -> Self {
        Self {
            shape_code: params.shape.into(),
            frequency: params.frequency,
            amplitude: params.amplitude,
            offset: params.offset,
            save,
        }
    }

    /// Decoded shape, `None` for an unknown code.
    #[inline]
    pub fn shape(&self) -> Option<Shape> {
        Shape::from_u8(self.shape_code)
    }

    /// Overwrite `params` with this frame, clamping numeric fields.
    ///
    /// Returns false when the shape code was not recognised (the previous
    /// shape is kept, the other fields still apply).
    pub fn apply_to(&self, params: &mut WaveformParams) -> bool {
        let shape = self.shape();
        *params = WaveformParams {
            shape: shape.unwrap_or(params.shape),
            frequency: self.frequency,
            amplitude: self.amplitude,
            offset: self.offset,
            magic: params.magic,
        }
        .clamped();
        shape.is_some()
    }
}
