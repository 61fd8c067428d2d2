//! Raw four-channel input sample.

/// Input levels sampled once per fast tick.
///
/// Stored as a single byte with one bit per channel; a set bit means the
/// line reads HIGH. All inputs are pulled up, so idle is all-ones and a
/// pressed button reads LOW.
///
/// Bit layout:
/// - Bit 0: encoder quadrature A
/// - Bit 1: encoder quadrature B
/// - Bit 2: encoder push-button
/// - Bit 3: auxiliary push-button
#[repr(transparent)]
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct RawInput(u8);

impl RawInput {
    pub const ENC_A: u8 = 0x01;
    pub const ENC_B: u8 = 0x02;
    pub const ENC_BUTTON: u8 = 0x04;
    pub const AUX_BUTTON: u8 = 0x08;

    /// Nothing pressed, encoder resting on a detent.
    pub const IDLE: Self = Self(Self::ENC_A | Self::ENC_B | Self::ENC_BUTTON | Self::AUX_BUTTON);

    pub const fn from_bits(bits: u8) -> Self {
        Self(bits)
    }

    /// Build from individual line levels (true = HIGH).
    pub const fn from_levels(a: bool, b: bool, button: bool, aux: bool) -> Self {
        let mut bits = 0;
        if a {
            bits |= Self::ENC_A;
        }
        if b {
            bits |= Self::ENC_B;
        }
        if button {
            bits |= Self::ENC_BUTTON;
        }
        if aux {
            bits |= Self::AUX_BUTTON;
        }
        Self(bits)
    }

    pub const fn bits(&self) -> u8 {
        self.0
    }

    pub const fn a(&self) -> bool {
        (self.0 & Self::ENC_A) != 0
    }

    pub const fn b(&self) -> bool {
        (self.0 & Self::ENC_B) != 0
    }

    pub const fn button(&self) -> bool {
        (self.0 & Self::ENC_BUTTON) != 0
    }

    pub const fn aux(&self) -> bool {
        (self.0 & Self::AUX_BUTTON) != 0
    }

    /// Copy with the encoder quadrature lines replaced.
    pub const fn with_quadrature(self, a: bool, b: bool) -> Self {
        Self::from_levels(a, b, self.button(), self.aux())
    }

    /// Copy with the encoder button line driven LOW (`pressed`) or HIGH.
    pub const fn with_button(self, pressed: bool) -> Self {
        Self::from_levels(self.a(), self.b(), !pressed, self.aux())
    }

    /// Copy with the auxiliary button line driven LOW (`pressed`) or HIGH.
    pub const fn with_aux(self, pressed: bool) -> Self {
        Self::from_levels(self.a(), self.b(), self.button(), !pressed)
    }
}

impl Default for RawInput {
    fn default() -> Self {
        Self::IDLE
    }
}
