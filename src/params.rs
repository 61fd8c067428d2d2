//! Module: params
//!
//! Purpose: Waveform parameter set edited by the menu, persisted to flash and
//! overridden by the remote channel.
//!
//! Each editable field has a fixed step and a bound policy:
//! - Shape: wraps modulo 4
//! - Frequency, Amplitude: wrap at both bounds (max → min, min → max)
//! - Offset: clamps at both bounds
//!
//! Safety: Safe. No unsafe blocks. Copy types only.

/// Frequency bounds and step in Hz.
pub const FREQ_MIN_HZ: i16 = 20;
pub const FREQ_MAX_HZ: i16 = 2000;
pub const FREQ_STEP_HZ: i16 = 20;

/// Amplitude bounds and step in mV (peak).
pub const AMPL_MIN_MV: i16 = 0;
pub const AMPL_MAX_MV: i16 = 10_000;
pub const AMPL_STEP_MV: i16 = 100;

/// Offset bounds and step in mV.
pub const OFFSET_MIN_MV: i16 = -5_000;
pub const OFFSET_MAX_MV: i16 = 5_000;
pub const OFFSET_STEP_MV: i16 = 100;

/// Sentinel stamped on every parameter set that is written to flash.
pub const MAGIC: u32 = 0x1234_55AA;

/// Waveform shape.
#[repr(u8)]
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum Shape {
    #[default]
    Sine = 0,
    Triangle = 1,
    Sawtooth = 2,
    Square = 3,
}

impl Shape {
    pub const COUNT: u8 = 4;

    /// Decode a wire/flash shape code. Unknown codes yield `None`.
    pub fn from_u8(code: u8) -> Option<Self> {
        match code {
            0 => Some(Shape::Sine),
            1 => Some(Shape::Triangle),
            2 => Some(Shape::Sawtooth),
            3 => Some(Shape::Square),
            _ => None,
        }
    }

    /// Label shown on the LCD.
    pub fn name(self) -> &'static str {
        match self {
            Shape::Sine => "Sine",
            Shape::Triangle => "Triangle",
            Shape::Sawtooth => "Sawtooth",
            Shape::Square => "Square",
        }
    }

    #[inline]
    pub fn next(self) -> Self {
        Self::from_index((self as u8 + 1) % Self::COUNT)
    }

    #[inline]
    pub fn prev(self) -> Self {
        Self::from_index((self as u8 + Self::COUNT - 1) % Self::COUNT)
    }

    fn from_index(idx: u8) -> Self {
        Self::from_u8(idx).unwrap_or_default()
    }
}

impl From<Shape> for u8 {
    fn from(s: Shape) -> Self {
        s as u8
    }
}

/// Editable parameter slot, arranged as a ring
/// (Shape → Frequency → Amplitude → Offset → Shape).
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Field {
    Shape,
    Frequency,
    Amplitude,
    Offset,
}

impl Field {
    /// All fields in ring order (also the LCD line order).
    pub const ALL: [Field; 4] = [Field::Shape, Field::Frequency, Field::Amplitude, Field::Offset];

    #[inline]
    pub fn next(self) -> Self {
        match self {
            Field::Shape => Field::Frequency,
            Field::Frequency => Field::Amplitude,
            Field::Amplitude => Field::Offset,
            Field::Offset => Field::Shape,
        }
    }

    #[inline]
    pub fn prev(self) -> Self {
        match self {
            Field::Shape => Field::Offset,
            Field::Frequency => Field::Shape,
            Field::Amplitude => Field::Frequency,
            Field::Offset => Field::Amplitude,
        }
    }

    /// Zero-based LCD line of this field.
    #[inline]
    pub fn line(self) -> u8 {
        self as u8
    }
}

/// Complete generator configuration.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct WaveformParams {
    pub shape: Shape,
    /// Output frequency in Hz, within `[FREQ_MIN_HZ, FREQ_MAX_HZ]`.
    pub frequency: i16,
    /// Peak amplitude in mV, within `[AMPL_MIN_MV, AMPL_MAX_MV]`.
    pub amplitude: i16,
    /// DC offset in mV, within `[OFFSET_MIN_MV, OFFSET_MAX_MV]`.
    pub offset: i16,
    /// Validity tag, only meaningful for persisted copies.
    pub magic: u32,
}

impl Default for WaveformParams {
    fn default() -> Self {
        Self::DEFAULT
    }
}

impl WaveformParams {
    /// Factory defaults: Sine, 20 Hz, 0 mV, 0 mV.
    pub const DEFAULT: Self = Self {
        shape: Shape::Sine,
        frequency: FREQ_MIN_HZ,
        amplitude: 0,
        offset: 0,
        magic: MAGIC,
    };

    /// Step `field` by `detents` (positive = increment) applying the field's
    /// bound policy after every single step.
    pub fn adjust(&mut self, field: Field, detents: i8) {
        let up = detents > 0;
        for _ in 0..detents.unsigned_abs() {
            match field {
                Field::Shape => {
                    self.shape = if up { self.shape.next() } else { self.shape.prev() };
                }
                Field::Frequency => {
                    self.frequency = wrap_step(self.frequency, FREQ_STEP_HZ, up, FREQ_MIN_HZ, FREQ_MAX_HZ);
                }
                Field::Amplitude => {
                    self.amplitude = wrap_step(self.amplitude, AMPL_STEP_MV, up, AMPL_MIN_MV, AMPL_MAX_MV);
                }
                Field::Offset => {
                    self.offset = clamp_step(self.offset, OFFSET_STEP_MV, up, OFFSET_MIN_MV, OFFSET_MAX_MV);
                }
            }
        }
    }

    /// Copy a single field from `other` into `self`.
    pub fn take_field(&mut self, other: &WaveformParams, field: Field) {
        match field {
            Field::Shape => self.shape = other.shape,
            Field::Frequency => self.frequency = other.frequency,
            Field::Amplitude => self.amplitude = other.amplitude,
            Field::Offset => self.offset = other.offset,
        }
    }

    /// Force every numeric field into its bound.
    pub fn clamped(mut self) -> Self {
        self.frequency = self.frequency.clamp(FREQ_MIN_HZ, FREQ_MAX_HZ);
        self.amplitude = self.amplitude.clamp(AMPL_MIN_MV, AMPL_MAX_MV);
        self.offset = self.offset.clamp(OFFSET_MIN_MV, OFFSET_MAX_MV);
        self
    }

    /// Check that every numeric field lies within its bound.
    pub fn in_bounds(&self) -> bool {
        (FREQ_MIN_HZ..=FREQ_MAX_HZ).contains(&self.frequency)
            && (AMPL_MIN_MV..=AMPL_MAX_MV).contains(&self.amplitude)
            && (OFFSET_MIN_MV..=OFFSET_MAX_MV).contains(&self.offset)
    }
}

#[inline]
fn wrap_step(value: i16, step: i16, up: bool, min: i16, max: i16) -> i16 {
    if up {
        let v = value.saturating_add(step);
        if v > max { min } else { v }
    } else {
        let v = value.saturating_sub(step);
        if v < min { max } else { v }
    }
}

#[inline]
fn clamp_step(value: i16, step: i16, up: bool, min: i16, max: i16) -> i16 {
    if up {
        value.saturating_add(step).min(max)
    } else {
        value.saturating_sub(step).max(min)
    }
}
