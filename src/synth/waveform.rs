//! Sample synthesis: (shape, amplitude, offset) → millivolt samples → output codes.
//!
//! Pure integer math apart from the sine lookup. Identical inputs always give
//! identical buffers.
//!
//! Note the sign convention: the offset is subtracted from every sample.

use super::lut::SINE_LUT;
use crate::config::SAMPLE_COUNT;
use crate::params::{Shape, WaveformParams};

/// Lowest representable output voltage in mV.
pub const SAMPLE_MIN_MV: i32 = -10_000;
/// Highest representable output voltage in mV.
pub const SAMPLE_MAX_MV: i32 = 10_000;
/// Full-scale output code.
pub const CODE_MAX: u32 = 65_535;

/// One period of millivolt samples, each within `[SAMPLE_MIN_MV, SAMPLE_MAX_MV]`.
pub type SampleBuffer = [i16; SAMPLE_COUNT];

/// One period of output codes.
pub type CodeBuffer = [u16; SAMPLE_COUNT];

const HALF: i32 = (SAMPLE_COUNT / 2) as i32;
const LEN: i32 = SAMPLE_COUNT as i32;

/// Compute one period of samples.
///
/// Negative amplitudes are treated as zero.
pub fn synthesize(shape: Shape, amplitude: i16, offset: i16) -> SampleBuffer {
    let a = amplitude.max(0) as i32;
    let o = offset as i32;
    let mut out = [0i16; SAMPLE_COUNT];

    for (i, slot) in out.iter_mut().enumerate() {
        let i = i as i32;
        let mv = match shape {
            Shape::Sine => round_f32(SINE_LUT[i as usize] * a as f32) - o,
            Shape::Triangle => {
                if i < HALF {
                    (2 * a * i) / HALF - a - o
                } else {
                    -(2 * a * (i - HALF)) / HALF + a - o
                }
            }
            Shape::Sawtooth => (2 * a * i) / LEN - a - o,
            Shape::Square => {
                if i < HALF {
                    a - o
                } else {
                    -a - o
                }
            }
        };
        *slot = saturate_mv(mv);
    }

    out
}

/// Map millivolt samples onto the output code range.
pub fn to_output_codes(samples: &SampleBuffer) -> CodeBuffer {
    let mut out = [0u16; SAMPLE_COUNT];
    for (code, &mv) in out.iter_mut().zip(samples.iter()) {
        *code = output_code(mv);
    }
    out
}

/// `round((mv + 10000) * 65535 / 20000)`, saturating outside ±10 V.
#[inline]
pub fn output_code(mv: i16) -> u16 {
    let span = (SAMPLE_MAX_MV - SAMPLE_MIN_MV) as u32;
    let shifted = (saturate_mv(mv as i32) as i32 - SAMPLE_MIN_MV) as u32;
    ((shifted * CODE_MAX + span / 2) / span) as u16
}

/// Output timer reload value for `frequency_hz`:
/// `round(tick_rate / (frequency * SAMPLE_COUNT)) - 1`, saturated to 16 bits.
pub fn period_ticks(tick_rate_hz: u32, frequency_hz: i16) -> u16 {
    let sample_rate = (frequency_hz.max(1) as u64) * SAMPLE_COUNT as u64;
    let ticks = (tick_rate_hz as u64 + sample_rate / 2) / sample_rate;
    ticks.saturating_sub(1).min(u16::MAX as u64) as u16
}

#[inline]
fn saturate_mv(mv: i32) -> i16 {
    mv.clamp(SAMPLE_MIN_MV, SAMPLE_MAX_MV) as i16
}

/// Round half away from zero without `std`.
#[inline]
fn round_f32(v: f32) -> i32 {
    if v >= 0.0 {
        (v + 0.5) as i32
    } else {
        (v - 0.5) as i32
    }
}

/// Owns the current sample and code buffers.
pub struct Synthesizer {
    samples: SampleBuffer,
    codes: CodeBuffer,
}

impl Synthesizer {
    /// Buffers for a flat 0 mV output.
    pub fn new() -> Self {
        let samples = [0i16; SAMPLE_COUNT];
        Self {
            codes: to_output_codes(&samples),
            samples,
        }
    }

    /// Recompute both buffers from `params`. Frequency is ignored here.
    pub fn update(&mut self, params: &WaveformParams) {
        self.samples = synthesize(params.shape, params.amplitude, params.offset);
        self.codes = to_output_codes(&self.samples);
    }

    #[inline]
    pub fn samples(&self) -> &SampleBuffer {
        &self.samples
    }

    #[inline]
    pub fn codes(&self) -> &CodeBuffer {
        &self.codes
    }
}

impl Default for Synthesizer {
    fn default() -> Self {
        Self::new()
    }
}
