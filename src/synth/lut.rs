//! Sine lookup table for waveform synthesis
//!
//! One entry per output sample covering one full cycle.
//! Values are unit-scale f32 in [-1, 1].

use crate::config::SAMPLE_COUNT;

/// Pre-computed sine wave lookup table
///
/// `SINE_LUT[i] = sin(2π * i / SAMPLE_COUNT)`
/// With 100 samples: index 25 = 90°, 50 = 180°, 75 = 270°
pub static SINE_LUT: [f32; SAMPLE_COUNT] = {
    let mut table = [0f32; SAMPLE_COUNT];
    let mut i = 0;
    while i < SAMPLE_COUNT {
        let angle = (i as f64) * core::f64::consts::PI * 2.0 / (SAMPLE_COUNT as f64);
        let mut v = const_sin(angle);
        if v > 1.0 {
            v = 1.0;
        } else if v < -1.0 {
            v = -1.0;
        }
        table[i] = v as f32;
        i += 1;
    }
    table
};

/// Const-compatible sine using a Taylor series on the folded angle
const fn const_sin(x: f64) -> f64 {
    use core::f64::consts::{FRAC_PI_2, PI};

    // Normalize to [-π, π]
    let mut x = x;
    while x > PI {
        x -= 2.0 * PI;
    }
    while x < -PI {
        x += 2.0 * PI;
    }

    // Fold into [-π/2, π/2] where the series converges quickly
    if x > FRAC_PI_2 {
        x = PI - x;
    } else if x < -FRAC_PI_2 {
        x = -PI - x;
    }

    // sin(x) = x - x³/3! + x⁵/5! - x⁷/7! + x⁹/9! - x¹¹/11!
    let x2 = x * x;
    let x3 = x2 * x;
    let x5 = x3 * x2;
    let x7 = x5 * x2;
    let x9 = x7 * x2;
    let x11 = x9 * x2;

    x - x3 / 6.0 + x5 / 120.0 - x7 / 5040.0 + x9 / 362_880.0 - x11 / 39_916_800.0
}
