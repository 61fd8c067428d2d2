//! Waveform synthesizer tests

use rust_wavegen::config::SAMPLE_COUNT;
use rust_wavegen::hal::RecordingSink;
use rust_wavegen::params::{Shape, WaveformParams};
use rust_wavegen::synth::lut::SINE_LUT;
use rust_wavegen::synth::{
    output_code, period_ticks, synthesize, to_output_codes, OutputPump, Synthesizer, WaveTable,
};

const SHAPES: [Shape; 4] = [Shape::Sine, Shape::Triangle, Shape::Sawtooth, Shape::Square];

#[test]
fn test_samples_and_codes_stay_in_range() {
    for shape in SHAPES {
        for amplitude in (0..=10_000).step_by(500) {
            for offset in (-5_000..=5_000).step_by(500) {
                let samples = synthesize(shape, amplitude, offset);
                for &mv in samples.iter() {
                    assert!(
                        (-10_000..=10_000).contains(&mv),
                        "{:?} A={} O={} gave {}",
                        shape,
                        amplitude,
                        offset,
                        mv
                    );
                }
                // u16 is [0, 65535] by construction; check the ends are reachable only at the rails
                let codes = to_output_codes(&samples);
                for (&mv, &code) in samples.iter().zip(codes.iter()) {
                    assert_eq!(code == 0, mv == -10_000);
                    assert_eq!(code == 65_535, mv == 10_000);
                }
            }
        }
    }
}

#[test]
fn test_synthesis_is_idempotent() {
    for shape in SHAPES {
        let a = synthesize(shape, 3_700, -1_200);
        let b = synthesize(shape, 3_700, -1_200);
        assert_eq!(a, b);
        assert_eq!(to_output_codes(&a), to_output_codes(&b));
    }
}

#[test]
fn test_offset_is_subtracted() {
    let samples = synthesize(Shape::Square, 0, 1_500);
    assert!(samples.iter().all(|&v| v == -1_500));
}

#[test]
fn test_sine_peak_and_trough() {
    let samples = synthesize(Shape::Sine, 300, 0);
    assert_eq!(samples[0], 0);
    assert_eq!(samples[25], 300);
    assert_eq!(samples[50], 0);
    assert_eq!(samples[75], -300);
    assert_eq!(*samples.iter().max().unwrap(), 300);
}

#[test]
fn test_sine_uses_table() {
    let samples = synthesize(Shape::Sine, 10_000, 0);
    for (i, &v) in samples.iter().enumerate() {
        let expected = (SINE_LUT[i] * 10_000.0).round() as i16;
        assert!((v - expected).abs() <= 1, "index {}", i);
    }
}

#[test]
fn test_code_mapping_rounds() {
    // (300 + 10000) * 65535 / 20000 = 33750.525
    assert_eq!(output_code(300), 33_751);
    assert_eq!(output_code(-5_000), 16_384);
    assert_eq!(output_code(5_000), 49_151);
}

#[test]
fn test_period_follows_frequency() {
    let rate = 2_500_000;
    let mut last = u16::MAX;
    for f in (20..=2000).step_by(20) {
        let p = period_ticks(rate, f);
        assert!(p <= last, "period shrinks as frequency rises");
        last = p;
    }
    // Slow clock: never underflows
    assert_eq!(period_ticks(1_000, 2000), 0);
    // Fast clock: saturates
    assert_eq!(period_ticks(u32::MAX, 20), u16::MAX);
}

#[test]
fn test_synthesizer_feeds_pump() {
    let params = WaveformParams {
        shape: Shape::Sawtooth,
        amplitude: 2_000,
        ..WaveformParams::DEFAULT
    };
    let mut synth = Synthesizer::new();
    synth.update(&params);

    let table = WaveTable::new();
    table.publish(synth.codes());

    let mut pump = OutputPump::new();
    let mut sink = RecordingSink::new();
    for _ in 0..SAMPLE_COUNT * 3 {
        pump.tick(&table, &mut sink);
    }

    assert_eq!(sink.total(), 300);
    assert_eq!(&sink.codes()[..SAMPLE_COUNT], &synth.codes()[..]);
    assert_eq!(&sink.codes()[SAMPLE_COUNT..2 * SAMPLE_COUNT], &synth.codes()[..]);
    assert_eq!(table.snapshot(), *synth.codes());
}
