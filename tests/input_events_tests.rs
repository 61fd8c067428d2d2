//! Input event aggregator tests
//!
//! Drives the aggregator with raw line levels at 1 ms per tick and checks the
//! one-shot events it produces.

use rust_wavegen::config::TimingConfig;
use rust_wavegen::input::{Debouncer, IdleEdge, InputAggregator, RawInput};

fn feed(input: &mut InputAggregator, raw: RawInput, ticks: u32) -> Option<IdleEdge> {
    let mut edge = None;
    for _ in 0..ticks {
        edge = input.tick(raw).or(edge);
    }
    edge
}

/// One clockwise detent: A falls, then B falls with A low, then both rise.
fn detent_cw(input: &mut InputAggregator) {
    feed(input, RawInput::IDLE.with_quadrature(false, true), 5);
    feed(input, RawInput::IDLE.with_quadrature(false, false), 5);
    feed(input, RawInput::IDLE.with_quadrature(true, false), 5);
    feed(input, RawInput::IDLE, 5);
}

/// One counter-clockwise detent: B falls first while A is still high.
fn detent_ccw(input: &mut InputAggregator) {
    feed(input, RawInput::IDLE.with_quadrature(true, false), 5);
    feed(input, RawInput::IDLE.with_quadrature(false, false), 5);
    feed(input, RawInput::IDLE.with_quadrature(false, true), 5);
    feed(input, RawInput::IDLE, 5);
}

fn hold_encoder_button(input: &mut InputAggregator, ticks: u32) {
    feed(input, RawInput::IDLE.with_button(true), ticks);
    feed(input, RawInput::IDLE, 10);
}

#[test]
fn test_clockwise_detents_count_exactly() {
    let mut input = InputAggregator::new(&TimingConfig::default());
    let mut increments = 0;
    let mut decrements = 0;

    for _ in 0..25 {
        detent_cw(&mut input);
        if input.increment() {
            increments += 1;
        }
        if input.decrement() {
            decrements += 1;
        }
        input.clear_rotation();
    }

    assert_eq!(increments, 25);
    assert_eq!(decrements, 0);
}

#[test]
fn test_counter_clockwise_detents_count_exactly() {
    let mut input = InputAggregator::new(&TimingConfig::default());
    let mut increments = 0;
    let mut decrements = 0;

    for _ in 0..17 {
        detent_ccw(&mut input);
        increments += input.increment() as u32;
        decrements += input.decrement() as u32;
        input.clear_rotation();
    }

    assert_eq!(increments, 0);
    assert_eq!(decrements, 17);
}

#[test]
fn test_hold_499_ticks_is_confirm() {
    let mut input = InputAggregator::new(&TimingConfig::default());
    hold_encoder_button(&mut input, 499);

    assert!(input.encoder_button().is_confirm());
    assert!(!input.encoder_button().is_cancel());
}

#[test]
fn test_hold_500_ticks_is_cancel() {
    let mut input = InputAggregator::new(&TimingConfig::default());
    hold_encoder_button(&mut input, 500);

    assert!(input.encoder_button().is_cancel());
    assert!(!input.encoder_button().is_confirm());
}

#[test]
fn test_press_timer_resets_between_presses() {
    let mut input = InputAggregator::new(&TimingConfig::default());
    hold_encoder_button(&mut input, 400);
    input.encoder_button_mut().clear_confirm();
    assert_eq!(input.encoder_button().press_ticks(), 0);

    // A second 400-tick press is not the sum of both.
    hold_encoder_button(&mut input, 400);
    assert!(input.encoder_button().is_confirm());
    assert!(!input.encoder_button().is_cancel());
}

#[test]
fn test_aux_button_classified_independently() {
    let mut input = InputAggregator::new(&TimingConfig::default());
    feed(&mut input, RawInput::IDLE.with_aux(true), 600);
    feed(&mut input, RawInput::IDLE, 10);

    assert!(input.aux_button().is_cancel());
    assert!(!input.encoder_button().is_confirm());
    assert!(!input.encoder_button().is_cancel());

    input.aux_button_mut().clear_cancel();
    assert!(!input.aux_button().is_cancel());
}

#[test]
fn test_bounce_shorter_than_confirm_count_ignored() {
    let mut input = InputAggregator::new(&TimingConfig::default());
    for _ in 0..20 {
        feed(&mut input, RawInput::IDLE.with_button(true), 2);
        feed(&mut input, RawInput::IDLE, 2);
    }
    assert!(!input.encoder_button().is_confirm());
    assert!(!input.encoder_button().is_cancel());
}

#[test]
fn test_idle_timeout_after_threshold() {
    let mut input = InputAggregator::new(&TimingConfig::default());

    assert_eq!(feed(&mut input, RawInput::IDLE, 4_990), None);
    assert_eq!(feed(&mut input, RawInput::IDLE, 20), Some(IdleEdge::TimedOut));
    assert!(input.is_idle());

    // Rotation re-arms
    let mut woke = None;
    for raw in [
        RawInput::IDLE.with_quadrature(false, true),
        RawInput::IDLE.with_quadrature(false, false),
    ] {
        woke = feed(&mut input, raw, 5).or(woke);
    }
    assert_eq!(woke, Some(IdleEdge::Resumed));
    assert!(!input.is_idle());
}

#[test]
fn test_debouncer_standalone() {
    let mut line = Debouncer::new(4);
    for _ in 0..3 {
        line.update(false);
    }
    assert!(line.level());
    line.update(false);
    assert!(!line.level());
    assert!(line.is_pressed());
    assert!(!line.is_released());
}
