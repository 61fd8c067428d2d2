//! Input event aggregator.
//!
//! Turns the four debounced lines into semantic, one-shot events:
//!
//! - **Rotation**: decoded on the falling edge of B only (one per detent).
//!   A LOW at that instant means increment, A HIGH means decrement.
//! - **Press classification** (encoder button and auxiliary button):
//!   released before `long_press_ticks` → confirm, otherwise → cancel.
//! - **Idle tracking**: no event for `idle_timeout_ticks` → idle timeout,
//!   re-armed by the next event.
//!
//! Event flags are caller-cleared. A consumer that never clears a flag sees
//! it again on every subsequent tick.
//!
//! # Example
//!
//! ```
//! use rust_wavegen::input::{InputAggregator, RawInput};
//! use rust_wavegen::config::TimingConfig;
//!
//! let mut input = InputAggregator::new(&TimingConfig::default());
//!
//! // Short press of the encoder button
//! for _ in 0..50 {
//!     input.tick(RawInput::IDLE.with_button(true));
//! }
//! for _ in 0..5 {
//!     input.tick(RawInput::IDLE);
//! }
//! assert!(input.encoder_button().is_confirm());
//! ```

use super::debounce::Debouncer;
use super::raw::RawInput;
use crate::config::TimingConfig;

/// Rotation events. At most one is set at a time.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct EncoderEvents {
    increment: bool,
    decrement: bool,
}

/// Press classification state of one push-button.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ButtonEvents {
    confirm: bool,
    cancel: bool,
    press_ticks: u16,
}

impl ButtonEvents {
    /// Short press released.
    #[inline]
    pub fn is_confirm(&self) -> bool {
        self.confirm
    }

    /// Long press released.
    #[inline]
    pub fn is_cancel(&self) -> bool {
        self.cancel
    }

    #[inline]
    pub fn clear_confirm(&mut self) {
        self.confirm = false;
    }

    #[inline]
    pub fn clear_cancel(&mut self) {
        self.cancel = false;
    }

    /// Ticks the button has been held so far (0 when released).
    #[inline]
    pub fn press_ticks(&self) -> u16 {
        self.press_ticks
    }

    #[inline]
    fn clear(&mut self) {
        self.confirm = false;
        self.cancel = false;
    }

    /// Advance the press timer. Returns true on press or release.
    fn track(&mut self, line: &mut Debouncer, long_press_ticks: u16) -> bool {
        let mut activity = false;

        if line.is_pressed() {
            line.clear_pressed();
            self.press_ticks = 0;
            activity = true;
        }

        if line.is_low() {
            self.press_ticks = self.press_ticks.saturating_add(1);
        } else if line.is_released() {
            line.clear_released();
            if self.press_ticks < long_press_ticks {
                self.confirm = true;
            } else {
                self.cancel = true;
            }
            self.press_ticks = 0;
            activity = true;
        }

        activity
    }
}

/// Idle state transition reported by [`InputAggregator::tick`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum IdleEdge {
    /// No activity for the idle timeout.
    TimedOut,
    /// First activity after a timeout.
    Resumed,
}

/// Debounces the raw lines and produces one-shot operator events.
pub struct InputAggregator {
    enc_a: Debouncer,
    enc_b: Debouncer,
    button: Debouncer,
    aux: Debouncer,

    encoder: EncoderEvents,
    button_events: ButtonEvents,
    aux_events: ButtonEvents,

    idle_ticks: u16,
    idle: bool,

    long_press_ticks: u16,
    idle_timeout_ticks: u16,
}

impl InputAggregator {
    pub fn new(timing: &TimingConfig) -> Self {
        Self {
            enc_a: Debouncer::new(timing.debounce_ticks),
            enc_b: Debouncer::new(timing.debounce_ticks),
            button: Debouncer::new(timing.debounce_ticks),
            aux: Debouncer::new(timing.debounce_ticks),
            encoder: EncoderEvents::default(),
            button_events: ButtonEvents::default(),
            aux_events: ButtonEvents::default(),
            idle_ticks: 0,
            idle: false,
            long_press_ticks: timing.long_press_ticks,
            idle_timeout_ticks: timing.idle_timeout_ticks,
        }
    }

    /// Process one raw sample (call every fast tick).
    pub fn tick(&mut self, raw: RawInput) -> Option<IdleEdge> {
        self.enc_a.update(raw.a());
        self.enc_b.update(raw.b());
        self.button.update(raw.button());
        self.aux.update(raw.aux());

        let mut activity = false;

        if self.enc_b.is_pressed() {
            self.enc_b.clear_pressed();
            activity = true;
            if self.enc_a.is_low() {
                self.encoder.increment = true;
                self.encoder.decrement = false;
            } else {
                self.encoder.decrement = true;
                self.encoder.increment = false;
            }
        }
        // Only the B falling edge carries information.
        self.enc_b.clear_released();
        self.enc_a.clear_pressed();
        self.enc_a.clear_released();

        activity |= self.button_events.track(&mut self.button, self.long_press_ticks);
        activity |= self.aux_events.track(&mut self.aux, self.long_press_ticks);

        self.update_idle(activity)
    }

    fn update_idle(&mut self, activity: bool) -> Option<IdleEdge> {
        if activity {
            self.idle_ticks = 0;
            if self.idle {
                self.idle = false;
                return Some(IdleEdge::Resumed);
            }
            return None;
        }

        if self.idle_ticks >= self.idle_timeout_ticks {
            if !self.idle {
                self.idle = true;
                return Some(IdleEdge::TimedOut);
            }
        } else {
            self.idle_ticks += 1;
        }
        None
    }

    #[inline]
    pub fn increment(&self) -> bool {
        self.encoder.increment
    }

    #[inline]
    pub fn decrement(&self) -> bool {
        self.encoder.decrement
    }

    /// Clear both rotation flags.
    #[inline]
    pub fn clear_rotation(&mut self) {
        self.encoder = EncoderEvents::default();
    }

    #[inline]
    pub fn encoder_button(&self) -> &ButtonEvents {
        &self.button_events
    }

    #[inline]
    pub fn encoder_button_mut(&mut self) -> &mut ButtonEvents {
        &mut self.button_events
    }

    #[inline]
    pub fn aux_button(&self) -> &ButtonEvents {
        &self.aux_events
    }

    #[inline]
    pub fn aux_button_mut(&mut self) -> &mut ButtonEvents {
        &mut self.aux_events
    }

    /// Any rotation or encoder button event pending.
    #[inline]
    pub fn any_encoder_event(&self) -> bool {
        self.encoder.increment
            || self.encoder.decrement
            || self.button_events.confirm
            || self.button_events.cancel
    }

    /// Drop every pending event. Press timers and idle state are kept.
    pub fn clear_all(&mut self) {
        self.clear_rotation();
        self.button_events.clear();
        self.aux_events.clear();
    }

    /// Idle timeout currently in effect.
    #[inline]
    pub fn is_idle(&self) -> bool {
        self.idle
    }
}
