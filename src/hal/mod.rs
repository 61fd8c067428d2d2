//! Hardware Abstraction Layer for RustWavegen.
//!
//! Collaborator traits the control loop talks to, plus host-side fakes.
//! Business logic stays in core modules, HAL is just I/O.

pub mod dac;
pub mod display;
pub mod gpio;
pub mod timer;

pub use dac::{dac_frame, RecordingSink, DAC_CHANNEL};
pub use display::{TextFrame, DISPLAY_COLS, DISPLAY_ROWS};
pub use gpio::InputPins;
pub use timer::{RecordingTimer, REFERENCE_TICK_RATE_HZ};

/// Failures of fire-and-forget hardware calls.
///
/// The collaborator traits never report errors upward; drivers count them
/// here so they stay visible.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ErrorCount(u32);

impl ErrorCount {
    pub const fn new() -> Self {
        Self(0)
    }

    /// Count `result` if it failed. Returns true on success.
    #[inline]
    pub fn record<T, E>(&mut self, result: Result<T, E>) -> bool {
        match result {
            Ok(_) => true,
            Err(_) => {
                self.0 = self.0.wrapping_add(1);
                false
            }
        }
    }

    #[inline]
    pub fn get(&self) -> u32 {
        self.0
    }
}

/// Character display. Fire-and-forget: nothing here reports failure.
pub trait Display {
    fn clear(&mut self);
    /// Move the cursor (1-based column and row).
    fn goto(&mut self, col: u8, row: u8);
    fn write_str(&mut self, s: &str);
    fn set_backlight(&mut self, on: bool);
}

/// Destination of output codes, one per pump tick. Never blocks, never fails.
pub trait OutputSink {
    fn write(&mut self, code: u16);
}

/// Periodic timer clocking the output pump.
pub trait OutputTimer {
    /// Timer input clock after prescaling.
    fn tick_rate_hz(&self) -> u32;
    /// Reload value: the pump fires every `period + 1` timer ticks.
    fn set_period(&mut self, period: u16);
}

impl<D: Display + ?Sized> Display for &mut D {
    fn clear(&mut self) {
        (**self).clear()
    }

    fn goto(&mut self, col: u8, row: u8) {
        (**self).goto(col, row)
    }

    fn write_str(&mut self, s: &str) {
        (**self).write_str(s)
    }

    fn set_backlight(&mut self, on: bool) {
        (**self).set_backlight(on)
    }
}

impl<S: OutputSink + ?Sized> OutputSink for &mut S {
    #[inline]
    fn write(&mut self, code: u16) {
        (**self).write(code)
    }
}

impl<T: OutputTimer + ?Sized> OutputTimer for &mut T {
    fn tick_rate_hz(&self) -> u32 {
        (**self).tick_rate_hz()
    }

    fn set_period(&mut self, period: u16) {
        (**self).set_period(period)
    }
}
