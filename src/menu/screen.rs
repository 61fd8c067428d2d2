//! Screen layout (4 lines × 20 columns).
//!
//! ```text
//! *Shape = Sine
//!  Freq [Hz] 20
//!  Ampl [mV] 0
//!  Offset [mV] 0
//! ```
//!
//! Column 1 holds the cursor: `*` selected, `?` editing, `#` remote-locked.

use core::fmt::Write;

use heapless::String;

use super::state::MenuState;
use crate::hal::{Display, DISPLAY_COLS};
use crate::params::{Field, WaveformParams};

type Line = String<DISPLAY_COLS>;

/// Draw the whole screen for `state`.
pub fn draw<D: Display + ?Sized>(display: &mut D, state: &MenuState, live: &WaveformParams, locked: bool) {
    display.clear();
    match *state {
        MenuState::Select(_) | MenuState::Edit { .. } => {
            // A locked screen always mirrors the live (remote) values.
            let shown = match state {
                MenuState::Edit { working, .. } if !locked => working,
                _ => live,
            };
            for field in Field::ALL {
                let line = field_line(field, shown, marker(state, field, locked));
                display.goto(1, field.line() + 1);
                display.write_str(&line);
            }
        }
        MenuState::ConfirmSave => {
            display.goto(2, 2);
            display.write_str("Save ?");
            display.goto(2, 3);
            display.write_str("(long press)");
        }
        MenuState::SaveResult { outcome, .. } => {
            let mut line = Line::new();
            let _ = write!(line, "Save {}", outcome.as_str());
            display.goto(2, 2);
            display.write_str(&line);
        }
        MenuState::RemoteSaved { .. } => {
            display.goto(2, 2);
            display.write_str("Remote save OK");
        }
    }
}

/// Boot banner.
pub fn draw_splash<D: Display + ?Sized>(display: &mut D, version: &str) {
    display.clear();
    display.goto(1, 1);
    display.write_str("Waveform generator");
    let mut line = Line::new();
    let _ = write!(line, "v{}", version);
    display.goto(1, 2);
    display.write_str(&line);
    display.goto(1, 4);
    display.write_str("Loading...");
}

fn marker(state: &MenuState, field: Field, locked: bool) -> char {
    if locked {
        return '#';
    }
    match *state {
        MenuState::Select(f) if f == field => '*',
        MenuState::Edit { field: f, .. } if f == field => '?',
        _ => ' ',
    }
}

/// One field line, truncated to the display width.
pub fn field_line(field: Field, params: &WaveformParams, marker: char) -> Line {
    let mut line = Line::new();
    let _ = match field {
        Field::Shape => write!(line, "{}Shape = {}", marker, params.shape.name()),
        Field::Frequency => write!(line, "{}Freq [Hz] {}", marker, params.frequency),
        Field::Amplitude => write!(line, "{}Ampl [mV] {}", marker, params.amplitude),
        Field::Offset => write!(line, "{}Offset [mV] {}", marker, params.offset),
    };
    line
}
