//! Module: config
//!
//! Purpose: Timing configuration and persisted parameter storage.
//!
//! Architecture:
//! - Every duration is expressed in fast service ticks (1 ms)
//! - The menu runs once every `menu_divider` ticks and consumes its dwell
//!   counters `menu_divider` ticks at a time, so constants never depend on
//!   the caller's cadence
//! - `record`: fixed binary layout of the saved parameter set
//! - `nvs`: persistence contract, load/save with magic validation
//!
//! Safety: Safe. Plain `Copy` values, no globals.

pub mod nvs;
pub mod record;

pub use nvs::{load_params, save_params, LoadOutcome, MemoryStore, PersistError, Persistence};
pub use record::{ParamRecord, RecordError, RECORD_LEN};

/// Fast service tick period in microseconds.
pub const TICK_PERIOD_US: u32 = 1_000;

/// Consecutive identical samples before a level change is accepted.
pub const DEBOUNCE_TICKS: u8 = 3;

/// Held duration at or above which a button release counts as cancel.
pub const LONG_PRESS_TICKS: u16 = 500;

/// Inactivity before the idle timeout fires (backlight off).
pub const IDLE_TIMEOUT_TICKS: u16 = 5_000;

/// The menu state machine runs once per this many fast ticks.
pub const MENU_DIVIDER: u16 = 10;

/// How long the save result screen stays up.
pub const SAVE_DWELL_TICKS: u16 = 2_000;

/// How long the remote save acknowledgment stays up.
pub const REMOTE_ACK_DWELL_TICKS: u16 = 2_000;

/// Boot splash duration before the menu starts.
pub const STARTUP_SPLASH_TICKS: u16 = 3_000;

/// Number of samples in one waveform period.
pub const SAMPLE_COUNT: usize = 100;

/// Timing policy handed to the controller.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TimingConfig {
    pub debounce_ticks: u8,
    pub long_press_ticks: u16,
    pub idle_timeout_ticks: u16,
    pub menu_divider: u16,
    pub save_dwell_ticks: u16,
    pub remote_ack_dwell_ticks: u16,
    pub splash_ticks: u16,
}

impl Default for TimingConfig {
    fn default() -> Self {
        Self {
            debounce_ticks: DEBOUNCE_TICKS,
            long_press_ticks: LONG_PRESS_TICKS,
            idle_timeout_ticks: IDLE_TIMEOUT_TICKS,
            menu_divider: MENU_DIVIDER,
            save_dwell_ticks: SAVE_DWELL_TICKS,
            remote_ack_dwell_ticks: REMOTE_ACK_DWELL_TICKS,
            splash_ticks: STARTUP_SPLASH_TICKS,
        }
    }
}

impl TimingConfig {
    /// Number of menu steps a dwell of `ticks` lasts (at least one).
    #[inline]
    pub fn dwell_steps(&self, ticks: u16) -> u16 {
        let div = self.menu_divider.max(1) as u32;
        ((ticks as u32 + div - 1) / div).max(1) as u16
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_dwell_steps_default() {
        let t = TimingConfig::default();
        // 2 s at one menu step per 10 ms
        assert_eq!(t.dwell_steps(SAVE_DWELL_TICKS), 200);
    }

    #[test]
    fn test_dwell_steps_rounds_up() {
        let t = TimingConfig { menu_divider: 3, ..Default::default() };
        assert_eq!(t.dwell_steps(10), 4);
        assert_eq!(t.dwell_steps(0), 1);
    }
}
