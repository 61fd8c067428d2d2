//! Output pump timer.

use super::OutputTimer;

/// 80 MHz APB clock through a /32 prescaler.
pub const REFERENCE_TICK_RATE_HZ: u32 = 80_000_000 / 32;

/// Host timer that remembers the last period it was given.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct RecordingTimer {
    tick_rate_hz: u32,
    period: Option<u16>,
    updates: u32,
}

impl RecordingTimer {
    pub const fn new(tick_rate_hz: u32) -> Self {
        Self {
            tick_rate_hz,
            period: None,
            updates: 0,
        }
    }

    /// Last programmed period, `None` before the first call.
    pub fn period(&self) -> Option<u16> {
        self.period
    }

    pub fn updates(&self) -> u32 {
        self.updates
    }
}

impl Default for RecordingTimer {
    fn default() -> Self {
        Self::new(REFERENCE_TICK_RATE_HZ)
    }
}

impl OutputTimer for RecordingTimer {
    fn tick_rate_hz(&self) -> u32 {
        self.tick_rate_hz
    }

    fn set_period(&mut self, period: u16) {
        self.period = Some(period);
        self.updates = self.updates.wrapping_add(1);
    }
}

#[cfg(target_os = "espidf")]
pub use esp::PumpTimer;

#[cfg(target_os = "espidf")]
mod esp {
    use crate::hal::{ErrorCount, OutputTimer};
    use esp_idf_svc::hal::peripheral::Peripheral;
    use esp_idf_svc::hal::timer::{config::Config, Timer, TimerDriver};
    use esp_idf_svc::sys::EspError;

    /// Hardware timer whose alarm clocks the output pump.
    pub struct PumpTimer<'d> {
        driver: TimerDriver<'d>,
        errors: ErrorCount,
    }

    impl<'d> PumpTimer<'d> {
        pub fn new(timer: impl Peripheral<P = impl Timer> + 'd) -> Result<Self, EspError> {
            let config = Config::new().divider(32).auto_reload(true);
            let driver = TimerDriver::new(timer, &config)?;
            Ok(Self {
                driver,
                errors: ErrorCount::new(),
            })
        }

        pub fn driver(&mut self) -> &mut TimerDriver<'d> {
            &mut self.driver
        }

        /// Alarm reprograms that failed since startup.
        pub fn errors(&self) -> u32 {
            self.errors.get()
        }
    }

    impl OutputTimer for PumpTimer<'_> {
        fn tick_rate_hz(&self) -> u32 {
            self.driver.tick_hz() as u32
        }

        fn set_period(&mut self, period: u16) {
            // Alarm fires once the counter reaches period + 1.
            // On failure the previous period stays in effect.
            self.errors.record(self.driver.set_alarm(period as u64 + 1));
        }
    }
}
