//! GPIO HAL for the encoder and push-buttons.
//!
//! All four lines are active-low with pull-ups.

/// Input pin assignment.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct InputPins {
    pub enc_a: i32,
    pub enc_b: i32,
    pub enc_button: i32,
    pub aux_button: i32,
}

impl Default for InputPins {
    fn default() -> Self {
        Self {
            enc_a: 4,
            enc_b: 5,
            enc_button: 6,
            aux_button: 7,
        }
    }
}

#[cfg(target_os = "espidf")]
pub use esp::InputReader;

#[cfg(target_os = "espidf")]
mod esp {
    use super::InputPins;
    use crate::input::RawInput;
    use esp_idf_svc::hal::gpio::{AnyIOPin, Input, PinDriver, Pull};
    use esp_idf_svc::sys::EspError;

    /// Samples the four input lines into a [`RawInput`].
    pub struct InputReader<'d> {
        enc_a: PinDriver<'d, AnyIOPin, Input>,
        enc_b: PinDriver<'d, AnyIOPin, Input>,
        enc_button: PinDriver<'d, AnyIOPin, Input>,
        aux_button: PinDriver<'d, AnyIOPin, Input>,
    }

    impl InputReader<'static> {
        /// Claim the pins named in `pins`.
        ///
        /// # Safety
        ///
        /// The pins must not be owned by any other driver.
        pub unsafe fn new(pins: &InputPins) -> Result<Self, EspError> {
            Ok(Self {
                enc_a: pull_up(AnyIOPin::new(pins.enc_a))?,
                enc_b: pull_up(AnyIOPin::new(pins.enc_b))?,
                enc_button: pull_up(AnyIOPin::new(pins.enc_button))?,
                aux_button: pull_up(AnyIOPin::new(pins.aux_button))?,
            })
        }
    }

    impl InputReader<'_> {
        #[inline]
        pub fn read(&self) -> RawInput {
            RawInput::from_levels(
                self.enc_a.is_high(),
                self.enc_b.is_high(),
                self.enc_button.is_high(),
                self.aux_button.is_high(),
            )
        }
    }

    fn pull_up(pin: AnyIOPin) -> Result<PinDriver<'static, AnyIOPin, Input>, EspError> {
        let mut driver = PinDriver::input(pin)?;
        driver.set_pull(Pull::Up)?;
        Ok(driver)
    }
}
