//! LTC2604 quad 16-bit DAC.
//!
//! SPI, 24-bit frames: command nibble, address nibble, 16-bit code MSB first.
//! Reference: LTC2604 datasheet

use super::OutputSink;

/// DAC channel carrying the waveform.
pub const DAC_CHANNEL: u8 = 0;

/// LTC2604 command nibbles
#[allow(dead_code)]
mod cmd {
    pub const WRITE: u8 = 0x0;
    pub const UPDATE: u8 = 0x1;
    pub const WRITE_UPDATE_ALL: u8 = 0x2;
    pub const WRITE_UPDATE: u8 = 0x3;
    pub const POWER_DOWN: u8 = 0x4;
    pub const NOP: u8 = 0xF;
}

/// Build the "write and update channel" frame for `code`.
#[inline]
pub const fn dac_frame(channel: u8, code: u16) -> [u8; 3] {
    [
        (cmd::WRITE_UPDATE << 4) | (channel & 0x0F),
        (code >> 8) as u8,
        code as u8,
    ]
}

/// Host sink that records every code it receives.
#[derive(Debug, Default)]
pub struct RecordingSink {
    codes: heapless::Vec<u16, 1024>,
    total: u32,
}

impl RecordingSink {
    pub fn new() -> Self {
        Self::default()
    }

    /// First codes received (capacity-limited).
    pub fn codes(&self) -> &[u16] {
        &self.codes
    }

    /// Number of writes, including those past capacity.
    pub fn total(&self) -> u32 {
        self.total
    }
}

impl OutputSink for RecordingSink {
    fn write(&mut self, code: u16) {
        let _ = self.codes.push(code);
        self.total = self.total.wrapping_add(1);
    }
}

#[cfg(target_os = "espidf")]
pub use esp::Ltc2604;

#[cfg(target_os = "espidf")]
mod esp {
    use super::{dac_frame, DAC_CHANNEL};
    use crate::hal::{ErrorCount, OutputSink};
    use esp_idf_svc::hal::spi::{SpiDeviceDriver, SpiDriver};

    /// SPI-attached LTC2604 driving one channel.
    pub struct Ltc2604<'d> {
        spi: SpiDeviceDriver<'d, SpiDriver<'d>>,
        errors: ErrorCount,
    }

    impl<'d> Ltc2604<'d> {
        pub fn new(spi: SpiDeviceDriver<'d, SpiDriver<'d>>) -> Self {
            Self { spi, errors: ErrorCount::new() }
        }

        /// SPI transfers that failed since startup.
        pub fn errors(&self) -> u32 {
            self.errors.get()
        }
    }

    impl OutputSink for Ltc2604<'_> {
        fn write(&mut self, code: u16) {
            // A dropped sample is repaired by the next one.
            self.errors.record(self.spi.write(&dac_frame(DAC_CHANNEL, code)));
        }
    }
}
