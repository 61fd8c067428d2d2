//! RustWavegen - Main entry point
//!
//! On target: NVS-backed params, encoder on GPIO, LTC2604 on SPI, output
//! pump clocked by a hardware timer. On host: a short scripted session
//! against the in-memory collaborators, printed to stdout.

use rust_wavegen::WaveTable;

/// Waveform shared between the control loop and the output pump.
static TABLE: WaveTable = WaveTable::new();

/// `core::fmt::Write` over stdout.
struct Stdout;

impl core::fmt::Write for Stdout {
    fn write_str(&mut self, s: &str) -> core::fmt::Result {
        use std::io::Write;
        std::io::stdout().write_all(s.as_bytes()).map_err(|_| core::fmt::Error)
    }
}

#[cfg(not(target_os = "espidf"))]
fn main() {
    use rust_wavegen::config::MemoryStore;
    use rust_wavegen::hal::{RecordingSink, RecordingTimer, TextFrame, DISPLAY_ROWS};
    use rust_wavegen::log_drain::drain_to;
    use rust_wavegen::{Controller, OutputPump, RawInput, TimingConfig, LOG};

    let timing = TimingConfig::default();
    let mut ctl = Controller::new(
        timing,
        &TABLE,
        &LOG,
        TextFrame::new(),
        MemoryStore::blank(),
        RecordingTimer::default(),
    );
    ctl.start();

    let run = |ctl: &mut Controller<'_, _, _, _>, raw: RawInput, ticks: u32| {
        for _ in 0..ticks {
            ctl.tick(raw);
        }
    };

    // Splash, then Amplitude: two detents down the ring, edit, +3, confirm.
    run(&mut ctl, RawInput::IDLE, timing.splash_ticks as u32 + 10);
    for _ in 0..2 {
        run(&mut ctl, RawInput::IDLE.with_quadrature(false, true), 10);
        run(&mut ctl, RawInput::IDLE.with_quadrature(false, false), 10);
        run(&mut ctl, RawInput::IDLE, 20);
    }
    run(&mut ctl, RawInput::IDLE.with_button(true), 50);
    run(&mut ctl, RawInput::IDLE, 20);
    for _ in 0..3 {
        run(&mut ctl, RawInput::IDLE.with_quadrature(false, true), 10);
        run(&mut ctl, RawInput::IDLE.with_quadrature(false, false), 10);
        run(&mut ctl, RawInput::IDLE, 20);
    }
    run(&mut ctl, RawInput::IDLE.with_button(true), 50);
    run(&mut ctl, RawInput::IDLE, 20);

    let mut pump = OutputPump::new();
    let mut sink = RecordingSink::new();
    for _ in 0..100 {
        pump.tick(&TABLE, &mut sink);
    }

    for row in 0..DISPLAY_ROWS {
        println!("| {:<20} |", ctl.display().line(row));
    }
    println!(
        "period = {:?}, peak code = {:?}",
        ctl.timer().period(),
        sink.codes().iter().max()
    );
    drain_to(&LOG, &mut Stdout);
}

#[cfg(target_os = "espidf")]
fn main() {
    esp_idf_svc::sys::link_patches();

    if let Err(e) = firmware::run() {
        println!("fatal: {}", e);
    }
}

#[cfg(target_os = "espidf")]
mod firmware {
    use core::num::NonZeroU32;
    use std::sync::mpsc;

    use esp_idf_svc::hal::delay::{FreeRtos, BLOCK};
    use esp_idf_svc::hal::gpio::AnyIOPin;
    use esp_idf_svc::hal::prelude::*;
    use esp_idf_svc::hal::spi::{config::Config as SpiConfig, SpiDeviceDriver, SpiDriver, SpiDriverConfig};
    use esp_idf_svc::hal::task::notification::Notification;
    use esp_idf_svc::nvs::EspDefaultNvsPartition;
    use esp_idf_svc::sys::EspError;

    use rust_wavegen::config::nvs::{NvsStore, PersistError};
    use rust_wavegen::hal::dac::Ltc2604;
    use rust_wavegen::hal::gpio::InputReader;
    use rust_wavegen::hal::timer::PumpTimer;
    use rust_wavegen::hal::{InputPins, TextFrame, DISPLAY_ROWS};
    use rust_wavegen::log_drain::drain_to;
    use rust_wavegen::{Controller, OutputPump, TimingConfig, LOG};

    use super::{Stdout, TABLE};

    /// Startup failure.
    #[derive(Debug)]
    pub enum Fatal {
        Esp(EspError),
        Persist(PersistError),
    }

    impl core::fmt::Display for Fatal {
        fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
            match self {
                Fatal::Esp(e) => write!(f, "{}", e),
                Fatal::Persist(e) => write!(f, "{}", e),
            }
        }
    }

    impl From<EspError> for Fatal {
        fn from(e: EspError) -> Self {
            Fatal::Esp(e)
        }
    }

    impl From<PersistError> for Fatal {
        fn from(e: PersistError) -> Self {
            Fatal::Persist(e)
        }
    }

    pub fn run() -> Result<(), Fatal> {
        let peripherals = Peripherals::take()?;

        let store = NvsStore::open(EspDefaultNvsPartition::take()?)?;
        // SAFETY: these pins are not handed to any other driver.
        let inputs = unsafe { InputReader::new(&InputPins::default())? };

        let spi = SpiDriver::new(
            peripherals.spi2,
            peripherals.pins.gpio12,
            peripherals.pins.gpio11,
            None::<AnyIOPin>,
            &SpiDriverConfig::new(),
        )?;
        let spi = SpiDeviceDriver::new(spi, Some(peripherals.pins.gpio10), &SpiConfig::new().baudrate(20.MHz().into()))?;
        let mut dac = Ltc2604::new(spi);

        // Pump task owns its notification; hand the notifier back for the ISR.
        let (tx, rx) = mpsc::channel();
        std::thread::Builder::new()
            .name("pump".into())
            .stack_size(4096)
            .spawn(move || {
                let notification = Notification::new();
                if tx.send(notification.notifier()).is_err() {
                    return;
                }
                let mut pump = OutputPump::new();
                loop {
                    if notification.wait(BLOCK).is_some() {
                        pump.tick(&TABLE, &mut dac);
                    }
                }
            })
            .map_err(|_| EspError::from_infallible::<{ esp_idf_svc::sys::ESP_FAIL }>())?;
        let notifier = rx
            .recv()
            .map_err(|_| EspError::from_infallible::<{ esp_idf_svc::sys::ESP_FAIL }>())?;

        let mut timer = PumpTimer::new(peripherals.timer00)?;
        // SAFETY: the callback only signals the pump task.
        unsafe {
            timer.driver().subscribe(move || {
                notifier.notify_and_yield(NonZeroU32::MIN);
            })?;
        }
        timer.driver().enable_interrupt()?;
        timer.driver().enable_alarm(true)?;
        timer.driver().enable(true)?;

        let mut ctl = Controller::new(TimingConfig::default(), &TABLE, &LOG, TextFrame::new(), store, timer);
        ctl.start();

        let mut shown = ctl.display().clone();
        loop {
            ctl.tick(inputs.read());

            if *ctl.display() != shown {
                shown = ctl.display().clone();
                for row in 0..DISPLAY_ROWS {
                    println!("| {:<20} |", shown.line(row));
                }
            }
            drain_to(&LOG, &mut Stdout);

            FreeRtos::delay_ms(1);
        }
    }
}
