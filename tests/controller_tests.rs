//! Controller integration tests
//!
//! Full control loop against the host collaborators: frame-buffer display,
//! in-memory store, recording timer. One `tick` = 1 ms.

use rust_wavegen::config::nvs::{save_params, MemoryStore};
use rust_wavegen::config::TimingConfig;
use rust_wavegen::hal::{RecordingTimer, TextFrame};
use rust_wavegen::input::RawInput;
use rust_wavegen::logging::LogStream;
use rust_wavegen::menu::{MenuState, RemoteFrame, SaveOutcome};
use rust_wavegen::params::{Field, Shape, WaveformParams};
use rust_wavegen::synth::{output_code, WaveTable};
use rust_wavegen::{Controller, Phase};

type Ctl<'a> = Controller<'a, TextFrame, MemoryStore, RecordingTimer>;

fn controller<'a>(table: &'a WaveTable, log: &'a LogStream, store: MemoryStore) -> Ctl<'a> {
    Controller::new(
        TimingConfig::default(),
        table,
        log,
        TextFrame::new(),
        store,
        RecordingTimer::default(),
    )
}

fn run(ctl: &mut Ctl<'_>, raw: RawInput, ticks: u32) {
    for _ in 0..ticks {
        ctl.tick(raw);
    }
}

fn boot(ctl: &mut Ctl<'_>) {
    ctl.start();
    run(ctl, RawInput::IDLE, 3_000);
    assert_eq!(ctl.phase(), Phase::Running);
}

fn cw(ctl: &mut Ctl<'_>) {
    run(ctl, RawInput::IDLE.with_quadrature(false, true), 5);
    run(ctl, RawInput::IDLE.with_quadrature(false, false), 5);
    run(ctl, RawInput::IDLE, 20);
}

fn press(ctl: &mut Ctl<'_>, ticks: u32) {
    run(ctl, RawInput::IDLE.with_button(true), ticks);
    run(ctl, RawInput::IDLE, 20);
}

fn aux(ctl: &mut Ctl<'_>, ticks: u32) {
    run(ctl, RawInput::IDLE.with_aux(true), ticks);
    run(ctl, RawInput::IDLE, 20);
}

fn logged(log: &LogStream, needle: &str) -> bool {
    let mut found = false;
    while let Some(entry) = log.drain() {
        found |= entry.message().contains(needle);
    }
    found
}

#[test]
fn test_startup_splash_then_defaults() {
    let table = WaveTable::new();
    let log = LogStream::new();
    let mut ctl = controller(&table, &log, MemoryStore::blank());

    ctl.start();
    assert!(ctl.display().line(0).contains("Waveform generator"));
    run(&mut ctl, RawInput::IDLE, 2_999);
    assert!(matches!(ctl.phase(), Phase::Splash { .. }));

    run(&mut ctl, RawInput::IDLE, 1);
    assert_eq!(ctl.phase(), Phase::Running);
    assert_eq!(*ctl.params(), WaveformParams::DEFAULT);
    assert_eq!(*ctl.menu().state(), MenuState::Select(Field::Shape));
    assert_eq!(ctl.display().line(0), "*Shape = Sine");
    assert_eq!(ctl.display().line(1), " Freq [Hz] 20");
    assert_eq!(ctl.timer().period(), Some(1_249));
    assert!(logged(&log, "params defaulted"));
}

#[test]
fn test_startup_restores_saved_params() {
    let saved = WaveformParams {
        shape: Shape::Square,
        frequency: 1_000,
        amplitude: 2_000,
        offset: 100,
        ..WaveformParams::DEFAULT
    };
    let mut store = MemoryStore::blank();
    save_params(&mut store, &saved).unwrap();

    let table = WaveTable::new();
    let log = LogStream::new();
    let mut ctl = controller(&table, &log, store);
    boot(&mut ctl);

    assert_eq!(*ctl.params(), saved);
    assert_eq!(ctl.timer().period(), Some(24));
    assert_eq!(ctl.samples()[0], 1_900);
    assert_eq!(table.sample(0), output_code(1_900));
    assert!(logged(&log, "params restored"));
}

#[test]
fn test_input_during_splash_is_dropped() {
    let table = WaveTable::new();
    let log = LogStream::new();
    let mut ctl = controller(&table, &log, MemoryStore::blank());
    ctl.start();
    run(&mut ctl, RawInput::IDLE.with_button(true), 100);
    run(&mut ctl, RawInput::IDLE, 2_900);
    assert_eq!(ctl.phase(), Phase::Running);

    run(&mut ctl, RawInput::IDLE, 50);
    assert_eq!(*ctl.menu().state(), MenuState::Select(Field::Shape));
}

#[test]
fn test_edit_amplitude_end_to_end() {
    let table = WaveTable::new();
    let log = LogStream::new();
    let mut ctl = controller(&table, &log, MemoryStore::blank());
    boot(&mut ctl);

    cw(&mut ctl);
    cw(&mut ctl);
    assert_eq!(*ctl.menu().state(), MenuState::Select(Field::Amplitude));

    press(&mut ctl, 50);
    for _ in 0..3 {
        cw(&mut ctl);
    }
    assert_eq!(ctl.params().amplitude, 0, "not committed yet");
    assert_eq!(ctl.display().line(2), "?Ampl [mV] 300");

    press(&mut ctl, 50);
    assert_eq!(ctl.params().amplitude, 300);
    assert_eq!(ctl.display().line(2), "*Ampl [mV] 300");

    // Sine peak at a quarter period
    assert_eq!(ctl.samples()[25], 300);
    assert_eq!(table.sample(25), 33_751);
    assert!(logged(&log, "amplitude = 300 mV"));
}

#[test]
fn test_frequency_commit_reprograms_timer_only() {
    let table = WaveTable::new();
    let log = LogStream::new();
    let mut ctl = controller(&table, &log, MemoryStore::blank());
    boot(&mut ctl);
    let generation = table.generation();

    cw(&mut ctl);
    press(&mut ctl, 50);
    for _ in 0..4 {
        cw(&mut ctl);
    }
    press(&mut ctl, 50);

    assert_eq!(ctl.params().frequency, 100);
    assert_eq!(ctl.timer().period(), Some(249));
    assert_eq!(table.generation(), generation, "buffer untouched by frequency");
}

#[test]
fn test_save_via_long_aux_press() {
    let table = WaveTable::new();
    let log = LogStream::new();
    let mut ctl = controller(&table, &log, MemoryStore::blank());
    boot(&mut ctl);

    aux(&mut ctl, 50);
    assert_eq!(*ctl.menu().state(), MenuState::ConfirmSave);
    assert_eq!(ctl.display().line(1), " Save ?");

    aux(&mut ctl, 700);
    assert_eq!(ctl.store().writes, 1);
    assert_eq!(ctl.display().line(1), " Save OK");
    assert!(logged(&log, "saved"));

    run(&mut ctl, RawInput::IDLE, 2_000);
    assert_eq!(*ctl.menu().state(), MenuState::Select(Field::Shape));
}

#[test]
fn test_save_failure_reported() {
    let table = WaveTable::new();
    let log = LogStream::new();
    let mut store = MemoryStore::blank();
    store.fail_writes = true;
    let mut ctl = controller(&table, &log, store);
    boot(&mut ctl);

    aux(&mut ctl, 50);
    aux(&mut ctl, 700);
    assert!(matches!(
        ctl.menu().state(),
        MenuState::SaveResult { outcome: SaveOutcome::Failed, .. }
    ));
    assert_eq!(ctl.display().line(1), " Save FAILED");
    assert!(logged(&log, "save failed"));
}

#[test]
fn test_save_cancelled_by_rotation() {
    let table = WaveTable::new();
    let log = LogStream::new();
    let mut ctl = controller(&table, &log, MemoryStore::blank());
    boot(&mut ctl);

    aux(&mut ctl, 50);
    cw(&mut ctl);
    assert_eq!(ctl.store().writes, 0);
    assert_eq!(ctl.display().line(1), " Save CANCELLED");
    assert!(logged(&log, "save cancelled"));
}

#[test]
fn test_idle_turns_backlight_off_and_on() {
    let table = WaveTable::new();
    let log = LogStream::new();
    let mut ctl = controller(&table, &log, MemoryStore::blank());
    boot(&mut ctl);
    assert!(ctl.display().backlight());

    run(&mut ctl, RawInput::IDLE, 5_100);
    assert!(!ctl.display().backlight());

    press(&mut ctl, 50);
    assert!(ctl.display().backlight());
}

#[test]
fn test_remote_lock_and_save() {
    let table = WaveTable::new();
    let log = LogStream::new();
    let mut ctl = controller(&table, &log, MemoryStore::blank());
    boot(&mut ctl);

    ctl.set_remote_lock(true);
    run(&mut ctl, RawInput::IDLE, 10);
    assert!(ctl.display().line(0).starts_with('#'));

    cw(&mut ctl);
    press(&mut ctl, 50);
    assert_eq!(*ctl.menu().state(), MenuState::Select(Field::Shape), "local input drained");

    let frame = RemoteFrame {
        shape_code: 2,
        frequency: 500,
        amplitude: 1_000,
        offset: -200,
        save: true,
    };
    let ack = ctl.apply_remote(&frame).expect("ack after save");

    assert_eq!(ack, frame);
    assert_eq!(ctl.params().shape, Shape::Sawtooth);
    assert_eq!(ctl.timer().period(), Some(49));
    assert_eq!(ctl.store().writes, 1);
    assert_eq!(ctl.display().line(1), " Remote save OK");

    run(&mut ctl, RawInput::IDLE, 2_000);
    assert_eq!(*ctl.menu().state(), MenuState::Select(Field::Shape));
    assert!(logged(&log, "remote: saved"));
}

#[test]
fn test_remote_unknown_shape_keeps_shape() {
    let table = WaveTable::new();
    let log = LogStream::new();
    let mut ctl = controller(&table, &log, MemoryStore::blank());
    boot(&mut ctl);

    let frame = RemoteFrame {
        shape_code: 42,
        frequency: 20,
        amplitude: 500,
        offset: 0,
        save: false,
    };
    assert_eq!(ctl.apply_remote(&frame), None);
    assert_eq!(ctl.params().shape, Shape::Sine);
    assert_eq!(ctl.params().amplitude, 500);
    assert_eq!(ctl.samples()[25], 500);
    assert!(logged(&log, "unknown shape code 42"));
}

#[test]
fn test_remote_ignored_before_startup() {
    let table = WaveTable::new();
    let log = LogStream::new();
    let mut ctl = controller(&table, &log, MemoryStore::blank());
    ctl.start();

    let frame = RemoteFrame {
        shape_code: 3,
        frequency: 1_000,
        amplitude: 1_000,
        offset: 0,
        save: true,
    };
    assert_eq!(ctl.apply_remote(&frame), None);
    assert_eq!(ctl.store().writes, 0);
}

#[test]
fn test_remote_save_write_failure_reported() {
    let table = WaveTable::new();
    let log = LogStream::new();
    let mut store = MemoryStore::blank();
    store.fail_writes = true;
    let mut ctl = controller(&table, &log, store);
    boot(&mut ctl);

    let frame = RemoteFrame {
        shape_code: 1,
        frequency: 200,
        amplitude: 1_500,
        offset: 0,
        save: true,
    };
    let ack = ctl.apply_remote(&frame).expect("ack after save request");

    assert!(!ack.save, "ack must not claim a save");
    assert_eq!(ctl.store().writes, 0);
    assert_eq!(ctl.display().line(1), " Save FAILED");
    assert_eq!(ctl.params().amplitude, 1_500, "values still applied");
    assert!(logged(&log, "remote: save failed"));

    run(&mut ctl, RawInput::IDLE, 2_000);
    assert_eq!(*ctl.menu().state(), MenuState::Select(Field::Shape));
}

#[test]
fn test_remote_frame_overrides_edit_in_progress() {
    let table = WaveTable::new();
    let log = LogStream::new();
    let mut ctl = controller(&table, &log, MemoryStore::blank());
    boot(&mut ctl);

    cw(&mut ctl);
    cw(&mut ctl);
    press(&mut ctl, 50);
    cw(&mut ctl);
    assert_eq!(ctl.display().line(2), "?Ampl [mV] 100");

    ctl.set_remote_lock(true);
    let frame = RemoteFrame {
        shape_code: 3,
        frequency: 1_000,
        amplitude: 4_000,
        offset: 200,
        save: false,
    };
    assert_eq!(ctl.apply_remote(&frame), None);
    assert_eq!(ctl.display().line(0), "#Shape = Square");
    assert_eq!(ctl.display().line(1), "#Freq [Hz] 1000");
    assert_eq!(ctl.display().line(2), "#Ampl [mV] 4000");
    assert_eq!(ctl.display().line(3), "#Offset [mV] 200");

    ctl.set_remote_lock(false);
    press(&mut ctl, 50);
    press(&mut ctl, 50);
    assert_eq!(ctl.params().amplitude, 4_000, "stale edit not committed");
    assert_eq!(ctl.samples()[0], 3_800);
}
