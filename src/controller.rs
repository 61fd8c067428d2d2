//! Control loop context.
//!
//! Owns every piece of mutable state: live params, input aggregator, menu,
//! synthesizer. Hardware is reached only through the collaborator traits.
//!
//! ```text
//! fast tick (1 ms) ──▶ InputAggregator::tick ──▶ idle backlight
//!        │
//!        └─ every MENU_DIVIDER ticks ──▶ Menu::step ──▶ commit / save
//!                                                       │
//!                          Synthesizer ──▶ WaveTable ◀──┘ (pump reads)
//! ```

use crate::config::nvs::{load_params, save_params, LoadOutcome, Persistence};
use crate::config::TimingConfig;
use crate::hal::{Display, OutputTimer};
use crate::input::{IdleEdge, InputAggregator, RawInput};
use crate::logging::LogStream;
use crate::menu::{screen, Menu, MenuAction, RemoteFrame, SaveOutcome};
use crate::params::{Field, WaveformParams};
use crate::synth::{period_ticks, SampleBuffer, Synthesizer, WaveTable};
use crate::{rt_error, rt_info, rt_warn};

/// Startup progress.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Phase {
    /// `start` not called yet.
    Boot,
    /// Splash on screen, input drained.
    Splash { ticks_left: u16 },
    Running,
}

/// The waveform generator control loop.
pub struct Controller<'a, D, P, T>
where
    D: Display,
    P: Persistence,
    T: OutputTimer,
{
    timing: TimingConfig,
    params: WaveformParams,
    input: InputAggregator,
    menu: Menu,
    synth: Synthesizer,
    table: &'a WaveTable,
    log: &'a LogStream,
    display: D,
    store: P,
    timer: T,
    phase: Phase,
    tick: u32,
    menu_phase: u16,
}

impl<'a, D, P, T> Controller<'a, D, P, T>
where
    D: Display,
    P: Persistence,
    T: OutputTimer,
{
    pub fn new(
        timing: TimingConfig,
        table: &'a WaveTable,
        log: &'a LogStream,
        display: D,
        store: P,
        timer: T,
    ) -> Self {
        Self {
            input: InputAggregator::new(&timing),
            menu: Menu::new(&timing),
            timing,
            params: WaveformParams::DEFAULT,
            synth: Synthesizer::new(),
            table,
            log,
            display,
            store,
            timer,
            phase: Phase::Boot,
            tick: 0,
            menu_phase: 0,
        }
    }

    /// Show the splash screen. Params are loaded once it times out.
    pub fn start(&mut self) {
        if self.phase != Phase::Boot {
            return;
        }
        screen::draw_splash(&mut self.display, env!("CARGO_PKG_VERSION"));
        self.display.set_backlight(true);
        rt_info!(self.log, self.tick, "boot: {}", crate::VERSION);

        if self.timing.splash_ticks == 0 {
            self.finish_startup();
        } else {
            self.phase = Phase::Splash {
                ticks_left: self.timing.splash_ticks,
            };
        }
    }

    /// One fast tick. `raw` is this tick's input sample.
    pub fn tick(&mut self, raw: RawInput) {
        self.tick = self.tick.wrapping_add(1);

        match self.phase {
            Phase::Boot => {
                self.start();
                self.input.tick(raw);
            }
            Phase::Splash { ticks_left } => {
                self.input.tick(raw);
                let ticks_left = ticks_left.saturating_sub(1);
                if ticks_left == 0 {
                    self.input.clear_all();
                    self.finish_startup();
                } else {
                    self.phase = Phase::Splash { ticks_left };
                }
            }
            Phase::Running => {
                if let Some(edge) = self.input.tick(raw) {
                    self.on_idle_edge(edge);
                }

                self.menu_phase += 1;
                if self.menu_phase >= self.timing.menu_divider.max(1) {
                    self.menu_phase = 0;
                    self.service_menu();
                }
            }
        }
    }

    /// Lock or unlock local control.
    pub fn set_remote_lock(&mut self, locked: bool) {
        if self.menu.is_remote_locked() != locked {
            rt_info!(self.log, self.tick, "remote lock {}", if locked { "on" } else { "off" });
        }
        self.menu.set_remote_lock(locked);
    }

    /// Apply a decoded remote message. Returns the ack frame after a save
    /// request; its `save` flag tells whether the write succeeded.
    pub fn apply_remote(&mut self, frame: &RemoteFrame) -> Option<RemoteFrame> {
        if self.phase != Phase::Running {
            rt_warn!(self.log, self.tick, "remote: ignored during startup");
            return None;
        }

        if frame.shape().is_none() {
            rt_warn!(self.log, self.tick, "remote: unknown shape code {}, kept", frame.shape_code);
        }

        let before = self.params;
        let save_requested = self.menu.apply_remote(frame, &mut self.params);
        rt_info!(
            self.log,
            self.tick,
            "remote: {} {} Hz {} mV {} mV",
            self.params.shape.name(),
            self.params.frequency,
            self.params.amplitude,
            self.params.offset
        );

        if self.params.frequency != before.frequency {
            self.update_period();
        }
        if (self.params.shape, self.params.amplitude, self.params.offset)
            != (before.shape, before.amplitude, before.offset)
        {
            self.resynthesize();
        }

        let ack = if save_requested {
            let saved = match save_params(&mut self.store, &self.params) {
                Ok(stamped) => {
                    self.params = stamped;
                    rt_info!(self.log, self.tick, "remote: saved");
                    true
                }
                Err(e) => {
                    rt_error!(self.log, self.tick, "remote: save failed: {}", e);
                    false
                }
            };
            Some(self.menu.finish_remote_save(saved, &self.params))
        } else {
            None
        };

        self.menu.render(&mut self.display, &self.params);
        ack
    }

    #[inline]
    pub fn params(&self) -> &WaveformParams {
        &self.params
    }

    #[inline]
    pub fn menu(&self) -> &Menu {
        &self.menu
    }

    #[inline]
    pub fn samples(&self) -> &SampleBuffer {
        self.synth.samples()
    }

    #[inline]
    pub fn phase(&self) -> Phase {
        self.phase
    }

    #[inline]
    pub fn input(&self) -> &InputAggregator {
        &self.input
    }

    /// Fast ticks since construction.
    #[inline]
    pub fn ticks(&self) -> u32 {
        self.tick
    }

    pub fn display(&self) -> &D {
        &self.display
    }

    pub fn store(&self) -> &P {
        &self.store
    }

    pub fn timer(&self) -> &T {
        &self.timer
    }

    fn finish_startup(&mut self) {
        self.display.clear();

        let (params, outcome) = load_params(&mut self.store);
        self.params = params;
        match outcome {
            LoadOutcome::Restored => rt_info!(self.log, self.tick, "params restored"),
            LoadOutcome::Defaulted(e) => rt_warn!(self.log, self.tick, "params defaulted: {}", e),
        }

        self.resynthesize();
        self.update_period();

        self.menu.reset();
        self.menu_phase = 0;
        self.phase = Phase::Running;
        self.menu.render(&mut self.display, &self.params);
    }

    fn service_menu(&mut self) {
        match self.menu.step(&mut self.input, &self.params) {
            MenuAction::None => {}
            MenuAction::Commit { field, working } => self.commit(field, &working),
            MenuAction::Save(record) => {
                rt_info!(self.log, self.tick, "save requested");
                let outcome = match save_params(&mut self.store, &record) {
                    Ok(saved) => {
                        self.params = saved;
                        rt_info!(self.log, self.tick, "saved");
                        SaveOutcome::Saved
                    }
                    Err(e) => {
                        rt_error!(self.log, self.tick, "save failed: {}", e);
                        SaveOutcome::Failed
                    }
                };
                self.menu.finish_save(outcome);
            }
            MenuAction::SaveAborted => rt_info!(self.log, self.tick, "save cancelled"),
        }

        self.menu.render(&mut self.display, &self.params);
    }

    fn commit(&mut self, field: Field, working: &WaveformParams) {
        self.params.take_field(working, field);
        match field {
            Field::Shape => rt_info!(self.log, self.tick, "shape = {}", self.params.shape.name()),
            Field::Frequency => rt_info!(self.log, self.tick, "frequency = {} Hz", self.params.frequency),
            Field::Amplitude => rt_info!(self.log, self.tick, "amplitude = {} mV", self.params.amplitude),
            Field::Offset => rt_info!(self.log, self.tick, "offset = {} mV", self.params.offset),
        }

        if field == Field::Frequency {
            self.update_period();
        } else {
            self.resynthesize();
        }
    }

    fn resynthesize(&mut self) {
        self.synth.update(&self.params);
        self.table.publish(self.synth.codes());
    }

    fn update_period(&mut self) {
        let period = period_ticks(self.timer.tick_rate_hz(), self.params.frequency);
        self.timer.set_period(period);
    }

    fn on_idle_edge(&mut self, edge: IdleEdge) {
        match edge {
            IdleEdge::TimedOut => {
                self.display.set_backlight(false);
                rt_info!(self.log, self.tick, "idle: backlight off");
            }
            IdleEdge::Resumed => {
                self.display.set_backlight(true);
                rt_info!(self.log, self.tick, "idle: backlight on");
            }
        }
    }
}
