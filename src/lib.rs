//! # RustWavegen
//!
//! Control loop of a single-channel periodic waveform generator.
//!
//! ## Architecture
//!
//! Three independently clocked activities share one parameter set:
//! - Fast tick (1 ms): debounce + input events ([`input`])
//! - Menu tick (every `MENU_DIVIDER` fast ticks): [`menu::Menu::step`]
//! - Output tick (`frequency × SAMPLE_COUNT` Hz): [`synth::OutputPump`]
//!
//! The [`Controller`] owns all mutable state. The only thing shared with the
//! output tick is the lock-free [`WaveTable`].

#![cfg_attr(not(test), no_std)]

pub mod config;
pub mod controller;
pub mod hal;
pub mod input;
pub mod log_drain;
pub mod log_globals;
pub mod logging;
pub mod menu;
pub mod params;
pub mod synth;

/// Build version, `Wavegen v<semver>-g<git hash>`.
pub const VERSION: &str = env!("VERSION_STRING");

pub use config::TimingConfig;
pub use controller::{Controller, Phase};
pub use input::{InputAggregator, RawInput};
pub use log_globals::LOG;
pub use menu::{Menu, MenuAction, MenuState, RemoteFrame, SaveOutcome};
pub use params::{Field, Shape, WaveformParams};
pub use synth::{OutputPump, Synthesizer, WaveTable};
