//! Operator menu: navigate, edit and save the waveform parameters.

pub mod machine;
pub mod remote;
pub mod screen;
pub mod state;

pub use machine::{Menu, MenuAction};
pub use remote::RemoteFrame;
pub use state::{MenuState, SaveOutcome};
