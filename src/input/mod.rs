//! Operator input: rotary encoder with push-button plus one auxiliary button.
//!
//! Sampled every fast tick (1 ms). Pure logic, fully testable on host.

pub mod debounce;
pub mod events;
pub mod raw;

pub use debounce::Debouncer;
pub use events::{ButtonEvents, IdleEdge, InputAggregator};
pub use raw::RawInput;
