//! Waveform synthesis and output.
//!
//! ```text
//! WaveformParams ──▶ synthesize() ──▶ SampleBuffer (mV)
//!                                        │
//!                                        ▼ to_output_codes()
//!                    WaveTable ◀── publish(CodeBuffer)
//!                        │
//!                        ▼ OutputPump::tick() @ f·L
//!                    OutputSink (DAC)
//! ```

pub mod lut;
pub mod pump;
pub mod table;
pub mod waveform;

pub use pump::OutputPump;
pub use table::WaveTable;
pub use waveform::{
    output_code, period_ticks, synthesize, to_output_codes, CodeBuffer, SampleBuffer, Synthesizer,
};
