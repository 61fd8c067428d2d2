//! Output pump: one code per output timer tick.
//!
//! Runs in the output timer's context at `frequency × SAMPLE_COUNT` Hz,
//! independent of menu timing. O(1), no allocation, no logging.

use super::table::WaveTable;
use crate::config::SAMPLE_COUNT;
use crate::hal::OutputSink;

/// Cursor over the published waveform.
#[derive(Clone, Copy, Debug, Default)]
pub struct OutputPump {
    index: usize,
}

impl OutputPump {
    pub const fn new() -> Self {
        Self { index: 0 }
    }

    /// Emit the current sample and advance modulo `SAMPLE_COUNT`.
    #[inline]
    pub fn tick<S: OutputSink + ?Sized>(&mut self, table: &WaveTable, sink: &mut S) {
        sink.write(table.sample(self.index));
        self.index += 1;
        if self.index >= SAMPLE_COUNT {
            self.index = 0;
        }
    }

    /// Index of the next sample to emit.
    #[inline]
    pub fn index(&self) -> usize {
        self.index
    }
}
