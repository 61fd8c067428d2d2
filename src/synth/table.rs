//! Output code table shared between the control loop and the output pump.
//!
//! ```text
//! Controller (10 ms)          WaveTable             Output ISR (f·L)
//! ──────────────────          ─────────             ────────────────
//!
//! publish(codes) ──▶ write [inactive bank] ──▶ swap active ──▶ sample(i)
//!                     Relaxed stores          Release/Acquire
//! ```
//!
//! Two banks of `SAMPLE_COUNT` atomic codes. The writer fills the inactive
//! bank, then flips the active index. The pump only ever reads the active
//! bank, so it never sees a half-written waveform. Single writer.

use core::sync::atomic::{AtomicU16, AtomicU32, AtomicU8, Ordering};

use super::waveform::CodeBuffer;
use crate::config::SAMPLE_COUNT;

/// Code for 0 mV, used until the first publish.
const MIDSCALE: u16 = 32_768;

/// Double-buffered, lock-free output code table.
pub struct WaveTable {
    banks: [[AtomicU16; SAMPLE_COUNT]; 2],
    active: AtomicU8,
    generation: AtomicU32,
}

impl WaveTable {
    /// Table holding a flat 0 mV output in both banks.
    pub const fn new() -> Self {
        Self {
            banks: [const { [const { AtomicU16::new(MIDSCALE) }; SAMPLE_COUNT] }; 2],
            active: AtomicU8::new(0),
            generation: AtomicU32::new(0),
        }
    }

    /// Replace the waveform (writer side).
    pub fn publish(&self, codes: &CodeBuffer) {
        let next = (self.active.load(Ordering::Relaxed) ^ 1) & 1;
        for (slot, &code) in self.banks[next as usize].iter().zip(codes.iter()) {
            slot.store(code, Ordering::Relaxed);
        }
        self.active.store(next, Ordering::Release);
        self.generation.fetch_add(1, Ordering::Relaxed);
    }

    /// Code at `index` (modulo `SAMPLE_COUNT`) from the active bank (reader side).
    #[inline]
    pub fn sample(&self, index: usize) -> u16 {
        let bank = (self.active.load(Ordering::Acquire) & 1) as usize;
        self.banks[bank][index % SAMPLE_COUNT].load(Ordering::Relaxed)
    }

    /// Copy of the active bank.
    pub fn snapshot(&self) -> CodeBuffer {
        let bank = (self.active.load(Ordering::Acquire) & 1) as usize;
        let mut out = [0u16; SAMPLE_COUNT];
        for (dst, src) in out.iter_mut().zip(self.banks[bank].iter()) {
            *dst = src.load(Ordering::Relaxed);
        }
        out
    }

    /// Number of publishes so far.
    #[inline]
    pub fn generation(&self) -> u32 {
        self.generation.load(Ordering::Relaxed)
    }
}

impl Default for WaveTable {
    fn default() -> Self {
        Self::new()
    }
}
