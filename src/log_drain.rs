//! Console log output.
//!
//! Drains a [`LogStream`] into any `core::fmt::Write` sink: stdout on host,
//! the ESP-IDF console (UART0) on target. Runs outside the control loop,
//! blocking writes are fine here.
//!
//! Line format: `[      tick] LEVEL: message`

use core::fmt::Write;

use crate::logging::{LogEntry, LogStream};

/// Write one entry as a full line.
pub fn format_log_entry<W: Write + ?Sized>(out: &mut W, entry: &LogEntry) -> core::fmt::Result {
    writeln!(out, "[{:10}] {}: {}", entry.tick, entry.level.as_str(), entry.message())
}

/// Write every pending entry, then a warning if messages were dropped.
///
/// Returns the number of entries written.
pub fn drain_to<W: Write + ?Sized, const N: usize>(stream: &LogStream<N>, out: &mut W) -> usize {
    let mut written = 0;
    while let Some(entry) = stream.drain() {
        if format_log_entry(out, &entry).is_err() {
            break;
        }
        written += 1;
    }

    let dropped = stream.take_dropped();
    if dropped > 0 {
        let _ = writeln!(out, "[WARN] Dropped: {}", dropped);
    }

    written
}
