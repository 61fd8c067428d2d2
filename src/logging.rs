//! RT-safe logging for RustWavegen.
//!
//! ```text
//! Control loop           LogStream            Drain (console)
//! ────────────           ─────────            ───────────────
//!
//! rt_info!() ─────────▶ [L0][L1][L2] ──────▶ stdout / UART
//! non-blocking            lock-free           blocking ok
//! ```
//!
//! # Rules
//!
//! - The control loop never prints directly, it uses the `rt_*!` macros.
//! - Messages are dropped (and counted) when the ring is full.
//! - Timestamps are fast-tick counts, not wall clock.

use core::cell::UnsafeCell;
use core::fmt::Write;
use core::sync::atomic::{AtomicU32, Ordering};

use heapless::String;

/// Maximum message length in bytes.
pub const MAX_MSG_LEN: usize = 64;

/// Default ring capacity in entries.
pub const LOG_BUFFER_SIZE: usize = 64;

/// Formatted message, truncated to [`MAX_MSG_LEN`].
pub type Message = String<MAX_MSG_LEN>;

/// Severity, most severe first.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord)]
#[repr(u8)]
pub enum LogLevel {
    Error = 0,
    Warn = 1,
    Info = 2,
    Debug = 3,
    Trace = 4,
}

impl LogLevel {
    /// Label printed by the console drain.
    pub fn as_str(self) -> &'static str {
        match self {
            LogLevel::Error => "ERROR",
            LogLevel::Warn => "WARN",
            LogLevel::Info => "INFO",
            LogLevel::Debug => "DEBUG",
            LogLevel::Trace => "TRACE",
        }
    }
}

/// One queued log line.
#[derive(Clone, Copy)]
pub struct LogEntry {
    /// Fast-tick count when the entry was produced.
    pub tick: u32,
    pub level: LogLevel,
    len: u8,
    msg: [u8; MAX_MSG_LEN],
}

impl LogEntry {
    const EMPTY: Self = Self {
        tick: 0,
        level: LogLevel::Info,
        len: 0,
        msg: [0; MAX_MSG_LEN],
    };

    pub fn new(tick: u32, level: LogLevel, text: &str) -> Self {
        let mut entry = Self::EMPTY;
        entry.tick = tick;
        entry.level = level;
        let mut len = text.len().min(MAX_MSG_LEN);
        while !text.is_char_boundary(len) {
            len -= 1;
        }
        entry.msg[..len].copy_from_slice(&text.as_bytes()[..len]);
        entry.len = len as u8;
        entry
    }

    /// Message text. Truncation always lands on a char boundary.
    pub fn message(&self) -> &str {
        core::str::from_utf8(&self.msg[..self.len as usize]).unwrap_or("<invalid utf8>")
    }
}

impl Default for LogEntry {
    fn default() -> Self {
        Self::EMPTY
    }
}

/// Lock-free log ring (single producer, single consumer).
///
/// The control loop is the only producer. The console drain is the only
/// consumer. Push never blocks.
pub struct LogStream<const N: usize = LOG_BUFFER_SIZE> {
    entries: UnsafeCell<[LogEntry; N]>,
    write_idx: AtomicU32,
    read_idx: AtomicU32,
    dropped: AtomicU32,
}

// SAFETY: one producer owns the slot at write_idx until it publishes it with
// a Release store; the single consumer only reads slots below write_idx.
unsafe impl<const N: usize> Sync for LogStream<N> {}
unsafe impl<const N: usize> Send for LogStream<N> {}

impl<const N: usize> LogStream<N> {
    const MASK: usize = N - 1;

    /// Empty ring. `N` must be a power of two.
    pub const fn new() -> Self {
        assert!(N.is_power_of_two(), "LogStream capacity must be a power of two");

        Self {
            entries: UnsafeCell::new([LogEntry::EMPTY; N]),
            write_idx: AtomicU32::new(0),
            read_idx: AtomicU32::new(0),
            dropped: AtomicU32::new(0),
        }
    }

    /// Queue an entry. Returns `false` if the ring was full and it was dropped.
    #[inline]
    pub fn push(&self, tick: u32, level: LogLevel, text: &str) -> bool {
        let write = self.write_idx.load(Ordering::Relaxed);
        let read = self.read_idx.load(Ordering::Acquire);

        if write.wrapping_sub(read) >= N as u32 {
            self.dropped.fetch_add(1, Ordering::Relaxed);
            return false;
        }

        let idx = (write as usize) & Self::MASK;

        // SAFETY: slot `write` is not visible to the consumer until the
        // Release store below.
        unsafe {
            (*self.entries.get())[idx] = LogEntry::new(tick, level, text);
        }

        self.write_idx.store(write.wrapping_add(1), Ordering::Release);
        true
    }

    /// Take the oldest entry, `None` if empty.
    #[inline]
    pub fn drain(&self) -> Option<LogEntry> {
        let read = self.read_idx.load(Ordering::Relaxed);
        let write = self.write_idx.load(Ordering::Acquire);

        if read == write {
            return None;
        }

        let idx = (read as usize) & Self::MASK;

        // SAFETY: Single consumer, slot published by the Acquire above
        let entry = unsafe { (*self.entries.get())[idx] };

        self.read_idx.store(read.wrapping_add(1), Ordering::Release);
        Some(entry)
    }

    /// Entries lost to a full ring since the last `take_dropped`.
    #[inline]
    pub fn dropped(&self) -> u32 {
        self.dropped.load(Ordering::Relaxed)
    }

    /// Read and zero the dropped counter.
    #[inline]
    pub fn take_dropped(&self) -> u32 {
        self.dropped.swap(0, Ordering::Relaxed)
    }

    /// Entries waiting for the drain.
    #[inline]
    pub fn pending(&self) -> u32 {
        let read = self.read_idx.load(Ordering::Relaxed);
        let write = self.write_idx.load(Ordering::Acquire);
        write.wrapping_sub(read)
    }
}

impl<const N: usize> Default for LogStream<N> {
    fn default() -> Self {
        Self::new()
    }
}

/// Format into a fixed-capacity message, truncating on overflow.
pub fn format_message(args: core::fmt::Arguments<'_>) -> Message {
    struct Truncating(Message);

    impl Write for Truncating {
        fn write_str(&mut self, s: &str) -> core::fmt::Result {
            for c in s.chars() {
                if self.0.push(c).is_err() {
                    break;
                }
            }
            Ok(())
        }
    }

    let mut out = Truncating(Message::new());
    let _ = out.write_fmt(args);
    out.0
}

/// RT-safe log macro.
///
/// ```ignore
/// rt_log!(LogLevel::Info, LOG, tick, "freq {} Hz", freq);
/// ```
#[macro_export]
macro_rules! rt_log {
    ($level:expr, $stream:expr, $tick:expr, $($arg:tt)*) => {{
        let msg = $crate::logging::format_message(format_args!($($arg)*));
        $stream.push($tick, $level, &msg);
    }};
}

/// RT-safe info log.
#[macro_export]
macro_rules! rt_info {
    ($stream:expr, $tick:expr, $($arg:tt)*) => {
        $crate::rt_log!($crate::logging::LogLevel::Info, $stream, $tick, $($arg)*)
    };
}

/// RT-safe warning log.
#[macro_export]
macro_rules! rt_warn {
    ($stream:expr, $tick:expr, $($arg:tt)*) => {
        $crate::rt_log!($crate::logging::LogLevel::Warn, $stream, $tick, $($arg)*)
    };
}

/// RT-safe error log.
#[macro_export]
macro_rules! rt_error {
    ($stream:expr, $tick:expr, $($arg:tt)*) => {
        $crate::rt_log!($crate::logging::LogLevel::Error, $stream, $tick, $($arg)*)
    };
}

/// RT-safe debug log.
#[macro_export]
macro_rules! rt_debug {
    ($stream:expr, $tick:expr, $($arg:tt)*) => {
        $crate::rt_log!($crate::logging::LogLevel::Debug, $stream, $tick, $($arg)*)
    };
}

/// RT-safe trace log (maximum verbosity).
#[macro_export]
macro_rules! rt_trace {
    ($stream:expr, $tick:expr, $($arg:tt)*) => {
        $crate::rt_log!($crate::logging::LogLevel::Trace, $stream, $tick, $($arg)*)
    };
}
