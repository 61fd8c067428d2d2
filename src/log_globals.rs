//! Global log stream instance.

use crate::logging::LogStream;

/// Control loop log stream.
///
/// Single producer (the controller), single consumer (the console drain).
pub static LOG: LogStream = LogStream::new();
