//! Leveled diagnostics, written straight to the error descriptor.
//!
//! This channel is for the runtime's own complaints (allocator misuse,
//! failed bootstrap steps). It bypasses the buffered streams so it can
//! fire from any context, and it writes through an untracked descriptor
//! write so emitting a diagnostic never disturbs the last-error cell.

use core::fmt;
use core::sync::atomic::{AtomicU8, Ordering};

use husk_abi::STDERR_FD;

use crate::syscall;

#[repr(u8)]
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Level {
    Error = 0,
    Warn = 1,
    Info = 2,
    Debug = 3,
    Trace = 4,
}

impl Level {
    fn from_raw(raw: u8) -> Self {
        match raw {
            0 => Level::Error,
            1 => Level::Warn,
            2 => Level::Info,
            3 => Level::Debug,
            _ => Level::Trace,
        }
    }
}

static CURRENT_LEVEL: AtomicU8 = AtomicU8::new(Level::Info as u8);

#[inline(always)]
fn is_enabled(level: Level) -> bool {
    level as u8 <= CURRENT_LEVEL.load(Ordering::Relaxed)
}

pub fn set_level(level: Level) {
    CURRENT_LEVEL.store(level as u8, Ordering::Relaxed);
}

pub fn get_level() -> Level {
    Level::from_raw(CURRENT_LEVEL.load(Ordering::Relaxed))
}

pub fn is_enabled_level(level: Level) -> bool {
    is_enabled(level)
}

pub fn log_args(level: Level, args: fmt::Arguments<'_>) {
    if !is_enabled(level) {
        return;
    }
    struct SinkWriter;
    impl fmt::Write for SinkWriter {
        fn write_str(&mut self, s: &str) -> fmt::Result {
            syscall::write_untracked(STDERR_FD, s.as_bytes());
            Ok(())
        }
    }
    let _ = fmt::write(&mut SinkWriter, args);
    syscall::write_untracked(STDERR_FD, b"\n");
}

#[macro_export]
macro_rules! rtlog {
    ($level:expr, $($arg:tt)*) => {{
        $crate::rtlog::log_args($level, ::core::format_args!($($arg)*));
    }};
}

#[macro_export]
macro_rules! rtlog_error {
    ($($arg:tt)*) => {
        $crate::rtlog::log_args($crate::rtlog::Level::Error, ::core::format_args!($($arg)*))
    };
}

#[macro_export]
macro_rules! rtlog_warn {
    ($($arg:tt)*) => {
        $crate::rtlog::log_args($crate::rtlog::Level::Warn, ::core::format_args!($($arg)*))
    };
}

#[macro_export]
macro_rules! rtlog_info {
    ($($arg:tt)*) => {
        $crate::rtlog::log_args($crate::rtlog::Level::Info, ::core::format_args!($($arg)*))
    };
}

#[macro_export]
macro_rules! rtlog_debug {
    ($($arg:tt)*) => {
        $crate::rtlog::log_args($crate::rtlog::Level::Debug, ::core::format_args!($($arg)*))
    };
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn level_gate_is_inclusive() {
        set_level(Level::Warn);
        assert!(is_enabled_level(Level::Error));
        assert!(is_enabled_level(Level::Warn));
        assert!(!is_enabled_level(Level::Info));
        set_level(Level::Info);
        assert_eq!(get_level(), Level::Info);
    }
}
