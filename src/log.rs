//! A pluggable logging sink.
//!
//! The teacher kernel has no generic logging crate dependency: console
//! output goes through hand-rolled `print!`/`println!` macros that format
//! into a `core::fmt::Write` target (`src/printf.rs`, `src/console.rs`).
//! NILFS's own C source (`examples/original_source/fs/nilfs2/file.c`) logs
//! the same way in spirit, through `nilfs_info`/`nilfs_warn`/`nilfs_error`
//! macros scoped to a `struct super_block`. This module keeps that shape:
//! the engine never picks a concrete sink, it formats into whatever
//! `Logger` the caller hands it, same as the teacher's `Writer` is the only
//! thing that actually touches hardware.

use core::fmt::Arguments;

/// The logging collaborator. Every accepted and every rejected dedup pair is
/// logged at info/warn level respectively; the final "deduplicated N blocks"
/// summary line is info. Hard failures that abandon a single-file operation
/// outright (an out-of-memory while preparing a marker, an unsupported
/// request) log at error level.
pub trait Logger {
    fn info(&self, args: Arguments<'_>);
    fn warn(&self, args: Arguments<'_>);
    fn error(&self, args: Arguments<'_>);
}

/// Discards everything. Useful where a caller truly does not care.
pub struct NullLogger;

impl Logger for NullLogger {
    fn info(&self, _args: Arguments<'_>) {}
    fn warn(&self, _args: Arguments<'_>) {}
    fn error(&self, _args: Arguments<'_>) {}
}

/// Logs an info-level line through `$logger`.
#[macro_export]
macro_rules! log_info {
    ($logger:expr, $($arg:tt)*) => {
        $crate::log::Logger::info($logger, format_args!($($arg)*))
    };
}

/// Logs a warn-level line through `$logger`.
#[macro_export]
macro_rules! log_warn {
    ($logger:expr, $($arg:tt)*) => {
        $crate::log::Logger::warn($logger, format_args!($($arg)*))
    };
}

/// Logs an error-level line through `$logger`.
#[macro_export]
macro_rules! log_error {
    ($logger:expr, $($arg:tt)*) => {
        $crate::log::Logger::error($logger, format_args!($($arg)*))
    };
}
