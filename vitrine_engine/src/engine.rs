//! Process-wide logging hub
//!
//! The viewer itself is an owned `World` value, so the only global state left
//! is the logger and a severity floor applied in front of it. An entry is
//! built only when it clears the floor and the logger's own `enabled` check.

use std::sync::atomic::{AtomicU8, Ordering};
use std::sync::{OnceLock, RwLock};
use crate::log::{Logger, LogEntry, LogSeverity, DefaultLogger};

/// Global logger (initialized with DefaultLogger)
static LOGGER: OnceLock<RwLock<Box<dyn Logger>>> = OnceLock::new();

/// Process-wide floor, checked before the logger is consulted
static MIN_SEVERITY: AtomicU8 = AtomicU8::new(LogSeverity::Trace as u8);

fn logger_lock() -> &'static RwLock<Box<dyn Logger>> {
    LOGGER.get_or_init(|| RwLock::new(Box::new(DefaultLogger::new())))
}

/// Entry point for engine-wide services
///
/// # Example
///
/// ```no_run
/// use vitrine_engine::vitrine::Engine;
/// use vitrine_engine::vitrine::log::LogSeverity;
///
/// Engine::set_min_severity(LogSeverity::Info);
/// Engine::reset_logger();
/// ```
pub struct Engine;

impl Engine {
    /// Replace the global logger
    ///
    /// # Example
    ///
    /// ```no_run
    /// use vitrine_engine::vitrine::Engine;
    /// use vitrine_engine::vitrine::log::{Logger, LogEntry};
    ///
    /// struct Quiet;
    /// impl Logger for Quiet {
    ///     fn log(&self, _entry: &LogEntry) {}
    /// }
    ///
    /// Engine::set_logger(Quiet);
    /// ```
    pub fn set_logger<L: Logger + 'static>(logger: L) {
        if let Ok(mut lock) = logger_lock().write() {
            *lock = Box::new(logger);
        }
    }

    /// Reset logger to default (DefaultLogger) and clear the severity filter
    pub fn reset_logger() {
        if let Ok(mut lock) = logger_lock().write() {
            *lock = Box::new(DefaultLogger::new());
        }
        MIN_SEVERITY.store(LogSeverity::Trace as u8, Ordering::Relaxed);
    }

    /// Drop every entry whose severity is lower than `severity`
    pub fn set_min_severity(severity: LogSeverity) {
        MIN_SEVERITY.store(severity as u8, Ordering::Relaxed);
    }

    /// Current severity filter
    pub fn min_severity() -> LogSeverity {
        LogSeverity::from_u8(MIN_SEVERITY.load(Ordering::Relaxed))
    }

    /// Whether an entry of `severity` from `source` would be logged.
    /// The `engine_*!` macros skip formatting when this is false.
    pub fn enabled(severity: LogSeverity, source: &str) -> bool {
        if severity < Self::min_severity() {
            return false;
        }
        logger_lock()
            .read()
            .map(|logger| logger.enabled(severity, source))
            .unwrap_or(false)
    }

    /// Internal logging method (for simple logs without file:line)
    ///
    /// Used by macros like engine_info!, engine_warn!, etc.
    pub fn log(severity: LogSeverity, source: &str, message: String) {
        Self::dispatch(severity, source, message, None, None);
    }

    /// Internal logging method with file:line information (for ERROR logs)
    ///
    /// Used by engine_error! macro to include source location.
    pub fn log_detailed(
        severity: LogSeverity,
        source: &str,
        message: String,
        file: &'static str,
        line: u32,
    ) {
        Self::dispatch(severity, source, message, Some(file), Some(line));
    }

    fn dispatch(
        severity: LogSeverity,
        source: &str,
        message: String,
        file: Option<&'static str>,
        line: Option<u32>,
    ) {
        if severity < Self::min_severity() {
            return;
        }
        let Ok(logger) = logger_lock().read() else { return };
        if !logger.enabled(severity, source) {
            return;
        }
        let mut entry = LogEntry::new(severity, source, message);
        if let (Some(file), Some(line)) = (file, line) {
            entry = entry.with_location(file, line);
        }
        logger.log(&entry);
    }
}

#[cfg(test)]
#[path = "engine_tests.rs"]
mod tests;
