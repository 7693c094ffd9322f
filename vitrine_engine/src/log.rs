//! Logging for the Vitrine engine
//!
//! Every engine component logs under a `vitrine::<Component>` source through
//! the `engine_*!` macros. The installed `Logger` decides what it keeps:
//! `Engine` asks `Logger::enabled` before an entry is formatted, so filtered
//! trace output in the frame loop costs one call.
//!
//! `DefaultLogger` prints colored lines to stdout and can be narrowed to a
//! minimum severity and to one source prefix (e.g. `vitrine::RenderPipeline`
//! while tuning the composite).

use std::fmt;
use std::time::SystemTime;
use colored::*;
use chrono::{DateTime, Local};

/// Sink for engine log entries
///
/// ```no_run
/// use vitrine_engine::vitrine::log::{Logger, LogEntry, LogSeverity};
///
/// /// Keeps only pipeline warnings and errors
/// struct PipelineAlerts;
///
/// impl Logger for PipelineAlerts {
///     fn enabled(&self, severity: LogSeverity, source: &str) -> bool {
///         severity >= LogSeverity::Warn && source == "vitrine::RenderPipeline"
///     }
///
///     fn log(&self, entry: &LogEntry) {
///         eprintln!("{}", entry);
///     }
/// }
/// ```
pub trait Logger: Send + Sync {
    /// Whether entries of `severity` from `source` should be built at all.
    /// Entries rejected here never reach `log`.
    fn enabled(&self, _severity: LogSeverity, _source: &str) -> bool {
        true
    }

    fn log(&self, entry: &LogEntry);
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum LogSeverity {
    Trace,
    Debug,
    Info,
    Warn,
    Error,
}

impl LogSeverity {
    pub const ALL: [LogSeverity; 5] = [
        LogSeverity::Trace,
        LogSeverity::Debug,
        LogSeverity::Info,
        LogSeverity::Warn,
        LogSeverity::Error,
    ];

    /// Fixed-width upper-case tag used in log lines
    pub fn label(self) -> &'static str {
        match self {
            LogSeverity::Trace => "TRACE",
            LogSeverity::Debug => "DEBUG",
            LogSeverity::Info => "INFO ",
            LogSeverity::Warn => "WARN ",
            LogSeverity::Error => "ERROR",
        }
    }

    /// Parse a level name such as `"warn"` or `"ERROR"`
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|s| s.label().trim().eq_ignore_ascii_case(name.trim()))
    }

    pub(crate) fn from_u8(value: u8) -> Self {
        match value {
            0 => LogSeverity::Trace,
            1 => LogSeverity::Debug,
            2 => LogSeverity::Info,
            3 => LogSeverity::Warn,
            _ => LogSeverity::Error,
        }
    }

    fn colored_label(self) -> ColoredString {
        match self {
            LogSeverity::Trace => self.label().bright_black(),
            LogSeverity::Debug => self.label().cyan(),
            LogSeverity::Info => self.label().green(),
            LogSeverity::Warn => self.label().yellow(),
            LogSeverity::Error => self.label().red().bold(),
        }
    }
}

/// One log record
#[derive(Debug, Clone)]
pub struct LogEntry {
    pub severity: LogSeverity,
    pub timestamp: SystemTime,
    /// Emitting component, e.g. `vitrine::World`
    pub source: String,
    pub message: String,
    /// Set for errors logged through `engine_error!`
    pub file: Option<&'static str>,
    pub line: Option<u32>,
}

impl LogEntry {
    pub fn new(severity: LogSeverity, source: &str, message: String) -> Self {
        Self {
            severity,
            timestamp: SystemTime::now(),
            source: source.to_string(),
            message,
            file: None,
            line: None,
        }
    }

    pub fn with_location(mut self, file: &'static str, line: u32) -> Self {
        self.file = Some(file);
        self.line = Some(line);
        self
    }

    /// `file:line`, when the entry carries one
    pub fn location(&self) -> Option<String> {
        match (self.file, self.line) {
            (Some(file), Some(line)) => Some(format!("{}:{}", file, line)),
            _ => None,
        }
    }
}

/// Plain line without timestamp or colors: `[WARN ] [vitrine::World] message (file:line)`
impl fmt::Display for LogEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] [{}] {}", self.severity.label(), self.source, self.message)?;
        if let Some(location) = self.location() {
            write!(f, " ({})", location)?;
        }
        Ok(())
    }
}

/// Colored stdout logger: `[timestamp] [SEVERITY] [source] message (file:line)`
#[derive(Debug, Clone)]
pub struct DefaultLogger {
    min_severity: LogSeverity,
    source_prefix: Option<String>,
}

impl DefaultLogger {
    /// Everything, from every source
    pub fn new() -> Self {
        Self { min_severity: LogSeverity::Trace, source_prefix: None }
    }

    pub fn with_min_severity(mut self, severity: LogSeverity) -> Self {
        self.min_severity = severity;
        self
    }

    /// Keep only sources starting with `prefix`. Errors always pass.
    pub fn with_source_prefix(mut self, prefix: &str) -> Self {
        self.source_prefix = Some(prefix.to_string());
        self
    }

    pub fn min_severity(&self) -> LogSeverity {
        self.min_severity
    }

    /// The line `log` prints for `entry`
    pub fn format(&self, entry: &LogEntry) -> String {
        let datetime: DateTime<Local> = entry.timestamp.into();
        let mut line = format!(
            "[{}] [{}] [{}] {}",
            datetime.format("%Y-%m-%d %H:%M:%S%.3f"),
            entry.severity.colored_label(),
            entry.source.bright_blue(),
            entry.message
        );
        if let Some(location) = entry.location() {
            line.push_str(&format!(" ({})", location));
        }
        line
    }
}

impl Default for DefaultLogger {
    fn default() -> Self {
        Self::new()
    }
}

impl Logger for DefaultLogger {
    fn enabled(&self, severity: LogSeverity, source: &str) -> bool {
        if severity < self.min_severity {
            return false;
        }
        match &self.source_prefix {
            Some(prefix) => severity == LogSeverity::Error || source.starts_with(prefix.as_str()),
            None => true,
        }
    }

    fn log(&self, entry: &LogEntry) {
        println!("{}", self.format(entry));
    }
}

// ===== LOGGING MACROS =====

/// Shared body of the `engine_*!` macros: checks `Engine::enabled` before
/// formatting anything
#[doc(hidden)]
#[macro_export]
macro_rules! engine_log {
    ($severity:ident, $source:expr, $($arg:tt)*) => {{
        let severity = $crate::vitrine::log::LogSeverity::$severity;
        let source: &str = $source;
        if $crate::vitrine::Engine::enabled(severity, source) {
            $crate::vitrine::Engine::log(severity, source, format!($($arg)*));
        }
    }};
}

/// ```ignore
/// engine_trace!("vitrine::World", "Polling {} pending objects", count);
/// ```
#[macro_export]
macro_rules! engine_trace {
    ($source:expr, $($arg:tt)*) => {
        $crate::engine_log!(Trace, $source, $($arg)*)
    };
}

/// ```ignore
/// engine_debug!("vitrine::World", "Registered '{}'", name);
/// ```
#[macro_export]
macro_rules! engine_debug {
    ($source:expr, $($arg:tt)*) => {
        $crate::engine_log!(Debug, $source, $($arg)*)
    };
}

#[macro_export]
macro_rules! engine_info {
    ($source:expr, $($arg:tt)*) => {
        $crate::engine_log!(Info, $source, $($arg)*)
    };
}

#[macro_export]
macro_rules! engine_warn {
    ($source:expr, $($arg:tt)*) => {
        $crate::engine_log!(Warn, $source, $($arg)*)
    };
}

/// Error with the call site's file:line attached
///
/// ```ignore
/// engine_error!("vitrine::RenderPipeline", "Stage failed: {}", error);
/// ```
#[macro_export]
macro_rules! engine_error {
    ($source:expr, $($arg:tt)*) => {{
        let severity = $crate::vitrine::log::LogSeverity::Error;
        let source: &str = $source;
        if $crate::vitrine::Engine::enabled(severity, source) {
            $crate::vitrine::Engine::log_detailed(severity, source, format!($($arg)*), file!(), line!());
        }
    }};
}

#[cfg(test)]
#[path = "log_tests.rs"]
mod tests;
