//! Error types for the Vitrine engine
//!
//! This module defines the error types used throughout the engine.
//! Lookup misses and invalid geometric queries are NOT errors (they degrade
//! to no-ops or invalid results); only device failures and rejected
//! parameters surface here.

use std::fmt;

/// Result type for Vitrine engine operations
pub type Result<T> = std::result::Result<T, Error>;

/// Vitrine engine errors
#[derive(Debug, Clone)]
pub enum Error {
    /// Render device failure (context lost, draw submission failed, etc.)
    BackendError(String),

    /// Out of GPU memory
    OutOfMemory,

    /// Invalid resource (buffer, pass, drawable, etc.)
    InvalidResource(String),

    /// Initialization failed (device, pipeline, subsystems)
    InitializationFailed(String),

    /// A parameter value was rejected (NaN, out of range)
    InvalidParameter(String),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::BackendError(msg) => write!(f, "Backend error: {}", msg),
            Error::OutOfMemory => write!(f, "Out of GPU memory"),
            Error::InvalidResource(msg) => write!(f, "Invalid resource: {}", msg),
            Error::InitializationFailed(msg) => write!(f, "Initialization failed: {}", msg),
            Error::InvalidParameter(msg) => write!(f, "Invalid parameter: {}", msg),
        }
    }
}

impl std::error::Error for Error {}

/// Build an `Error::BackendError`, logging it with file:line first
///
/// # Example
///
/// ```ignore
/// let buffer = buffers.get(id)
///     .ok_or_else(|| engine_err!("vitrine::MockDevice", "Unknown buffer {:?}", id))?;
/// ```
#[macro_export]
macro_rules! engine_err {
    ($source:expr, $($arg:tt)*) => {{
        let message = format!($($arg)*);
        $crate::engine_error!($source, "{}", message);
        $crate::vitrine::Error::BackendError(message)
    }};
}

/// Log and return an `Error::BackendError` from the current function
#[macro_export]
macro_rules! engine_bail {
    ($source:expr, $($arg:tt)*) => {
        return Err($crate::engine_err!($source, $($arg)*))
    };
}

/// Log and build an `Error::InvalidParameter`
#[macro_export]
macro_rules! engine_invalid_param {
    ($source:expr, $($arg:tt)*) => {{
        let message = format!($($arg)*);
        $crate::engine_warn!($source, "Rejected parameter: {}", message);
        $crate::vitrine::Error::InvalidParameter(message)
    }};
}

#[cfg(test)]
#[path = "error_tests.rs"]
mod tests;
