//! Error types for the Prism engine
//!
//! This module defines the error types used throughout the engine,
//! including window/context creation, shader compilation and linking,
//! and GPU resource management.

use std::fmt;
use crate::graphics_device::ShaderKind;

/// Result type for Prism engine operations
pub type Result<T> = std::result::Result<T, Error>;

/// Prism engine errors
///
/// Every variant is fatal at the point it is raised: setup aborts, and
/// resources already acquired are released by their owners on the way out.
#[derive(Debug, Clone)]
pub enum Error {
    /// Backend-specific error (OpenGL driver, loader, etc.)
    BackendError(String),

    /// Invalid resource (destroyed buffer, stale key, wrong binding, etc.)
    InvalidResource(String),

    /// Initialization failed (engine, frame driver, subsystems)
    InitializationFailed(String),

    /// Window or graphics context could not be created
    WindowCreationFailed(String),

    /// A shader stage failed to compile; `log` is the driver diagnostic
    CompileFailed {
        stage: ShaderKind,
        log: String,
    },

    /// A program failed to link; `log` is the driver diagnostic
    LinkFailed {
        log: String,
    },

    /// A shader source file could not be read
    SourceUnavailable {
        path: String,
        reason: String,
    },
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::BackendError(msg) => write!(f, "Backend error: {}", msg),
            Error::InvalidResource(msg) => write!(f, "Invalid resource: {}", msg),
            Error::InitializationFailed(msg) => write!(f, "Initialization failed: {}", msg),
            Error::WindowCreationFailed(msg) => write!(f, "ERROR: Failed to create window: {}", msg),
            Error::CompileFailed { stage, log } => write!(
                f,
                "ERROR::SHADER::{}::COMPILATION_FAILED\n{}",
                stage.label(),
                log
            ),
            Error::LinkFailed { log } => write!(f, "ERROR::SHADER::PROGRAM::LINKING_FAILED\n{}", log),
            Error::SourceUnavailable { path, reason } => {
                write!(f, "Shader source '{}' unavailable: {}", path, reason)
            }
        }
    }
}

impl std::error::Error for Error {}

// ===== ERROR MACROS =====

/// Log an ERROR message and build an `Error::BackendError` with the same text
///
/// # Example
///
/// ```ignore
/// let err = engine_err!("prism::opengl", "create_buffer failed: {}", reason);
/// ```
#[macro_export]
macro_rules! engine_err {
    ($source:expr, $($arg:tt)*) => {{
        let message = format!($($arg)*);
        $crate::engine_error!($source, "{}", message);
        $crate::prism::Error::BackendError(message)
    }};
}

/// Log an ERROR message and return `Err(Error::BackendError)` from the current function
#[macro_export]
macro_rules! engine_bail {
    ($source:expr, $($arg:tt)*) => {
        return Err($crate::engine_err!($source, $($arg)*))
    };
}

/// Log a WARN message and build an `Error::InvalidResource` with the same text
///
/// Misuse of a wrapper (stale handle, missing binding) is a caller bug, not a
/// driver failure, so it is reported at warning level.
#[macro_export]
macro_rules! engine_invalid {
    ($source:expr, $($arg:tt)*) => {{
        let message = format!($($arg)*);
        $crate::engine_warn!($source, "{}", message);
        $crate::prism::Error::InvalidResource(message)
    }};
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
#[path = "error_tests.rs"]
mod tests;
