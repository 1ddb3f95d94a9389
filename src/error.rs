//! Unified error types for the simile engine.
//!
//! Only content-integrity failures are fatal: a pool that violates its
//! invariants indicates an authoring bug and the engine refuses to operate
//! on it. Everything else (corrupt ledger file, out-of-range configuration)
//! is resolved locally with a logged fallback so that a running drill never
//! surfaces an error to the learner.

use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// The main error type for simile operations.
#[derive(Error, Debug)]
pub enum SimileError {
    /// Content-integrity violations in an item pool (duplicate id,
    /// self-referential distractor, empty pool). Fatal at activation time.
    #[error("content error: {message}")]
    Content { message: String },

    /// Configuration loading or validation errors.
    #[error("config error: {message}")]
    Config { message: String },

    /// I/O errors from ledger persistence.
    #[error("storage error at {path}: {source}")]
    Storage {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// JSON or TOML parsing/serialization errors.
    #[error("serialization error: {message}")]
    Serde { message: String },
}

/// A specialized Result type for simile operations.
pub type Result<T> = std::result::Result<T, SimileError>;

impl SimileError {
    /// Create a content-integrity error.
    pub fn content(message: impl Into<String>) -> Self {
        Self::Content {
            message: message.into(),
        }
    }

    /// Create a config error.
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config {
            message: message.into(),
        }
    }

    /// Create a storage error from an I/O error.
    pub fn storage(path: impl Into<PathBuf>, source: io::Error) -> Self {
        Self::Storage {
            path: path.into(),
            source,
        }
    }

    /// Create a serialization error.
    pub fn serde(message: impl Into<String>) -> Self {
        Self::Serde {
            message: message.into(),
        }
    }

    /// Check if this error may be resolved with a fallback value.
    ///
    /// Content errors indicate an authoring defect and must propagate;
    /// infrastructure errors (storage, serialization, config) should not
    /// interrupt a running session.
    pub fn is_fail_open(&self) -> bool {
        !matches!(self, Self::Content { .. })
    }
}

impl From<io::Error> for SimileError {
    fn from(err: io::Error) -> Self {
        Self::Storage {
            path: PathBuf::new(),
            source: err,
        }
    }
}

impl From<serde_json::Error> for SimileError {
    fn from(err: serde_json::Error) -> Self {
        Self::Serde {
            message: err.to_string(),
        }
    }
}

/// Trait for fail-open error handling.
///
/// Infrastructure reads (ledger file, config file) log a warning and fall
/// back to a safe default instead of propagating.
pub trait FailOpen<T> {
    /// Handle an error by logging a warning and returning the default value.
    fn fail_open_default(self, context: &str) -> T
    where
        T: Default;

    /// Handle an error by logging a warning and returning the provided fallback.
    fn fail_open_with(self, context: &str, fallback: T) -> T;
}

impl<T> FailOpen<T> for Result<T> {
    fn fail_open_default(self, context: &str) -> T
    where
        T: Default,
    {
        match self {
            Ok(value) => value,
            Err(err) => {
                tracing::warn!("{}: {} (fail-open: using default)", context, err);
                T::default()
            }
        }
    }

    fn fail_open_with(self, context: &str, fallback: T) -> T {
        match self {
            Ok(value) => value,
            Err(err) => {
                tracing::warn!("{}: {} (fail-open: using fallback)", context, err);
                fallback
            }
        }
    }
}
