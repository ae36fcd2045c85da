//! Error types.
//!
//! Only the storage boundary and configuration loading can fail. Everything
//! downstream of a successful read (reconstruction, detection, scoring) is
//! infallible and degrades to neutral output instead.

use std::path::PathBuf;

use thiserror::Error;

/// Errors surfaced by the storage and configuration boundaries.
#[derive(Error, Debug)]
pub enum TelemetryError {
    #[error("I/O failed for {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Invalid configuration: {0}")]
    Config(String),

    #[error("Store error: {0}")]
    Store(String),
}

impl TelemetryError {
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        TelemetryError::Io {
            path: path.into(),
            source,
        }
    }
}

/// Result type for storage and configuration operations.
pub type Result<T> = std::result::Result<T, TelemetryError>;
