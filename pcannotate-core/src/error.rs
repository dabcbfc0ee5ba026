//! Error types for pcannotate

use std::path::PathBuf;
use thiserror::Error;

/// Main error type for pcannotate operations
#[derive(Error, Debug)]
pub enum Error {
    #[error("Not found: {path}: {reason}")]
    NotFound { path: PathBuf, reason: String },

    #[error("Failed to decode {path}: {message}")]
    Decode { path: PathBuf, message: String },

    #[error("Annotation log {path} is corrupted: {message}")]
    PersistenceCorrupt { path: PathBuf, message: String },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Visualization error: {0}")]
    Visualization(String),

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
}

impl Error {
    /// Shorthand for a [`Error::Decode`] on `path`
    pub fn decode(path: impl Into<PathBuf>, message: impl Into<String>) -> Self {
        Error::Decode {
            path: path.into(),
            message: message.into(),
        }
    }

    /// Shorthand for a [`Error::NotFound`] on `path`
    pub fn not_found(path: impl Into<PathBuf>, reason: impl Into<String>) -> Self {
        Error::NotFound {
            path: path.into(),
            reason: reason.into(),
        }
    }
}

/// Result type alias for pcannotate operations
pub type Result<T> = std::result::Result<T, Error>;
