//! Error types for the reviewmap shell.
//!
//! The review-state engine itself never fails: missing sheets, rows or signal
//! entries resolve to default results and data problems are recorded as
//! anomalies. Errors only arise at the edges, when loading configuration or a
//! review snapshot from disk.

use std::path::PathBuf;
use thiserror::Error;

/// Common result type for reviewmap I/O operations
pub type Result<T> = std::result::Result<T, ReviewmapError>;

#[derive(Debug, Error)]
pub enum ReviewmapError {
    /// File system related errors
    #[error("File system error: {message}")]
    FileSystem {
        message: String,
        path: Option<PathBuf>,
        #[source]
        source: Option<std::io::Error>,
    },

    /// Configuration errors
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// Snapshot or config contents failed validation
    #[error("Validation error: {0}")]
    Validation(String),

    /// TOML parse errors
    #[error(transparent)]
    Toml(#[from] toml::de::Error),

    /// JSON errors
    #[error(transparent)]
    Json(#[from] serde_json::Error),

    /// IO errors
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl ReviewmapError {
    /// Wrap an I/O error with the path it happened on
    pub fn io_at(source: std::io::Error, path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        Self::FileSystem {
            message: format!("{} ({})", source, path.display()),
            path: Some(path),
            source: Some(source),
        }
    }

    pub fn configuration(message: impl Into<String>) -> Self {
        Self::Configuration(message.into())
    }

    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation(message.into())
    }

    /// Whether the user can fix this by editing their input files
    pub fn is_user_fixable(&self) -> bool {
        matches!(
            self,
            Self::Configuration(_) | Self::Validation(_) | Self::Toml(_) | Self::Json(_)
        )
    }
}
