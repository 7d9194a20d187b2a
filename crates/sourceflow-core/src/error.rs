//! Error types for record loading and project discovery.

use std::path::PathBuf;
use thiserror::Error;

/// Errors raised while discovering files or loading analysis records.
///
/// Decoding an analysis record is not in this list on purpose: malformed
/// records are repaired with defaults, never rejected.
#[derive(Error, Debug)]
pub enum CoreError {
    #[error("I/O error on {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("'{0}' is not a valid directory")]
    InvalidDirectory(PathBuf),

    #[error("no analysis record for {file} (looked in {record})")]
    MissingRecord { file: PathBuf, record: PathBuf },
}

impl CoreError {
    /// Wraps an I/O error with the path that caused it.
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}

pub type Result<T> = std::result::Result<T, CoreError>;
