//! Error types for persistence operations.

use std::path::PathBuf;
use thiserror::Error;

/// Result type alias for persistence operations.
pub type PersistResult<T> = Result<T, PersistError>;

/// Errors that can occur while encoding, decoding, or storing state.
///
/// These surface only from the low-level [`persist`](crate::persist)
/// functions. The store-level operations (`save`, `load`, `load_json`,
/// `reset_saved_state`) recover locally and route failures to the log
/// instead of returning them.
#[derive(Debug, Error)]
pub enum PersistError {
    /// JSON encode or decode failed.
    #[error("state serialization error: {0}")]
    Serde(#[from] serde_json::Error),

    /// Reading, writing, or deleting the state file failed.
    #[error("state file i/o error at {path}: {source}")]
    Io {
        /// The path being accessed.
        path: PathBuf,
        /// The underlying i/o error.
        #[source]
        source: std::io::Error,
    },

    /// No per-user data directory could be resolved on this platform.
    #[error("no data directory available for state persistence")]
    NoDataDir,
}

impl PersistError {
    /// Create an i/o error for the given path.
    #[inline]
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        PersistError::Io {
            path: path.into(),
            source,
        }
    }
}
