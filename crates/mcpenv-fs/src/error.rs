//! Error types for mcpenv-fs

use std::path::PathBuf;

/// Result type for mcpenv-fs operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur in mcpenv-fs operations
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("I/O error at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to acquire file lock on {path}")]
    LockFailed { path: PathBuf },

    #[error("Could not determine a configuration directory for this user")]
    NoConfigDir,

    #[error("Could not determine the user's home directory")]
    NoHomeDir,
}

impl Error {
    /// Wrap an I/O error with the path it occurred at
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}
