//! Error types for mcpenv-core

use std::path::PathBuf;

use crate::secrets::SecretsError;

/// Result type for mcpenv-core operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur in mcpenv-core operations.
///
/// Resolution itself has exactly two failure exits: an unsupported platform
/// and a needed-but-unavailable secret store. Everything else the resolver
/// encounters degrades into warnings or skip markers.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// The runtime platform is outside the closed {darwin, win32, linux} set
    #[error("Unsupported platform: {os}")]
    UnsupportedPlatform { os: String },

    /// Secrets are referenced by the input documents but could not be loaded
    #[error(transparent)]
    Secrets(#[from] SecretsError),

    /// A config document exists but is not valid YAML of the expected shape
    #[error("Failed to parse {path}: {message}")]
    Parse { path: PathBuf, message: String },

    /// Filesystem error from mcpenv-fs
    #[error(transparent)]
    Fs(#[from] mcpenv_fs::Error),

    /// JSON serialization error
    #[error(transparent)]
    Json(#[from] serde_json::Error),
}
