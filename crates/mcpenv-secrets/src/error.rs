//! Error types for mcpenv-secrets

use std::path::PathBuf;

/// Result type for mcpenv-secrets operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur in mcpenv-secrets operations
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// The secret store could not be read. Deliberately opaque: any
    /// underlying sops/age failure collapses into this one condition.
    #[error("Failed to decrypt secrets: {message}")]
    Unavailable { message: String },

    #[error("Required tool '{tool}' is not installed. {hint}")]
    ToolMissing { tool: String, hint: String },

    #[error("Age key not found at {path}. Run \"mcp-env init\" first.")]
    KeyMissing { path: PathBuf },

    #[error("{tool} exited with status {status}")]
    ToolFailed { tool: String, status: String },

    #[error(transparent)]
    Fs(#[from] mcpenv_fs::Error),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl Error {
    pub fn unavailable(message: impl Into<String>) -> Self {
        Self::Unavailable {
            message: message.into(),
        }
    }
}
