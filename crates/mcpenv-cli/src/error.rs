//! Error types for mcpenv-cli

/// Result type for CLI operations
pub type Result<T> = std::result::Result<T, CliError>;

/// Errors that can occur in CLI operations
#[derive(Debug, thiserror::Error)]
pub enum CliError {
    /// Error from mcpenv-core
    #[error(transparent)]
    Core(#[from] mcpenv_core::Error),

    /// Error from mcpenv-fs
    #[error(transparent)]
    Fs(#[from] mcpenv_fs::Error),

    /// Error from mcpenv-git
    #[error(transparent)]
    Git(#[from] mcpenv_git::Error),

    /// Error from mcpenv-secrets
    #[error(transparent)]
    Secrets(#[from] mcpenv_secrets::Error),

    /// Standard I/O error
    #[error(transparent)]
    Io(#[from] std::io::Error),

    /// JSON serialization error
    #[error(transparent)]
    Json(#[from] serde_json::Error),

    /// Interactive prompt error
    #[error("Interactive prompt error: {0}")]
    Dialoguer(#[from] dialoguer::Error),

    /// User-facing error with a message
    #[error("{message}")]
    User { message: String },
}

impl CliError {
    /// Create a new user error with the given message
    pub fn user(message: impl Into<String>) -> Self {
        Self::User {
            message: message.into(),
        }
    }
}
