//! Error types for mcpenv-git

use std::path::PathBuf;

/// Result type for mcpenv-git operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur in mcpenv-git operations
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Git error: {0}")]
    Git(#[from] git2::Error),

    #[error("Not a git repository: {path}")]
    NotARepository { path: PathBuf },

    #[error("Remote '{name}' not found")]
    RemoteNotFound { name: String },

    #[error("Push failed: {message}")]
    PushFailed { message: String },

    #[error("Pull failed: {message}")]
    PullFailed { message: String },

    #[error("Clone failed: {message}")]
    CloneFailed { message: String },
}
