//! Core error types.

use thiserror::Error;

use crate::RepoHandle;

/// Core-related errors.
#[derive(Debug, Error)]
pub enum CoreError {
    /// Git error.
    #[error(transparent)]
    Git(#[from] gitpass_git::GitError),

    /// Configuration error.
    #[error("config error: {0}")]
    Config(#[from] gitpass_config::ConfigError),

    /// The client was closed before the call.
    #[error("client is closed")]
    ClientClosed,

    /// The handle was never issued or has been released.
    #[error("invalid repository handle: {0}")]
    InvalidHandle(RepoHandle),
}

impl CoreError {
    /// Returns the status code reported for this error.
    pub fn code(&self) -> i32 {
        match self {
            Self::Git(e) => e.code(),
            Self::InvalidHandle(_) => gitpass_git::code::NOT_FOUND,
            Self::Config(_) | Self::ClientClosed => gitpass_git::code::GENERIC,
        }
    }
}

/// Result type for core operations.
pub type CoreResult<T> = Result<T, CoreError>;
