//! Git error types.

use std::path::PathBuf;

use thiserror::Error;

use crate::CommitStage;

/// libgit2 style status codes for errors that do not come from the engine.
pub mod code {
    /// Generic failure (`GIT_ERROR`).
    pub const GENERIC: i32 = -1;
    /// Object or path not found (`GIT_ENOTFOUND`).
    pub const NOT_FOUND: i32 = -3;
    /// Object already exists (`GIT_EEXISTS`).
    pub const EXISTS: i32 = -4;
    /// Operation not allowed on a bare repository (`GIT_EBAREREPO`).
    pub const BARE_REPO: i32 = -8;
    /// Authentication failure (`GIT_EAUTH`).
    pub const AUTH: i32 = -16;
}

/// Git-related errors.
#[derive(Debug, Error)]
pub enum GitError {
    /// Not a git repository.
    #[error("not a git repository: {0}")]
    NotARepo(PathBuf),

    /// Repository has no working tree.
    #[error("repository has no working tree: {0}")]
    Bare(PathBuf),

    /// Clone failed; no repository was opened.
    #[error("clone of {url} failed: {reason}")]
    Clone {
        url: String,
        reason: String,
        code: i32,
    },

    /// Path does not exist inside the working tree.
    #[error("path not found in working tree: {0}")]
    PathNotFound(PathBuf),

    /// Commit creation failed at the given stage.
    #[error("commit failed while {stage}: {source}")]
    Commit {
        stage: CommitStage,
        #[source]
        source: git2::Error,
    },

    /// Remote is not configured.
    #[error("unknown remote: {0}")]
    UnknownRemote(String),

    /// The remote kept rejecting the credential.
    #[error("authentication rejected by remote {remote}")]
    Authentication { remote: String },

    /// Transfer failed or the remote rejected the update.
    #[error("push to {remote} failed: {reason}")]
    Push {
        remote: String,
        reason: String,
        code: i32,
    },

    /// Git2 error.
    #[error("git error: {0}")]
    Git2(#[from] git2::Error),

    /// IO error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl GitError {
    /// Returns the status code reported for this error.
    ///
    /// Engine failures keep libgit2's native code; errors raised by this
    /// crate use the closest libgit2 equivalent.
    pub fn code(&self) -> i32 {
        match self {
            Self::NotARepo(_) | Self::PathNotFound(_) | Self::UnknownRemote(_) => code::NOT_FOUND,
            Self::Bare(_) => code::BARE_REPO,
            Self::Clone { code, .. } | Self::Push { code, .. } => *code,
            Self::Commit { source, .. } | Self::Git2(source) => source.raw_code(),
            Self::Authentication { .. } => code::AUTH,
            Self::Io(_) => code::GENERIC,
        }
    }
}

/// Result type for git operations.
pub type GitResult<T> = Result<T, GitError>;

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn test_not_a_repo_display() {
        let err = GitError::NotARepo(PathBuf::from("/tmp/not-git"));
        assert_eq!(err.to_string(), "not a git repository: /tmp/not-git");
    }

    #[test]
    fn test_path_not_found_display_and_code() {
        let err = GitError::PathNotFound(PathBuf::from("missing.txt"));
        assert_eq!(err.to_string(), "path not found in working tree: missing.txt");
        assert_eq!(err.code(), code::NOT_FOUND);
    }

    #[test]
    fn test_commit_display_names_stage() {
        let err = GitError::Commit {
            stage: CommitStage::Tree,
            source: git2::Error::from_str("index is locked"),
        };
        assert_eq!(
            err.to_string(),
            "commit failed while building tree: index is locked"
        );
    }

    #[test]
    fn test_unknown_remote_code() {
        let err = GitError::UnknownRemote("upstream".to_string());
        assert_eq!(err.to_string(), "unknown remote: upstream");
        assert_eq!(err.code(), code::NOT_FOUND);
    }

    #[test]
    fn test_authentication_code() {
        let err = GitError::Authentication {
            remote: "origin".to_string(),
        };
        assert_eq!(err.code(), code::AUTH);
    }

    #[test]
    fn test_clone_and_push_keep_engine_code() {
        let clone = GitError::Clone {
            url: "https://example.test/repo.git".to_string(),
            reason: "failed to resolve address".to_string(),
            code: -1,
        };
        assert_eq!(clone.code(), -1);

        let push = GitError::Push {
            remote: "origin".to_string(),
            reason: "cannot push non-fastforwardable reference".to_string(),
            code: -11,
        };
        assert_eq!(push.code(), -11);
    }

    #[test]
    fn test_git2_error_keeps_raw_code() {
        let err = GitError::from(git2::Error::new(
            git2::ErrorCode::NotFound,
            git2::ErrorClass::Reference,
            "reference not found",
        ));
        assert_eq!(err.code(), code::NOT_FOUND);
    }

    #[test]
    fn test_io_code() {
        let err = GitError::from(std::io::Error::other("disk full"));
        assert_eq!(err.code(), code::GENERIC);
    }
}
