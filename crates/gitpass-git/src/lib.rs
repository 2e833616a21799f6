//! Git repository operations for gitpass.
//!
//! This crate wraps `git2` with the handful of operations gitpass exposes:
//! - Directory provisioning
//! - Clone, open and init
//! - Staging paths into the index
//! - Committing the index onto the current branch
//! - Pushing the current branch with a token credential

mod commit;
mod error;
mod provision;
mod remote;
mod repository;
mod staging;

#[cfg(test)]
mod test_support;

pub use commit::{CommitStage, Identity};
pub use error::{GitError, GitResult, code};
pub use provision::{ensure_dir, write_file};
pub use remote::{Credential, PushOptions, PushOutcome, RemoteEndpoint, TOKEN_USERNAME, refspec_for};
pub use repository::Repository;
