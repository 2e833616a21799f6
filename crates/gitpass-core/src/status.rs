//! Flat status-code interface.
//!
//! Every operation here reports success as [`Status::OK`] and failure as the
//! engine's native (negative) code. Diagnostics go to the log, not to the
//! caller.

use std::fmt;
use std::path::Path;

use tracing::error;

use crate::{Client, CoreResult, RepoHandle};

/// Integer status returned by the flat interface.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Status(i32);

impl Status {
    /// Success.
    pub const OK: Self = Self(0);

    /// Wraps a raw status code.
    #[must_use]
    pub const fn from_code(code: i32) -> Self {
        Self(code)
    }

    /// Returns the raw code.
    #[must_use]
    pub const fn code(self) -> i32 {
        self.0
    }

    /// Returns `true` for [`Status::OK`].
    #[must_use]
    pub const fn is_ok(self) -> bool {
        self.0 == 0
    }
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<Status> for i32 {
    fn from(status: Status) -> Self {
        status.0
    }
}

fn report<T>(operation: &str, result: CoreResult<T>) -> Result<T, Status> {
    result.map_err(|e| {
        let code = e.code();
        error!(operation, code, error = %e, "operation failed");
        Status(code)
    })
}

fn status<T>(operation: &str, result: CoreResult<T>) -> Status {
    match report(operation, result) {
        Ok(_) => Status::OK,
        Err(status) => status,
    }
}

impl Client {
    /// Creates `path` and every missing parent directory.
    pub fn mkdir_recursive(&self, path: impl AsRef<Path>) -> Status {
        status("mkdir_recursive", self.try_mkdir_recursive(path))
    }

    /// Writes `contents` to `path`, creating parent directories.
    pub fn write_file(&self, path: impl AsRef<Path>, contents: &str) -> Status {
        status("write_file", self.try_write_file(path, contents))
    }

    /// Clones `url` into `workdir`. Returns `None` on failure.
    pub fn clone_repository(&mut self, url: &str, workdir: impl AsRef<Path>) -> Option<RepoHandle> {
        report("clone_repository", self.try_clone_repository(url, workdir)).ok()
    }

    /// Opens the working tree at `path`. Returns `None` on failure.
    pub fn open_repository(&mut self, path: impl AsRef<Path>) -> Option<RepoHandle> {
        report("open_repository", self.try_open_repository(path)).ok()
    }

    /// Initializes a repository at `path`. Returns `None` on failure.
    pub fn init_repository(&mut self, path: impl AsRef<Path>) -> Option<RepoHandle> {
        report("init_repository", self.try_init_repository(path)).ok()
    }

    /// Stages `path` in the repository behind `handle`.
    pub fn stage_path(&self, handle: RepoHandle, path: impl AsRef<Path>) -> Status {
        status("stage_path", self.try_stage_path(handle, path))
    }

    /// Commits the staged index with `message`.
    pub fn commit(&self, handle: RepoHandle, message: &str) -> Status {
        status("commit", self.try_commit(handle, message))
    }

    /// Pushes the current branch to `remote` using `token`.
    pub fn push(&self, handle: RepoHandle, remote: &str, token: &str) -> Status {
        status("push", self.try_push(handle, remote, token))
    }
}
