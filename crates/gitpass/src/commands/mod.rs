//! Command implementations.

pub mod add;
pub mod clone;
pub mod commit;
pub mod init;
pub mod mkdir;
pub mod push;
pub mod status;
pub mod write;

use std::fmt::Display;
use std::path::PathBuf;

use clap::Args;
use gitpass_core::{Client, CoreResult, RepoHandle};

/// Attaches the operation and its status code to a core error.
pub trait StatusContext<T> {
    /// Wraps the error with `what` and the error's status code.
    fn status_context<C: Display>(self, what: C) -> anyhow::Result<T>;
}

impl<T> StatusContext<T> for CoreResult<T> {
    fn status_context<C: Display>(self, what: C) -> anyhow::Result<T> {
        self.map_err(|e| {
            let code = e.code();
            anyhow::Error::new(e).context(format!("{what} (status {code})"))
        })
    }
}

/// Working tree selection shared by repository commands.
#[derive(Debug, Args)]
pub struct RepoArgs {
    /// Working tree root (default: current directory)
    #[arg(short = 'C', long = "repo", default_value = ".")]
    pub repo: PathBuf,
}

impl RepoArgs {
    /// Opens the selected working tree through `client`.
    pub fn open(&self, client: &mut Client) -> anyhow::Result<RepoHandle> {
        client
            .try_open_repository(&self.repo)
            .status_context(format_args!("failed to open {}", self.repo.display()))
    }
}
