//! Status command.

use anyhow::Result;
use clap::Args;
use gitpass_core::{Client, CoreError};

use super::{RepoArgs, StatusContext};

/// Arguments for the status command.
#[derive(Debug, Args)]
pub struct StatusArgs {
    #[command(flatten)]
    pub repo: RepoArgs,
}

/// Runs the status command.
#[allow(clippy::needless_pass_by_value)]
pub fn run(client: &mut Client, args: StatusArgs) -> Result<()> {
    let handle = args.repo.open(client)?;
    let repo = client
        .repository(handle)
        .status_context("failed to read repository")?;

    match repo.current_branch() {
        Some(branch) => println!("On branch {branch}"),
        None => println!("HEAD detached"),
    }
    match repo.head_commit().map_err(CoreError::from).status_context("failed to read HEAD")? {
        Some(head) => println!("Tip {} {}", head.short_id(), head.subject()),
        None => println!("No commits yet"),
    }

    let staged = repo
        .staged_paths()
        .map_err(CoreError::from)
        .status_context("failed to read index")?;
    println!("Staged ({}):", staged.len());
    for path in staged {
        println!("  {path}");
    }

    client.release_handle(handle);
    Ok(())
}
