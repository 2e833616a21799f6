//! Commit command.

use anyhow::{Context, Result};
use clap::Args;
use gitpass_core::Client;

use super::{RepoArgs, StatusContext};

/// Arguments for the commit command.
#[derive(Debug, Args)]
pub struct CommitArgs {
    #[command(flatten)]
    pub repo: RepoArgs,

    /// Commit message
    #[arg(short, long)]
    pub message: String,

    /// Print the commit record as JSON
    #[arg(long)]
    pub json: bool,
}

/// Runs the commit command.
#[allow(clippy::needless_pass_by_value)]
pub fn run(client: &mut Client, args: CommitArgs) -> Result<()> {
    let handle = args.repo.open(client)?;
    let record = client
        .try_commit(handle, &args.message)
        .status_context("failed to commit")?;

    if args.json {
        let json = serde_json::to_string_pretty(&record).context("failed to encode commit")?;
        println!("{json}");
    } else {
        println!("[{}] {}", record.short_id(), record.subject());
    }

    client.release_handle(handle);
    Ok(())
}
