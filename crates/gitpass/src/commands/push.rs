//! Push command.

use anyhow::Result;
use clap::Args;
use gitpass_core::Client;

use super::{RepoArgs, StatusContext};

/// Arguments for the push command.
#[derive(Debug, Args)]
pub struct PushArgs {
    #[command(flatten)]
    pub repo: RepoArgs,

    /// Remote name (default: push.remote from configuration)
    #[arg(short, long)]
    pub remote: Option<String>,

    /// Access token offered to the remote
    #[arg(long, env = "GITPASS_TOKEN", hide_env_values = true)]
    pub token: String,
}

/// Runs the push command.
#[allow(clippy::needless_pass_by_value)]
pub fn run(client: &mut Client, args: PushArgs) -> Result<()> {
    let handle = args.repo.open(client)?;
    let remote = args
        .remote
        .clone()
        .unwrap_or_else(|| client.config().push.remote.clone());

    println!("Pushing to {remote}...");
    let outcome = client
        .try_push(handle, &remote, &args.token)
        .status_context(format_args!("failed to push to {remote}"))?;
    println!("Pushed {} to {}", outcome.branch, outcome.remote.url);

    client.release_handle(handle);
    Ok(())
}
