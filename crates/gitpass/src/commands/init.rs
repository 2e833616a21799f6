//! Initialize command.

use std::path::PathBuf;

use anyhow::Result;
use clap::Args;
use gitpass_core::Client;

use super::StatusContext;

/// Arguments for the init command.
#[derive(Debug, Args)]
pub struct InitArgs {
    /// Directory to initialize (created if missing)
    #[arg(default_value = ".")]
    pub path: PathBuf,
}

/// Runs the init command.
#[allow(clippy::needless_pass_by_value)]
pub fn run(client: &mut Client, args: InitArgs) -> Result<()> {
    let handle = client
        .try_init_repository(&args.path)
        .status_context(format_args!("failed to initialize {}", args.path.display()))?;

    let branch = client
        .repository(handle)
        .status_context("failed to read repository")?
        .current_branch()
        .unwrap_or_default();
    println!("Initialized {} on {branch}", args.path.display());

    client.release_handle(handle);
    Ok(())
}
