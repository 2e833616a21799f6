//! Clone command.

use std::path::PathBuf;

use anyhow::Result;
use clap::Args;
use gitpass_core::Client;

use super::StatusContext;

/// Arguments for the clone command.
#[derive(Debug, Args)]
pub struct CloneArgs {
    /// Repository URL or local path
    pub url: String,

    /// Destination directory (must be empty or missing)
    pub workdir: PathBuf,
}

/// Runs the clone command.
#[allow(clippy::needless_pass_by_value)]
pub fn run(client: &mut Client, args: CloneArgs) -> Result<()> {
    let handle = client
        .try_clone_repository(&args.url, &args.workdir)
        .status_context(format_args!("failed to clone {}", args.url))?;

    println!("Cloned {} into {}", args.url, args.workdir.display());
    client.release_handle(handle);
    Ok(())
}
