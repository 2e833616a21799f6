//! Mkdir command.

use std::path::PathBuf;

use anyhow::Result;
use clap::Args;
use gitpass_core::Client;

use super::StatusContext;

/// Arguments for the mkdir command.
#[derive(Debug, Args)]
pub struct MkdirArgs {
    /// Directory to create
    pub path: PathBuf,
}

/// Runs the mkdir command.
#[allow(clippy::needless_pass_by_value)]
pub fn run(client: &Client, args: MkdirArgs) -> Result<()> {
    client
        .try_mkdir_recursive(&args.path)
        .status_context(format_args!("failed to create {}", args.path.display()))?;
    println!("{}", args.path.display());
    Ok(())
}
