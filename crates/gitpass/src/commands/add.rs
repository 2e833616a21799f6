//! Add command.

use std::path::{self, PathBuf};

use anyhow::{Context, Result};
use clap::Args;
use gitpass_core::Client;
use tracing::info;

use super::{RepoArgs, StatusContext};

/// Arguments for the add command.
#[derive(Debug, Args)]
pub struct AddArgs {
    #[command(flatten)]
    pub repo: RepoArgs,

    /// Paths to stage, relative to the current directory
    #[arg(required = true)]
    pub paths: Vec<PathBuf>,
}

/// Runs the add command.
#[allow(clippy::needless_pass_by_value)]
pub fn run(client: &mut Client, args: AddArgs) -> Result<()> {
    let handle = args.repo.open(client)?;

    for input in &args.paths {
        let absolute = path::absolute(input)
            .with_context(|| format!("failed to resolve {}", input.display()))?;
        let key = client
            .try_stage_path(handle, &absolute)
            .status_context(format_args!("failed to stage {}", input.display()))?;
        info!(%key, "staged");
        println!("{key}");
    }

    client.release_handle(handle);
    Ok(())
}
