//! Write command.

use std::path::PathBuf;

use anyhow::Result;
use clap::Args;
use gitpass_core::Client;

use super::StatusContext;

/// Arguments for the write command.
#[derive(Debug, Args)]
pub struct WriteArgs {
    /// File to write
    pub path: PathBuf,

    /// File contents
    pub contents: String,
}

/// Runs the write command.
#[allow(clippy::needless_pass_by_value)]
pub fn run(client: &Client, args: WriteArgs) -> Result<()> {
    client
        .try_write_file(&args.path, &args.contents)
        .status_context(format_args!("failed to write {}", args.path.display()))
}
