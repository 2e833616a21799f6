//! CLI definition.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use gitpass_config::{Config, load_config, load_config_or_default};
use gitpass_core::Client;

use crate::commands;

/// Clone, stage, commit and push Git repositories with a bearer token.
#[derive(Debug, Parser)]
#[command(name = "gitpass")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Configuration file (default: nearest gitpass.toml)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Create a directory and any missing parents
    Mkdir(commands::mkdir::MkdirArgs),

    /// Write a file, creating missing parents
    Write(commands::write::WriteArgs),

    /// Initialize an empty repository
    Init(commands::init::InitArgs),

    /// Clone a repository into an empty directory
    Clone(commands::clone::CloneArgs),

    /// Stage paths for the next commit
    Add(commands::add::AddArgs),

    /// Commit the staged paths
    Commit(commands::commit::CommitArgs),

    /// Push the current branch
    Push(commands::push::PushArgs),

    /// Show the current branch and staged paths
    Status(commands::status::StatusArgs),
}

impl Cli {
    /// Runs the CLI command.
    pub fn run(self) -> Result<()> {
        let config = self.load_config()?;
        let mut client = Client::open(config).context("failed to open client")?;

        match self.command {
            Commands::Mkdir(args) => commands::mkdir::run(&client, args),
            Commands::Write(args) => commands::write::run(&client, args),
            Commands::Init(args) => commands::init::run(&mut client, args),
            Commands::Clone(args) => commands::clone::run(&mut client, args),
            Commands::Add(args) => commands::add::run(&mut client, args),
            Commands::Commit(args) => commands::commit::run(&mut client, args),
            Commands::Push(args) => commands::push::run(&mut client, args),
            Commands::Status(args) => commands::status::run(&mut client, args),
        }
    }

    fn load_config(&self) -> Result<Config> {
        match &self.config {
            Some(path) => load_config(path)
                .with_context(|| format!("failed to load configuration from {}", path.display())),
            None => {
                let cwd = std::env::current_dir().context("failed to read current directory")?;
                load_config_or_default(cwd).context("failed to load configuration")
            }
        }
    }
}
