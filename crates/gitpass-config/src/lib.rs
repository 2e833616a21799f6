//! Configuration management for gitpass.
//!
//! This crate handles loading the optional `gitpass.toml` configuration file.

mod error;
mod loader;
mod schema;

pub use error::{ConfigError, ConfigResult};
pub use loader::{CONFIG_FILE_NAME, load_config, load_config_or_default};
pub use schema::{Config, IdentityConfig, PushConfig};
