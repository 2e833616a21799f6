//! Configuration schema.

use serde::{Deserialize, Serialize};

use crate::{ConfigError, ConfigResult};

/// Main configuration structure.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
    /// Identity recorded on generated commits.
    #[serde(default)]
    pub identity: IdentityConfig,

    /// Push configuration.
    #[serde(default)]
    pub push: PushConfig,
}

impl Config {
    /// Checks values that deserialize fine but cannot be used.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Invalid`] naming the first offending field.
    pub fn validate(&self) -> ConfigResult<()> {
        if self.identity.name.trim().is_empty() {
            return Err(invalid("identity.name", "must not be empty"));
        }
        if self.identity.email.trim().is_empty() {
            return Err(invalid("identity.email", "must not be empty"));
        }
        if self.push.username.is_empty() {
            return Err(invalid("push.username", "must not be empty"));
        }
        if self.push.default_branch.is_empty() {
            return Err(invalid("push.default_branch", "must not be empty"));
        }
        if self.push.max_auth_attempts == 0 {
            return Err(invalid("push.max_auth_attempts", "must be at least 1"));
        }
        Ok(())
    }
}

fn invalid(field: &'static str, reason: &'static str) -> ConfigError {
    ConfigError::Invalid { field, reason }
}

/// Commit identity configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IdentityConfig {
    /// Author and committer name.
    #[serde(default = "default_identity_name")]
    pub name: String,

    /// Author and committer email.
    #[serde(default = "default_identity_email")]
    pub email: String,
}

impl Default for IdentityConfig {
    fn default() -> Self {
        Self {
            name: default_identity_name(),
            email: default_identity_email(),
        }
    }
}

fn default_identity_name() -> String {
    "gitpass".to_string()
}

fn default_identity_email() -> String {
    "gitpass@example.com".to_string()
}

/// Push configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PushConfig {
    /// Remote used when none is given on the command line.
    #[serde(default = "default_remote")]
    pub remote: String,

    /// Username paired with the token on authentication challenges.
    #[serde(default = "default_username")]
    pub username: String,

    /// Branch pushed when `HEAD` does not name one.
    #[serde(default = "default_branch")]
    pub default_branch: String,

    /// Authentication challenges answered before giving up.
    #[serde(default = "default_max_auth_attempts")]
    pub max_auth_attempts: u32,
}

impl Default for PushConfig {
    fn default() -> Self {
        Self {
            remote: default_remote(),
            username: default_username(),
            default_branch: default_branch(),
            max_auth_attempts: default_max_auth_attempts(),
        }
    }
}

fn default_remote() -> String {
    "origin".to_string()
}

fn default_username() -> String {
    "x-access-token".to_string()
}

fn default_branch() -> String {
    "main".to_string()
}

fn default_max_auth_attempts() -> u32 {
    3
}
