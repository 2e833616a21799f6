//! Remote publishing.
//!
//! A push walks through `Idle → RemoteResolved → BranchDetermined →
//! Authenticated → Transferring` and ends in success or failure. Nothing
//! local is modified along the way.

use std::cell::{Cell, RefCell};
use std::fmt;

use git2::{Cred, ErrorCode, RemoteCallbacks};
use tracing::{debug, info, warn};

use crate::{GitError, GitResult, Repository, code};

/// Placeholder username sent alongside bearer tokens.
pub const TOKEN_USERNAME: &str = "x-access-token";

/// A configured remote, resolved by name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RemoteEndpoint {
    /// Remote name (e.g. `origin`).
    pub name: String,
    /// Remote URL as configured.
    pub url: String,
}

/// Username and token offered on every authentication challenge.
///
/// The token is never persisted and is redacted from `Debug` output.
#[derive(Clone)]
pub struct Credential {
    username: String,
    token: String,
}

impl Credential {
    /// Creates a credential with an explicit username.
    #[must_use]
    pub fn new(username: impl Into<String>, token: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            token: token.into(),
        }
    }

    /// Creates a credential pairing `token` with [`TOKEN_USERNAME`].
    #[must_use]
    pub fn bearer(token: impl Into<String>) -> Self {
        Self::new(TOKEN_USERNAME, token)
    }

    /// Returns the username.
    #[must_use]
    pub fn username(&self) -> &str {
        &self.username
    }
}

impl fmt::Debug for Credential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credential")
            .field("username", &self.username)
            .field("token", &"<redacted>")
            .finish()
    }
}

/// Push behavior that does not come from the caller.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PushOptions {
    /// Branch pushed when `HEAD` does not name one.
    pub default_branch: String,
    /// Authentication challenges answered before giving up.
    pub max_auth_attempts: u32,
}

impl Default for PushOptions {
    fn default() -> Self {
        Self {
            default_branch: "main".to_string(),
            max_auth_attempts: 3,
        }
    }
}

/// What a successful push transferred.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PushOutcome {
    /// The remote pushed to.
    pub remote: RemoteEndpoint,
    /// The local branch pushed.
    pub branch: String,
    /// The refspec handed to the engine.
    pub refspec: String,
}

/// Builds the refspec pushing `branch` to the same name on the remote.
#[must_use]
pub fn refspec_for(branch: &str) -> String {
    format!("refs/heads/{branch}:refs/heads/{branch}")
}

impl Repository {
    /// Looks up the remote called `name`.
    ///
    /// # Errors
    ///
    /// Returns [`GitError::UnknownRemote`] if no such remote is configured.
    pub fn resolve_remote(&self, name: &str) -> GitResult<RemoteEndpoint> {
        let remote = self.git2().find_remote(name).map_err(|e| match e.code() {
            ErrorCode::NotFound | ErrorCode::InvalidSpec => GitError::UnknownRemote(name.to_string()),
            _ => e.into(),
        })?;

        Ok(RemoteEndpoint {
            name: name.to_string(),
            url: remote.url().unwrap_or_default().to_string(),
        })
    }

    /// Returns the branch a push would transfer: the one `HEAD` points at, or
    /// `default` when `HEAD` is detached.
    pub fn determine_branch(&self, default: &str) -> String {
        self.current_branch().unwrap_or_else(|| default.to_string())
    }

    /// Pushes the current branch to the same-named branch on `remote_name`.
    ///
    /// `credential` is answered to every authentication challenge whatever
    /// methods the server advertises, up to `options.max_auth_attempts`
    /// times. No fast-forward check is made locally; the remote decides.
    ///
    /// # Errors
    ///
    /// Returns [`GitError::UnknownRemote`] if the remote is not configured,
    /// [`GitError::Authentication`] if the remote keeps rejecting the
    /// credential, and [`GitError::Push`] for transport failures or
    /// references the remote refused.
    pub fn push(
        &self,
        remote_name: &str,
        credential: &Credential,
        options: &PushOptions,
    ) -> GitResult<PushOutcome> {
        let endpoint = self.resolve_remote(remote_name)?;
        debug!(remote = %endpoint.name, url = %endpoint.url, "remote resolved");

        let branch = self.determine_branch(&options.default_branch);
        let refspec = refspec_for(&branch);
        debug!(%branch, %refspec, "branch determined");

        let attempts = Cell::new(0u32);
        let rejected = RefCell::new(Vec::new());

        let mut callbacks = RemoteCallbacks::new();
        callbacks.credentials(|url, _username_from_url, allowed| {
            let attempt = attempts.get() + 1;
            attempts.set(attempt);
            if attempt > options.max_auth_attempts {
                return Err(git2::Error::from_str("authentication attempts exhausted"));
            }
            debug!(url, attempt, ?allowed, "authenticated");
            Cred::userpass_plaintext(&credential.username, &credential.token)
        });
        callbacks.push_update_reference(|refname, status| {
            if let Some(message) = status {
                rejected.borrow_mut().push(format!("{refname}: {message}"));
            }
            Ok(())
        });

        let mut push_options = git2::PushOptions::new();
        push_options.remote_callbacks(callbacks);

        let mut remote = self.git2().find_remote(&endpoint.name)?;
        debug!(remote = %endpoint.name, "transferring");
        let result = remote.push(&[refspec.as_str()], Some(&mut push_options));

        if let Err(e) = result {
            if attempts.get() > options.max_auth_attempts || e.code() == ErrorCode::Auth {
                warn!(remote = %endpoint.name, attempts = attempts.get(), "credential rejected");
                return Err(GitError::Authentication {
                    remote: endpoint.name,
                });
            }
            return Err(GitError::Push {
                remote: endpoint.name,
                reason: e.message().to_string(),
                code: e.raw_code(),
            });
        }

        let rejected = rejected.take();
        if !rejected.is_empty() {
            return Err(GitError::Push {
                remote: endpoint.name,
                reason: rejected.join("; "),
                code: code::GENERIC,
            });
        }

        info!(remote = %endpoint.name, %branch, "push succeeded");
        Ok(PushOutcome {
            remote: endpoint,
            branch,
            refspec,
        })
    }
}
