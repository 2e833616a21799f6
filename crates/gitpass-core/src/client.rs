//! Client session and handle arena.

use std::collections::HashMap;
use std::path::Path;

use gitpass_commit::CommitRecord;
use gitpass_config::Config;
use gitpass_git::{Credential, Identity, PushOptions, PushOutcome, Repository};
use tracing::{debug, info};

use crate::{CoreError, CoreResult, RepoHandle};

/// An open gitpass session.
///
/// Repositories opened through the client are owned by it and addressed by
/// [`RepoHandle`]. Closing the client releases every outstanding handle; any
/// later call fails with [`CoreError::ClientClosed`]. A client is not meant
/// to be shared between threads; callers serialize access.
pub struct Client {
    config: Config,
    repos: HashMap<RepoHandle, Repository>,
    next_id: u64,
    open: bool,
}

impl Client {
    /// Opens a client with the given configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration is invalid.
    pub fn open(config: Config) -> CoreResult<Self> {
        config.validate()?;

        let version = git2::Version::get();
        let (major, minor, rev) = version.libgit2_version();
        info!(libgit2 = %format!("{major}.{minor}.{rev}"), "client opened");

        Ok(Self {
            config,
            repos: HashMap::new(),
            next_id: 1,
            open: true,
        })
    }

    /// Closes the client, releasing every outstanding handle.
    ///
    /// Closing twice is a no-op.
    pub fn close(&mut self) {
        if !self.open {
            return;
        }
        let released = self.repos.len();
        self.repos.clear();
        self.open = false;
        info!(released, "client closed");
    }

    /// Returns `true` until [`close`](Self::close) is called.
    pub fn is_open(&self) -> bool {
        self.open
    }

    /// Returns the configuration the client was opened with.
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Returns the number of live handles.
    pub fn handle_count(&self) -> usize {
        self.repos.len()
    }

    fn ensure_open(&self) -> CoreResult<()> {
        if self.open {
            Ok(())
        } else {
            Err(CoreError::ClientClosed)
        }
    }

    fn register(&mut self, repo: Repository) -> RepoHandle {
        let handle = RepoHandle::new(self.next_id);
        self.next_id += 1;
        debug!(%handle, root = ?repo.root(), "issued handle");
        self.repos.insert(handle, repo);
        handle
    }

    /// Returns the repository behind `handle`.
    ///
    /// # Errors
    ///
    /// Returns an error if the client is closed or the handle is not live.
    pub fn repository(&self, handle: RepoHandle) -> CoreResult<&Repository> {
        self.ensure_open()?;
        self.repos
            .get(&handle)
            .ok_or(CoreError::InvalidHandle(handle))
    }

    /// Creates `path` and every missing parent directory.
    ///
    /// # Errors
    ///
    /// Returns an error if the client is closed or a segment cannot be created.
    pub fn try_mkdir_recursive(&self, path: impl AsRef<Path>) -> CoreResult<()> {
        self.ensure_open()?;
        gitpass_git::ensure_dir(path)?;
        Ok(())
    }

    /// Writes `contents` to `path`, creating parent directories.
    ///
    /// # Errors
    ///
    /// Returns an error if the client is closed or the file cannot be written.
    pub fn try_write_file(&self, path: impl AsRef<Path>, contents: &str) -> CoreResult<()> {
        self.ensure_open()?;
        gitpass_git::write_file(path, contents)?;
        Ok(())
    }

    /// Clones `url` into `workdir` and returns a handle to the clone.
    ///
    /// An empty remote that advertises no default branch is checked out on
    /// the configured default branch.
    ///
    /// # Errors
    ///
    /// Returns an error if the client is closed or the clone fails. No handle
    /// is issued on failure.
    pub fn try_clone_repository(
        &mut self,
        url: &str,
        workdir: impl AsRef<Path>,
    ) -> CoreResult<RepoHandle> {
        self.ensure_open()?;
        let repo = Repository::clone(url, workdir, &self.config.push.default_branch)?;
        Ok(self.register(repo))
    }

    /// Opens the existing working tree at `path`.
    ///
    /// # Errors
    ///
    /// Returns an error if the client is closed or `path` is not a repository
    /// with a working tree.
    pub fn try_open_repository(&mut self, path: impl AsRef<Path>) -> CoreResult<RepoHandle> {
        self.ensure_open()?;
        let repo = Repository::open(path)?;
        Ok(self.register(repo))
    }

    /// Initializes a repository at `path` on the configured default branch.
    ///
    /// # Errors
    ///
    /// Returns an error if the client is closed or initialization fails.
    pub fn try_init_repository(&mut self, path: impl AsRef<Path>) -> CoreResult<RepoHandle> {
        self.ensure_open()?;
        let repo = Repository::init(path, &self.config.push.default_branch)?;
        Ok(self.register(repo))
    }

    /// Stages `path` in the repository behind `handle`.
    ///
    /// Returns the index key the path resolved to.
    ///
    /// # Errors
    ///
    /// Returns an error if the handle is invalid or the path cannot be staged.
    pub fn try_stage_path(&self, handle: RepoHandle, path: impl AsRef<Path>) -> CoreResult<String> {
        let key = self.repository(handle)?.stage(path)?;
        Ok(key)
    }

    /// Commits the staged index with the configured identity.
    ///
    /// # Errors
    ///
    /// Returns an error if the handle is invalid or commit creation fails.
    pub fn try_commit(&self, handle: RepoHandle, message: &str) -> CoreResult<CommitRecord> {
        let identity = Identity::new(&self.config.identity.name, &self.config.identity.email);
        let record = self.repository(handle)?.commit(message, &identity)?;
        Ok(record)
    }

    /// Pushes the current branch to `remote`, authenticating with `token`.
    ///
    /// # Errors
    ///
    /// Returns an error if the handle is invalid, the remote is unknown, the
    /// token is rejected or the transfer fails.
    pub fn try_push(
        &self,
        handle: RepoHandle,
        remote: &str,
        token: &str,
    ) -> CoreResult<PushOutcome> {
        let push = &self.config.push;
        let credential = Credential::new(&push.username, token);
        let options = PushOptions {
            default_branch: push.default_branch.clone(),
            max_auth_attempts: push.max_auth_attempts,
        };
        let outcome = self.repository(handle)?.push(remote, &credential, &options)?;
        Ok(outcome)
    }

    /// Releases `handle`. Unknown or already released handles are ignored.
    pub fn release_handle(&mut self, handle: RepoHandle) {
        if self.repos.remove(&handle).is_some() {
            debug!(%handle, "released handle");
        }
    }
}

impl Drop for Client {
    fn drop(&mut self) {
        self.close();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use git2::{Oid, Repository as Git2Repo, RepositoryInitOptions};
    use gitpass_git::GitError;
    use std::fs;
    use std::path::PathBuf;
    use tempfile::TempDir;

    fn empty_remote(temp_dir: &TempDir) -> PathBuf {
        let path = temp_dir.path().join("remote.git");
        let mut opts = RepositoryInitOptions::new();
        opts.bare(true).initial_head("main");
        Git2Repo::init_opts(&path, &opts).unwrap();
        path
    }

    fn remote_tip(remote: &Path, branch: &str) -> Option<Oid> {
        Git2Repo::open_bare(remote)
            .unwrap()
            .refname_to_id(&format!("refs/heads/{branch}"))
            .ok()
    }

    fn client() -> Client {
        Client::open(Config::default()).unwrap()
    }

    #[test]
    fn test_open_rejects_invalid_config() {
        let mut config = Config::default();
        config.push.max_auth_attempts = 0;
        assert!(matches!(Client::open(config), Err(CoreError::Config(_))));
    }

    #[test]
    fn test_closed_client_rejects_calls() {
        let temp_dir = TempDir::new().unwrap();
        let mut client = client();
        client.close();

        assert!(!client.is_open());
        assert!(matches!(
            client.try_mkdir_recursive(temp_dir.path().join("x")),
            Err(CoreError::ClientClosed)
        ));
        assert!(matches!(
            client.try_init_repository(temp_dir.path().join("repo")),
            Err(CoreError::ClientClosed)
        ));
    }

    #[test]
    fn test_close_releases_handles() {
        let temp_dir = TempDir::new().unwrap();
        let mut client = client();
        let handle = client.try_init_repository(temp_dir.path().join("repo")).unwrap();
        assert_eq!(client.handle_count(), 1);

        client.close();
        client.close();

        assert_eq!(client.handle_count(), 0);
        assert!(matches!(
            client.repository(handle),
            Err(CoreError::ClientClosed)
        ));
    }

    #[test]
    fn test_handles_are_distinct_and_not_reused() {
        let temp_dir = TempDir::new().unwrap();
        let mut client = client();
        let first = client.try_init_repository(temp_dir.path().join("a")).unwrap();
        client.release_handle(first);
        let second = client.try_init_repository(temp_dir.path().join("b")).unwrap();

        assert_ne!(first, second);
        assert!(matches!(
            client.repository(first),
            Err(CoreError::InvalidHandle(h)) if h == first
        ));
        assert!(client.repository(second).is_ok());
    }

    #[test]
    fn test_release_is_idempotent() {
        let temp_dir = TempDir::new().unwrap();
        let mut client = client();
        let handle = client.try_init_repository(temp_dir.path().join("a")).unwrap();

        client.release_handle(handle);
        client.release_handle(handle);

        assert_eq!(client.handle_count(), 0);
    }

    #[test]
    fn test_failed_clone_issues_no_handle() {
        let temp_dir = TempDir::new().unwrap();
        let mut client = client();

        let result = client.try_clone_repository(
            temp_dir.path().join("missing.git").to_str().unwrap(),
            temp_dir.path().join("work"),
        );

        assert!(matches!(result, Err(CoreError::Git(GitError::Clone { .. }))));
        assert_eq!(client.handle_count(), 0);
    }

    #[test]
    fn test_open_existing_repository() {
        let temp_dir = TempDir::new().unwrap();
        let mut client = client();
        let created = client.try_init_repository(temp_dir.path().join("repo")).unwrap();
        client.release_handle(created);

        let opened = client.try_open_repository(temp_dir.path().join("repo")).unwrap();
        assert_eq!(
            client.repository(opened).unwrap().current_branch().as_deref(),
            Some("main")
        );
    }

    #[test]
    fn test_commit_uses_configured_identity() {
        let temp_dir = TempDir::new().unwrap();
        let mut config = Config::default();
        config.identity.name = "moonbot".to_string();
        config.identity.email = "moonbot@example.com".to_string();
        let mut client = Client::open(config).unwrap();
        let handle = client.try_init_repository(temp_dir.path().join("repo")).unwrap();

        let record = client.try_commit(handle, "msg").unwrap();

        assert_eq!(record.author, "moonbot");
        assert_eq!(record.email, "moonbot@example.com");
    }

    #[test]
    fn test_clone_commit_push_round() {
        let temp_dir = TempDir::new().unwrap();
        let remote = empty_remote(&temp_dir);
        let workdir = temp_dir.path().join("work");
        let mut client = client();

        let handle = client
            .try_clone_repository(remote.to_str().unwrap(), &workdir)
            .unwrap();
        assert_eq!(
            client.repository(handle).unwrap().current_branch().as_deref(),
            Some("main")
        );

        client
            .try_write_file(workdir.join("README.md"), "# repo\n")
            .unwrap();
        let key = client
            .try_stage_path(handle, workdir.join("README.md"))
            .unwrap();
        assert_eq!(key, "README.md");

        let first = client.try_commit(handle, "initial").unwrap();
        assert!(first.is_root());

        fs::write(workdir.join("CHANGES.md"), "- more\n").unwrap();
        client.try_stage_path(handle, "CHANGES.md").unwrap();
        let second = client.try_commit(handle, "second").unwrap();
        assert_eq!(second.parent(), Some(first.id.as_str()));

        let outcome = client.try_push(handle, "origin", "tok123").unwrap();
        assert_eq!(outcome.branch, "main");
        assert_eq!(
            remote_tip(&remote, "main").unwrap().to_string(),
            second.id
        );

        client.release_handle(handle);
    }
}
