//! Git repository wrapper.

use std::fs;
use std::path::{Path, PathBuf};

use chrono::{TimeZone, Utc};
use git2::{Direction, ErrorCode, Repository as Git2Repo, RepositoryInitOptions};
use gitpass_commit::CommitRecord;
use tracing::{debug, info, warn};

use crate::{GitError, GitResult, code, ensure_dir};

/// A Git repository with a working tree.
pub struct Repository {
    inner: Git2Repo,
}

impl Repository {
    /// Opens the repository whose working tree is at `path`.
    ///
    /// # Errors
    ///
    /// Returns an error if `path` is not a Git repository or has no working
    /// tree.
    pub fn open(path: impl AsRef<Path>) -> GitResult<Self> {
        let path = path.as_ref();
        let inner = Git2Repo::open(path).map_err(|_| GitError::NotARepo(path.to_path_buf()))?;
        Self::from_git2(inner, path)
    }

    /// Creates `path` if needed and initializes an empty repository in it
    /// whose `HEAD` points at the unborn `branch`.
    ///
    /// # Errors
    ///
    /// Returns an error if the directory cannot be created or the repository
    /// cannot be initialized.
    pub fn init(path: impl AsRef<Path>, branch: &str) -> GitResult<Self> {
        let path = path.as_ref();
        ensure_dir(path)?;

        let mut opts = RepositoryInitOptions::new();
        opts.initial_head(branch);
        let inner = Git2Repo::init_opts(path, &opts)?;

        info!(?path, branch, "initialized repository");
        Self::from_git2(inner, path)
    }

    /// Clones `url` into `workdir` and checks out the remote's default branch.
    ///
    /// `workdir` is created if it does not exist and must be empty otherwise.
    /// When the remote has no commits yet, `HEAD` is pointed at the branch the
    /// remote advertises as its default, or at `fallback_branch` if it
    /// advertises none. Directories created here are removed again if the
    /// clone fails.
    ///
    /// # Errors
    ///
    /// Returns [`GitError::Clone`] if the destination is not empty or the
    /// engine fails (network, authentication, checkout).
    pub fn clone(url: &str, workdir: impl AsRef<Path>, fallback_branch: &str) -> GitResult<Self> {
        let workdir = workdir.as_ref();
        let clone_error = |reason: String, code: i32| GitError::Clone {
            url: url.to_string(),
            reason,
            code,
        };

        let created = first_missing_ancestor(workdir);
        ensure_dir(workdir).map_err(|e| clone_error(e.to_string(), e.code()))?;
        let occupied = fs::read_dir(workdir)
            .map_err(|e| clone_error(e.to_string(), code::GENERIC))?
            .next()
            .is_some();
        if occupied {
            return Err(clone_error(
                format!("destination {} is not empty", workdir.display()),
                code::EXISTS,
            ));
        }

        debug!(url, ?workdir, "cloning repository");
        let cloned = git2::build::RepoBuilder::new()
            .clone(url, workdir)
            .and_then(|inner| {
                settle_unborn_head(&inner, fallback_branch)?;
                Ok(inner)
            });
        let inner = match cloned {
            Ok(inner) => inner,
            Err(e) => {
                if let Some(dir) = created
                    && let Err(cleanup) = fs::remove_dir_all(&dir)
                {
                    warn!(?dir, error = %cleanup, "failed to remove clone destination");
                }
                return Err(clone_error(e.message().to_string(), e.raw_code()));
            }
        };

        info!(url, ?workdir, "cloned repository");
        Self::from_git2(inner, workdir)
    }

    fn from_git2(inner: Git2Repo, path: &Path) -> GitResult<Self> {
        if inner.workdir().is_none() {
            return Err(GitError::Bare(path.to_path_buf()));
        }
        Ok(Self { inner })
    }

    /// Returns the working tree root.
    #[must_use]
    pub fn root(&self) -> &Path {
        self.inner.workdir().unwrap_or_else(|| self.inner.path())
    }

    /// Returns the underlying `git2` repository.
    #[must_use]
    pub fn git2(&self) -> &Git2Repo {
        &self.inner
    }

    /// Returns the short name of the branch `HEAD` points at.
    ///
    /// Works for unborn branches. Returns `None` when `HEAD` is detached or
    /// unreadable.
    pub fn current_branch(&self) -> Option<String> {
        let head = self.inner.find_reference("HEAD").ok()?;
        let target = head.symbolic_target()?;
        target.strip_prefix("refs/heads/").map(String::from)
    }

    /// Returns the commit at the tip of the current branch.
    ///
    /// Returns `None` if the branch is unborn.
    ///
    /// # Errors
    ///
    /// Returns an error if `HEAD` cannot be resolved for another reason.
    pub fn head_commit(&self) -> GitResult<Option<CommitRecord>> {
        match self.inner.head() {
            Ok(head) => {
                let commit = head.peel_to_commit()?;
                Ok(Some(record_from_commit(&commit)))
            }
            Err(e) if is_unborn(&e) => Ok(None),
            Err(e) => Err(e.into()),
        }
    }
}

/// Points an unborn `HEAD` of a fresh clone at the remote's default branch.
///
/// An empty remote leaves `HEAD` on the engine's built-in initial branch,
/// which need not match the remote's.
fn settle_unborn_head(repo: &Git2Repo, fallback_branch: &str) -> Result<(), git2::Error> {
    match repo.head() {
        Ok(_) => return Ok(()),
        Err(e) if is_unborn(&e) => {}
        Err(e) => return Err(e),
    }

    let branch = advertised_branch(repo).unwrap_or_else(|| fallback_branch.to_string());
    debug!(%branch, "remote is empty, setting unborn HEAD");
    repo.set_head(&format!("refs/heads/{branch}"))
}

/// Returns the short name of the branch `origin` advertises as its `HEAD`.
fn advertised_branch(repo: &Git2Repo) -> Option<String> {
    let mut remote = repo.find_remote("origin").ok()?;
    remote.connect(Direction::Fetch).ok()?;
    let target = remote.default_branch().ok()?;
    target
        .as_str()?
        .strip_prefix("refs/heads/")
        .map(String::from)
}

/// Returns the outermost ancestor of `path` (or `path` itself) that does not
/// exist yet.
fn first_missing_ancestor(path: &Path) -> Option<PathBuf> {
    path.ancestors()
        .take_while(|dir| !dir.as_os_str().is_empty() && !dir.exists())
        .last()
        .map(Path::to_path_buf)
}

/// Returns `true` if `err` means `HEAD` has no commit yet.
pub(crate) fn is_unborn(err: &git2::Error) -> bool {
    matches!(err.code(), ErrorCode::UnbornBranch | ErrorCode::NotFound)
}

/// Converts a `git2` commit into a [`CommitRecord`].
pub(crate) fn record_from_commit(commit: &git2::Commit<'_>) -> CommitRecord {
    let author = commit.author();
    let time = commit.time();

    CommitRecord::new(
        commit.id().to_string(),
        commit.tree_id().to_string(),
        commit.parent_ids().map(|id| id.to_string()).collect(),
        author.name().unwrap_or("Unknown"),
        author.email().unwrap_or(""),
        Utc.timestamp_opt(time.seconds(), 0)
            .single()
            .unwrap_or_else(Utc::now),
        commit.message().unwrap_or(""),
    )
}
