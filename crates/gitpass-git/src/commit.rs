//! Commit builder.

use std::fmt;

use git2::{Commit, Signature};
use gitpass_commit::CommitRecord;
use tracing::{debug, info};

use crate::repository::{is_unborn, record_from_commit};
use crate::{GitError, GitResult, Repository};

/// Author and committer identity recorded on new commits.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Identity {
    /// Name.
    pub name: String,
    /// Email.
    pub email: String,
}

impl Identity {
    /// Creates a new identity.
    #[must_use]
    pub fn new(name: impl Into<String>, email: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            email: email.into(),
        }
    }
}

/// The step of commit creation that failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommitStage {
    /// Loading the index.
    Index,
    /// Writing the index as a tree.
    Tree,
    /// Building the author/committer signature.
    Identity,
    /// Resolving the current branch tip.
    Parent,
    /// Writing the commit and moving the branch.
    Record,
}

impl fmt::Display for CommitStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let stage = match self {
            Self::Index => "loading index",
            Self::Tree => "building tree",
            Self::Identity => "creating identity",
            Self::Parent => "looking up parent",
            Self::Record => "recording commit",
        };
        f.write_str(stage)
    }
}

fn failed_at(stage: CommitStage) -> impl FnOnce(git2::Error) -> GitError {
    move |source| GitError::Commit { stage, source }
}

impl Repository {
    /// Commits the current index onto the branch `HEAD` points at.
    ///
    /// The branch tip becomes the sole parent; on an unborn branch the commit
    /// has no parents. The branch only moves once the commit object exists,
    /// so a failure at any stage leaves the tip and the index as they were.
    /// An empty message is accepted.
    ///
    /// # Errors
    ///
    /// Returns [`GitError::Commit`] naming the stage that failed.
    pub fn commit(&self, message: &str, identity: &Identity) -> GitResult<CommitRecord> {
        let mut index = self.git2().index().map_err(failed_at(CommitStage::Index))?;
        let tree_id = index.write_tree().map_err(failed_at(CommitStage::Tree))?;
        let tree = self
            .git2()
            .find_tree(tree_id)
            .map_err(failed_at(CommitStage::Tree))?;

        let signature = Signature::now(&identity.name, &identity.email)
            .map_err(failed_at(CommitStage::Identity))?;

        let parent = self.branch_tip().map_err(failed_at(CommitStage::Parent))?;
        let parents: Vec<&Commit<'_>> = parent.iter().collect();
        debug!(
            tree = %tree_id,
            parent = ?parent.as_ref().map(Commit::id),
            "creating commit"
        );

        let id = self
            .git2()
            .commit(Some("HEAD"), &signature, &signature, message, &tree, &parents)
            .map_err(failed_at(CommitStage::Record))?;
        let commit = self
            .git2()
            .find_commit(id)
            .map_err(failed_at(CommitStage::Record))?;

        let record = record_from_commit(&commit);
        info!(id = %record.short_id(), parents = record.parents.len(), "created commit");
        Ok(record)
    }

    fn branch_tip(&self) -> Result<Option<Commit<'_>>, git2::Error> {
        match self.git2().head() {
            Ok(head) => head.peel_to_commit().map(Some),
            Err(e) if is_unborn(&e) => Ok(None),
            Err(e) => Err(e),
        }
    }
}
