//! Commit record type.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// An immutable commit as created by the commit builder or read back from Git.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommitRecord {
    /// The commit id (SHA).
    pub id: String,

    /// The id of the tree snapshot the commit points at.
    pub tree: String,

    /// Parent commit ids. Empty for the first commit on a branch.
    #[serde(default)]
    pub parents: Vec<String>,

    /// The author name.
    pub author: String,

    /// The author email.
    pub email: String,

    /// The author timestamp.
    pub date: DateTime<Utc>,

    /// The full commit message. May be empty.
    pub message: String,
}

impl CommitRecord {
    /// Creates a new commit record.
    #[must_use]
    pub fn new(
        id: impl Into<String>,
        tree: impl Into<String>,
        parents: Vec<String>,
        author: impl Into<String>,
        email: impl Into<String>,
        date: DateTime<Utc>,
        message: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            tree: tree.into(),
            parents,
            author: author.into(),
            email: email.into(),
            date,
            message: message.into(),
        }
    }

    /// Returns `true` if the commit has no parents (first commit of a branch).
    #[must_use]
    pub fn is_root(&self) -> bool {
        self.parents.is_empty()
    }

    /// Returns the single parent id, if any.
    #[must_use]
    pub fn parent(&self) -> Option<&str> {
        self.parents.first().map(String::as_str)
    }

    /// Returns the first line of the commit message (the subject).
    #[must_use]
    pub fn subject(&self) -> &str {
        self.message.lines().next().unwrap_or("")
    }

    /// Returns the short id (first 7 characters).
    #[must_use]
    pub fn short_id(&self) -> &str {
        &self.id[..7.min(self.id.len())]
    }
}
