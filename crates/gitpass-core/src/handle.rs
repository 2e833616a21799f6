//! Repository handles.

use std::fmt;

/// Opaque identifier for a repository owned by a [`Client`](crate::Client).
///
/// Handles are never reused within a client, so a released handle stays
/// invalid even after new repositories are opened.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct RepoHandle(u64);

impl RepoHandle {
    pub(crate) const fn new(id: u64) -> Self {
        Self(id)
    }

    /// Returns the numeric id.
    #[must_use]
    pub const fn id(self) -> u64 {
        self.0
    }
}

impl fmt::Display for RepoHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "repo#{}", self.0)
    }
}
