//! Fixtures shared by the unit tests.

use std::path::Path;

use git2::{Oid, Repository as Git2Repo, RepositoryInitOptions, Signature};

use crate::Identity;

/// Initializes a bare repository at `path` with `HEAD` on `branch`.
pub fn bare_remote(path: &Path, branch: &str) -> Git2Repo {
    let mut opts = RepositoryInitOptions::new();
    opts.bare(true).initial_head(branch);
    Git2Repo::init_opts(path, &opts).unwrap()
}

/// Writes a single-file commit straight into `branch` of the bare repository
/// at `path`.
pub fn seed_remote(path: &Path, branch: &str) -> Oid {
    let repo = Git2Repo::open_bare(path).unwrap();
    let blob = repo.blob(b"seed\n").unwrap();
    let mut builder = repo.treebuilder(None).unwrap();
    builder.insert("SEED.md", blob, 0o100_644).unwrap();
    let tree = repo.find_tree(builder.write().unwrap()).unwrap();
    let sig = Signature::now("Seeder", "seeder@example.com").unwrap();

    repo.commit(
        Some(&format!("refs/heads/{branch}")),
        &sig,
        &sig,
        "seed",
        &tree,
        &[],
    )
    .unwrap()
}

/// Returns the tip of `branch` in the bare repository at `path`.
pub fn remote_tip(path: &Path, branch: &str) -> Option<Oid> {
    let repo = Git2Repo::open_bare(path).unwrap();
    repo.refname_to_id(&format!("refs/heads/{branch}")).ok()
}

/// The identity used for commits made in tests.
pub fn identity() -> Identity {
    Identity::new("Test User", "test@example.com")
}
