//! Staging index operations.

use std::fs;
use std::path::{Component, Path, PathBuf};

use git2::Index;
use tracing::{debug, warn};
use walkdir::WalkDir;

use crate::{GitError, GitResult, Repository};

impl Repository {
    /// Stages the current content at `path` and writes the index to disk.
    ///
    /// `path` may be absolute or relative to the working tree. Directories
    /// are staged recursively, file by file, skipping ignored files and
    /// nested `.git` entries. Path names are taken literally, never as glob
    /// patterns. Returns the index key the path resolved to.
    ///
    /// # Errors
    ///
    /// Returns [`GitError::PathNotFound`] if `path` does not exist inside the
    /// working tree; the index is untouched in that case. Engine failures
    /// reload the index from disk before returning.
    pub fn stage(&self, path: impl AsRef<Path>) -> GitResult<String> {
        let path = path.as_ref();
        let key = self.index_key(path)?;
        let is_dir = self.root().join(&key).is_dir();

        let mut index = self.git2().index()?;
        let staged = if is_dir {
            self.stage_dir(&mut index, &key)
        } else {
            index.add_path(Path::new(&key))
        };

        if let Err(e) = staged.and_then(|()| index.write()) {
            if let Err(reload) = index.read(true) {
                warn!(error = %reload, "failed to reload index after staging error");
            }
            return Err(e.into());
        }

        debug!(%key, is_dir, "staged path");
        Ok(key)
    }

    fn stage_dir(&self, index: &mut Index, key: &str) -> Result<(), git2::Error> {
        let root = self.root();
        let walker = WalkDir::new(root.join(key))
            .sort_by_file_name()
            .into_iter()
            .filter_entry(|entry| entry.file_name() != ".git");

        for entry in walker {
            let entry = entry.map_err(|e| git2::Error::from_str(&e.to_string()))?;
            if entry.file_type().is_dir() {
                continue;
            }
            let relative = entry
                .path()
                .strip_prefix(root)
                .map_err(|e| git2::Error::from_str(&e.to_string()))?;
            if self.git2().is_path_ignored(relative)? {
                continue;
            }
            index.add_path(relative)?;
        }
        Ok(())
    }

    /// Returns the index keys currently staged, in index order.
    ///
    /// # Errors
    ///
    /// Returns an error if the index cannot be read.
    pub fn staged_paths(&self) -> GitResult<Vec<String>> {
        let mut index = self.git2().index()?;
        index.read(false)?;
        Ok(index
            .iter()
            .map(|entry| String::from_utf8_lossy(&entry.path).into_owned())
            .collect())
    }

    /// Resolves `path` to a working-tree-relative index key.
    ///
    /// Containment is checked on canonical paths component by component, so
    /// a sibling directory sharing a textual prefix with the root never
    /// matches.
    ///
    /// # Errors
    ///
    /// Returns [`GitError::PathNotFound`] if the path does not exist, lies
    /// outside the working tree, names the root itself, points into `.git`
    /// or is not valid UTF-8.
    pub fn index_key(&self, path: &Path) -> GitResult<String> {
        let not_found = || GitError::PathNotFound(path.to_path_buf());

        let root = self.root().canonicalize()?;
        let candidate = if path.is_absolute() {
            path.to_path_buf()
        } else {
            root.join(path)
        };
        let resolved = resolve(&candidate).ok_or_else(not_found)?;
        let relative = resolved.strip_prefix(&root).map_err(|_| not_found())?;

        let segments: Vec<String> = relative
            .components()
            .map(|c| match c {
                Component::Normal(s) => s.to_str().map(String::from),
                _ => None,
            })
            .collect::<Option<_>>()
            .ok_or_else(not_found)?;

        match segments.first() {
            None => Err(not_found()),
            Some(first) if first == ".git" => Err(not_found()),
            Some(_) => Ok(segments.join("/")),
        }
    }
}

/// Canonicalizes the parent of `candidate` and re-attaches the final name, so
/// a symlink inside the tree resolves to itself rather than its target.
fn resolve(candidate: &Path) -> Option<PathBuf> {
    fs::symlink_metadata(candidate).ok()?;
    match (candidate.parent(), candidate.file_name()) {
        (Some(parent), Some(name)) if !parent.as_os_str().is_empty() => {
            Some(parent.canonicalize().ok()?.join(name))
        }
        _ => candidate.canonicalize().ok(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn init_repo() -> (TempDir, Repository) {
        let temp_dir = TempDir::new().unwrap();
        let repo = Repository::init(temp_dir.path().join("work"), "main").unwrap();
        (temp_dir, repo)
    }

    #[test]
    fn test_stage_relative_path() {
        let (_temp_dir, repo) = init_repo();
        fs::write(repo.root().join("README.md"), "hello").unwrap();

        let key = repo.stage("README.md").unwrap();

        assert_eq!(key, "README.md");
        assert_eq!(repo.staged_paths().unwrap(), vec!["README.md".to_string()]);
    }

    #[test]
    fn test_absolute_and_relative_resolve_to_same_key() {
        let (_temp_dir, repo) = init_repo();
        fs::create_dir_all(repo.root().join("docs")).unwrap();
        fs::write(repo.root().join("docs/guide.md"), "guide").unwrap();

        let absolute = repo.root().join("docs/guide.md");
        let from_absolute = repo.index_key(&absolute).unwrap();
        let from_relative = repo.index_key(Path::new("docs/guide.md")).unwrap();

        assert_eq!(from_absolute, "docs/guide.md");
        assert_eq!(from_absolute, from_relative);
    }

    #[test]
    fn test_stage_missing_path_leaves_index_unchanged() {
        let (_temp_dir, repo) = init_repo();
        fs::write(repo.root().join("kept.txt"), "kept").unwrap();
        repo.stage("kept.txt").unwrap();
        let before = repo.staged_paths().unwrap();

        let result = repo.stage("missing.txt");

        assert!(matches!(result, Err(GitError::PathNotFound(_))));
        assert_eq!(repo.staged_paths().unwrap(), before);
    }

    #[test]
    fn test_sibling_with_shared_prefix_is_outside() {
        let temp_dir = TempDir::new().unwrap();
        let repo = Repository::init(temp_dir.path().join("work"), "main").unwrap();
        let sibling = temp_dir.path().join("work-other");
        fs::create_dir(&sibling).unwrap();
        fs::write(sibling.join("file.txt"), "x").unwrap();

        let result = repo.stage(sibling.join("file.txt"));

        assert!(matches!(result, Err(GitError::PathNotFound(_))));
        assert!(repo.staged_paths().unwrap().is_empty());
    }

    #[test]
    fn test_parent_escape_is_outside() {
        let temp_dir = TempDir::new().unwrap();
        let repo = Repository::init(temp_dir.path().join("work"), "main").unwrap();
        fs::write(temp_dir.path().join("outside.txt"), "x").unwrap();

        let result = repo.stage("../outside.txt");
        assert!(matches!(result, Err(GitError::PathNotFound(_))));
    }

    #[test]
    fn test_root_and_git_dir_are_rejected() {
        let (_temp_dir, repo) = init_repo();

        assert!(matches!(
            repo.index_key(repo.root()),
            Err(GitError::PathNotFound(_))
        ));
        assert!(matches!(
            repo.index_key(Path::new(".git/HEAD")),
            Err(GitError::PathNotFound(_))
        ));
    }

    #[test]
    fn test_stage_directory_recursively() {
        let (_temp_dir, repo) = init_repo();
        fs::create_dir_all(repo.root().join("src/nested")).unwrap();
        fs::write(repo.root().join("src/lib.rs"), "//").unwrap();
        fs::write(repo.root().join("src/nested/mod.rs"), "//").unwrap();

        let key = repo.stage(repo.root().join("src")).unwrap();

        assert_eq!(key, "src");
        assert_eq!(
            repo.staged_paths().unwrap(),
            vec!["src/lib.rs".to_string(), "src/nested/mod.rs".to_string()]
        );
    }

    #[test]
    fn test_staging_persists_across_reopen() {
        let (_temp_dir, repo) = init_repo();
        fs::write(repo.root().join("durable.txt"), "d").unwrap();
        repo.stage("durable.txt").unwrap();
        let root = repo.root().to_path_buf();
        drop(repo);

        let reopened = Repository::open(&root).unwrap();
        assert_eq!(
            reopened.staged_paths().unwrap(),
            vec!["durable.txt".to_string()]
        );
    }

    #[test]
    fn test_restage_updates_content() {
        let (_temp_dir, repo) = init_repo();
        let file = repo.root().join("a.txt");
        fs::write(&file, "v1").unwrap();
        repo.stage("a.txt").unwrap();
        let first = repo.git2().index().unwrap().get_path(Path::new("a.txt"), 0).unwrap().id;

        fs::write(&file, "v2").unwrap();
        repo.stage(&file).unwrap();
        let second = repo.git2().index().unwrap().get_path(Path::new("a.txt"), 0).unwrap().id;

        assert_ne!(first, second);
        assert_eq!(repo.staged_paths().unwrap().len(), 1);
    }

    #[test]
    fn test_stage_directory_takes_name_literally() {
        let (_temp_dir, repo) = init_repo();
        let root = repo.root().to_path_buf();
        fs::create_dir_all(root.join("a*")).unwrap();
        fs::write(root.join("a*/in.txt"), "in").unwrap();
        fs::create_dir_all(root.join("abc")).unwrap();
        fs::write(root.join("abc/secret.txt"), "secret").unwrap();
        fs::write(root.join("apple.txt"), "apple").unwrap();

        let key = repo.stage("a*").unwrap();

        assert_eq!(key, "a*");
        assert_eq!(repo.staged_paths().unwrap(), vec!["a*/in.txt".to_string()]);
    }

    #[test]
    fn test_stage_directory_skips_ignored_files() {
        let (_temp_dir, repo) = init_repo();
        let root = repo.root().to_path_buf();
        fs::write(root.join(".gitignore"), "*.log\n").unwrap();
        fs::create_dir_all(root.join("out")).unwrap();
        fs::write(root.join("out/result.txt"), "ok").unwrap();
        fs::write(root.join("out/debug.log"), "noise").unwrap();

        repo.stage("out").unwrap();

        assert_eq!(
            repo.staged_paths().unwrap(),
            vec!["out/result.txt".to_string()]
        );
    }

    #[cfg(target_os = "linux")]
    #[test]
    fn test_non_utf8_name_is_not_found() {
        use std::ffi::OsStr;
        use std::os::unix::ffi::OsStrExt;

        let (_temp_dir, repo) = init_repo();
        let name = OsStr::from_bytes(b"bad\xff.txt");
        fs::write(repo.root().join(name), "x").unwrap();

        let result = repo.stage(name);

        assert!(matches!(result, Err(GitError::PathNotFound(_))));
        assert!(repo.staged_paths().unwrap().is_empty());
    }
}
