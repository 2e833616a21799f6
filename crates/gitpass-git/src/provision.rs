//! Working directory provisioning.

use std::fs::{self, DirBuilder};
use std::io;
use std::path::Path;

use tracing::debug;

use crate::GitResult;

/// Creates `path` and every missing parent directory.
///
/// Existing directories are left alone, so calling this twice is a no-op the
/// second time. New directories get mode `0o755` on Unix.
///
/// # Errors
///
/// Returns an IO error if a segment exists as a non-directory or a directory
/// cannot be created.
pub fn ensure_dir(path: impl AsRef<Path>) -> GitResult<()> {
    let path = path.as_ref();
    if path.as_os_str().is_empty() {
        return Err(io::Error::new(io::ErrorKind::InvalidInput, "empty directory path").into());
    }

    debug!(?path, "provisioning directory");

    let mut builder = DirBuilder::new();
    builder.recursive(true);
    #[cfg(unix)]
    {
        use std::os::unix::fs::DirBuilderExt;
        builder.mode(0o755);
    }
    builder.create(path)?;

    Ok(())
}

/// Writes `contents` to `path`, creating missing parent directories.
///
/// # Errors
///
/// Returns an IO error if a parent cannot be created or the file cannot be
/// written.
pub fn write_file(path: impl AsRef<Path>, contents: &str) -> GitResult<()> {
    let path = path.as_ref();
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        ensure_dir(parent)?;
    }

    debug!(?path, bytes = contents.len(), "writing file");
    fs::write(path, contents)?;
    Ok(())
}
