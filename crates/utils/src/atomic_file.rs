//! Crash-safe record writes
//!
//! A record is staged in a temporary file beside its target, flushed to disk
//! and renamed over the target. On unix the parent directory is synced as
//! well so the rename itself survives a crash.

use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;

/// Failed step of [`write_atomic`], with the path it touched
#[derive(Debug, thiserror::Error)]
#[error("failed to {operation} '{}': {source}", path.display())]
pub struct AtomicWriteError {
    pub path: PathBuf,
    pub operation: &'static str,
    #[source]
    pub source: io::Error,
}

impl AtomicWriteError {
    fn new(path: impl Into<PathBuf>, operation: &'static str, source: io::Error) -> Self {
        Self {
            path: path.into(),
            operation,
            source,
        }
    }
}

/// Replace the file at `path` with `content`.
///
/// Readers see either the previous content or the new content. Missing
/// parent directories are created. The staged file is removed when any
/// step fails.
pub fn write_atomic(path: &Path, content: &[u8]) -> Result<(), AtomicWriteError> {
    let parent = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };

    fs::create_dir_all(parent)
        .map_err(|e| AtomicWriteError::new(parent, "create parent directory", e))?;

    let mut staged = NamedTempFile::new_in(parent)
        .map_err(|e| AtomicWriteError::new(parent, "create temporary file", e))?;
    staged
        .write_all(content)
        .map_err(|e| AtomicWriteError::new(staged.path(), "write temporary file", e))?;
    staged
        .as_file()
        .sync_all()
        .map_err(|e| AtomicWriteError::new(staged.path(), "sync temporary file", e))?;

    // A failed persist hands the file back and dropping it removes it
    staged
        .persist(path)
        .map_err(|e| AtomicWriteError::new(path, "replace", e.error))?;

    sync_dir(parent)
}

#[cfg(unix)]
fn sync_dir(dir: &Path) -> Result<(), AtomicWriteError> {
    fs::File::open(dir)
        .and_then(|handle| handle.sync_all())
        .map_err(|e| AtomicWriteError::new(dir, "sync directory", e))
}

#[cfg(not(unix))]
fn sync_dir(_dir: &Path) -> Result<(), AtomicWriteError> {
    Ok(())
}
