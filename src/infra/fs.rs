//! Filesystem operations used by settings side effects.

use std::fs;
use std::io;
use std::path::Path;

#[cfg(any(test, feature = "test-utils"))]
use mockall::automock;

/// Filesystem trait for dependency injection.
///
/// Implementations must treat an already existing directory as success.
#[cfg_attr(any(test, feature = "test-utils"), automock)]
pub trait Filesystem: Send + Sync {
    /// Create `path` and any missing parents.
    fn ensure_dir(&self, path: &Path) -> io::Result<()>;
}

/// Real filesystem.
#[derive(Debug, Default, Clone, Copy)]
pub struct StdFilesystem;

impl Filesystem for StdFilesystem {
    fn ensure_dir(&self, path: &Path) -> io::Result<()> {
        // create_dir_all tolerates the directory appearing concurrently, but
        // fails if the path exists as a regular file.
        fs::create_dir_all(path)
    }
}

/// Leaves the filesystem untouched.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopFilesystem;

impl Filesystem for NoopFilesystem {
    fn ensure_dir(&self, _path: &Path) -> io::Result<()> {
        Ok(())
    }
}
