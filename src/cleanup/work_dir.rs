//! Exclusively-owned temporary directory with at-most-once removal

use std::io;
use std::path::{Path, PathBuf};
use std::sync::{Mutex, PoisonError};
use tempfile::TempDir;
use tracing::debug;

const PREFIX: &str = "sparsefetch-";

/// A temporary directory that can be removed from any thread, exactly once
///
/// Shared between a session and its registered cleanup hook. Whoever calls
/// [`WorkDir::remove`] first performs the removal; later calls do nothing.
#[derive(Debug)]
pub struct WorkDir {
    path: PathBuf,
    dir: Mutex<Option<TempDir>>,
}

impl WorkDir {
    /// Create a fresh, uniquely named directory under the system temp dir
    ///
    /// # Errors
    ///
    /// Returns an error if the directory cannot be created
    #[inline]
    pub fn create() -> io::Result<Self> {
        let dir = tempfile::Builder::new().prefix(PREFIX).tempdir()?;
        Ok(Self {
            path: dir.path().to_path_buf(),
            dir: Mutex::new(Some(dir)),
        })
    }

    #[must_use]
    #[inline]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Whether a removal has already been attempted
    #[must_use]
    #[inline]
    pub fn is_removed(&self) -> bool {
        self.dir
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .is_none()
    }

    /// Recursively delete the directory; never fails
    ///
    /// Returns `true` if this call attempted the removal. Removal errors are
    /// logged and dropped.
    #[inline]
    pub fn remove(&self) -> bool {
        let taken = self
            .dir
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .take();

        let Some(dir) = taken else {
            return false;
        };

        match dir.close() {
            Ok(()) => debug!("Removed work directory {}", self.path.display()),
            Err(err) => debug!(
                "Ignoring failure to remove work directory {}: {err}",
                self.path.display()
            ),
        }
        true
    }
}

impl Drop for WorkDir {
    fn drop(&mut self) {
        self.remove();
    }
}
