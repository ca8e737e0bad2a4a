//! Advisory lock so only one mutating run touches the host at a time.

use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};

use fslock::LockFile;

use crate::error::{Result, WslstrapError};

/// Default lock file location.
pub fn default_lock_path() -> PathBuf {
    std::env::temp_dir().join("wslstrap.lock")
}

/// Held for the duration of a mutating run; released on drop.
///
/// Backed by an OS file lock, so a run that dies without unwinding
/// releases it too. The file carries the owner's pid for diagnostics.
pub struct RunLock {
    lock: LockFile,
    path: PathBuf,
}

impl RunLock {
    /// Take the lock at `path`, failing with `RunInProgress` if it is held.
    pub fn acquire(path: &Path) -> Result<Self> {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)?;
        }

        let path = path.to_path_buf();
        let mut lock = LockFile::open(&path)?;
        if !lock.try_lock_with_pid()? {
            let holder = fs::read_to_string(&path).unwrap_or_default();
            tracing::warn!(
                "Lock {} already held by pid {}",
                path.display(),
                holder.trim()
            );
            return Err(WslstrapError::RunInProgress { path });
        }

        tracing::debug!("Acquired run lock {}", path.display());
        Ok(Self { lock, path })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl fmt::Debug for RunLock {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RunLock").field("path", &self.path).finish()
    }
}

impl Drop for RunLock {
    fn drop(&mut self) {
        if let Err(e) = self.lock.unlock() {
            tracing::warn!("Failed to release lock {}: {}", self.path.display(), e);
        }
        // The next run recreates it.
        let _ = fs::remove_file(&self.path);
    }
}
