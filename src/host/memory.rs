//! In-memory host collaborators for testing.
//!
//! These record every mutation so tests can assert on host state without
//! touching the registry or the filesystem.

use std::collections::{BTreeMap, BTreeSet};
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Mutex, MutexGuard, PoisonError};

use crate::error::{Result, WslstrapError};

use super::{ArtifactWriter, EntryStore, PrivilegeCheck};

fn lock<T>(m: &Mutex<T>) -> MutexGuard<'_, T> {
    m.lock().unwrap_or_else(PoisonError::into_inner)
}

fn injected(what: &str, target: &str) -> WslstrapError {
    anyhow::anyhow!("injected failure: {} {}", what, target).into()
}

/// Entry store kept in a map.
#[derive(Debug, Default)]
pub struct MemoryEntryStore {
    entries: Mutex<BTreeMap<String, String>>,
    failing: AtomicBool,
}

impl MemoryEntryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make `create` and `delete` fail until reset.
    pub fn set_failing(&self, failing: bool) {
        self.failing.store(failing, Ordering::SeqCst);
    }

    /// Value stored under `key`.
    pub fn get(&self, key: &str) -> Option<String> {
        lock(&self.entries).get(key).cloned()
    }

    /// All keys, sorted.
    pub fn keys(&self) -> Vec<String> {
        lock(&self.entries).keys().cloned().collect()
    }

    pub fn is_empty(&self) -> bool {
        lock(&self.entries).is_empty()
    }
}

impl EntryStore for MemoryEntryStore {
    fn exists(&self, key: &str) -> Result<bool> {
        Ok(lock(&self.entries).contains_key(key))
    }

    fn create(&self, key: &str, value: &str) -> Result<()> {
        if self.failing.load(Ordering::SeqCst) {
            return Err(injected("create", key));
        }
        lock(&self.entries).insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn delete(&self, key: &str) -> Result<()> {
        if self.failing.load(Ordering::SeqCst) {
            return Err(injected("delete", key));
        }
        lock(&self.entries).remove(key);
        Ok(())
    }
}

/// Artifact writer kept in memory.
///
/// Directories exist once a file has been written below them and are
/// only removed by [`remove_dir_if_empty`](ArtifactWriter::remove_dir_if_empty).
#[derive(Debug, Default)]
pub struct MemoryArtifacts {
    files: Mutex<BTreeMap<PathBuf, String>>,
    dirs: Mutex<BTreeSet<PathBuf>>,
}

impl MemoryArtifacts {
    pub fn new() -> Self {
        Self::default()
    }

    /// Contents of the file at `path`.
    pub fn read(&self, path: &Path) -> Option<String> {
        lock(&self.files).get(path).cloned()
    }

    pub fn file_exists(&self, path: &Path) -> bool {
        lock(&self.files).contains_key(path)
    }

    pub fn dir_exists(&self, dir: &Path) -> bool {
        lock(&self.dirs).contains(dir)
    }
}

impl ArtifactWriter for MemoryArtifacts {
    fn write_file(&self, path: &Path, contents: &str) -> Result<()> {
        if let Some(parent) = path.parent() {
            lock(&self.dirs).insert(parent.to_path_buf());
        }
        lock(&self.files).insert(path.to_path_buf(), contents.to_string());
        Ok(())
    }

    fn delete_file(&self, path: &Path) -> Result<()> {
        lock(&self.files).remove(path);
        Ok(())
    }

    fn remove_dir_if_empty(&self, dir: &Path) -> Result<bool> {
        if lock(&self.files).keys().any(|f| f.starts_with(dir)) {
            return Ok(false);
        }
        Ok(lock(&self.dirs).remove(dir))
    }
}

/// Privilege check with a fixed answer that counts how often it was asked.
#[derive(Debug, Default)]
pub struct FixedPrivileges {
    elevated: bool,
    checks: AtomicUsize,
}

impl FixedPrivileges {
    pub fn elevated() -> Self {
        Self {
            elevated: true,
            checks: AtomicUsize::new(0),
        }
    }

    pub fn unelevated() -> Self {
        Self::default()
    }

    /// Number of times `is_elevated` was called.
    pub fn checks(&self) -> usize {
        self.checks.load(Ordering::SeqCst)
    }
}

impl PrivilegeCheck for FixedPrivileges {
    fn is_elevated(&self) -> bool {
        self.checks.fetch_add(1, Ordering::SeqCst);
        self.elevated
    }
}
