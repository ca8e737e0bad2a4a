//! Host-side collaborators the stages and the orchestrator depend on.
//!
//! Each concern is a trait with a production implementation that touches
//! the real machine and an in-memory one in [`memory`] for tests.

pub mod fs;
pub mod memory;
pub mod privileges;
pub mod registry;

pub use fs::FsArtifacts;
pub use memory::{FixedPrivileges, MemoryArtifacts, MemoryEntryStore};
pub use privileges::HostPrivileges;
pub use registry::RegistryStore;

use std::path::Path;

use crate::error::Result;

/// Persistent key → value store for shell entries.
pub trait EntryStore: Send + Sync {
    /// Whether an entry exists under `key`.
    fn exists(&self, key: &str) -> Result<bool>;

    /// Create (or overwrite) the entry under `key` with its command `value`.
    fn create(&self, key: &str, value: &str) -> Result<()>;

    /// Delete the entry under `key`. Deleting an absent entry succeeds.
    fn delete(&self, key: &str) -> Result<()>;
}

/// Writes and removes files the integration ships.
pub trait ArtifactWriter: Send + Sync {
    /// Write `contents` to `path`, creating parent directories.
    fn write_file(&self, path: &Path, contents: &str) -> Result<()>;

    /// Delete `path`. Deleting a missing file succeeds.
    fn delete_file(&self, path: &Path) -> Result<()>;

    /// Remove `dir` if it exists and is empty; returns whether it was removed.
    fn remove_dir_if_empty(&self, dir: &Path) -> Result<bool>;
}

/// Answers whether the current process may change host state.
pub trait PrivilegeCheck: Send + Sync {
    fn is_elevated(&self) -> bool;
}
