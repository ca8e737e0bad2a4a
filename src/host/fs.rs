//! Launcher artifacts on the real filesystem.

use anyhow::Context;
use std::fs;
use std::io::ErrorKind;
use std::path::Path;

use crate::error::Result;

use super::ArtifactWriter;

/// Artifact writer backed by `std::fs`.
#[derive(Debug, Clone, Copy, Default)]
pub struct FsArtifacts;

impl FsArtifacts {
    pub fn new() -> Self {
        Self
    }
}

impl ArtifactWriter for FsArtifacts {
    fn write_file(&self, path: &Path, contents: &str) -> Result<()> {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create directory {}", parent.display()))?;
        }
        fs::write(path, contents)
            .with_context(|| format!("Failed to write {}", path.display()))?;
        tracing::info!("Wrote {}", path.display());
        Ok(())
    }

    fn delete_file(&self, path: &Path) -> Result<()> {
        match fs::remove_file(path) {
            Ok(()) => {
                tracing::info!("Deleted {}", path.display());
                Ok(())
            }
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(anyhow::Error::new(e)
                .context(format!("Failed to delete {}", path.display()))
                .into()),
        }
    }

    fn remove_dir_if_empty(&self, dir: &Path) -> Result<bool> {
        let mut entries = match fs::read_dir(dir) {
            Ok(entries) => entries,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(false),
            Err(e) => {
                return Err(anyhow::Error::new(e)
                    .context(format!("Failed to read {}", dir.display()))
                    .into())
            }
        };
        if entries.next().is_some() {
            tracing::debug!("{} not empty, keeping it", dir.display());
            return Ok(false);
        }
        fs::remove_dir(dir).with_context(|| format!("Failed to remove {}", dir.display()))?;
        Ok(true)
    }
}
