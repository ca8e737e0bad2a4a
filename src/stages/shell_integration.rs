//! Explorer "open here" integration.
//!
//! Two context-menu entries are installed, one on folder backgrounds and
//! one on folders themselves, both running a small launcher script that
//! opens the application in the guest at the clicked location.

use std::path::PathBuf;
use std::sync::Arc;

use crate::config::IntegrationConfig;
use crate::error::Result;
use crate::host::{ArtifactWriter, EntryStore};

use super::{ProbeResult, Stage, StageKind};

const LAUNCHER_TEMPLATE: &str = include_str!("../../templates/launcher.cmd");

/// Menu on the empty area of an open folder.
pub const BACKGROUND_ROOT: &str = r"HKCR\Directory\Background\shell";
/// Menu on a folder icon.
pub const DIRECTORY_ROOT: &str = r"HKCR\Directory\shell";

/// Installs the context-menu entries and their launcher.
pub struct ShellIntegration {
    entries: Arc<dyn EntryStore>,
    artifacts: Arc<dyn ArtifactWriter>,
    integration: IntegrationConfig,
    distro: String,
    app_name: String,
    app_binary: String,
}

impl ShellIntegration {
    pub fn new(
        entries: Arc<dyn EntryStore>,
        artifacts: Arc<dyn ArtifactWriter>,
        integration: IntegrationConfig,
        distro: &str,
        app_name: &str,
        app_binary: &str,
    ) -> Self {
        Self {
            entries,
            artifacts,
            integration,
            distro: distro.to_string(),
            app_name: app_name.to_string(),
            app_binary: app_binary.to_string(),
        }
    }

    pub fn background_key(&self) -> String {
        format!(r"{}\{}", BACKGROUND_ROOT, self.integration.key)
    }

    pub fn directory_key(&self) -> String {
        format!(r"{}\{}", DIRECTORY_ROOT, self.integration.key)
    }

    pub fn launcher_path(&self) -> PathBuf {
        self.integration.launcher_path()
    }

    /// Launcher path as Explorer expects it, with backslashes.
    fn launcher_windows_path(&self) -> String {
        windows_path(&self.launcher_path().display().to_string())
    }

    /// Command line for an entry; `placeholder` is `%V` or `%1`.
    pub fn entry_command(&self, placeholder: &str) -> String {
        format!(r#""{}" "{}""#, self.launcher_windows_path(), placeholder)
    }

    /// The launcher script, with CRLF line endings.
    pub fn render_launcher(&self) -> String {
        let log_dir = windows_path(&self.integration.launcher_dir.display().to_string());
        LAUNCHER_TEMPLATE
            .replace("{{title}}", &self.app_name)
            .replace("{{distro}}", &self.distro)
            .replace("{{binary}}", &self.app_binary)
            .replace("{{log_dir}}", &log_dir)
            .lines()
            .collect::<Vec<_>>()
            .join("\r\n")
            + "\r\n"
    }
}

fn windows_path(path: &str) -> String {
    path.replace('/', "\\")
}

impl Stage for ShellIntegration {
    fn kind(&self) -> StageKind {
        StageKind::ShellIntegration
    }

    fn probe(&self) -> ProbeResult {
        let key = self.background_key();
        match self.entries.exists(&key) {
            Ok(true) => ProbeResult::satisfied(Some(key)),
            Ok(false) => ProbeResult::unsatisfied(Some(format!("{} not present", key))),
            Err(e) => {
                tracing::debug!("Shell integration probe failed: {}", e);
                ProbeResult::unsatisfied(Some(e.to_string()))
            }
        }
    }

    fn apply(&self) -> Result<()> {
        let launcher = self.launcher_path();
        tracing::info!("Writing launcher {}", launcher.display());
        self.artifacts.write_file(&launcher, &self.render_launcher())?;

        self.entries.create(&self.background_key(), &self.entry_command("%V"))?;
        self.entries.create(&self.directory_key(), &self.entry_command("%1"))?;
        Ok(())
    }

    fn reversible(&self) -> bool {
        true
    }

    fn reverse(&self) -> Result<()> {
        self.entries.delete(&self.background_key())?;
        self.entries.delete(&self.directory_key())?;

        let launcher = self.launcher_path();
        self.artifacts.delete_file(&launcher)?;
        if self
            .artifacts
            .remove_dir_if_empty(&self.integration.launcher_dir)?
        {
            tracing::info!(
                "Removed empty directory {}",
                self.integration.launcher_dir.display()
            );
        }
        Ok(())
    }
}
