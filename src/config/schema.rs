//! Configuration schema definitions for wslstrap.
//!
//! This module contains the struct definitions that map to the YAML
//! configuration file format. Every field has a default, so an empty
//! file (or no file at all) describes the stock setup: Ubuntu, Node.js 18
//! from NodeSource, Claude Code from npm, and an "Open in Claude Code"
//! Explorer entry.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

/// Root configuration structure for wslstrap.yml
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WslstrapConfig {
    /// Guest distribution to install and run inside.
    pub distro: String,

    /// Language runtime installed in the guest.
    pub runtime: RuntimeConfig,

    /// Application installed through the runtime's package manager.
    pub application: ApplicationConfig,

    /// Explorer context-menu integration.
    pub integration: IntegrationConfig,

    /// Wall-clock bounds for external commands.
    pub timeouts: TimeoutConfig,
}

impl Default for WslstrapConfig {
    fn default() -> Self {
        Self {
            distro: "Ubuntu".to_string(),
            runtime: RuntimeConfig::default(),
            application: ApplicationConfig::default(),
            integration: IntegrationConfig::default(),
            timeouts: TimeoutConfig::default(),
        }
    }
}

/// Runtime installed before the application.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RuntimeConfig {
    /// Display name.
    pub name: String,

    /// Distro package providing the runtime.
    pub package: String,

    /// Runtime binary, used to verify the install.
    pub binary: String,

    /// Pinned major version.
    pub major_version: u32,

    /// Repository setup script; `{major}` is replaced by `major_version`.
    pub setup_url: String,

    /// Package manager binary used to install the application.
    pub package_manager: String,

    /// Base packages installed with apt before the runtime.
    pub base_packages: Vec<String>,
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self {
            name: "Node.js".to_string(),
            package: "nodejs".to_string(),
            binary: "node".to_string(),
            major_version: 18,
            setup_url: "https://deb.nodesource.com/setup_{major}.x".to_string(),
            package_manager: "npm".to_string(),
            base_packages: ["curl", "wget", "git", "build-essential"]
                .iter()
                .map(|s| s.to_string())
                .collect(),
        }
    }
}

impl RuntimeConfig {
    /// Setup script URL with the major version substituted.
    pub fn setup_url(&self) -> String {
        self.setup_url
            .replace("{major}", &self.major_version.to_string())
    }
}

/// The application the whole chain exists to provide.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ApplicationConfig {
    /// Display name.
    pub name: String,

    /// Binary name on the guest `PATH`.
    pub binary: String,

    /// Package installed globally with the package manager.
    pub package: String,

    /// Extra flags for the global install.
    pub install_flags: Vec<String>,
}

impl Default for ApplicationConfig {
    fn default() -> Self {
        Self {
            name: "Claude Code".to_string(),
            binary: "claude".to_string(),
            package: "@anthropic-ai/claude-code".to_string(),
            install_flags: vec!["--force".to_string(), "--no-os-check".to_string()],
        }
    }
}

/// Explorer context-menu entries and their launcher script.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct IntegrationConfig {
    /// Registry key name under `Directory\shell` and
    /// `Directory\Background\shell`.
    pub key: String,

    /// Menu label.
    pub label: String,

    /// Menu icon resource.
    pub icon: String,

    /// Directory holding the launcher script.
    pub launcher_dir: PathBuf,

    /// Launcher script file name.
    pub launcher_file: String,
}

impl Default for IntegrationConfig {
    fn default() -> Self {
        Self {
            key: "OpenInClaude".to_string(),
            label: "Open in Claude Code".to_string(),
            icon: r"C:\Windows\System32\cmd.exe,0".to_string(),
            launcher_dir: PathBuf::from("C:/Scripts"),
            launcher_file: "open_in_claude.cmd".to_string(),
        }
    }
}

impl IntegrationConfig {
    /// Full path of the launcher script.
    pub fn launcher_path(&self) -> PathBuf {
        self.launcher_dir.join(&self.launcher_file)
    }
}

/// Wall-clock bounds, in seconds.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TimeoutConfig {
    /// Bound for mutating commands (installs, package managers).
    pub command_secs: u64,

    /// Bound for read-only probes.
    pub probe_secs: u64,
}

impl Default for TimeoutConfig {
    fn default() -> Self {
        Self {
            command_secs: 300,
            probe_secs: 60,
        }
    }
}

impl TimeoutConfig {
    /// Bound for mutating commands.
    pub fn command(&self) -> Duration {
        Duration::from_secs(self.command_secs)
    }

    /// Bound for probes.
    pub fn probe(&self) -> Duration {
        Duration::from_secs(self.probe_secs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_yaml_yields_defaults() {
        let config: WslstrapConfig = serde_yaml::from_str("{}").unwrap();
        assert_eq!(config, WslstrapConfig::default());
        assert_eq!(config.distro, "Ubuntu");
        assert_eq!(config.application.binary, "claude");
    }

    #[test]
    fn partial_yaml_keeps_other_defaults() {
        let yaml = r#"
distro: Debian
runtime:
  major_version: 20
"#;
        let config: WslstrapConfig = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(config.distro, "Debian");
        assert_eq!(config.runtime.major_version, 20);
        assert_eq!(config.runtime.package, "nodejs");
        assert_eq!(config.timeouts.command_secs, 300);
    }

    #[test]
    fn setup_url_substitutes_major_version() {
        let runtime = RuntimeConfig {
            major_version: 22,
            ..Default::default()
        };
        assert_eq!(runtime.setup_url(), "https://deb.nodesource.com/setup_22.x");
    }

    #[test]
    fn launcher_path_joins_dir_and_file() {
        let integration = IntegrationConfig::default();
        assert!(integration
            .launcher_path()
            .ends_with("open_in_claude.cmd"));
    }

    #[test]
    fn timeouts_convert_to_durations() {
        let timeouts = TimeoutConfig::default();
        assert_eq!(timeouts.command(), Duration::from_secs(300));
        assert_eq!(timeouts.probe(), Duration::from_secs(60));
    }
}
