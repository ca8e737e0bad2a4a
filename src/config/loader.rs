//! Configuration file discovery and loading.
//!
//! This module handles finding and loading configuration files from
//! various locations in the correct priority order.

use crate::config::merger::merge_configs;
use crate::config::schema::WslstrapConfig;
use crate::error::{Result, WslstrapError};
use std::fs;
use std::path::{Path, PathBuf};

/// Project config file name, looked up in the working directory.
pub const PROJECT_CONFIG_FILE: &str = "wslstrap.yml";

/// Paths to configuration files in priority order (later overrides earlier).
///
/// Merge order:
/// 1. User global config (`~/.wslstrap/config.yml`)
/// 2. Project config (`./wslstrap.yml`)
#[derive(Debug, Clone, Default)]
pub struct ConfigPaths {
    /// User's global config: ~/.wslstrap/config.yml
    pub user_global: Option<PathBuf>,

    /// Project config: ./wslstrap.yml
    pub project: Option<PathBuf>,
}

impl ConfigPaths {
    /// Discover config files for the given project root.
    pub fn discover(project_root: &Path) -> Self {
        Self::discover_with_home(project_root, dirs::home_dir().as_deref())
    }

    /// Discover config files with an explicit home directory.
    pub fn discover_with_home(project_root: &Path, home: Option<&Path>) -> Self {
        Self {
            user_global: home
                .map(|h| h.join(".wslstrap").join("config.yml"))
                .filter(|p| p.is_file()),
            project: Some(project_root.join(PROJECT_CONFIG_FILE)).filter(|p| p.is_file()),
        }
    }

    /// Returns all existing config paths in merge order.
    pub fn all_existing(&self) -> Vec<&PathBuf> {
        self.user_global.iter().chain(self.project.iter()).collect()
    }

    /// Whether no config file was found at all.
    pub fn is_empty(&self) -> bool {
        self.user_global.is_none() && self.project.is_none()
    }
}

/// Load a config file as raw YAML Value (for merging).
///
/// # Errors
///
/// Returns `ConfigNotFound` if the file doesn't exist.
/// Returns `ConfigParseError` if the YAML is invalid.
pub fn load_config_value(path: &Path) -> Result<serde_yaml::Value> {
    let content = fs::read_to_string(path).map_err(|e| {
        if e.kind() == std::io::ErrorKind::NotFound {
            WslstrapError::ConfigNotFound {
                path: path.to_path_buf(),
            }
        } else {
            WslstrapError::Io(e)
        }
    })?;

    serde_yaml::from_str(&content).map_err(|e| WslstrapError::ConfigParseError {
        path: path.to_path_buf(),
        message: e.to_string(),
    })
}

/// Parse YAML content into a typed config.
///
/// Empty content yields the defaults.
pub fn parse_config(content: &str, source_path: &Path) -> Result<WslstrapConfig> {
    let value: serde_yaml::Value =
        serde_yaml::from_str(content).map_err(|e| WslstrapError::ConfigParseError {
            path: source_path.to_path_buf(),
            message: e.to_string(),
        })?;
    from_merged(merge_configs(&[value]), source_path)
}

/// Load a single config file.
pub fn load_config_file(path: &Path) -> Result<WslstrapConfig> {
    let value = load_config_value(path)?;
    from_merged(merge_configs(&[value]), path)
}

/// Load and merge all discovered config files.
///
/// Returns the defaults when no file exists.
pub fn load_merged_config(paths: &ConfigPaths) -> Result<WslstrapConfig> {
    if paths.is_empty() {
        tracing::debug!("No configuration file found, using defaults");
        return Ok(WslstrapConfig::default());
    }

    let mut configs = Vec::new();
    for path in paths.all_existing() {
        tracing::debug!("Loading configuration from {}", path.display());
        configs.push(load_config_value(path)?);
    }

    let source = paths
        .project
        .as_ref()
        .or(paths.user_global.as_ref())
        .cloned()
        .unwrap_or_default();
    from_merged(merge_configs(&configs), &source)
}

/// Load config with optional path override.
///
/// If `config_override` is provided, loads only that file without merging
/// and a missing file is an error. Otherwise, discovers and merges.
pub fn load_config(project_root: &Path, config_override: Option<&Path>) -> Result<WslstrapConfig> {
    if let Some(override_path) = config_override {
        load_config_file(override_path)
    } else {
        load_merged_config(&ConfigPaths::discover(project_root))
    }
}

fn from_merged(merged: serde_yaml::Value, source: &Path) -> Result<WslstrapConfig> {
    serde_yaml::from_value(merged).map_err(|e| WslstrapError::ConfigParseError {
        path: source.to_path_buf(),
        message: e.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn write_user_config(home: &Path, content: &str) {
        let dir = home.join(".wslstrap");
        fs::create_dir_all(&dir).unwrap();
        fs::write(dir.join("config.yml"), content).unwrap();
    }

    #[test]
    fn discover_finds_project_config() {
        let temp = TempDir::new().unwrap();
        fs::write(temp.path().join(PROJECT_CONFIG_FILE), "distro: Debian").unwrap();

        let paths = ConfigPaths::discover_with_home(temp.path(), None);
        assert!(paths.project.is_some());
        assert!(paths.user_global.is_none());
    }

    #[test]
    fn discover_returns_none_for_missing_configs() {
        let project = TempDir::new().unwrap();
        let home = TempDir::new().unwrap();

        let paths = ConfigPaths::discover_with_home(project.path(), Some(home.path()));
        assert!(paths.is_empty());
        assert!(paths.all_existing().is_empty());
    }

    #[test]
    fn all_existing_puts_user_global_first() {
        let project = TempDir::new().unwrap();
        let home = TempDir::new().unwrap();
        fs::write(project.path().join(PROJECT_CONFIG_FILE), "").unwrap();
        write_user_config(home.path(), "");

        let paths = ConfigPaths::discover_with_home(project.path(), Some(home.path()));
        let all = paths.all_existing();

        assert_eq!(all.len(), 2);
        assert!(all[0].starts_with(home.path()));
        assert!(all[1].starts_with(project.path()));
    }

    #[test]
    fn project_config_overrides_user_global() {
        let project = TempDir::new().unwrap();
        let home = TempDir::new().unwrap();
        write_user_config(home.path(), "distro: Debian\nruntime:\n  major_version: 20");
        fs::write(project.path().join(PROJECT_CONFIG_FILE), "distro: Ubuntu-22.04").unwrap();

        let paths = ConfigPaths::discover_with_home(project.path(), Some(home.path()));
        let config = load_merged_config(&paths).unwrap();

        assert_eq!(config.distro, "Ubuntu-22.04");
        assert_eq!(config.runtime.major_version, 20);
    }

    #[test]
    fn no_files_yields_defaults() {
        let config = load_merged_config(&ConfigPaths::default()).unwrap();
        assert_eq!(config, WslstrapConfig::default());
    }

    #[test]
    fn empty_file_yields_defaults() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("empty.yml");
        fs::write(&path, "").unwrap();

        let config = load_config_file(&path).unwrap();
        assert_eq!(config, WslstrapConfig::default());
    }

    #[test]
    fn load_config_override_missing_file_is_not_found() {
        let temp = TempDir::new().unwrap();
        let missing = temp.path().join("nope.yml");

        let err = load_config(temp.path(), Some(&missing)).unwrap_err();
        assert!(matches!(err, WslstrapError::ConfigNotFound { .. }));
    }

    #[test]
    fn invalid_yaml_is_parse_error() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("bad.yml");
        fs::write(&path, "distro: [unclosed").unwrap();

        let err = load_config_file(&path).unwrap_err();
        assert!(matches!(err, WslstrapError::ConfigParseError { .. }));
    }

    #[test]
    fn wrong_type_is_parse_error() {
        let err = parse_config("runtime:\n  major_version: eighteen", Path::new("x.yml"))
            .unwrap_err();
        match err {
            WslstrapError::ConfigParseError { path, .. } => {
                assert_eq!(path, PathBuf::from("x.yml"))
            }
            other => panic!("Expected ConfigParseError, got {:?}", other),
        }
    }
}
