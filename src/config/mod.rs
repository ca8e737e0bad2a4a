//! Configuration loading, parsing, and validation for wslstrap.
//!
//! - Schema definitions in [`schema`]
//! - File discovery and loading in [`loader`]
//! - Deep merging in [`merger`]
//! - Validation in [`validator`]
//!
//! # Example
//!
//! ```
//! use wslstrap::config::{load_config, validate};
//! use tempfile::TempDir;
//! use std::fs;
//!
//! let temp = TempDir::new().unwrap();
//! let path = temp.path().join("wslstrap.yml");
//! fs::write(&path, "distro: Debian").unwrap();
//!
//! let config = load_config(temp.path(), Some(&path)).unwrap();
//! validate(&config).unwrap();
//! assert_eq!(config.distro, "Debian");
//! ```
//!
//! # Configuration File Locations
//!
//! wslstrap discovers and merges configuration in this order:
//! 1. User global config (`~/.wslstrap/config.yml`)
//! 2. Project config (`./wslstrap.yml`)
//!
//! `--config <path>` replaces discovery with a single file.

pub mod loader;
pub mod merger;
pub mod schema;
pub mod validator;

pub use schema::{
    ApplicationConfig, IntegrationConfig, RuntimeConfig, TimeoutConfig, WslstrapConfig,
};

pub use loader::{
    load_config, load_config_file, load_config_value, load_merged_config, parse_config,
    ConfigPaths, PROJECT_CONFIG_FILE,
};

pub use merger::{deep_merge, merge_configs};

pub use validator::{validate, validate_config, ValidationError};
