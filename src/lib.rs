//! wslstrap - idempotent WSL bootstrap.
//!
//! wslstrap brings a Windows host to a known state: the WSL
//! virtualization layer, a guest distribution, a language runtime with
//! a command-line application inside the guest, and an Explorer
//! context-menu entry that opens the application in the clicked folder.
//! Every run re-probes the host and only installs what is missing.
//!
//! # Modules
//!
//! - [`cli`] - Command-line interface and argument parsing
//! - [`config`] - Configuration loading, merging, and validation
//! - [`error`] - Error types and result aliases
//! - [`host`] - Registry, filesystem, and privilege access
//! - [`runner`] - Dependency chain, run modes, and reports
//! - [`shell`] - External command execution
//! - [`stages`] - The four installable components
//! - [`ui`] - Interactive prompts, spinners, and terminal output
//!
//! # Example
//!
//! ```
//! use std::sync::Arc;
//! use wslstrap::config::WslstrapConfig;
//! use wslstrap::host::{FixedPrivileges, MemoryArtifacts, MemoryEntryStore};
//! use wslstrap::runner::{HostServices, NoHooks, Orchestrator, RunMode};
//! use wslstrap::shell::ScriptedRunner;
//!
//! let services = HostServices {
//!     runner: Arc::new(ScriptedRunner::new()),
//!     entries: Arc::new(MemoryEntryStore::new()),
//!     artifacts: Arc::new(MemoryArtifacts::new()),
//!     privileges: Arc::new(FixedPrivileges::unelevated()),
//! };
//! let orchestrator = Orchestrator::from_config(&WslstrapConfig::default(), &services);
//!
//! // Status runs never need elevation and never change anything.
//! let report = orchestrator.run(RunMode::Status, &mut NoHooks).unwrap();
//! assert_eq!(report.stages.len(), 4);
//! assert_eq!(report.exit_code(), 0);
//! ```

pub mod cli;
pub mod config;
pub mod error;
pub mod host;
pub mod runner;
pub mod shell;
pub mod stages;
pub mod ui;

pub use error::{Result, WslstrapError};
