//! CLI argument definitions.
//!
//! This module defines all CLI arguments using clap's derive macros.
//! The main entry point is the [`Cli`] struct.

use clap::{ArgGroup, Parser};
use std::path::PathBuf;

use crate::runner::RunMode;

/// wslstrap - set up WSL, Node.js and Claude Code with an Explorer
/// "Open in Claude Code" entry.
///
/// Without a mode flag, installs whatever is missing.
#[derive(Debug, Parser)]
#[command(name = "wslstrap")]
#[command(author, version, about, long_about = None)]
#[command(group(
    ArgGroup::new("mode")
        .args(["status", "context_only", "uninstall"])
        .multiple(false)
))]
pub struct Cli {
    /// Show what is installed without changing anything
    #[arg(long)]
    pub status: bool,

    /// Print the status report as JSON
    #[arg(long, requires = "status")]
    pub json: bool,

    /// Install only the Explorer context-menu entry
    #[arg(long)]
    pub context_only: bool,

    /// Remove the Explorer context-menu entry
    #[arg(long)]
    pub uninstall: bool,

    /// Path to config file (overrides ./wslstrap.yml and ~/.wslstrap/config.yml)
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// WSL distribution to install and launch into
    #[arg(long, env = "WSLSTRAP_DISTRO")]
    pub distro: Option<String>,

    /// Answer yes to every confirmation
    #[arg(short, long)]
    pub yes: bool,

    /// Use defaults, no prompts
    #[arg(long)]
    pub non_interactive: bool,

    /// Show verbose output
    #[arg(short, long, conflicts_with = "quiet")]
    pub verbose: bool,

    /// Minimal output
    #[arg(short, long)]
    pub quiet: bool,

    /// Disable colored output
    #[arg(long)]
    pub no_color: bool,

    /// Enable debug logging
    #[arg(long)]
    pub debug: bool,

    /// Also write logs to this file
    #[arg(long, value_name = "PATH")]
    pub log_file: Option<PathBuf>,

    /// Advisory lock file held during mutating runs
    #[arg(long, value_name = "PATH")]
    pub lock_file: Option<PathBuf>,
}

impl Cli {
    /// The run mode selected by the mode flags.
    pub fn mode(&self) -> RunMode {
        if self.status {
            RunMode::Status
        } else if self.context_only {
            RunMode::ContextOnly
        } else if self.uninstall {
            RunMode::Uninstall
        } else {
            RunMode::Install
        }
    }
}
