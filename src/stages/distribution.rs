//! The guest Linux distribution.
//!
//! Detection parses `wsl -l -v` into a set of names rather than searching
//! the raw text, so `Ubuntu` is not mistaken for present when only
//! `Ubuntu-22.04` is installed.

use std::collections::BTreeSet;
use std::sync::{Arc, LazyLock};

use regex::Regex;

use crate::config::TimeoutConfig;
use crate::error::Result;
use crate::shell::{run_checked, CommandLine, CommandRunner};

use super::{clean_tool_output, ProbeResult, Stage, StageKind};

static HEADER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)^\s*NAME\s+STATE\s+VERSION\s*$").unwrap());

static ROW: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^\s*(?:\*\s*)?(\S+)").unwrap());

/// Installed distributions, as reported by `wsl -l -v`.
///
/// ```
/// use wslstrap::stages::DistroListing;
///
/// let listing = DistroListing::parse("  NAME      STATE    VERSION\n* Ubuntu    Stopped  2\n");
/// assert!(listing.contains("ubuntu"));
/// assert!(!listing.contains("Ubuntu-22.04"));
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DistroListing {
    names: Vec<String>,
    normalized: BTreeSet<String>,
}

impl DistroListing {
    /// Tokenize raw listing output.
    ///
    /// Tolerates UTF-16 artifacts, blank lines, the header row and the
    /// `*` default marker. The first token of each row is the name.
    pub fn parse(raw: &str) -> Self {
        let mut listing = Self::default();
        let cleaned = clean_tool_output(raw);

        for line in cleaned.lines() {
            if line.trim().is_empty() || HEADER.is_match(line) {
                continue;
            }
            if let Some(name) = ROW.captures(line).and_then(|c| c.get(1)) {
                let name = name.as_str();
                if listing.normalized.insert(name.to_lowercase()) {
                    listing.names.push(name.to_string());
                }
            }
        }

        listing
    }

    /// Case-insensitive exact membership.
    pub fn contains(&self, name: &str) -> bool {
        self.normalized.contains(&name.trim().to_lowercase())
    }

    /// Names in listing order, as printed.
    pub fn names(&self) -> &[String] {
        &self.names
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }
}

/// Installs the configured guest distribution.
pub struct GuestDistribution {
    runner: Arc<dyn CommandRunner>,
    distro: String,
    timeouts: TimeoutConfig,
}

impl GuestDistribution {
    pub fn new(runner: Arc<dyn CommandRunner>, distro: &str, timeouts: TimeoutConfig) -> Self {
        Self {
            runner,
            distro: distro.to_string(),
            timeouts,
        }
    }

    /// Configured distribution name.
    pub fn distro(&self) -> &str {
        &self.distro
    }
}

impl Stage for GuestDistribution {
    fn kind(&self) -> StageKind {
        StageKind::Distribution
    }

    fn name(&self) -> String {
        format!("Guest distribution ({})", self.distro)
    }

    fn probe(&self) -> ProbeResult {
        let cmd = CommandLine::new(["wsl", "-l", "-v"]);
        let result = match self.runner.run(&cmd, self.timeouts.probe()) {
            Ok(result) if result.success => result,
            Ok(result) => {
                return ProbeResult::unsatisfied(Some(format!(
                    "wsl -l -v exited with {:?}",
                    result.exit_code
                )))
            }
            Err(e) => return ProbeResult::unsatisfied(Some(e.to_string())),
        };

        let listing = DistroListing::parse(&result.stdout);
        tracing::debug!("Installed distributions: {:?}", listing.names());

        let detail = if listing.is_empty() {
            "no distributions installed".to_string()
        } else {
            format!("installed: {}", listing.names().join(", "))
        };

        if listing.contains(&self.distro) {
            ProbeResult::satisfied(Some(detail))
        } else {
            ProbeResult::unsatisfied(Some(detail))
        }
    }

    fn apply(&self) -> Result<()> {
        tracing::info!("Installing guest distribution {}", self.distro);
        let cmd = CommandLine::new(["wsl", "--install", "-d", &self.distro, "--no-launch"]);
        run_checked(self.runner.as_ref(), &cmd, self.timeouts.command())?;
        Ok(())
    }
}
