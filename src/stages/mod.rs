//! Bootstrap stages.
//!
//! A stage is one installable component of the target state. It can
//! report whether the component is present ([`Stage::probe`]), install it
//! ([`Stage::apply`]) and, for some stages, remove it again
//! ([`Stage::reverse`]).
//!
//! Stages never reference each other. Ordering and prerequisites are
//! expressed by position in a [`DependencyChain`](crate::runner::DependencyChain).
//!
//! # Stages
//!
//! | Stage | Probe | Reversible |
//! |-------|-------|------------|
//! | [`VirtualizationLayer`] | `wsl --version` | no |
//! | [`GuestDistribution`] | `wsl -l -v` listing | no |
//! | [`Application`] | `which <bin>` / `<bin> --version` in the guest | no |
//! | [`ShellIntegration`] | Explorer entry exists | yes |

pub mod application;
pub mod distribution;
pub mod shell_integration;
pub mod virtualization;

pub use application::Application;
pub use distribution::{DistroListing, GuestDistribution};
pub use shell_integration::ShellIntegration;
pub use virtualization::VirtualizationLayer;

use std::fmt;

use serde::Serialize;

use crate::error::{Result, WslstrapError};

/// Identity of a stage within the chain.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum StageKind {
    /// The host virtualization feature.
    Virtualization,
    /// The guest Linux distribution.
    Distribution,
    /// Runtime plus application inside the guest.
    Application,
    /// Explorer context-menu entries and launcher.
    ShellIntegration,
}

impl fmt::Display for StageKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Virtualization => "Virtualization layer",
            Self::Distribution => "Guest distribution",
            Self::Application => "Application",
            Self::ShellIntegration => "Shell integration",
        };
        f.write_str(s)
    }
}

/// What a probe found.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProbeResult {
    /// Whether the target state already holds.
    pub satisfied: bool,
    /// Diagnostic detail for reporting (cleaned tool output, version).
    pub detail: Option<String>,
}

impl ProbeResult {
    /// Target state holds.
    pub fn satisfied(detail: Option<String>) -> Self {
        Self {
            satisfied: true,
            detail,
        }
    }

    /// Target state does not hold.
    pub fn unsatisfied(detail: Option<String>) -> Self {
        Self {
            satisfied: false,
            detail,
        }
    }
}

/// One installable component.
///
/// `probe` is read-only and infallible: a missing tool, a non-zero exit
/// or a timeout all mean "not satisfied", with the reason in the detail.
/// `apply` fails on the first command that fails and leaves whatever it
/// already did in place.
pub trait Stage: Send + Sync {
    /// Which stage this is.
    fn kind(&self) -> StageKind;

    /// Display name.
    fn name(&self) -> String {
        self.kind().to_string()
    }

    /// Check whether the target state already holds.
    fn probe(&self) -> ProbeResult;

    /// Bring the host to the target state.
    fn apply(&self) -> Result<()>;

    /// Whether [`reverse`](Stage::reverse) is supported.
    fn reversible(&self) -> bool {
        false
    }

    /// Remove what [`apply`](Stage::apply) installed.
    fn reverse(&self) -> Result<()> {
        Err(WslstrapError::NotReversible {
            stage: self.name(),
        })
    }
}

/// Normalize text printed by Windows tools.
///
/// `wsl.exe` writes UTF-16LE, which arrives here as text with NULs
/// between characters, sometimes behind a BOM. Lossy decoding may also
/// leave replacement characters.
pub fn clean_tool_output(raw: &str) -> String {
    raw.chars()
        .filter(|c| !matches!(c, '\0' | '\u{feff}' | '\u{fffd}'))
        .collect()
}

/// First non-blank line of cleaned output, trimmed.
pub(crate) fn first_line(raw: &str) -> Option<String> {
    clean_tool_output(raw)
        .lines()
        .map(str::trim)
        .find(|line| !line.is_empty())
        .map(str::to_string)
}
