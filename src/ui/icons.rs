//! Status vocabulary for stage lines.
//!
//! `StatusKind` is the one set of icons and colors every command uses
//! to show a stage outcome.

use crate::runner::StageOutcome;

use super::theme::WslstrapTheme;

/// Canonical status kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StatusKind {
    /// Present or just installed.
    Success,
    /// Install or removal failed.
    Failed,
    /// Not attempted.
    Skipped,
    /// Missing (read-only status).
    Missing,
    /// Prerequisite failed.
    Blocked,
    /// Needs attention.
    Warning,
}

impl StatusKind {
    /// Unicode icon for TTY output.
    pub fn icon(self) -> &'static str {
        match self {
            Self::Success => "✓",
            Self::Failed => "✗",
            Self::Skipped => "○",
            Self::Missing => "◌",
            Self::Blocked => "⊘",
            Self::Warning => "⚠",
        }
    }

    /// Bracketed text for non-TTY output.
    pub fn bracketed(self) -> &'static str {
        match self {
            Self::Success => "[ok]",
            Self::Failed => "[FAIL]",
            Self::Skipped => "[skip]",
            Self::Missing => "[missing]",
            Self::Blocked => "[blocked]",
            Self::Warning => "[warn]",
        }
    }

    /// Styled icon string using the given theme.
    pub fn styled(self, theme: &WslstrapTheme) -> String {
        let icon = self.icon();
        match self {
            Self::Success => theme.success.apply_to(icon).to_string(),
            Self::Failed => theme.error.apply_to(icon).to_string(),
            Self::Skipped | Self::Missing => theme.dim.apply_to(icon).to_string(),
            Self::Blocked | Self::Warning => theme.warning.apply_to(icon).to_string(),
        }
    }

    /// Styled icon + message.
    pub fn format(self, theme: &WslstrapTheme, msg: &str) -> String {
        format!("{} {}", self.styled(theme), msg)
    }

    /// Bracketed + message.
    pub fn format_plain(self, msg: &str) -> String {
        format!("{} {}", self.bracketed(), msg)
    }
}

impl From<&StageOutcome> for StatusKind {
    fn from(outcome: &StageOutcome) -> Self {
        match outcome {
            StageOutcome::Applied | StageOutcome::AlreadySatisfied => Self::Success,
            StageOutcome::NotSatisfied => Self::Missing,
            StageOutcome::Failed { .. } => Self::Failed,
            StageOutcome::SkippedUnmetDependency => Self::Blocked,
            StageOutcome::PermissionDenied => Self::Warning,
            StageOutcome::Cancelled => Self::Skipped,
        }
    }
}
