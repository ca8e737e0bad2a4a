//! Command dispatching.
//!
//! This module provides the core command infrastructure:
//! - [`Command`] trait for implementing commands
//! - [`CommandResult`] for uniform result reporting
//! - [`CommandDispatcher`] for routing the selected mode

use crate::cli::args::Cli;
use crate::config::WslstrapConfig;
use crate::error::Result;
use crate::runner::{Orchestrator, RunMode, RunReport};
use crate::ui::UserInterface;

/// Trait for command implementations.
pub trait Command {
    /// Execute the command.
    ///
    /// # Arguments
    ///
    /// * `ui` - User interface for displaying output and prompts
    ///
    /// # Returns
    ///
    /// A [`CommandResult`] indicating success/failure and exit code.
    fn execute(&self, ui: &mut dyn UserInterface) -> Result<CommandResult>;
}

/// Result of command execution.
#[derive(Debug)]
pub struct CommandResult {
    /// Whether the command succeeded.
    pub success: bool,

    /// Exit code to use (0 for success, non-zero for failure).
    pub exit_code: i32,
}

impl CommandResult {
    pub fn success() -> Self {
        Self {
            success: true,
            exit_code: 0,
        }
    }

    pub fn failure(exit_code: i32) -> Self {
        Self {
            success: false,
            exit_code,
        }
    }

    /// Result reflecting a run report.
    pub fn from_report(report: &RunReport) -> Self {
        Self {
            success: report.success(),
            exit_code: report.exit_code(),
        }
    }
}

/// Routes the selected mode to its command.
///
/// Holds the orchestrator by reference; it is built once in `main`.
pub struct CommandDispatcher<'a> {
    orchestrator: &'a Orchestrator,
    config: &'a WslstrapConfig,
}

impl<'a> CommandDispatcher<'a> {
    pub fn new(orchestrator: &'a Orchestrator, config: &'a WslstrapConfig) -> Self {
        Self {
            orchestrator,
            config,
        }
    }

    /// Dispatch and execute the command for `cli`'s mode.
    pub fn dispatch(&self, cli: &Cli, ui: &mut dyn UserInterface) -> Result<CommandResult> {
        match cli.mode() {
            RunMode::Status => {
                super::status::StatusCommand::new(self.orchestrator, self.config, cli.json)
                    .execute(ui)
            }
            mode => super::run::RunCommand::new(self.orchestrator, self.config, mode)
                .assume_yes(cli.yes)
                .execute(ui),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::runner::{StageOutcome, StageReport};
    use crate::stages::StageKind;

    #[test]
    fn command_result_constructors() {
        let ok = CommandResult::success();
        assert!(ok.success);
        assert_eq!(ok.exit_code, 0);

        let failed = CommandResult::failure(2);
        assert!(!failed.success);
        assert_eq!(failed.exit_code, 2);
    }

    #[test]
    fn command_result_from_report() {
        let mut report = RunReport::new(RunMode::Uninstall);
        report.stages.push(StageReport {
            name: "Shell integration".into(),
            kind: StageKind::ShellIntegration,
            ordinal: 3,
            outcome: StageOutcome::PermissionDenied,
            detail: None,
            duration: None,
            in_scope: true,
        });

        let result = CommandResult::from_report(&report);
        assert!(!result.success);
        assert_eq!(result.exit_code, 1);
    }
}
