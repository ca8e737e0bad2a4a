//! Callbacks from a run back to its front end.
//!
//! The orchestrator never talks to a terminal. Progress display and the
//! operator decisions a run can need go through [`RunHooks`].

use crate::stages::StageKind;

use super::report::StageReport;

/// Front-end callbacks invoked during a run.
///
/// Every method has a default, so a front end only implements what it
/// shows. The defaults never stop a run for a restart, never continue
/// without the application and leave an existing integration alone.
pub trait RunHooks {
    /// A stage is about to be probed.
    fn stage_started(&mut self, _name: &str, _kind: StageKind, _index: usize, _total: usize) {}

    /// A stage reached its outcome for this run.
    fn stage_finished(&mut self, _report: &StageReport) {}

    /// Something the operator should know that doesn't change the outcome.
    fn warn(&mut self, _message: &str) {}

    /// The virtualization layer was just installed and the host may need
    /// a restart before the guest can be installed. Return `true` to stop
    /// here.
    fn stop_for_restart(&mut self) -> bool {
        false
    }

    /// The application is not installed; return `true` to install the
    /// shell integration anyway.
    fn continue_without_application(&mut self, _detail: Option<&str>) -> bool {
        false
    }

    /// The shell integration is already installed. Return `true` to remove
    /// and reinstall it from the current configuration.
    fn refresh_integration(&mut self) -> bool {
        false
    }
}

/// Hooks that show nothing and take the defaults.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoHooks;

impl RunHooks for NoHooks {}

/// Hooks with fixed answers that record what they were told.
///
/// Used by tests and by embedders that decide up front.
#[derive(Debug, Clone, Default)]
pub struct RecordingHooks {
    /// Answer for [`RunHooks::stop_for_restart`].
    pub stop_for_restart: bool,
    /// Answer for [`RunHooks::continue_without_application`].
    pub continue_without_application: bool,
    /// Answer for [`RunHooks::refresh_integration`].
    pub refresh_integration: bool,
    /// Names of started stages, in order.
    pub started: Vec<String>,
    /// Finished stage reports, in order.
    pub finished: Vec<StageReport>,
    /// Warnings received.
    pub warnings: Vec<String>,
    /// How many times each question was asked: (restart, continue, refresh).
    pub asked: (usize, usize, usize),
}

impl RecordingHooks {
    pub fn new() -> Self {
        Self::default()
    }

    /// Answer "stop" to the restart question.
    pub fn stopping_for_restart(mut self) -> Self {
        self.stop_for_restart = true;
        self
    }

    /// Answer "continue" to the missing-application question.
    pub fn continuing_without_application(mut self) -> Self {
        self.continue_without_application = true;
        self
    }

    /// Answer "update" to the existing-integration question.
    pub fn refreshing_integration(mut self) -> Self {
        self.refresh_integration = true;
        self
    }
}

impl RunHooks for RecordingHooks {
    fn stage_started(&mut self, name: &str, _kind: StageKind, _index: usize, _total: usize) {
        self.started.push(name.to_string());
    }

    fn stage_finished(&mut self, report: &StageReport) {
        self.finished.push(report.clone());
    }

    fn warn(&mut self, message: &str) {
        self.warnings.push(message.to_string());
    }

    fn stop_for_restart(&mut self) -> bool {
        self.asked.0 += 1;
        self.stop_for_restart
    }

    fn continue_without_application(&mut self, _detail: Option<&str>) -> bool {
        self.asked.1 += 1;
        self.continue_without_application
    }

    fn refresh_integration(&mut self) -> bool {
        self.asked.2 += 1;
        self.refresh_integration
    }
}
