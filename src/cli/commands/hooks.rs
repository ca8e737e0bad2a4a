//! Run hooks rendered through a [`UserInterface`].

use crate::runner::{RunHooks, RunMode, StageOutcome, StageReport};
use crate::stages::StageKind;
use crate::ui::{progress::stage_counter, Prompt, SpinnerHandle, StatusKind, UserInterface};

use super::display::outcome_label;

/// Prompt key for the restart question.
pub const CONTINUE_WITHOUT_RESTART: &str = "continue_without_restart";
/// Prompt key for the missing-application question.
pub const CONTINUE_WITHOUT_APP: &str = "continue_without_app";
/// Prompt key for updating an installed context-menu entry.
pub const REFRESH_INTEGRATION: &str = "refresh_integration";

/// Shows a spinner per stage and puts the run's questions to the operator.
pub struct UiHooks<'a> {
    ui: &'a mut dyn UserInterface,
    mode: RunMode,
    assume_yes: bool,
    spinner: Option<Box<dyn SpinnerHandle>>,
}

impl<'a> UiHooks<'a> {
    pub fn new(ui: &'a mut dyn UserInterface, mode: RunMode) -> Self {
        Self {
            ui,
            mode,
            assume_yes: false,
            spinner: None,
        }
    }

    /// Answer yes to every question without asking.
    pub fn assume_yes(mut self, yes: bool) -> Self {
        self.assume_yes = yes;
        self
    }

    fn ask(&mut self, prompt: Prompt) -> bool {
        if self.assume_yes {
            tracing::debug!("{}: assuming yes", prompt.key);
            return true;
        }
        match self.ui.confirm(&prompt) {
            Ok(answer) => answer,
            Err(e) => {
                tracing::warn!("{}: {}; using default", prompt.key, e);
                self.ui.warning(&e.to_string());
                prompt.default
            }
        }
    }

    fn verb(&self) -> &'static str {
        match self.mode {
            RunMode::Uninstall => "Removing",
            RunMode::Status => "Checking",
            _ => "Setting up",
        }
    }
}

impl RunHooks for UiHooks<'_> {
    fn stage_started(&mut self, name: &str, _kind: StageKind, index: usize, total: usize) {
        let message = format!("{} {} {}", stage_counter(index, total), self.verb(), name);
        self.spinner = Some(self.ui.start_spinner(&message));
    }

    fn stage_finished(&mut self, report: &StageReport) {
        let label = format!("{}: {}", report.name, outcome_label(self.mode, &report.outcome));
        let Some(mut spinner) = self.spinner.take() else {
            self.ui
                .show_status(StatusKind::from(&report.outcome), &label, None);
            return;
        };
        match report.outcome {
            StageOutcome::Applied | StageOutcome::AlreadySatisfied => {
                spinner.finish_success(&label)
            }
            StageOutcome::Failed { .. } => spinner.finish_error(&label),
            _ => spinner.finish_skipped(&label),
        }
    }

    fn warn(&mut self, message: &str) {
        self.ui.warning(message);
    }

    fn stop_for_restart(&mut self) -> bool {
        !self.ask(Prompt::confirm(
            CONTINUE_WITHOUT_RESTART,
            "Continue without restarting?",
            true,
        ))
    }

    fn continue_without_application(&mut self, detail: Option<&str>) -> bool {
        if let Some(detail) = detail {
            self.ui.message(detail);
        }
        self.ask(Prompt::confirm(
            CONTINUE_WITHOUT_APP,
            "Install the context-menu entry anyway?",
            false,
        ))
    }

    fn refresh_integration(&mut self) -> bool {
        self.ui.message("The context-menu entry is already installed.");
        self.ask(Prompt::confirm(
            REFRESH_INTEGRATION,
            "Update the existing context-menu entry?",
            false,
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::runner::FailureKind;
    use crate::ui::{MockUI, SpinnerStatus};

    fn report(outcome: StageOutcome) -> StageReport {
        StageReport {
            name: "Application".into(),
            kind: StageKind::Application,
            ordinal: 2,
            outcome,
            detail: None,
            duration: None,
            in_scope: true,
        }
    }

    #[test]
    fn started_stage_finishes_its_spinner() {
        let mut ui = MockUI::new();
        {
            let mut hooks = UiHooks::new(&mut ui, RunMode::Install);
            hooks.stage_started("Application", StageKind::Application, 2, 4);
            hooks.stage_finished(&report(StageOutcome::Failed {
                kind: FailureKind::CommandFailed,
                reason: "exit 1".into(),
            }));
        }

        assert_eq!(ui.spinners(), ["[3/4] Setting up Application"]);
        assert_eq!(
            ui.spinner_results(),
            vec![(
                SpinnerStatus::Error,
                "Application: failed: exit 1".to_string()
            )]
        );
    }

    #[test]
    fn unstarted_stage_gets_a_status_line() {
        let mut ui = MockUI::new();
        {
            let mut hooks = UiHooks::new(&mut ui, RunMode::Install);
            hooks.stage_finished(&report(StageOutcome::SkippedUnmetDependency));
        }

        assert!(ui.spinners().is_empty());
        assert_eq!(ui.statuses()[0].0, StatusKind::Blocked);
    }

    #[test]
    fn restart_question_defaults_to_continue() {
        let mut ui = MockUI::new();
        let stop = UiHooks::new(&mut ui, RunMode::Install).stop_for_restart();
        assert!(!stop);
        assert_eq!(ui.prompts_shown(), [CONTINUE_WITHOUT_RESTART]);
    }

    #[test]
    fn declining_to_continue_stops_for_restart() {
        let mut ui = MockUI::new();
        ui.set_prompt_response(CONTINUE_WITHOUT_RESTART, false);
        assert!(UiHooks::new(&mut ui, RunMode::Install).stop_for_restart());
    }

    #[test]
    fn missing_application_defaults_to_cancel() {
        let mut ui = MockUI::new();
        let go_on = UiHooks::new(&mut ui, RunMode::ContextOnly)
            .continue_without_application(Some("claude not found in Ubuntu"));
        assert!(!go_on);
        assert!(ui.has_message("claude not found"));
    }

    #[test]
    fn assume_yes_skips_questions() {
        let mut ui = MockUI::new();
        {
            let mut hooks = UiHooks::new(&mut ui, RunMode::ContextOnly).assume_yes(true);
            assert!(hooks.continue_without_application(None));
            assert!(!hooks.stop_for_restart());
            assert!(hooks.refresh_integration());
        }
        assert!(ui.prompts_shown().is_empty());
    }

    #[test]
    fn existing_integration_is_kept_unless_confirmed() {
        let mut ui = MockUI::new();
        assert!(!UiHooks::new(&mut ui, RunMode::Install).refresh_integration());
        assert_eq!(ui.prompts_shown(), [REFRESH_INTEGRATION]);

        ui.set_prompt_response(REFRESH_INTEGRATION, true);
        assert!(UiHooks::new(&mut ui, RunMode::Install).refresh_integration());
    }
}
