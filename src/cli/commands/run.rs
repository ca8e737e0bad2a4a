//! Mutating runs: full install, context-menu only, and uninstall.

use crate::config::WslstrapConfig;
use crate::error::Result;
use crate::runner::{Orchestrator, RunMode};
use crate::ui::UserInterface;

use super::dispatcher::{Command, CommandResult};
use super::display;
use super::hooks::UiHooks;

/// Runs the orchestrator in a mutating mode and reports the outcome.
pub struct RunCommand<'a> {
    orchestrator: &'a Orchestrator,
    config: &'a WslstrapConfig,
    mode: RunMode,
    assume_yes: bool,
}

impl<'a> RunCommand<'a> {
    pub fn new(orchestrator: &'a Orchestrator, config: &'a WslstrapConfig, mode: RunMode) -> Self {
        Self {
            orchestrator,
            config,
            mode,
            assume_yes: false,
        }
    }

    pub fn assume_yes(mut self, yes: bool) -> Self {
        self.assume_yes = yes;
        self
    }

    fn title(&self) -> String {
        let app = &self.config.application.name;
        match self.mode {
            RunMode::ContextOnly => format!("Installing the {} context menu", app),
            RunMode::Uninstall => format!("Removing the {} context menu", app),
            _ => format!("{} installer", app),
        }
    }
}

impl Command for RunCommand<'_> {
    fn execute(&self, ui: &mut dyn UserInterface) -> Result<CommandResult> {
        ui.show_header(&self.title());

        let report = {
            let mut hooks = UiHooks::new(ui, self.mode).assume_yes(self.assume_yes);
            self.orchestrator.run(self.mode, &mut hooks)?
        };

        display::show_outcome(ui, &report);
        if report.success() && self.mode != RunMode::Uninstall {
            display::show_usage_guide(ui, self.config);
        }

        Ok(CommandResult::from_report(&report))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::host::{EntryStore, FixedPrivileges, MemoryArtifacts, MemoryEntryStore};
    use crate::runner::HostServices;
    use crate::shell::{ScriptedResponse, ScriptedRunner};
    use crate::ui::MockUI;
    use std::sync::Arc;

    fn services(elevated: bool, app_present: bool) -> (HostServices, Arc<MemoryEntryStore>) {
        let runner = Arc::new(ScriptedRunner::new());
        runner.on("wsl --version", ScriptedResponse::ok("WSL version: 2.0.9.0"));
        runner.on("wsl -l -v", ScriptedResponse::ok("* Ubuntu Running 2"));
        if !app_present {
            runner.on("wsl -d Ubuntu -- bash -ic", ScriptedResponse::exit(1));
        }
        let entries = Arc::new(MemoryEntryStore::new());
        let privileges = if elevated {
            FixedPrivileges::elevated()
        } else {
            FixedPrivileges::unelevated()
        };
        let services = HostServices {
            runner,
            entries: entries.clone(),
            artifacts: Arc::new(MemoryArtifacts::new()),
            privileges: Arc::new(privileges),
        };
        (services, entries)
    }

    #[test]
    fn successful_install_shows_usage_guide() {
        let config = WslstrapConfig::default();
        let (services, entries) = services(true, true);
        let orchestrator = Orchestrator::from_config(&config, &services);
        let mut ui = MockUI::new();

        let result = RunCommand::new(&orchestrator, &config, RunMode::Install)
            .execute(&mut ui)
            .unwrap();

        assert!(result.success);
        assert_eq!(result.exit_code, 0);
        assert!(ui.has_success("Done: Shell integration"));
        assert!(ui.headers().iter().any(|h| h == "How to use"));
        assert_eq!(entries.keys().len(), 2);
    }

    #[test]
    fn unelevated_install_fails_with_hint() {
        let config = WslstrapConfig::default();
        let (services, entries) = services(false, true);
        let orchestrator = Orchestrator::from_config(&config, &services);
        let mut ui = MockUI::new();

        let result = RunCommand::new(&orchestrator, &config, RunMode::Install)
            .execute(&mut ui)
            .unwrap();

        assert_eq!(result.exit_code, 1);
        assert!(ui.has_error("Administrator"));
        assert!(!ui.headers().iter().any(|h| h == "How to use"));
        assert!(entries.is_empty());
    }

    #[test]
    fn context_only_with_missing_app_asks_and_cancels() {
        let config = WslstrapConfig::default();
        let (services, entries) = services(true, false);
        let orchestrator = Orchestrator::from_config(&config, &services);
        let mut ui = MockUI::new();

        let result = RunCommand::new(&orchestrator, &config, RunMode::ContextOnly)
            .execute(&mut ui)
            .unwrap();

        assert_eq!(result.exit_code, 1);
        assert_eq!(ui.prompts_shown(), ["continue_without_app"]);
        assert!(entries.is_empty());
    }

    #[test]
    fn context_only_with_yes_installs_anyway() {
        let config = WslstrapConfig::default();
        let (services, entries) = services(true, false);
        let orchestrator = Orchestrator::from_config(&config, &services);
        let mut ui = MockUI::new();

        let result = RunCommand::new(&orchestrator, &config, RunMode::ContextOnly)
            .assume_yes(true)
            .execute(&mut ui)
            .unwrap();

        assert_eq!(result.exit_code, 0);
        assert!(ui.prompts_shown().is_empty());
        assert!(entries
            .exists(r"HKCR\Directory\Background\shell\OpenInClaude")
            .unwrap());
    }

    #[test]
    fn uninstall_without_entry_is_a_quiet_success() {
        let config = WslstrapConfig::default();
        let (services, _) = services(true, true);
        let orchestrator = Orchestrator::from_config(&config, &services);
        let mut ui = MockUI::new();

        let result = RunCommand::new(&orchestrator, &config, RunMode::Uninstall)
            .execute(&mut ui)
            .unwrap();

        assert!(result.success);
        assert!(ui.has_success("Everything is already in place"));
        assert!(!ui.headers().iter().any(|h| h == "How to use"));
    }
}
