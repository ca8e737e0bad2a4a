//! Status command implementation.
//!
//! `wslstrap --status` probes every stage and changes nothing.

use crate::config::WslstrapConfig;
use crate::error::{Result, WslstrapError};
use crate::runner::{NoHooks, Orchestrator, RunMode, RunReport};
use crate::ui::UserInterface;

use super::dispatcher::{Command, CommandResult};
use super::display;

/// The status command implementation.
pub struct StatusCommand<'a> {
    orchestrator: &'a Orchestrator,
    config: &'a WslstrapConfig,
    json: bool,
}

impl<'a> StatusCommand<'a> {
    pub fn new(orchestrator: &'a Orchestrator, config: &'a WslstrapConfig, json: bool) -> Self {
        Self {
            orchestrator,
            config,
            json,
        }
    }

    /// Probe every stage.
    pub fn report(&self) -> Result<RunReport> {
        self.orchestrator.run(RunMode::Status, &mut NoHooks)
    }
}

impl Command for StatusCommand<'_> {
    fn execute(&self, ui: &mut dyn UserInterface) -> Result<CommandResult> {
        let report = self.report()?;

        if self.json {
            let json = report
                .to_json()
                .map_err(|e| WslstrapError::Other(e.into()))?;
            println!("{}", json);
            return Ok(CommandResult::success());
        }

        ui.show_header(&format!(
            "{} installation status",
            self.config.application.name
        ));
        display::show_report(ui, &report);

        Ok(CommandResult::from_report(&report))
    }
}
