//! Shared display helpers for stage outcomes and the usage guide.

use crate::config::WslstrapConfig;
use crate::runner::{RunMode, RunReport, StageOutcome};
use crate::ui::{format_duration, StatusKind, UserInterface};

/// Short description of `outcome` for a run in `mode`.
pub fn outcome_label(mode: RunMode, outcome: &StageOutcome) -> String {
    match (mode, outcome) {
        (RunMode::Uninstall, StageOutcome::Applied) => "removed".to_string(),
        (RunMode::Uninstall, StageOutcome::AlreadySatisfied) => {
            "not installed, nothing to remove".to_string()
        }
        (_, StageOutcome::Applied) => "installed".to_string(),
        (_, StageOutcome::AlreadySatisfied) => "installed".to_string(),
        (_, StageOutcome::NotSatisfied) => "not installed".to_string(),
        (_, StageOutcome::Failed { reason, .. }) => format!("failed: {}", reason),
        (_, StageOutcome::SkippedUnmetDependency) => "skipped, prerequisite not met".to_string(),
        (_, StageOutcome::PermissionDenied) => "administrator privileges required".to_string(),
        (_, StageOutcome::Cancelled) => "cancelled".to_string(),
    }
}

/// Print every stage of `report` as a status line.
pub fn show_report(ui: &mut dyn UserInterface, report: &RunReport) {
    let verbose = ui.output_mode().shows_detail();
    for stage in &report.stages {
        let mut label = format!(
            "{}: {}",
            stage.name,
            outcome_label(report.mode, &stage.outcome)
        );
        if verbose {
            if let Some(duration) = stage.duration {
                label.push_str(&format!(" ({})", format_duration(duration)));
            }
        }
        let detail = match stage.outcome {
            StageOutcome::Failed { .. } => None,
            _ => stage.detail.as_deref(),
        };
        ui.show_status(StatusKind::from(&stage.outcome), &label, detail);
    }
}

/// Closing line for a finished run.
pub fn show_outcome(ui: &mut dyn UserInterface, report: &RunReport) {
    if report.restart_required {
        ui.warning("Please restart your computer and run wslstrap again.");
        return;
    }

    if report.success() {
        let applied = report.applied();
        if applied.is_empty() {
            ui.success("Everything is already in place.");
        } else {
            ui.success(&format!("Done: {}", applied.join(", ")));
        }
        return;
    }

    if report
        .stages
        .iter()
        .any(|s| s.outcome == StageOutcome::PermissionDenied)
    {
        ui.error("wslstrap must be run as Administrator.");
        ui.show_hint("Open a terminal with \"Run as administrator\" and try again.");
        return;
    }

    let failed: Vec<&str> = report
        .stages
        .iter()
        .filter(|s| s.in_scope && s.outcome.is_failure())
        .map(|s| s.name.as_str())
        .collect();
    ui.error(&format!("Setup did not complete: {}", failed.join(", ")));
}

/// How to use the integration once it is installed.
pub fn show_usage_guide(ui: &mut dyn UserInterface, config: &WslstrapConfig) {
    let integration = &config.integration;
    let app = &config.application;

    ui.show_header("How to use");
    ui.message("1. Open Windows Explorer");
    ui.message("2. Navigate to any folder");
    ui.message("3. Right-click in the folder (empty space) or on a folder");
    ui.message(&format!("4. Select '{}'", integration.label));
    ui.message(&format!("5. {} will launch in that directory", app.name));
    ui.message("");
    ui.message("From a terminal:");
    ui.message(&format!("  wsl -d {}", config.distro));
    ui.message("  cd /mnt/c/your/project/path");
    ui.message(&format!("  {}", app.binary));
    ui.show_hint("Remove the context-menu entry any time with: wslstrap --uninstall");
}
