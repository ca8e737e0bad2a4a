//! Drives a run in one of the four modes and produces its report.

use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Instant;

use crate::config::WslstrapConfig;
use crate::error::Result;
use crate::host::{
    ArtifactWriter, EntryStore, FsArtifacts, HostPrivileges, PrivilegeCheck, RegistryStore,
};
use crate::shell::{CommandRunner, SystemRunner};
use crate::stages::{
    Application, GuestDistribution, ShellIntegration, Stage, StageKind, VirtualizationLayer,
};

use super::chain::{ChainControl, DependencyChain};
use super::hooks::RunHooks;
use super::lock::RunLock;
use super::report::{RunMode, RunReport, StageOutcome, StageReport};

/// The host collaborators a chain is built over.
#[derive(Clone)]
pub struct HostServices {
    pub runner: Arc<dyn CommandRunner>,
    pub entries: Arc<dyn EntryStore>,
    pub artifacts: Arc<dyn ArtifactWriter>,
    pub privileges: Arc<dyn PrivilegeCheck>,
}

impl HostServices {
    /// Real processes, the registry, the filesystem and the OS elevation check.
    pub fn system(config: &WslstrapConfig) -> Self {
        let runner: Arc<dyn CommandRunner> = Arc::new(SystemRunner::new());
        Self {
            entries: Arc::new(RegistryStore::new(
                runner.clone(),
                &config.integration.label,
                &config.integration.icon,
                config.timeouts.probe(),
            )),
            artifacts: Arc::new(FsArtifacts::new()),
            privileges: Arc::new(HostPrivileges::new(runner.clone())),
            runner,
        }
    }
}

/// The four stages in prerequisite order.
pub fn build_chain(config: &WslstrapConfig, services: &HostServices) -> DependencyChain {
    let runner = &services.runner;
    DependencyChain::new(vec![
        Box::new(VirtualizationLayer::new(
            runner.clone(),
            config.timeouts.clone(),
        )),
        Box::new(GuestDistribution::new(
            runner.clone(),
            &config.distro,
            config.timeouts.clone(),
        )),
        Box::new(Application::new(
            runner.clone(),
            &config.distro,
            config.runtime.clone(),
            config.application.clone(),
            config.timeouts.clone(),
        )),
        Box::new(ShellIntegration::new(
            services.entries.clone(),
            services.artifacts.clone(),
            config.integration.clone(),
            &config.distro,
            &config.application.name,
            &config.application.binary,
        )),
    ])
}

/// Runs the chain.
///
/// Built once per process and handed by reference to whichever front end
/// asks for a run. Each run re-probes the host; nothing carries over.
pub struct Orchestrator {
    chain: DependencyChain,
    privileges: Arc<dyn PrivilegeCheck>,
    lock_path: Option<PathBuf>,
}

impl Orchestrator {
    pub fn new(chain: DependencyChain, privileges: Arc<dyn PrivilegeCheck>) -> Self {
        Self {
            chain,
            privileges,
            lock_path: None,
        }
    }

    /// Orchestrator over the standard chain for `config`.
    pub fn from_config(config: &WslstrapConfig, services: &HostServices) -> Self {
        Self::new(build_chain(config, services), services.privileges.clone())
    }

    /// Hold an advisory lock at `path` during mutating runs.
    pub fn with_lock(mut self, path: impl Into<PathBuf>) -> Self {
        self.lock_path = Some(path.into());
        self
    }

    pub fn chain(&self) -> &DependencyChain {
        &self.chain
    }

    pub fn lock_path(&self) -> Option<&Path> {
        self.lock_path.as_deref()
    }

    /// Perform one run.
    ///
    /// Stage failures end up in the report. Only a held lock (or an I/O
    /// error taking it) makes the run itself fail.
    pub fn run(&self, mode: RunMode, hooks: &mut dyn RunHooks) -> Result<RunReport> {
        tracing::info!("Starting {} run", mode);
        let mut report = RunReport::new(mode);

        if mode.is_mutating() && !self.privileges.is_elevated() {
            tracing::warn!("Not elevated, refusing {} run", mode);
            self.deny(mode, hooks, &mut report);
            return Ok(report);
        }

        let _lock = match (mode.is_mutating(), self.lock_path.as_deref()) {
            (true, Some(path)) => Some(RunLock::acquire(path)?),
            _ => None,
        };

        match mode {
            RunMode::Status => report.stages = self.chain.probe_all(hooks),
            RunMode::Install => self.install(hooks, &mut report),
            RunMode::ContextOnly => self.context_only(hooks, &mut report),
            RunMode::Uninstall => self.uninstall(hooks, &mut report),
        }

        tracing::info!(
            "Finished {} run: success={} restart_required={}",
            mode,
            report.success(),
            report.restart_required
        );
        Ok(report)
    }

    fn in_scope(mode: RunMode, kind: StageKind) -> bool {
        match mode {
            RunMode::Install | RunMode::Status => true,
            RunMode::ContextOnly | RunMode::Uninstall => kind == StageKind::ShellIntegration,
        }
    }

    fn deny(&self, mode: RunMode, hooks: &mut dyn RunHooks, report: &mut RunReport) {
        for (ordinal, stage) in self.chain.iter().enumerate() {
            if Self::in_scope(mode, stage.kind()) {
                let denied = StageReport::new(stage, ordinal, StageOutcome::PermissionDenied);
                hooks.stage_finished(&denied);
                report.push(denied);
            }
        }
    }

    fn install(&self, hooks: &mut dyn RunHooks, report: &mut RunReport) {
        let mut restart_required = false;
        report.stages = self.chain.walk(hooks, |stage, hooks| {
            if stage.kind() != StageKind::Virtualization {
                return ChainControl::Continue;
            }
            hooks.warn("The virtualization layer was just installed; a restart may be required.");
            if hooks.stop_for_restart() {
                tracing::info!("Stopping for restart after {}", stage.name());
                restart_required = true;
                ChainControl::Stop
            } else {
                ChainControl::Continue
            }
        });
        report.restart_required = restart_required;

        if let Some((ordinal, stage)) = self.chain.find(StageKind::ShellIntegration) {
            let installed = report.outcome(StageKind::ShellIntegration)
                == Some(&StageOutcome::AlreadySatisfied);
            if installed && stage.reversible() && hooks.refresh_integration() {
                let refreshed = self.refresh(stage, ordinal, hooks);
                if let Some(slot) = report.stages.get_mut(ordinal) {
                    *slot = refreshed;
                }
            }
        }
    }

    /// Remove and reinstall an installed stage so it matches the config.
    fn refresh(
        &self,
        stage: &dyn Stage,
        ordinal: usize,
        hooks: &mut dyn RunHooks,
    ) -> StageReport {
        let name = stage.name();
        hooks.stage_started(&name, stage.kind(), ordinal, self.chain.len());
        let start = Instant::now();
        tracing::info!("{}: updating existing installation", name);

        let outcome = match stage.reverse().and_then(|()| stage.apply()) {
            Ok(()) => StageOutcome::Applied,
            Err(e) => {
                tracing::warn!("{}: update failed: {}", name, e);
                StageOutcome::from_error(&e)
            }
        };

        let report = StageReport::new(stage, ordinal, outcome).with_duration(start.elapsed());
        hooks.stage_finished(&report);
        report
    }

    fn context_only(&self, hooks: &mut dyn RunHooks, report: &mut RunReport) {
        let total = self.chain.len();

        if let Some((ordinal, app)) = self.chain.find(StageKind::Application) {
            let name = app.name();
            hooks.stage_started(&name, app.kind(), ordinal, total);
            let start = Instant::now();
            let probe = app.probe();
            let outcome = if probe.satisfied {
                StageOutcome::AlreadySatisfied
            } else {
                StageOutcome::NotSatisfied
            };
            let checked = StageReport::new(app, ordinal, outcome)
                .with_detail(probe.detail.clone())
                .with_duration(start.elapsed())
                .out_of_scope();
            hooks.stage_finished(&checked);
            report.push(checked);

            if !probe.satisfied {
                hooks.warn(&format!(
                    "{} is not installed; the shell integration won't work until it is.",
                    name
                ));
                if !hooks.continue_without_application(probe.detail.as_deref()) {
                    tracing::info!("Shell integration cancelled by operator");
                    if let Some((ordinal, stage)) = self.chain.find(StageKind::ShellIntegration) {
                        let cancelled = StageReport::new(stage, ordinal, StageOutcome::Cancelled);
                        hooks.stage_finished(&cancelled);
                        report.push(cancelled);
                    }
                    return;
                }
            }
        }

        if let Some((ordinal, stage)) = self.chain.find(StageKind::ShellIntegration) {
            hooks.stage_started(&stage.name(), stage.kind(), ordinal, total);
            let start = Instant::now();
            let outcome = match stage.apply() {
                Ok(()) => StageOutcome::Applied,
                Err(e) => {
                    tracing::warn!("{}: failed: {}", stage.name(), e);
                    StageOutcome::from_error(&e)
                }
            };
            let applied = StageReport::new(stage, ordinal, outcome).with_duration(start.elapsed());
            hooks.stage_finished(&applied);
            report.push(applied);
        }
    }

    fn uninstall(&self, hooks: &mut dyn RunHooks, report: &mut RunReport) {
        let Some((ordinal, stage)) = self.chain.find(StageKind::ShellIntegration) else {
            return;
        };

        hooks.stage_started(&stage.name(), stage.kind(), ordinal, self.chain.len());
        let start = Instant::now();
        let probe = stage.probe();

        let outcome = if !probe.satisfied {
            tracing::info!("{}: nothing to remove", stage.name());
            StageOutcome::AlreadySatisfied
        } else {
            match stage.reverse() {
                Ok(()) => StageOutcome::Applied,
                Err(e) => {
                    tracing::warn!("{}: removal failed: {}", stage.name(), e);
                    StageOutcome::from_error(&e)
                }
            }
        };

        let removed = StageReport::new(stage, ordinal, outcome)
            .with_detail(probe.detail)
            .with_duration(start.elapsed());
        hooks.stage_finished(&removed);
        report.push(removed);
    }
}
