//! Runtime and application inside the guest.

use std::sync::{Arc, LazyLock};

use regex::Regex;

use crate::config::{ApplicationConfig, RuntimeConfig, TimeoutConfig};
use crate::error::Result;
use crate::shell::{run_checked, CommandLine, CommandRunner};

use super::{clean_tool_output, ProbeResult, Stage, StageKind};

static VERSION: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"v?(\d+\.\d+(?:\.\d+)?(?:[-+][0-9A-Za-z.]+)?)").unwrap());

/// Extract the first version-looking token from tool output.
pub fn extract_version(output: &str) -> Option<String> {
    VERSION
        .captures(&clean_tool_output(output))
        .and_then(|c| c.get(1))
        .map(|m| m.as_str().to_string())
}

/// Installs the language runtime and the application package in the guest.
///
/// Detection runs through an interactive guest shell: the application is
/// often only on `PATH` after the user's rc files have run.
pub struct Application {
    runner: Arc<dyn CommandRunner>,
    distro: String,
    runtime: RuntimeConfig,
    application: ApplicationConfig,
    timeouts: TimeoutConfig,
}

impl Application {
    pub fn new(
        runner: Arc<dyn CommandRunner>,
        distro: &str,
        runtime: RuntimeConfig,
        application: ApplicationConfig,
        timeouts: TimeoutConfig,
    ) -> Self {
        Self {
            runner,
            distro: distro.to_string(),
            runtime,
            application,
            timeouts,
        }
    }

    fn guest(&self, args: &[&str]) -> CommandLine {
        CommandLine::guest(&self.distro, args.iter().copied())
    }

    fn interactive(&self, script: &str) -> CommandLine {
        CommandLine::guest_interactive(&self.distro, script)
    }

    /// Run `cmd`, failing the apply on a non-zero exit.
    fn step(&self, description: &str, cmd: CommandLine) -> Result<String> {
        tracing::info!("{}", description);
        let result = run_checked(self.runner.as_ref(), &cmd, self.timeouts.command())?;
        Ok(clean_tool_output(&result.stdout).trim().to_string())
    }

    fn version_probe(&self) -> Option<String> {
        let cmd = self.interactive(&format!("{} --version", self.application.binary));
        match self.runner.run(&cmd, self.timeouts.probe()) {
            Ok(result) if result.success => {
                Some(extract_version(&result.stdout).unwrap_or_else(|| {
                    clean_tool_output(&result.stdout).trim().to_string()
                }))
            }
            Ok(result) => {
                tracing::debug!("{} exited with {:?}", cmd, result.exit_code);
                None
            }
            Err(e) => {
                tracing::debug!("{} failed: {}", cmd, e);
                None
            }
        }
    }
}

impl Stage for Application {
    fn kind(&self) -> StageKind {
        StageKind::Application
    }

    fn name(&self) -> String {
        self.application.name.clone()
    }

    fn probe(&self) -> ProbeResult {
        let which = self.interactive(&format!("which {}", self.application.binary));
        let located = match self.runner.run(&which, self.timeouts.probe()) {
            Ok(result) if result.success => {
                let path = clean_tool_output(&result.stdout).trim().to_string();
                (!path.is_empty()).then_some(path)
            }
            Ok(_) => None,
            Err(e) => {
                tracing::debug!("{} failed: {}", which, e);
                None
            }
        };

        if let Some(path) = located {
            return ProbeResult::satisfied(Some(path));
        }

        // Not on PATH; the binary may still run through an alias or wrapper.
        match self.version_probe() {
            Some(version) => ProbeResult::satisfied((!version.is_empty()).then_some(version)),
            None => ProbeResult::unsatisfied(Some(format!(
                "{} not found in {}",
                self.application.binary, self.distro
            ))),
        }
    }

    fn apply(&self) -> Result<()> {
        let runtime = &self.runtime;
        let app = &self.application;

        self.step(
            "Updating package lists",
            self.guest(&["sudo", "apt", "update", "-y"]),
        )?;
        self.step(
            "Upgrading installed packages",
            self.guest(&["sudo", "apt", "upgrade", "-y"]),
        )?;

        let mut install_base = vec!["sudo", "apt", "install", "-y"];
        install_base.extend(runtime.base_packages.iter().map(String::as_str));
        self.step("Installing base packages", self.guest(&install_base))?;

        let setup = format!("curl -fsSL {} | sudo -E bash -", runtime.setup_url());
        self.step(
            &format!("Adding {} {}.x repository", runtime.name, runtime.major_version),
            CommandLine::guest_script(&self.distro, &setup),
        )?;
        self.step(
            &format!("Installing {}", runtime.name),
            self.guest(&["sudo", "apt", "install", "-y", runtime.package.as_str()]),
        )?;

        let runtime_version = self.step(
            &format!("Verifying {}", runtime.name),
            self.guest(&[runtime.binary.as_str(), "--version"]),
        )?;
        let manager_version = self.step(
            &format!("Verifying {}", runtime.package_manager),
            self.guest(&[runtime.package_manager.as_str(), "--version"]),
        )?;
        tracing::info!(
            "{} {} with {} {}",
            runtime.name,
            runtime_version,
            runtime.package_manager,
            manager_version
        );

        self.step(
            "Configuring package manager for Linux",
            self.guest(&[runtime.package_manager.as_str(), "config", "set", "os", "linux"]),
        )?;

        let mut install_app = vec![
            runtime.package_manager.as_str(),
            "install",
            "-g",
            app.package.as_str(),
        ];
        install_app.extend(app.install_flags.iter().map(String::as_str));
        self.step(&format!("Installing {}", app.name), self.guest(&install_app))?;

        let installed = self.step(
            &format!("Verifying {}", app.name),
            self.interactive(&format!("{} --version", app.binary)),
        )?;
        tracing::info!("{} installed: {}", app.name, installed);

        Ok(())
    }
}
