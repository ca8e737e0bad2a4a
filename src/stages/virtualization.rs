//! The host virtualization layer (WSL itself).

use std::sync::Arc;

use crate::config::TimeoutConfig;
use crate::error::Result;
use crate::shell::{run_checked, CommandLine, CommandRunner};

use super::{first_line, ProbeResult, Stage, StageKind};

/// Installs the WSL feature on the host.
///
/// Present when `wsl --version` exits 0. Older inbox builds of `wsl.exe`
/// don't know `--version` and exit non-zero, which correctly reads as
/// "install the current one".
pub struct VirtualizationLayer {
    runner: Arc<dyn CommandRunner>,
    timeouts: TimeoutConfig,
}

impl VirtualizationLayer {
    pub fn new(runner: Arc<dyn CommandRunner>, timeouts: TimeoutConfig) -> Self {
        Self { runner, timeouts }
    }
}

impl Stage for VirtualizationLayer {
    fn kind(&self) -> StageKind {
        StageKind::Virtualization
    }

    fn probe(&self) -> ProbeResult {
        let cmd = CommandLine::new(["wsl", "--version"]);
        match self.runner.run(&cmd, self.timeouts.probe()) {
            Ok(result) if result.success => ProbeResult::satisfied(first_line(&result.stdout)),
            Ok(result) => {
                tracing::debug!("wsl --version exited with {:?}", result.exit_code);
                ProbeResult::unsatisfied(
                    first_line(&result.stderr).or_else(|| first_line(&result.stdout)),
                )
            }
            Err(e) => {
                tracing::debug!("Virtualization probe failed: {}", e);
                ProbeResult::unsatisfied(Some(e.to_string()))
            }
        }
    }

    fn apply(&self) -> Result<()> {
        tracing::info!("Installing virtualization layer");
        let cmd = CommandLine::new(["wsl", "--install", "--no-launch"]);
        run_checked(self.runner.as_ref(), &cmd, self.timeouts.command())?;
        Ok(())
    }
}
