//! wslstrap CLI entry point.

use std::fs::OpenOptions;
use std::path::Path;
use std::process::ExitCode;
use std::sync::Mutex;

use clap::Parser;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};
use wslstrap::cli::{Cli, CommandDispatcher};
use wslstrap::config::{load_config, validate, WslstrapConfig};
use wslstrap::runner::{default_lock_path, HostServices, Orchestrator};
use wslstrap::shell::is_ci;
use wslstrap::ui::{create_ui, OutputMode};

/// Initialize the tracing subscriber for logging.
///
/// Log level is controlled by:
/// 1. `--debug` flag sets level to DEBUG
/// 2. `RUST_LOG` environment variable (if set)
/// 3. Default is INFO
///
/// Console logs go to stderr so `--status --json` output stays clean.
/// With `--log-file`, the same events are appended to that file.
fn init_tracing(debug: bool, log_file: Option<&Path>) -> Option<String> {
    let filter = if debug {
        EnvFilter::new("wslstrap=debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("wslstrap=info"))
    };

    let (file_layer, file_error) = match log_file {
        Some(path) => match OpenOptions::new().create(true).append(true).open(path) {
            Ok(file) => (
                Some(
                    fmt::layer()
                        .with_ansi(false)
                        .with_writer(Mutex::new(file)),
                ),
                None,
            ),
            Err(e) => (
                None,
                Some(format!("Cannot open log file {}: {}", path.display(), e)),
            ),
        },
        None => (None, None),
    };

    tracing_subscriber::registry()
        .with(
            fmt::layer()
                .with_target(false)
                .with_writer(std::io::stderr),
        )
        .with(file_layer)
        .with(filter)
        .init();

    file_error
}

/// Load the config and apply command-line overrides.
fn resolve_config(cli: &Cli) -> wslstrap::Result<WslstrapConfig> {
    let project_root = std::env::current_dir()?;
    let mut config = load_config(&project_root, cli.config.as_deref())?;
    if let Some(distro) = &cli.distro {
        config.distro = distro.clone();
    }
    validate(&config)?;
    Ok(config)
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    let log_error = init_tracing(cli.debug, cli.log_file.as_deref());

    tracing::debug!("wslstrap starting with args: {:?}", cli);

    let output_mode = if cli.quiet {
        OutputMode::Quiet
    } else if cli.verbose {
        OutputMode::Verbose
    } else {
        OutputMode::Normal
    };

    if cli.no_color {
        std::env::set_var("NO_COLOR", "1");
    }

    let is_interactive = !cli.non_interactive && !is_ci();
    let mut ui = create_ui(is_interactive, output_mode);

    if let Some(message) = log_error {
        ui.warning(&message);
    }

    let config = match resolve_config(&cli) {
        Ok(config) => config,
        Err(e) => {
            ui.error(&format!("Error: {}", e));
            return ExitCode::from(1);
        }
    };

    let services = HostServices::system(&config);
    let orchestrator = Orchestrator::from_config(&config, &services)
        .with_lock(cli.lock_file.clone().unwrap_or_else(default_lock_path));

    let dispatcher = CommandDispatcher::new(&orchestrator, &config);

    match dispatcher.dispatch(&cli, ui.as_mut()) {
        Ok(result) => ExitCode::from(result.exit_code.clamp(0, 255) as u8),
        Err(e) => {
            ui.error(&format!("Error: {}", e));
            ExitCode::from(1)
        }
    }
}
