//! Non-interactive UI for CI/headless environments.

use std::collections::HashMap;

use crate::error::{Result, WslstrapError};

use super::theme::WslstrapTheme;
use super::{parse_bool_answer, OutputMode, Prompt, SpinnerHandle, StatusKind, UserInterface};

/// UI implementation for non-interactive mode.
///
/// Confirmations are answered from `WSLSTRAP_PROMPT_<KEY>` environment
/// variables, falling back to the prompt's default. Status lines use
/// bracketed labels so logs stay greppable.
pub struct NonInteractiveUI {
    mode: OutputMode,
    env_overrides: HashMap<String, String>,
}

impl NonInteractiveUI {
    pub fn new(mode: OutputMode) -> Self {
        let env_overrides: HashMap<String, String> = std::env::vars()
            .filter(|(k, _)| k.starts_with("WSLSTRAP_PROMPT_"))
            .collect();

        Self {
            mode,
            env_overrides,
        }
    }

    /// Create with explicit overrides (for testing).
    pub fn with_overrides(mode: OutputMode, overrides: HashMap<String, String>) -> Self {
        Self {
            mode,
            env_overrides: overrides,
        }
    }
}

impl UserInterface for NonInteractiveUI {
    fn output_mode(&self) -> OutputMode {
        self.mode
    }

    fn message(&mut self, msg: &str) {
        if self.mode.shows_status() {
            println!("{}", msg);
        }
    }

    fn success(&mut self, msg: &str) {
        if self.mode.shows_status() {
            println!("✓ {}", msg);
        }
    }

    fn warning(&mut self, msg: &str) {
        if self.mode.shows_status() {
            eprintln!("⚠ {}", msg);
        }
    }

    fn error(&mut self, msg: &str) {
        eprintln!("✗ {}", msg);
    }

    fn confirm(&mut self, prompt: &Prompt) -> Result<bool> {
        let env_key = prompt.env_key();
        let Some(value) = self.env_overrides.get(&env_key) else {
            tracing::debug!("{}: using default {}", prompt.key, prompt.default);
            return Ok(prompt.default);
        };

        parse_bool_answer(value).ok_or_else(|| WslstrapError::ConfigValidationError {
            message: format!("{} must be yes or no, got '{}'", env_key, value),
        })
    }

    fn start_spinner(&mut self, message: &str) -> Box<dyn SpinnerHandle> {
        if self.mode.shows_spinners() {
            println!("  {}", message);
        }
        Box::new(NoopSpinner {
            quiet: !self.mode.shows_status(),
        })
    }

    fn show_header(&mut self, title: &str) {
        if self.mode.shows_status() {
            println!("\n{}\n", title);
        }
    }

    fn show_status(&mut self, kind: StatusKind, label: &str, detail: Option<&str>) {
        if !self.mode.shows_status() {
            return;
        }
        match detail {
            Some(detail) if !detail.is_empty() => {
                println!("  {} ({})", kind.format_plain(label), detail)
            }
            _ => println!("  {}", kind.format_plain(label)),
        }
    }

    fn show_hint(&mut self, hint: &str) {
        if self.mode.shows_status() {
            println!("  {}", hint);
        }
    }

    fn is_interactive(&self) -> bool {
        false
    }
}

/// Spinner that prints only its final line.
struct NoopSpinner {
    quiet: bool,
}

impl SpinnerHandle for NoopSpinner {
    fn set_message(&mut self, _msg: &str) {}

    fn finish_success(&mut self, msg: &str) {
        if !self.quiet {
            println!("  {}", WslstrapTheme::plain().format_success(msg));
        }
    }

    fn finish_error(&mut self, msg: &str) {
        if !self.quiet {
            println!("  {}", WslstrapTheme::plain().format_error(msg));
        }
    }

    fn finish_skipped(&mut self, msg: &str) {
        if !self.quiet {
            println!("  {}", WslstrapTheme::plain().format_skipped(msg));
        }
    }
}
