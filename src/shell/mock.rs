//! Scripted command runner for testing.
//!
//! `ScriptedRunner` implements [`CommandRunner`] without spawning
//! processes. Responses are matched by argv prefix and every invocation
//! is recorded for later assertion. One-shot rules let a test model a
//! tool that is missing at first and present after an install.
//!
//! # Example
//!
//! ```
//! use std::time::Duration;
//! use wslstrap::shell::{CommandLine, CommandRunner, ScriptedResponse, ScriptedRunner};
//!
//! let runner = ScriptedRunner::new();
//! runner.on("wsl --version", ScriptedResponse::exit(1));
//!
//! let result = runner
//!     .run(&CommandLine::new(["wsl", "--version"]), Duration::from_secs(1))
//!     .unwrap();
//! assert!(!result.success);
//! assert!(runner.was_called("wsl --version"));
//! ```

use std::sync::{Mutex, PoisonError};
use std::time::Duration;

use crate::error::{Result, WslstrapError};

use super::command::{CommandLine, CommandResult, CommandRunner};

/// A canned outcome for a scripted command.
#[derive(Debug, Clone)]
pub enum ScriptedResponse {
    /// Process ran and exited with `code`.
    Exit {
        code: i32,
        stdout: String,
        stderr: String,
    },
    /// The program does not exist.
    Missing,
    /// The program exceeded its bound.
    Timeout,
}

impl ScriptedResponse {
    /// Exit 0 with the given stdout.
    pub fn ok(stdout: &str) -> Self {
        Self::Exit {
            code: 0,
            stdout: stdout.to_string(),
            stderr: String::new(),
        }
    }

    /// Exit with `code` and no output.
    pub fn exit(code: i32) -> Self {
        Self::Exit {
            code,
            stdout: String::new(),
            stderr: String::new(),
        }
    }

    /// Exit with `code` and the given stderr.
    pub fn fail(code: i32, stderr: &str) -> Self {
        Self::Exit {
            code,
            stdout: String::new(),
            stderr: stderr.to_string(),
        }
    }
}

#[derive(Debug)]
struct Rule {
    prefix: String,
    response: ScriptedResponse,
    /// `None` for rules that never run out.
    remaining: Option<usize>,
}

/// Command runner returning scripted responses.
///
/// Rules registered later win over earlier ones, so a test can change
/// the simulated host between runs by registering a new rule for the
/// same prefix.
#[derive(Debug)]
pub struct ScriptedRunner {
    rules: Mutex<Vec<Rule>>,
    calls: Mutex<Vec<String>>,
    fallback: ScriptedResponse,
}

impl Default for ScriptedRunner {
    fn default() -> Self {
        Self::new()
    }
}

impl ScriptedRunner {
    /// Create a runner where unmatched commands exit 0 silently.
    pub fn new() -> Self {
        Self::with_fallback(ScriptedResponse::ok(""))
    }

    /// Create a runner with a custom response for unmatched commands.
    pub fn with_fallback(fallback: ScriptedResponse) -> Self {
        Self {
            rules: Mutex::new(Vec::new()),
            calls: Mutex::new(Vec::new()),
            fallback,
        }
    }

    /// Respond with `response` to any argv starting with `prefix`.
    ///
    /// The prefix is matched against the space-joined, unquoted argv.
    pub fn on(&self, prefix: &str, response: ScriptedResponse) {
        self.push_rule(prefix, response, None);
    }

    /// Like [`on`](Self::on), but the rule only answers the next `times`
    /// matching invocations.
    pub fn on_times(&self, prefix: &str, times: usize, response: ScriptedResponse) {
        self.push_rule(prefix, response, Some(times));
    }

    /// Like [`on`](Self::on), but for the next matching invocation only.
    pub fn once(&self, prefix: &str, response: ScriptedResponse) {
        self.on_times(prefix, 1, response);
    }

    fn push_rule(&self, prefix: &str, response: ScriptedResponse, remaining: Option<usize>) {
        self.rules
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(Rule {
                prefix: prefix.to_string(),
                response,
                remaining,
            });
    }

    /// All recorded invocations as space-joined argv.
    pub fn calls(&self) -> Vec<String> {
        self.calls
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Number of invocations starting with `prefix`.
    pub fn call_count(&self, prefix: &str) -> usize {
        self.calls()
            .iter()
            .filter(|call| call.starts_with(prefix))
            .count()
    }

    /// Whether any invocation started with `prefix`.
    pub fn was_called(&self, prefix: &str) -> bool {
        self.call_count(prefix) > 0
    }

    /// Forget recorded invocations (rules are kept).
    pub fn clear_calls(&self) {
        self.calls
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clear();
    }

    fn response_for(&self, key: &str) -> ScriptedResponse {
        let mut rules = self.rules.lock().unwrap_or_else(PoisonError::into_inner);
        let rule = rules
            .iter_mut()
            .rev()
            .find(|rule| rule.remaining != Some(0) && key.starts_with(rule.prefix.as_str()));

        match rule {
            Some(rule) => {
                if let Some(n) = rule.remaining.as_mut() {
                    *n -= 1;
                }
                rule.response.clone()
            }
            None => self.fallback.clone(),
        }
    }
}

impl CommandRunner for ScriptedRunner {
    fn run(&self, cmd: &CommandLine, timeout: Duration) -> Result<CommandResult> {
        let key = cmd.argv().join(" ");
        self.calls
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(key.clone());

        match self.response_for(&key) {
            ScriptedResponse::Exit {
                code,
                stdout,
                stderr,
            } => {
                if code == 0 {
                    Ok(CommandResult::success(stdout, stderr, Duration::ZERO))
                } else {
                    Ok(CommandResult::failure(
                        Some(code),
                        stdout,
                        stderr,
                        Duration::ZERO,
                    ))
                }
            }
            ScriptedResponse::Missing => Err(WslstrapError::ToolNotFound {
                program: cmd.program.clone(),
            }),
            ScriptedResponse::Timeout => Err(WslstrapError::Timeout {
                command: cmd.to_string(),
                secs: timeout.as_secs(),
            }),
        }
    }
}
