//! External process execution with a wall-clock bound.

use crate::error::{Result, WslstrapError};
use std::fmt;
use std::io::Read;
use std::process::{Command, Stdio};
use std::sync::mpsc::{self, Receiver, RecvTimeoutError};
use std::thread;
use std::time::{Duration, Instant};

/// How often a running child is polled for exit.
const POLL_INTERVAL: Duration = Duration::from_millis(50);

/// Execution context of a command line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShellMode {
    /// Plain host process.
    Direct,
    /// Program executed inside the guest without a shell.
    GuestExec,
    /// Script run by a non-interactive guest shell (`bash -c`).
    GuestScript,
    /// Script run by an interactive guest shell (`bash -ic`).
    ///
    /// Tools installed through a version manager or a profile hook are
    /// often only on `PATH` once the interactive rc files have run.
    GuestInteractive,
}

/// A fully-resolved external command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandLine {
    /// Executable name or path.
    pub program: String,
    /// Arguments passed verbatim.
    pub args: Vec<String>,
    /// Context the command was built for.
    pub mode: ShellMode,
}

impl CommandLine {
    /// Build a direct host command from an argv sequence.
    ///
    /// An empty argv yields an empty program, which fails at spawn time.
    pub fn new<I, S>(argv: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut argv = argv.into_iter().map(Into::into);
        let program = argv.next().unwrap_or_default();
        Self {
            program,
            args: argv.collect(),
            mode: ShellMode::Direct,
        }
    }

    /// `wsl -d <distro> -- <args...>`
    pub fn guest<I, S>(distro: &str, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut argv = guest_prefix(distro);
        argv.extend(args.into_iter().map(Into::into));
        Self {
            mode: ShellMode::GuestExec,
            ..Self::new(argv)
        }
    }

    /// `wsl -d <distro> -- bash -c <script>`
    pub fn guest_script(distro: &str, script: &str) -> Self {
        let mut argv = guest_prefix(distro);
        argv.extend(["bash".to_string(), "-c".to_string(), script.to_string()]);
        Self {
            mode: ShellMode::GuestScript,
            ..Self::new(argv)
        }
    }

    /// `wsl -d <distro> -- bash -ic <script>`
    pub fn guest_interactive(distro: &str, script: &str) -> Self {
        let mut argv = guest_prefix(distro);
        argv.extend(["bash".to_string(), "-ic".to_string(), script.to_string()]);
        Self {
            mode: ShellMode::GuestInteractive,
            ..Self::new(argv)
        }
    }

    /// Full argv, program first.
    pub fn argv(&self) -> Vec<&str> {
        std::iter::once(self.program.as_str())
            .chain(self.args.iter().map(String::as_str))
            .collect()
    }
}

fn guest_prefix(distro: &str) -> Vec<String> {
    vec![
        "wsl".to_string(),
        "-d".to_string(),
        distro.to_string(),
        "--".to_string(),
    ]
}

impl fmt::Display for CommandLine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let rendered: Vec<String> = self
            .argv()
            .into_iter()
            .map(|arg| {
                if arg.is_empty() || arg.contains(char::is_whitespace) {
                    format!("'{}'", arg)
                } else {
                    arg.to_string()
                }
            })
            .collect();
        write!(f, "{}", rendered.join(" "))
    }
}

/// Result of executing an external command.
#[derive(Debug, Clone)]
pub struct CommandResult {
    /// Exit code (None if killed by signal).
    pub exit_code: Option<i32>,

    /// Standard output.
    pub stdout: String,

    /// Standard error.
    pub stderr: String,

    /// Execution duration.
    pub duration: Duration,

    /// Whether command succeeded (exit code 0).
    pub success: bool,
}

impl CommandResult {
    /// Create a success result.
    pub fn success(stdout: String, stderr: String, duration: Duration) -> Self {
        Self {
            exit_code: Some(0),
            stdout,
            stderr,
            duration,
            success: true,
        }
    }

    /// Create a failure result.
    pub fn failure(
        exit_code: Option<i32>,
        stdout: String,
        stderr: String,
        duration: Duration,
    ) -> Self {
        Self {
            exit_code,
            stdout,
            stderr,
            duration,
            success: false,
        }
    }
}

/// Executes external processes.
///
/// `run` reports a non-zero exit as `Ok` with `success == false`. It only
/// errors when the program is missing (`ToolNotFound`), when the bound is
/// exceeded (`Timeout`), or on other spawn I/O failures.
pub trait CommandRunner: Send + Sync {
    /// Run a command, waiting at most `timeout`.
    fn run(&self, cmd: &CommandLine, timeout: Duration) -> Result<CommandResult>;
}

/// Must-succeed variant of [`CommandRunner::run`].
///
/// Converts a non-zero exit into [`WslstrapError::CommandFailed`].
pub fn run_checked(
    runner: &dyn CommandRunner,
    cmd: &CommandLine,
    timeout: Duration,
) -> Result<CommandResult> {
    let result = runner.run(cmd, timeout)?;
    if result.success {
        Ok(result)
    } else {
        tracing::error!("Command failed: {} (exit {:?})", cmd, result.exit_code);
        if !result.stderr.trim().is_empty() {
            tracing::error!("Error output: {}", result.stderr.trim());
        }
        Err(WslstrapError::CommandFailed {
            command: cmd.to_string(),
            code: result.exit_code,
            stderr: result.stderr,
        })
    }
}

/// Runs commands as real host processes.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemRunner;

impl SystemRunner {
    /// Create a new system runner.
    pub fn new() -> Self {
        Self
    }
}

impl CommandRunner for SystemRunner {
    fn run(&self, cmd: &CommandLine, timeout: Duration) -> Result<CommandResult> {
        let start = Instant::now();
        let deadline = start + timeout;
        tracing::info!("Running command: {}", cmd);

        let mut child = Command::new(&cmd.program)
            .args(&cmd.args)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()
            .map_err(|e| {
                if e.kind() == std::io::ErrorKind::NotFound {
                    WslstrapError::ToolNotFound {
                        program: cmd.program.clone(),
                    }
                } else {
                    WslstrapError::Io(e)
                }
            })?;

        let stdout = child.stdout.take().map(spawn_reader);
        let stderr = child.stderr.take().map(spawn_reader);

        let status = loop {
            if let Some(status) = child.try_wait()? {
                break status;
            }
            if start.elapsed() >= timeout {
                let _ = child.kill();
                let _ = child.wait();
                tracing::error!("Command timed out after {:?}: {}", timeout, cmd);
                return Err(WslstrapError::Timeout {
                    command: cmd.to_string(),
                    secs: timeout.as_secs(),
                });
            }
            thread::sleep(POLL_INTERVAL);
        };

        // A background process can inherit the pipes and outlive the child.
        let (Some(stdout), Some(stderr)) = (collect(stdout, deadline), collect(stderr, deadline))
        else {
            tracing::error!(
                "Command output still open after {:?}, detaching: {}",
                timeout,
                cmd
            );
            return Err(WslstrapError::Timeout {
                command: cmd.to_string(),
                secs: timeout.as_secs(),
            });
        };
        let duration = start.elapsed();

        if !stdout.is_empty() {
            tracing::debug!("Command output: {}", stdout.trim_end());
        }

        if status.success() {
            Ok(CommandResult::success(stdout, stderr, duration))
        } else {
            tracing::debug!("Command exited with {:?}: {}", status.code(), cmd);
            Ok(CommandResult::failure(
                status.code(),
                stdout,
                stderr,
                duration,
            ))
        }
    }
}

fn spawn_reader<R: Read + Send + 'static>(mut pipe: R) -> Receiver<String> {
    let (tx, rx) = mpsc::channel();
    thread::spawn(move || {
        let mut buf = Vec::new();
        let _ = pipe.read_to_end(&mut buf);
        let _ = tx.send(String::from_utf8_lossy(&buf).into_owned());
    });
    rx
}

/// Wait for a reader until `deadline`; `None` when the pipe is still open.
fn collect(reader: Option<Receiver<String>>, deadline: Instant) -> Option<String> {
    let Some(reader) = reader else {
        return Some(String::new());
    };
    match reader.recv_timeout(deadline.saturating_duration_since(Instant::now())) {
        Ok(output) => Some(output),
        Err(RecvTimeoutError::Disconnected) => Some(String::new()),
        Err(RecvTimeoutError::Timeout) => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const TIMEOUT: Duration = Duration::from_secs(10);

    #[test]
    fn new_splits_program_and_args() {
        let cmd = CommandLine::new(["wsl", "--version"]);
        assert_eq!(cmd.program, "wsl");
        assert_eq!(cmd.args, vec!["--version"]);
        assert_eq!(cmd.mode, ShellMode::Direct);
    }

    #[test]
    fn guest_prefixes_distro() {
        let cmd = CommandLine::guest("Ubuntu", ["sudo", "apt", "update", "-y"]);
        assert_eq!(
            cmd.argv(),
            vec!["wsl", "-d", "Ubuntu", "--", "sudo", "apt", "update", "-y"]
        );
        assert_eq!(cmd.mode, ShellMode::GuestExec);
    }

    #[test]
    fn guest_interactive_uses_bash_ic() {
        let cmd = CommandLine::guest_interactive("Ubuntu", "which claude");
        assert_eq!(
            cmd.argv(),
            vec!["wsl", "-d", "Ubuntu", "--", "bash", "-ic", "which claude"]
        );
        assert_eq!(cmd.mode, ShellMode::GuestInteractive);
    }

    #[test]
    fn guest_script_uses_bash_c() {
        let cmd = CommandLine::guest_script("Debian", "curl -fsSL x | sudo -E bash -");
        assert_eq!(cmd.args[4], "-c");
        assert_eq!(cmd.mode, ShellMode::GuestScript);
    }

    #[test]
    fn display_quotes_arguments_with_spaces() {
        let cmd = CommandLine::guest_interactive("Ubuntu", "claude --version");
        assert_eq!(
            cmd.to_string(),
            "wsl -d Ubuntu -- bash -ic 'claude --version'"
        );
    }

    #[cfg(unix)]
    #[test]
    fn system_runner_captures_stdout() {
        let cmd = CommandLine::new(["sh", "-c", "echo hello"]);
        let result = SystemRunner::new().run(&cmd, TIMEOUT).unwrap();

        assert!(result.success);
        assert_eq!(result.exit_code, Some(0));
        assert!(result.stdout.contains("hello"));
    }

    #[cfg(unix)]
    #[test]
    fn system_runner_reports_nonzero_exit_without_error() {
        let cmd = CommandLine::new(["sh", "-c", "echo oops >&2; exit 3"]);
        let result = SystemRunner::new().run(&cmd, TIMEOUT).unwrap();

        assert!(!result.success);
        assert_eq!(result.exit_code, Some(3));
        assert!(result.stderr.contains("oops"));
    }

    #[test]
    fn system_runner_missing_program_is_tool_not_found() {
        let cmd = CommandLine::new(["wslstrap-definitely-not-a-real-tool"]);
        let err = SystemRunner::new().run(&cmd, TIMEOUT).unwrap_err();

        assert!(matches!(err, WslstrapError::ToolNotFound { .. }));
    }

    #[cfg(unix)]
    #[test]
    fn system_runner_kills_on_timeout() {
        let cmd = CommandLine::new(["sleep", "5"]);
        let start = Instant::now();
        let err = SystemRunner::new()
            .run(&cmd, Duration::from_millis(200))
            .unwrap_err();

        assert!(matches!(err, WslstrapError::Timeout { .. }));
        assert!(start.elapsed() < Duration::from_secs(4));
    }

    #[cfg(unix)]
    #[test]
    fn system_runner_bounds_output_held_by_background_process() {
        let cmd = CommandLine::new(["sh", "-c", "sleep 6 & echo started"]);
        let start = Instant::now();
        let err = SystemRunner::new()
            .run(&cmd, Duration::from_secs(1))
            .unwrap_err();

        assert!(matches!(err, WslstrapError::Timeout { secs: 1, .. }));
        assert!(start.elapsed() < Duration::from_secs(4));
    }

    #[cfg(unix)]
    #[test]
    fn run_checked_converts_nonzero_exit() {
        let cmd = CommandLine::new(["sh", "-c", "exit 1"]);
        let err = run_checked(&SystemRunner::new(), &cmd, TIMEOUT).unwrap_err();

        match err {
            WslstrapError::CommandFailed { code, .. } => assert_eq!(code, Some(1)),
            other => panic!("Expected CommandFailed, got {:?}", other),
        }
    }

    #[cfg(unix)]
    #[test]
    fn run_checked_passes_success_through() {
        let cmd = CommandLine::new(["sh", "-c", "echo ok"]);
        let result = run_checked(&SystemRunner::new(), &cmd, TIMEOUT).unwrap();
        assert!(result.stdout.contains("ok"));
    }
}
