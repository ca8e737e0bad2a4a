//! Error types for wslstrap operations.
//!
//! This module defines [`WslstrapError`], the primary error type used
//! throughout the crate, and a [`Result`] type alias for convenience.
//!
//! # Error Handling Strategy
//!
//! - Process-level failures (`ToolNotFound`, `CommandFailed`, `Timeout`)
//!   are stage-local: the orchestrator records them in the run report
//!   and keeps walking the chain
//! - Configuration and lock errors are fatal to the invocation
//! - Use `anyhow::Error` (via `WslstrapError::Other`) for unexpected errors

use std::path::PathBuf;
use thiserror::Error;

use crate::runner::FailureKind;

/// Core error type for wslstrap operations.
#[derive(Debug, Error)]
pub enum WslstrapError {
    /// The external executable itself is absent.
    #[error("Command not found: {program}")]
    ToolNotFound { program: String },

    /// External command exited non-zero.
    #[error("Command failed with exit code {code:?}: {command}")]
    CommandFailed {
        command: String,
        code: Option<i32>,
        stderr: String,
    },

    /// External command exceeded its wall-clock bound and was killed.
    #[error("Command timed out after {secs}s: {command}")]
    Timeout { command: String, secs: u64 },

    /// A mutating operation was attempted without elevation.
    #[error("Administrator privileges required to {operation}")]
    PermissionDenied { operation: String },

    /// `reverse()` was requested on a stage that cannot be removed.
    #[error("Stage '{stage}' cannot be uninstalled")]
    NotReversible { stage: String },

    /// Another run holds the advisory lock.
    #[error("Another run is in progress (lock held at {path})")]
    RunInProgress { path: PathBuf },

    /// Configuration file not found at an explicitly requested location.
    #[error("Configuration not found: {path}")]
    ConfigNotFound { path: PathBuf },

    /// Failed to parse configuration file.
    #[error("Failed to parse config at {path}: {message}")]
    ConfigParseError { path: PathBuf, message: String },

    /// Invalid configuration structure or values.
    #[error("Invalid configuration: {message}")]
    ConfigValidationError { message: String },

    /// IO error wrapper.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Generic wrapped error for anyhow interop.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl WslstrapError {
    /// Classify this error for the run report.
    pub fn failure_kind(&self) -> FailureKind {
        match self {
            Self::ToolNotFound { .. } => FailureKind::ToolNotFound,
            Self::CommandFailed { .. } => FailureKind::CommandFailed,
            Self::Timeout { .. } => FailureKind::Timeout,
            _ => FailureKind::Other,
        }
    }
}

/// Result type alias for wslstrap operations.
pub type Result<T> = std::result::Result<T, WslstrapError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tool_not_found_displays_program() {
        let err = WslstrapError::ToolNotFound {
            program: "wsl".into(),
        };
        assert!(err.to_string().contains("wsl"));
    }

    #[test]
    fn command_failed_displays_command_and_code() {
        let err = WslstrapError::CommandFailed {
            command: "wsl --install --no-launch".into(),
            code: Some(1),
            stderr: String::new(),
        };
        let msg = err.to_string();
        assert!(msg.contains("wsl --install --no-launch"));
        assert!(msg.contains("1"));
    }

    #[test]
    fn timeout_displays_seconds() {
        let err = WslstrapError::Timeout {
            command: "wsl --version".into(),
            secs: 300,
        };
        assert!(err.to_string().contains("300s"));
    }

    #[test]
    fn run_in_progress_displays_lock_path() {
        let err = WslstrapError::RunInProgress {
            path: PathBuf::from("/tmp/wslstrap.lock"),
        };
        assert!(err.to_string().contains("/tmp/wslstrap.lock"));
    }

    #[test]
    fn config_parse_error_displays_path_and_message() {
        let err = WslstrapError::ConfigParseError {
            path: PathBuf::from("/wslstrap.yml"),
            message: "invalid syntax".into(),
        };
        let msg = err.to_string();
        assert!(msg.contains("/wslstrap.yml"));
        assert!(msg.contains("invalid syntax"));
    }

    #[test]
    fn failure_kind_classifies_process_errors() {
        let missing = WslstrapError::ToolNotFound {
            program: "wsl".into(),
        };
        let failed = WslstrapError::CommandFailed {
            command: "x".into(),
            code: Some(2),
            stderr: String::new(),
        };
        let timed_out = WslstrapError::Timeout {
            command: "x".into(),
            secs: 1,
        };
        assert_eq!(missing.failure_kind(), FailureKind::ToolNotFound);
        assert_eq!(failed.failure_kind(), FailureKind::CommandFailed);
        assert_eq!(timed_out.failure_kind(), FailureKind::Timeout);
    }

    #[test]
    fn io_error_converts_from_std() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "file missing");
        let err: WslstrapError = io_err.into();
        assert!(matches!(err, WslstrapError::Io(_)));
        assert_eq!(err.failure_kind(), FailureKind::Other);
    }

    #[test]
    fn anyhow_error_converts_to_other() {
        let err: WslstrapError = anyhow::anyhow!("boom").into();
        assert!(matches!(err, WslstrapError::Other(_)));
        assert_eq!(err.to_string(), "boom");
    }
}
