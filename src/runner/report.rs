//! Run reports: per-stage outcomes of one orchestrator invocation.

use std::fmt;
use std::time::Duration;

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::error::WslstrapError;
use crate::stages::{Stage, StageKind};

/// Which run the orchestrator was asked to perform.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RunMode {
    /// Walk the full chain, installing whatever is missing.
    Install,
    /// Install only the shell integration.
    ContextOnly,
    /// Remove the shell integration.
    Uninstall,
    /// Probe everything, change nothing.
    Status,
}

impl RunMode {
    /// Whether this mode may change host state.
    pub fn is_mutating(self) -> bool {
        !matches!(self, Self::Status)
    }
}

impl fmt::Display for RunMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Install => "install",
            Self::ContextOnly => "context-only",
            Self::Uninstall => "uninstall",
            Self::Status => "status",
        };
        f.write_str(s)
    }
}

/// Classification of a stage failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FailureKind {
    /// The external executable is absent.
    ToolNotFound,
    /// An external command exited non-zero.
    CommandFailed,
    /// An external command exceeded its bound.
    Timeout,
    /// Anything else (I/O, unexpected errors).
    Other,
}

/// Terminal outcome of a stage within one run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum StageOutcome {
    /// The stage was unsatisfied and `apply()` (or `reverse()`) succeeded.
    Applied,
    /// The probe reported the target state already holds.
    AlreadySatisfied,
    /// Read-only probe result: the target state does not hold.
    NotSatisfied,
    /// `apply()` (or `reverse()`) failed.
    Failed {
        #[serde(rename = "failure")]
        kind: FailureKind,
        reason: String,
    },
    /// A predecessor failed or the chain was stopped.
    SkippedUnmetDependency,
    /// The host is not elevated.
    PermissionDenied,
    /// The operator declined to continue.
    Cancelled,
}

impl StageOutcome {
    /// Failed outcome classifying `err`.
    pub fn from_error(err: &WslstrapError) -> Self {
        Self::Failed {
            kind: err.failure_kind(),
            reason: err.to_string(),
        }
    }

    /// Whether this outcome makes an in-scope stage count against the run.
    pub fn is_failure(&self) -> bool {
        matches!(
            self,
            Self::Failed { .. }
                | Self::SkippedUnmetDependency
                | Self::PermissionDenied
                | Self::Cancelled
        )
    }
}

/// Outcome of a single stage, with reporting detail.
#[derive(Debug, Clone, Serialize)]
pub struct StageReport {
    /// Stage display name.
    pub name: String,
    /// Which stage this is.
    pub kind: StageKind,
    /// Position in the dependency chain.
    pub ordinal: usize,
    /// What happened.
    #[serde(flatten)]
    pub outcome: StageOutcome,
    /// Diagnostic detail from the probe (tool output, detected version).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub detail: Option<String>,
    /// Time spent in probe + apply.
    #[serde(rename = "duration_ms", serialize_with = "serialize_millis")]
    pub duration: Option<Duration>,
    /// Whether the outcome counts towards the run's success.
    pub in_scope: bool,
}

impl StageReport {
    /// In-scope report for `stage` at `ordinal`.
    pub fn new(stage: &dyn Stage, ordinal: usize, outcome: StageOutcome) -> Self {
        Self {
            name: stage.name(),
            kind: stage.kind(),
            ordinal,
            outcome,
            detail: None,
            duration: None,
            in_scope: true,
        }
    }

    pub fn with_detail(mut self, detail: Option<String>) -> Self {
        self.detail = detail;
        self
    }

    pub fn with_duration(mut self, duration: Duration) -> Self {
        self.duration = Some(duration);
        self
    }

    /// Mark as informational; it won't affect the run's success.
    pub fn out_of_scope(mut self) -> Self {
        self.in_scope = false;
        self
    }
}

fn serialize_millis<S: serde::Serializer>(
    duration: &Option<Duration>,
    serializer: S,
) -> std::result::Result<S::Ok, S::Error> {
    match duration {
        Some(d) => serializer.serialize_some(&(d.as_millis() as u64)),
        None => serializer.serialize_none(),
    }
}

/// Ordered record of one run.
#[derive(Debug, Clone, Serialize)]
pub struct RunReport {
    /// Requested mode.
    pub mode: RunMode,
    /// When the run started.
    pub started_at: DateTime<Utc>,
    /// Stage outcomes in chain order.
    pub stages: Vec<StageReport>,
    /// The virtualization layer was installed and the operator chose to
    /// restart before continuing.
    pub restart_required: bool,
}

impl RunReport {
    /// Start an empty report for `mode`.
    pub fn new(mode: RunMode) -> Self {
        Self {
            mode,
            started_at: Utc::now(),
            stages: Vec::new(),
            restart_required: false,
        }
    }

    /// Append a stage outcome.
    pub fn push(&mut self, stage: StageReport) {
        self.stages.push(stage);
    }

    /// True when no in-scope stage failed, was skipped, denied or cancelled.
    pub fn success(&self) -> bool {
        self.stages
            .iter()
            .filter(|s| s.in_scope)
            .all(|s| !s.outcome.is_failure())
    }

    /// Process exit code for this report.
    ///
    /// Status runs always exit 0.
    pub fn exit_code(&self) -> i32 {
        if self.mode == RunMode::Status || self.success() {
            0
        } else {
            1
        }
    }

    /// Look up a stage by kind.
    pub fn stage(&self, kind: StageKind) -> Option<&StageReport> {
        self.stages.iter().find(|s| s.kind == kind)
    }

    /// Outcome of a stage by kind.
    pub fn outcome(&self, kind: StageKind) -> Option<&StageOutcome> {
        self.stage(kind).map(|s| &s.outcome)
    }

    /// Outcomes in chain order.
    pub fn outcomes(&self) -> Vec<&StageOutcome> {
        self.stages.iter().map(|s| &s.outcome).collect()
    }

    /// Names of stages that were applied this run.
    pub fn applied(&self) -> Vec<&str> {
        self.stages
            .iter()
            .filter(|s| s.outcome == StageOutcome::Applied)
            .map(|s| s.name.as_str())
            .collect()
    }

    /// Serialize to pretty JSON with the computed `success` flag.
    pub fn to_json(&self) -> serde_json::Result<String> {
        let mut value = serde_json::to_value(self)?;
        if let Some(obj) = value.as_object_mut() {
            obj.insert("success".to_string(), serde_json::Value::Bool(self.success()));
        }
        serde_json::to_string_pretty(&value)
    }
}
