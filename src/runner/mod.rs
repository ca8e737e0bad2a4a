//! Run orchestration: the dependency chain, run modes and reports.

pub mod chain;
pub mod hooks;
pub mod lock;
pub mod orchestrator;
pub mod report;

pub use chain::{ChainControl, DependencyChain};
pub use hooks::{NoHooks, RecordingHooks, RunHooks};
pub use lock::{default_lock_path, RunLock};
pub use orchestrator::{build_chain, HostServices, Orchestrator};
pub use report::{FailureKind, RunMode, RunReport, StageOutcome, StageReport};
