//! CLI command implementations.
//!
//! Each command implements the [`Command`] trait, which provides a uniform
//! interface for executing commands and reporting results.
//!
//! # Architecture
//!
//! Commands are dispatched via [`CommandDispatcher`], which routes the
//! selected mode to its implementation. Every command borrows the one
//! [`Orchestrator`](crate::runner::Orchestrator) built in `main`.

pub mod dispatcher;
pub mod display;
pub mod hooks;
pub mod run;
pub mod status;

pub use dispatcher::{Command, CommandDispatcher, CommandResult};
pub use hooks::UiHooks;
pub use run::RunCommand;
pub use status::StatusCommand;
