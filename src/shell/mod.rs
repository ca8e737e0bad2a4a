//! External process execution and host platform queries.

pub mod command;
pub mod mock;
pub mod platform;

pub use command::{run_checked, CommandLine, CommandResult, CommandRunner, ShellMode, SystemRunner};
pub use mock::{ScriptedResponse, ScriptedRunner};
pub use platform::{is_ci, is_elevated};
