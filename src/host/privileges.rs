//! Elevation check for the real host.

use std::sync::Arc;

use crate::shell::{is_elevated, CommandRunner};

use super::PrivilegeCheck;

/// Asks the operating system whether this process is elevated.
pub struct HostPrivileges {
    runner: Arc<dyn CommandRunner>,
}

impl HostPrivileges {
    pub fn new(runner: Arc<dyn CommandRunner>) -> Self {
        Self { runner }
    }
}

impl PrivilegeCheck for HostPrivileges {
    fn is_elevated(&self) -> bool {
        let elevated = is_elevated(self.runner.as_ref());
        tracing::debug!("Process elevated: {}", elevated);
        elevated
    }
}
