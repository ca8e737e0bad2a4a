//! Explorer context-menu entries in the Windows registry, via `reg.exe`.
//!
//! An entry is a key with a default value (the menu label), an `Icon`
//! value and a `command` subkey whose default value is the command line
//! Explorer runs.

use std::sync::Arc;
use std::time::Duration;

use crate::error::Result;
use crate::shell::{run_checked, CommandLine, CommandRunner};

use super::EntryStore;

/// Entry store backed by `reg.exe`.
pub struct RegistryStore {
    runner: Arc<dyn CommandRunner>,
    label: String,
    icon: String,
    timeout: Duration,
}

impl RegistryStore {
    /// Store writing entries with the given menu `label` and `icon`.
    pub fn new(
        runner: Arc<dyn CommandRunner>,
        label: &str,
        icon: &str,
        timeout: Duration,
    ) -> Self {
        Self {
            runner,
            label: label.to_string(),
            icon: icon.to_string(),
            timeout,
        }
    }

    fn reg_add(&self, key: &str, value_args: &[&str]) -> Result<()> {
        let mut argv = vec!["reg", "add", key];
        argv.extend_from_slice(value_args);
        argv.push("/f");
        run_checked(self.runner.as_ref(), &CommandLine::new(argv), self.timeout)?;
        Ok(())
    }
}

impl EntryStore for RegistryStore {
    fn exists(&self, key: &str) -> Result<bool> {
        let cmd = CommandLine::new(["reg", "query", key]);
        Ok(self.runner.run(&cmd, self.timeout)?.success)
    }

    fn create(&self, key: &str, value: &str) -> Result<()> {
        tracing::info!("Creating registry entry {}", key);
        self.reg_add(key, &["/ve", "/d", self.label.as_str()])?;
        self.reg_add(key, &["/v", "Icon", "/d", self.icon.as_str()])?;
        self.reg_add(&format!(r"{}\command", key), &["/ve", "/d", value])?;
        Ok(())
    }

    fn delete(&self, key: &str) -> Result<()> {
        if !self.exists(key)? {
            tracing::debug!("Registry entry {} already absent", key);
            return Ok(());
        }
        tracing::info!("Deleting registry entry {}", key);
        let cmd = CommandLine::new(["reg", "delete", key, "/f"]);
        run_checked(self.runner.as_ref(), &cmd, self.timeout)?;
        Ok(())
    }
}
