//! Integration tests for the wslstrap binary.
// The cargo_bin function is marked deprecated in favor of cargo_bin! macro,
// but both work correctly. Suppressing until assert_cmd stabilizes the new API.
#![allow(deprecated)]

use assert_cmd::cargo::cargo_bin;
use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use tempfile::TempDir;

/// A command running in an empty directory with an empty home, so no
/// config file is picked up unless the test writes one.
fn wslstrap(temp: &TempDir) -> Command {
    let mut cmd = Command::new(cargo_bin("wslstrap"));
    cmd.current_dir(temp.path())
        .env("HOME", temp.path())
        .env_remove("WSLSTRAP_DISTRO")
        .env_remove("RUST_LOG")
        .arg("--non-interactive")
        .arg("--lock-file")
        .arg(temp.path().join("wslstrap.lock"));
    cmd
}

fn status_json(cmd: &mut Command) -> serde_json::Value {
    let output = cmd.args(["--status", "--json"]).output().unwrap();
    assert!(output.status.success());
    serde_json::from_slice(&output.stdout).unwrap()
}

#[test]
fn cli_shows_help() -> Result<(), Box<dyn std::error::Error>> {
    let mut cmd = Command::new(cargo_bin("wslstrap"));
    cmd.arg("--help");
    cmd.assert()
        .success()
        .stdout(predicate::str::contains("--context-only"))
        .stdout(predicate::str::contains("--uninstall"));
    Ok(())
}

#[test]
fn cli_shows_version() -> Result<(), Box<dyn std::error::Error>> {
    let mut cmd = Command::new(cargo_bin("wslstrap"));
    cmd.arg("--version");
    cmd.assert()
        .success()
        .stdout(predicate::str::contains(env!("CARGO_PKG_VERSION")));
    Ok(())
}

#[test]
fn cli_rejects_conflicting_modes() -> Result<(), Box<dyn std::error::Error>> {
    let temp = TempDir::new()?;
    wslstrap(&temp)
        .args(["--status", "--uninstall"])
        .assert()
        .code(2)
        .stderr(predicate::str::contains("cannot be used with"));
    Ok(())
}

#[test]
fn cli_json_requires_status() -> Result<(), Box<dyn std::error::Error>> {
    let temp = TempDir::new()?;
    wslstrap(&temp).arg("--json").assert().code(2);
    Ok(())
}

#[test]
fn cli_status_json_reports_every_stage() -> Result<(), Box<dyn std::error::Error>> {
    let temp = TempDir::new()?;
    let report = status_json(&mut wslstrap(&temp));

    assert_eq!(report["mode"], "status");
    assert_eq!(report["restart_required"], false);
    let stages = report["stages"].as_array().unwrap();
    let kinds: Vec<&str> = stages.iter().map(|s| s["kind"].as_str().unwrap()).collect();
    assert_eq!(
        kinds,
        ["virtualization", "distribution", "application", "shell_integration"]
    );
    Ok(())
}

#[test]
fn cli_status_text_exits_zero() -> Result<(), Box<dyn std::error::Error>> {
    let temp = TempDir::new()?;
    wslstrap(&temp)
        .arg("--status")
        .assert()
        .success()
        .stdout(predicate::str::contains("Claude Code installation status"))
        .stdout(predicate::str::contains("Virtualization layer"));
    Ok(())
}

#[test]
fn cli_distro_flag_overrides_default() -> Result<(), Box<dyn std::error::Error>> {
    let temp = TempDir::new()?;
    let report = status_json(wslstrap(&temp).args(["--distro", "Debian"]));
    assert_eq!(report["stages"][1]["name"], "Guest distribution (Debian)");
    Ok(())
}

#[test]
fn cli_distro_env_is_honored() -> Result<(), Box<dyn std::error::Error>> {
    let temp = TempDir::new()?;
    let report = status_json(wslstrap(&temp).env("WSLSTRAP_DISTRO", "Fedora"));
    assert_eq!(report["stages"][1]["name"], "Guest distribution (Fedora)");
    Ok(())
}

#[test]
fn cli_reads_project_config() -> Result<(), Box<dyn std::error::Error>> {
    let temp = TempDir::new()?;
    fs::write(
        temp.path().join("wslstrap.yml"),
        "distro: Arch\napplication:\n  name: Aider\n",
    )?;

    let report = status_json(&mut wslstrap(&temp));
    assert_eq!(report["stages"][1]["name"], "Guest distribution (Arch)");
    assert_eq!(report["stages"][2]["name"], "Aider");
    Ok(())
}

#[test]
fn cli_flag_beats_config_file() -> Result<(), Box<dyn std::error::Error>> {
    let temp = TempDir::new()?;
    fs::write(temp.path().join("wslstrap.yml"), "distro: Arch\n")?;

    let report = status_json(wslstrap(&temp).args(["--distro", "Debian"]));
    assert_eq!(report["stages"][1]["name"], "Guest distribution (Debian)");
    Ok(())
}

#[test]
fn cli_invalid_config_fails() -> Result<(), Box<dyn std::error::Error>> {
    let temp = TempDir::new()?;
    fs::write(temp.path().join("wslstrap.yml"), "timeouts:\n  command_secs: 0\n")?;

    wslstrap(&temp)
        .arg("--status")
        .assert()
        .code(1)
        .stderr(predicate::str::contains("Invalid configuration"));
    Ok(())
}

#[test]
fn cli_missing_config_override_fails() -> Result<(), Box<dyn std::error::Error>> {
    let temp = TempDir::new()?;
    wslstrap(&temp)
        .args(["--status", "--config", "nope.yml"])
        .assert()
        .code(1)
        .stderr(predicate::str::contains("Configuration not found"));
    Ok(())
}

#[test]
fn cli_install_fails_off_windows() -> Result<(), Box<dyn std::error::Error>> {
    // Either not elevated or `wsl` is missing; both fail the run.
    let temp = TempDir::new()?;
    wslstrap(&temp).assert().code(1);
    assert!(!temp.path().join("wslstrap.lock").exists());
    Ok(())
}

#[test]
fn cli_context_only_fails_off_windows() -> Result<(), Box<dyn std::error::Error>> {
    let temp = TempDir::new()?;
    wslstrap(&temp).arg("--context-only").assert().code(1);
    Ok(())
}

#[test]
fn cli_log_file_receives_events() -> Result<(), Box<dyn std::error::Error>> {
    let temp = TempDir::new()?;
    let log = temp.path().join("wslstrap.log");

    wslstrap(&temp)
        .arg("--status")
        .arg("--log-file")
        .arg(&log)
        .assert()
        .success();

    let content = fs::read_to_string(&log)?;
    assert!(content.contains("Starting status run"));
    Ok(())
}
