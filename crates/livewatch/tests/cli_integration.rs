//! CLI integration tests for the livewatch command-line interface.
//!
//! These tests verify:
//! - Help text is displayed correctly
//! - Argument parsing works as expected
//! - Logged-out commands answer without touching the network
//!
//! Every run gets its own config and data directories.

use std::path::Path;

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

/// Get a command for the livewatch binary, isolated in `dir`.
fn livewatch(dir: &Path) -> Command {
    let mut cmd = Command::cargo_bin("livewatch").unwrap();
    cmd.current_dir(dir)
        .env("LIVEWATCH_CONFIG_DIR", dir.join("config"))
        .env("LIVEWATCH_DATA_DIR", dir.join("data"))
        .env_remove("LIVEWATCH_CLIENT_ID");
    cmd
}

// ─────────────────────────────────────────────────────────────────────────────
// Help and Version Tests
// ─────────────────────────────────────────────────────────────────────────────

#[test]
fn test_help_displays() {
    let temp = TempDir::new().unwrap();
    livewatch(temp.path())
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("livewatch"))
        .stdout(predicate::str::contains("followed Twitch channels"));
}

#[test]
fn test_version_displays() {
    let temp = TempDir::new().unwrap();
    livewatch(temp.path())
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains("livewatch"));
}

#[test]
fn test_help_lists_subcommands() {
    let temp = TempDir::new().unwrap();
    livewatch(temp.path())
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("auth"))
        .stdout(predicate::str::contains("streams"))
        .stdout(predicate::str::contains("refresh"))
        .stdout(predicate::str::contains("poll"))
        .stdout(predicate::str::contains("daemon"))
        .stdout(predicate::str::contains("open"))
        .stdout(predicate::str::contains("config"));
}

#[test]
fn test_auth_help() {
    let temp = TempDir::new().unwrap();
    livewatch(temp.path())
        .args(["auth", "login", "--help"])
        .assert()
        .success()
        .stdout(predicate::str::contains("--manual"));
}

#[test]
fn test_unknown_subcommand_rejected() {
    let temp = TempDir::new().unwrap();
    livewatch(temp.path())
        .arg("frobnicate")
        .assert()
        .failure()
        .stderr(predicate::str::contains("unrecognized subcommand"));
}

// ─────────────────────────────────────────────────────────────────────────────
// Config Tests
// ─────────────────────────────────────────────────────────────────────────────

#[test]
fn test_config_path_honors_config_dir() {
    let temp = TempDir::new().unwrap();
    let custom = temp.path().join("elsewhere");
    livewatch(temp.path())
        .args(["--config-dir", custom.to_str().unwrap(), "config", "path"])
        .assert()
        .success()
        .stdout(predicate::str::contains("elsewhere"))
        .stdout(predicate::str::contains("config.toml"));
}

#[test]
fn test_config_init_writes_defaults_once() {
    let temp = TempDir::new().unwrap();
    livewatch(temp.path())
        .args(["config", "init"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Created"));

    let written = std::fs::read_to_string(temp.path().join("config/config.toml")).unwrap();
    assert!(written.contains("client_id = \"YOUR_TWITCH_CLIENT_ID\""));
    assert!(written.contains("interval_secs = 300"));

    livewatch(temp.path())
        .args(["config", "init"])
        .assert()
        .success()
        .stdout(predicate::str::contains("already exists"));
}

#[test]
fn test_invalid_config_is_reported() {
    let temp = TempDir::new().unwrap();
    std::fs::write(
        temp.path().join("livewatch.toml"),
        "[poller]\ninterval_secs = 0\n",
    )
    .unwrap();

    livewatch(temp.path())
        .arg("poll")
        .assert()
        .failure()
        .stderr(predicate::str::contains("Failed to load configuration"));
}

#[test]
fn test_config_show_json() {
    let temp = TempDir::new().unwrap();
    livewatch(temp.path())
        .env("LIVEWATCH_CLIENT_ID", "from-env")
        .args(["--json", "config", "show"])
        .assert()
        .success()
        .stdout(predicate::str::contains("\"client_id\": \"from-env\""));
}

// ─────────────────────────────────────────────────────────────────────────────
// Logged-out Behaviour
// ─────────────────────────────────────────────────────────────────────────────

#[test]
fn test_streams_without_session_prompts_to_connect() {
    let temp = TempDir::new().unwrap();
    livewatch(temp.path())
        .arg("streams")
        .assert()
        .success()
        .stdout(predicate::str::contains("Not connected"))
        .stdout(predicate::str::contains("livewatch auth login"));
}

#[test]
fn test_streams_json_without_session() {
    let temp = TempDir::new().unwrap();
    livewatch(temp.path())
        .args(["--json", "streams"])
        .assert()
        .success()
        .stdout(predicate::eq("{\"state\":\"connect\"}\n"));
}

#[test]
fn test_poll_without_session_is_noop() {
    let temp = TempDir::new().unwrap();
    livewatch(temp.path())
        .args(["--json", "poll"])
        .assert()
        .success()
        .stdout(predicate::str::contains("\"outcome\":\"no_session\""));

    assert!(!temp.path().join("data/store.json").exists());
}

#[test]
fn test_auth_status_without_session() {
    let temp = TempDir::new().unwrap();
    livewatch(temp.path())
        .args(["auth", "status"])
        .assert()
        .success()
        .stdout(predicate::str::contains("not connected"));
}

#[test]
fn test_logout_without_session() {
    let temp = TempDir::new().unwrap();
    livewatch(temp.path())
        .args(["auth", "logout"])
        .assert()
        .success()
        .stdout(predicate::str::contains("No session found"));
}

// ─────────────────────────────────────────────────────────────────────────────
// Open and Daemon
// ─────────────────────────────────────────────────────────────────────────────

#[test]
fn test_open_print() {
    let temp = TempDir::new().unwrap();
    livewatch(temp.path())
        .args(["open", "--print", "@Some_Streamer"])
        .assert()
        .success()
        .stdout(predicate::eq("https://twitch.tv/some_streamer\n"));
}

#[test]
fn test_open_rejects_bad_login() {
    let temp = TempDir::new().unwrap();
    livewatch(temp.path())
        .args(["open", "--print", "not a login"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("not a valid channel login"));
}

#[test]
fn test_daemon_rejects_zero_interval() {
    let temp = TempDir::new().unwrap();
    livewatch(temp.path())
        .args(["daemon", "--interval", "0"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("--interval must be greater than 0"));
}
