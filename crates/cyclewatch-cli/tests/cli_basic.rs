//! Basic CLI E2E tests.
//!
//! Tests invoke CLI commands via cargo run and verify outputs. Nothing here
//! touches a live event store.

use std::process::Command;

/// Run a CLI command and return (stdout, stderr, exit code).
fn run_cli(args: &[&str]) -> (String, String, i32) {
    let output = Command::new("cargo")
        .args(["run", "-p", "cyclewatch-cli", "--"])
        .args(args)
        .output()
        .expect("Failed to execute CLI command");

    let stdout = String::from_utf8_lossy(&output.stdout).to_string();
    let stderr = String::from_utf8_lossy(&output.stderr).to_string();
    let code = output.status.code().unwrap_or(-1);

    (stdout, stderr, code)
}

#[test]
fn test_help() {
    let (stdout, _, code) = run_cli(&["--help"]);
    assert_eq!(code, 0);
    assert!(stdout.contains("table"));
    assert!(stdout.contains("situation"));
    assert!(stdout.contains("standard-time"));
}

#[test]
fn test_config_path() {
    let output = Command::new("cargo")
        .args(["run", "-p", "cyclewatch-cli", "--", "config", "path"])
        .env("CYCLEWATCH_CONFIG", "/tmp/cyclewatch-test.toml")
        .output()
        .expect("Failed to execute CLI command");
    assert_eq!(output.status.code(), Some(0));
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("/tmp/cyclewatch-test.toml"));
}

#[test]
fn test_completions_bash() {
    let (stdout, _, code) = run_cli(&["completions", "bash"]);
    assert_eq!(code, 0);
    assert!(stdout.contains("cyclewatch-cli"));
}

#[test]
fn test_situation_rejects_bad_run_date() {
    let (_, stderr, code) = run_cli(&[
        "situation",
        "--elastic-server",
        "http://localhost:1",
        "--node-path",
        "/model/forecast",
        "--run-date",
        "20240301",
    ]);
    assert_ne!(code, 0);
    assert!(stderr.contains("run date"));
}

#[test]
fn test_standard_time_rejects_zero_bootstrap_count() {
    let (_, stderr, code) = run_cli(&[
        "standard-time",
        "--elastic-server",
        "http://localhost:1",
        "--system",
        "nwp_gfs",
        "--start-time",
        "2024030100/2024030700",
        "--forecast-hours",
        "0,3,6",
        "--bootstrap-count",
        "0",
    ]);
    assert_ne!(code, 0);
    assert!(stderr.contains("bootstrap-count"));
}

#[test]
fn test_table_requires_system() {
    let (_, stderr, code) = run_cli(&["table", "--start-time", "2024030100"]);
    assert_ne!(code, 0);
    assert!(stderr.contains("--system"));
}
