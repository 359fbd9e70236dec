#![allow(clippy::unwrap_used, clippy::expect_used)]

use std::path::Path;
use std::process::{Command, Output};

fn newsly(data_dir: &Path, args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_newsly"))
        .arg("--data-dir")
        .arg(data_dir)
        .args(["--api-url", "http://127.0.0.1:1"])
        .args(args)
        .env_remove("RUST_LOG")
        .output()
        .expect("failed to run newsly")
}

fn stdout(output: &Output) -> String {
    String::from_utf8(output.stdout.clone()).unwrap()
}

#[test]
fn help_lists_commands() {
    let dir = tempfile::tempdir().unwrap();
    let output = newsly(dir.path(), &["--help"]);
    assert!(output.status.success());
    let text = stdout(&output);
    for command in ["feed", "onboard", "signup", "signin", "account", "health"] {
        assert!(text.contains(command), "missing {command} in help");
    }
}

#[test]
fn print_config_shows_overrides() {
    let dir = tempfile::tempdir().unwrap();
    let output = newsly(dir.path(), &["--print-config"]);
    assert!(output.status.success());
    let text = stdout(&output);
    assert!(text.contains("base_url: http://127.0.0.1:1"));
    assert!(text.contains("preview_delay: 500ms"));
}

#[test]
fn missing_config_file_fails() {
    let dir = tempfile::tempdir().unwrap();
    let missing = dir.path().join("absent.yaml");
    let output = newsly(dir.path(), &["--config", missing.to_str().unwrap()]);
    assert!(!output.status.success());
    let stderr = String::from_utf8(output.stderr).unwrap();
    assert!(stderr.contains("config file does not exist"));
}

#[test]
fn feed_is_the_default_command() {
    let dir = tempfile::tempdir().unwrap();
    let output = newsly(dir.path(), &[]);
    assert!(output.status.success());
    assert!(stdout(&output).contains("newsly onboard"));
}

#[test]
fn google_url_uses_api_address() {
    let dir = tempfile::tempdir().unwrap();
    let output = newsly(dir.path(), &["google-url"]);
    assert!(output.status.success());
    assert_eq!(stdout(&output).trim(), "http://127.0.0.1:1/auth/google");
}

#[test]
fn skipped_onboarding_is_stored_on_disk() {
    let dir = tempfile::tempdir().unwrap();
    let output = newsly(dir.path(), &["onboard", "--skip"]);
    assert!(output.status.success());

    let raw = std::fs::read_to_string(dir.path().join("local-storage.json")).unwrap();
    let stored: serde_json::Value = serde_json::from_str(&raw).unwrap();
    assert_eq!(stored["noozers-onboarding-complete"], "true");
}

#[test]
fn health_against_closed_port_fails() {
    let dir = tempfile::tempdir().unwrap();
    let output = newsly(dir.path(), &["health"]);
    assert!(!output.status.success());
}
