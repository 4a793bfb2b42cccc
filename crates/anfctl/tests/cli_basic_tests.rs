//! Basic CLI behavior: help, argument validation, and the clean-exit
//! contract for missing configuration.

use assert_cmd::Command;
use predicates::prelude::*;

fn anfctl() -> Command {
    Command::cargo_bin("anfctl").expect("binary builds")
}

#[test]
fn help_lists_all_subcommands() {
    anfctl()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("provision"))
        .stdout(predicate::str::contains("teardown"))
        .stdout(predicate::str::contains("status"));
}

#[test]
fn version_prints_package_version() {
    anfctl()
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains(env!("CARGO_PKG_VERSION")));
}

#[test]
fn unknown_subcommand_is_rejected() {
    anfctl().arg("frobnicate").assert().failure();
}

#[test]
fn missing_config_file_stops_cleanly() {
    // Missing configuration is a diagnostic plus a clean exit, not a failure
    anfctl()
        .args([
            "status",
            "--config-file",
            "/nonexistent/anfctl-test/config.toml",
        ])
        .assert()
        .code(0)
        .stderr(predicate::str::contains("error"))
        .stderr(predicate::str::contains("config.toml"));
}

#[test]
fn corrupt_config_file_reports_parse_error() {
    let dir = tempfile::TempDir::new().unwrap();
    let config_path = dir.path().join("config.toml");
    std::fs::write(&config_path, "[[[broken").unwrap();

    anfctl()
        .args(["status", "--config-file"])
        .arg(&config_path)
        .assert()
        .code(0)
        .stderr(predicate::str::contains("parse"));
}

#[test]
fn completions_are_generated() {
    anfctl()
        .args(["completions", "bash"])
        .assert()
        .success()
        .stdout(predicate::str::contains("anfctl"));
}
