//! Integration tests for the CLI surface: argument parsing, help, version.

#![allow(clippy::expect_used)]

use assert_cmd::Command;
use predicates::prelude::*;

fn convoy() -> Command {
    let mut cmd = Command::new(assert_cmd::cargo::cargo_bin!("convoy"));
    cmd.env("NO_COLOR", "1");
    cmd
}

// --- Help and version tests ---

#[test]
fn test_cli_no_args_shows_help_and_exits_nonzero() {
    // clap with arg_required_else_help shows help on stderr and exits 2
    convoy().assert().code(2).stderr(predicate::str::contains(
        "Scaffold and deploy multi-service projects",
    ));
}

#[test]
fn test_cli_help_flag_shows_help() {
    convoy()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("Usage:"))
        .stdout(predicate::str::contains("Commands:"));
}

#[test]
fn test_cli_version_flag_shows_version() {
    convoy()
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains("convoy"));
}

#[test]
fn test_version_command_shows_version() {
    convoy()
        .arg("version")
        .assert()
        .success()
        .stdout(predicate::str::contains("convoy 0.2.0"));
}

// --- Command hierarchy tests ---

#[test]
fn test_help_shows_init_command() {
    convoy()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("init"));
}

#[test]
fn test_help_shows_deploy_command() {
    convoy()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("deploy"));
}

#[test]
fn test_help_shows_config_command() {
    convoy()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("config"));
}

#[test]
fn test_init_help_lists_registry_and_parameters_flags() {
    convoy()
        .args(["init", "--help"])
        .assert()
        .success()
        .stdout(predicate::str::contains("--registry"))
        .stdout(predicate::str::contains("--parameters"))
        .stdout(predicate::str::contains("--target"))
        .stdout(predicate::str::contains("--name"));
}

#[test]
fn test_deploy_help_lists_template_and_method_flags() {
    convoy()
        .args(["deploy", "--help"])
        .assert()
        .success()
        .stdout(predicate::str::contains("--template"))
        .stdout(predicate::str::contains("--method"));
}

#[test]
fn test_unknown_command_fails() {
    convoy()
        .arg("teleport")
        .assert()
        .failure()
        .stderr(predicate::str::contains("teleport"));
}

#[test]
fn test_init_requires_a_source_argument() {
    convoy().arg("init").assert().code(2);
}
