//! Integration tests for `convoy deploy`.
//!
//! Each test materializes a template into a temp project directory and runs
//! the binary there. Service methods are plain shell commands, so the tests
//! observe real end-to-end behavior: ordering, output threading, failure
//! propagation.

#![allow(clippy::expect_used, clippy::unwrap_used)]

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

fn convoy_in(dir: &TempDir) -> Command {
    let mut cmd = Command::new(assert_cmd::cargo::cargo_bin!("convoy"));
    cmd.env("NO_COLOR", "1");
    cmd.current_dir(dir.path());
    cmd
}

fn project_with(template: &str) -> TempDir {
    let dir = TempDir::new().expect("temp dir");
    std::fs::write(dir.path().join("convoy.yaml"), template).expect("write template");
    dir
}

// ---------------------------------------------------------------------------
// Template discovery
// ---------------------------------------------------------------------------

#[test]
fn test_deploy_without_template_fails_with_guidance() {
    let dir = TempDir::new().unwrap();
    convoy_in(&dir)
        .arg("deploy")
        .assert()
        .failure()
        .stderr(predicate::str::contains("No convoy.yaml found"))
        .stderr(predicate::str::contains("convoy init"));
}

#[test]
fn test_deploy_explicit_missing_template_fails() {
    let dir = TempDir::new().unwrap();
    convoy_in(&dir)
        .args(["deploy", "--template", "other.yaml"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("template not found"));
}

// ---------------------------------------------------------------------------
// Single-service runs
// ---------------------------------------------------------------------------

#[test]
fn test_deploy_single_service_prints_its_output() {
    let dir = project_with(
        "services:\n  api:\n    methods:\n      deploy: \"echo '{\\\"url\\\": \\\"https://api.example.com\\\"}'\"\n",
    );
    convoy_in(&dir)
        .arg("deploy")
        .assert()
        .success()
        .stdout(predicate::str::contains("https://api.example.com"));
}

#[test]
fn test_deploy_service_without_output_prints_completion_marker() {
    let dir = project_with(
        "services:\n  api:\n    methods:\n      deploy: echo done\n",
    );
    convoy_in(&dir)
        .arg("deploy")
        .assert()
        .success()
        .stdout(predicate::str::contains("end of method deploy"));
}

#[test]
fn test_deploy_custom_method_is_invoked() {
    let dir = project_with(
        "services:\n  api:\n    methods:\n      remove: \"echo '{\\\"removed\\\": true}'\"\n",
    );
    convoy_in(&dir)
        .args(["deploy", "--method", "remove"])
        .assert()
        .success()
        .stdout(predicate::str::contains("removed"));
}

// ---------------------------------------------------------------------------
// Multi-service runs
// ---------------------------------------------------------------------------

const CHAIN: &str = "services:\n  db:\n    methods:\n      deploy: \"echo '{\\\"url\\\": \\\"https://db.internal\\\"}'\"\n  api:\n    methods:\n      deploy: \"echo '{\\\"upstream\\\": \\\"${services.db.output.url}\\\"}'\"\n";

#[test]
fn test_deploy_chain_threads_recorded_outputs_into_later_services() {
    let dir = project_with(CHAIN);
    // api's method line references db's output; it only resolves if db ran
    // first and its output was recorded before api's variables were derived.
    convoy_in(&dir)
        .arg("deploy")
        .assert()
        .success()
        .stdout(predicate::str::contains(r#""upstream": "https://db.internal""#));
}

#[test]
fn test_deploy_reports_execution_order_before_running() {
    let dir = project_with(CHAIN);
    convoy_in(&dir)
        .arg("deploy")
        .assert()
        .success()
        .stdout(predicate::str::contains("db, api"));
}

#[test]
fn test_deploy_pinned_service_runs_only_that_service() {
    let dir = project_with(CHAIN);
    convoy_in(&dir)
        .args(["deploy", "db"])
        .assert()
        .success()
        .stdout(predicate::str::contains("https://db.internal"))
        .stdout(predicate::str::contains("upstream").not());
}

#[test]
fn test_deploy_failing_service_aborts_the_remaining_order() {
    let dir = project_with(
        "services:\n  db:\n    methods:\n      deploy: \"exit 3\"\n  api:\n    methods:\n      deploy: \"echo '{\\\"upstream\\\": \\\"${services.db.output.url}\\\"}'\"\n",
    );
    convoy_in(&dir)
        .arg("deploy")
        .assert()
        .failure()
        .stderr(predicate::str::contains("Service 'db' failed"))
        .stdout(predicate::str::contains("upstream").not());
}

#[test]
fn test_deploy_cyclic_dependencies_fail_before_any_execution() {
    let dir = project_with(
        "services:\n  a:\n    peer: ${services.b.output.x}\n    methods:\n      deploy: \"echo a > ran-a.txt\"\n  b:\n    peer: ${services.a.output.x}\n    methods:\n      deploy: \"echo b > ran-b.txt\"\n",
    );
    convoy_in(&dir)
        .arg("deploy")
        .assert()
        .failure()
        .stderr(predicate::str::contains("Cyclic dependency"));
    assert!(!dir.path().join("ran-a.txt").exists());
    assert!(!dir.path().join("ran-b.txt").exists());
}

// ---------------------------------------------------------------------------
// Pre-flight environment warning
// ---------------------------------------------------------------------------

#[test]
fn test_deploy_warns_about_undefined_environment_variables() {
    let dir = project_with(
        "services:\n  api:\n    environment:\n      API_TOKEN: ${env.CONVOY_TEST_SURELY_UNSET}\n    methods:\n      deploy: echo done\n",
    );
    convoy_in(&dir)
        .arg("deploy")
        .assert()
        .success()
        .stdout(predicate::str::contains("API_TOKEN"))
        .stdout(predicate::str::contains("is undefined"));
}
