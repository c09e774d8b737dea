//! Integration tests for `convoy config`.
//!
//! All filesystem-touching tests set `CONVOY_CONFIG` to a temp path so they
//! never read or write `~/.convoy/config.yaml`.

#![allow(clippy::expect_used, clippy::unwrap_used)]

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

fn convoy() -> Command {
    let mut cmd = Command::new(assert_cmd::cargo::cargo_bin!("convoy"));
    cmd.env("NO_COLOR", "1");
    cmd
}

/// Returns a `TempDir` and the path string for a config file inside it.
/// The file does NOT exist yet.
fn temp_config_path() -> (TempDir, String) {
    let dir = TempDir::new().expect("temp dir");
    let path = dir.path().join("config.yaml").to_string_lossy().into_owned();
    (dir, path)
}

// ---------------------------------------------------------------------------
// Subcommand registration
// ---------------------------------------------------------------------------

#[test]
fn test_config_help_shows_show_set_and_unset_subcommands() {
    convoy()
        .args(["config", "--help"])
        .assert()
        .success()
        .stdout(predicate::str::contains("show"))
        .stdout(predicate::str::contains("set"))
        .stdout(predicate::str::contains("unset"));
}

// ---------------------------------------------------------------------------
// `convoy config show`
// ---------------------------------------------------------------------------

#[test]
fn test_config_show_no_config_file_reports_unset_registry() {
    let (_dir, path) = temp_config_path();
    convoy()
        .args(["config", "show"])
        .env("CONVOY_CONFIG", &path)
        .assert()
        .success()
        .stdout(predicate::str::contains("registry"))
        .stdout(predicate::str::contains("(unset)"));
}

#[test]
fn test_config_show_does_not_create_file() {
    let (_dir, path) = temp_config_path();
    convoy()
        .args(["config", "show"])
        .env("CONVOY_CONFIG", &path)
        .assert()
        .success();
    assert!(
        !std::path::Path::new(&path).exists(),
        "show must not create the config file"
    );
}

#[test]
fn test_config_show_displays_backing_file_path() {
    let (_dir, path) = temp_config_path();
    convoy()
        .args(["config", "show"])
        .env("CONVOY_CONFIG", &path)
        .assert()
        .success()
        .stdout(predicate::str::contains(&path));
}

// ---------------------------------------------------------------------------
// `convoy config set`
// ---------------------------------------------------------------------------

#[test]
fn test_config_set_registry_persists_value_readable_by_show() {
    let (_dir, path) = temp_config_path();
    convoy()
        .args(["config", "set", "registry", "github"])
        .env("CONVOY_CONFIG", &path)
        .assert()
        .success();

    convoy()
        .args(["config", "show"])
        .env("CONVOY_CONFIG", &path)
        .assert()
        .success()
        .stdout(predicate::str::contains("github"));
}

#[test]
fn test_config_set_unknown_key_fails_listing_valid_keys() {
    let (_dir, path) = temp_config_path();
    convoy()
        .args(["config", "set", "mirror", "x"])
        .env("CONVOY_CONFIG", &path)
        .assert()
        .failure()
        .stderr(predicate::str::contains("Unknown setting"))
        .stderr(predicate::str::contains("registry"));
}

#[cfg(unix)]
#[test]
fn test_config_set_creates_file_with_owner_only_permissions() {
    use std::os::unix::fs::PermissionsExt;
    let (_dir, path) = temp_config_path();
    convoy()
        .args(["config", "set", "registry", "hub"])
        .env("CONVOY_CONFIG", &path)
        .assert()
        .success();
    let mode = std::fs::metadata(&path)
        .expect("file should exist")
        .permissions()
        .mode();
    assert_eq!(mode & 0o777, 0o600, "expected 0o600, got {mode:o}");
}

// ---------------------------------------------------------------------------
// `convoy config unset`
// ---------------------------------------------------------------------------

#[test]
fn test_config_unset_removes_value() {
    let (_dir, path) = temp_config_path();
    convoy()
        .args(["config", "set", "registry", "hub"])
        .env("CONVOY_CONFIG", &path)
        .assert()
        .success();
    convoy()
        .args(["config", "unset", "registry"])
        .env("CONVOY_CONFIG", &path)
        .assert()
        .success();
    convoy()
        .args(["config", "show"])
        .env("CONVOY_CONFIG", &path)
        .assert()
        .success()
        .stdout(predicate::str::contains("(unset)"));
}

#[test]
fn test_config_unset_unknown_key_fails() {
    let (_dir, path) = temp_config_path();
    convoy()
        .args(["config", "unset", "mirror"])
        .env("CONVOY_CONFIG", &path)
        .assert()
        .failure();
}

// ---------------------------------------------------------------------------
// Corrupt config file
// ---------------------------------------------------------------------------

#[test]
fn test_config_show_corrupt_yaml_fails() {
    let dir = TempDir::new().expect("tempdir");
    let path = dir.path().join("config.yaml");
    std::fs::write(&path, b"registry: [unclosed").expect("write");
    convoy()
        .args(["config", "show"])
        .env("CONVOY_CONFIG", path.to_str().expect("path"))
        .assert()
        .failure();
}
