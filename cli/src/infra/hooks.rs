//! Infrastructure implementation of the `HookRunner` port.
//!
//! An acquired artifact may ship a `hook.yaml` at its root declaring
//! `pre_init` / `post_init` command lists. Absence of the file is a normal
//! outcome, and every failure — unreadable manifest, spawn error, non-zero
//! exit — is swallowed: hooks are best-effort by contract.

use std::path::Path;

use serde::Deserialize;

use crate::application::ports::HookRunner;

/// Declared lifecycle hooks of one artifact.
#[derive(Debug, Default, Deserialize)]
pub struct HookManifest {
    #[serde(default)]
    pub pre_init: Vec<String>,
    #[serde(default)]
    pub post_init: Vec<String>,
}

/// Load an artifact's hook manifest, `None` when absent or unparseable.
#[must_use]
pub fn load_manifest(temporary_path: &Path) -> Option<HookManifest> {
    let content = std::fs::read_to_string(temporary_path.join("hook.yaml")).ok()?;
    serde_yaml::from_str(&content).ok()
}

/// Production hook runner executing declared commands through the shell.
///
/// Commands receive the capability bag as environment: `CONVOY_TEMP_PATH`
/// and `CONVOY_TARGET_PATH`, with the temp directory as working directory.
pub struct ShellHookRunner;

impl HookRunner for ShellHookRunner {
    fn pre_init(&self, temporary_path: &Path, application_path: &Path) {
        if let Some(manifest) = load_manifest(temporary_path) {
            run_commands(&manifest.pre_init, temporary_path, application_path);
        }
    }

    fn post_init(&self, temporary_path: &Path, application_path: &Path) {
        if let Some(manifest) = load_manifest(temporary_path) {
            run_commands(&manifest.post_init, temporary_path, application_path);
        }
    }
}

fn run_commands(commands: &[String], temporary_path: &Path, application_path: &Path) {
    let cwd = if temporary_path.is_dir() {
        temporary_path
    } else {
        application_path
    };
    for command in commands {
        let _ = std::process::Command::new("sh")
            .arg("-c")
            .arg(command)
            .current_dir(cwd)
            .env("CONVOY_TEMP_PATH", temporary_path)
            .env("CONVOY_TARGET_PATH", application_path)
            .status();
    }
}

// ── Unit tests ────────────────────────────────────────────────────────────────
