//! Application service — artifact acquisition and project materialization.
//!
//! Drives one acquisition end to end: overwrite confirmation, download into
//! a timestamp-suffixed temporary directory, lifecycle hooks, manifest
//! detection, parameter resolution, env bootstrap, and the optional
//! dependency install.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

use crate::application::ports::{
    CredentialStore, Downloader, FetchOptions, HookRunner, Prompter, Reporter, RunMode,
};
use crate::application::services::params;
use crate::application::services::resolve::Resolution;
use crate::domain::params::{render_placeholders, template_keys};
use crate::domain::source::ArtifactLocator;

/// Materialize a resolved artifact into its application path.
///
/// # Errors
///
/// Returns an error when nothing was downloaded, project files cannot be
/// moved into place, or parameter resolution fails. Hook and dependency
/// install failures are reported, never raised.
#[allow(clippy::too_many_arguments)]
pub fn acquire(
    resolution: Resolution,
    mode: &RunMode,
    downloader: &impl Downloader,
    hooks: &impl HookRunner,
    prompter: &impl Prompter,
    credentials: &impl CredentialStore,
    reporter: &impl Reporter,
    access_override: Option<&str>,
) -> Result<PathBuf> {
    match resolution {
        Resolution::Direct {
            url,
            application_path,
        } => {
            downloader.fetch(
                &url,
                &application_path,
                &FetchOptions {
                    extract: true,
                    ..FetchOptions::default()
                },
            )?;
            Ok(application_path)
        }
        Resolution::Release(locator) => materialize(
            &locator,
            mode,
            downloader,
            hooks,
            prompter,
            credentials,
            reporter,
            access_override,
        ),
    }
}

#[allow(clippy::too_many_arguments)]
fn materialize(
    locator: &ArtifactLocator,
    mode: &RunMode,
    downloader: &impl Downloader,
    hooks: &impl HookRunner,
    prompter: &impl Prompter,
    credentials: &impl CredentialStore,
    reporter: &impl Reporter,
    access_override: Option<&str>,
) -> Result<PathBuf> {
    let application_path = locator.application_path.clone();
    if !confirm_overwrite(&application_path, &locator.display_name, mode, prompter)? {
        return Ok(application_path);
    }

    // Timestamp suffix keeps concurrent acquisitions from colliding.
    let temporary_path = PathBuf::from(format!(
        "{}{}",
        application_path.display(),
        chrono::Utc::now().timestamp_millis()
    ));

    downloader.fetch(
        &locator.download_url,
        &temporary_path,
        &FetchOptions {
            extract: true,
            strip: 1,
            postfix: Some("zip".to_string()),
        },
    )?;
    anyhow::ensure!(
        directory_has_entries(&temporary_path),
        "nothing was downloaded for '{}' from {}",
        locator.display_name,
        locator.download_url
    );

    hooks.pre_init(&temporary_path, &application_path);

    if let Some(manifest) = read_publish_manifest(&temporary_path) {
        copy_dir_recursive(&temporary_path.join("src"), &application_path)
            .context("copying project files into place")?;
        std::fs::remove_dir_all(&temporary_path)
            .with_context(|| format!("removing {}", temporary_path.display()))?;
        params::resolve_and_write(
            &manifest,
            &application_path,
            mode,
            prompter,
            credentials,
            access_override,
        )?;
        init_env_file(&application_path, mode, prompter)?;
    } else {
        if application_path.exists() {
            std::fs::remove_dir_all(&application_path)
                .with_context(|| format!("clearing {}", application_path.display()))?;
        }
        std::fs::rename(&temporary_path, &application_path).with_context(|| {
            format!(
                "moving {} to {}",
                temporary_path.display(),
                application_path.display()
            )
        })?;
    }

    offer_dependency_install(&application_path, mode, prompter, reporter);
    hooks.post_init(&temporary_path, &application_path);
    Ok(application_path)
}

/// Ask before overwriting an existing application path.
///
/// Non-interactive runs (and runs carrying a `--parameters` payload) always
/// proceed.
fn confirm_overwrite(
    application_path: &Path,
    display_name: &str,
    mode: &RunMode,
    prompter: &impl Prompter,
) -> Result<bool> {
    if mode.assume_yes() || !application_path.exists() {
        return Ok(true);
    }
    prompter.confirm(
        &format!("File {display_name} already exists, override this file ?"),
        true,
    )
}

fn directory_has_entries(path: &Path) -> bool {
    std::fs::read_dir(path).is_ok_and(|mut entries| entries.next().is_some())
}

/// Read the artifact's `publish.yaml`, `None` when absent or unparseable.
fn read_publish_manifest(temporary_path: &Path) -> Option<serde_yaml::Value> {
    let content = std::fs::read_to_string(temporary_path.join("publish.yaml")).ok()?;
    serde_yaml::from_str(&content).ok()
}

fn copy_dir_recursive(from: &Path, to: &Path) -> Result<()> {
    std::fs::create_dir_all(to).with_context(|| format!("creating {}", to.display()))?;
    for entry in
        std::fs::read_dir(from).with_context(|| format!("reading {}", from.display()))?
    {
        let entry = entry.context("reading dir entry")?;
        let dest = to.join(entry.file_name());
        if entry.path().is_dir() {
            copy_dir_recursive(&entry.path(), &dest)?;
        } else {
            std::fs::copy(entry.path(), &dest)
                .with_context(|| format!("copying {}", entry.path().display()))?;
        }
    }
    Ok(())
}

/// Generate `.env` from a shipped `.env.example` by prompting for its
/// placeholders. Non-interactive runs leave the example in place.
fn init_env_file(application_path: &Path, mode: &RunMode, prompter: &impl Prompter) -> Result<()> {
    let example_path = application_path.join(".env.example");
    let Ok(content) = std::fs::read_to_string(&example_path) else {
        return Ok(());
    };
    let keys = template_keys(&content);
    if keys.is_empty() || mode.assume_yes() {
        return Ok(());
    }

    let mut values = std::collections::BTreeMap::new();
    for key in keys {
        let label = key.description.as_deref().unwrap_or(&key.name);
        let answer = prompter.input(&format!("please input {label}:"), None, false)?;
        values.insert(key.name, answer);
    }

    std::fs::write(
        application_path.join(".env"),
        render_placeholders(&content, &values),
    )
    .context("writing .env")?;
    std::fs::remove_file(&example_path).context("removing .env.example")?;
    Ok(())
}

/// Offer to install project dependencies when a `package.json` is shipped.
///
/// Optional enrichment: every failure is reported and swallowed.
fn offer_dependency_install(
    application_path: &Path,
    mode: &RunMode,
    prompter: &impl Prompter,
    reporter: &impl Reporter,
) {
    let Ok(content) = std::fs::read_to_string(application_path.join("package.json")) else {
        return;
    };
    let Ok(package) = serde_json::from_str::<serde_json::Value>(&content) else {
        return;
    };
    if package.get("autoInstall").and_then(serde_json::Value::as_bool) == Some(false) {
        return;
    }
    // A --parameters run skips the install entirely.
    if mode.parameters.is_some() {
        return;
    }
    let wanted = mode.non_interactive
        || prompter
            .confirm("Do you want to install dependencies?", true)
            .unwrap_or(false);
    if !wanted {
        return;
    }

    reporter.step("Installing dependencies");
    match std::process::Command::new("npm")
        .arg("install")
        .current_dir(application_path)
        .output()
    {
        Ok(output) if output.status.success() => reporter.success("Dependencies installed"),
        Ok(output) => reporter.warn(&format!(
            "dependency install failed: {}",
            String::from_utf8_lossy(&output.stderr).trim()
        )),
        Err(e) => reporter.warn(&format!("dependency install failed: {e}")),
    }
}

// ── Unit tests ────────────────────────────────────────────────────────────────
