//! Application service — project parameter resolution and config rewrite.
//!
//! Reconciles an artifact's declarative parameter schema against either
//! interactive prompts or a literal `--parameters` payload, then rewrites
//! the project's `convoy.yaml` placeholders in place.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

use crate::application::ports::{CredentialStore, Prompter, RunMode};
use crate::domain::params::{
    ParameterSchema, render_placeholders, resolve_with_payload, value_to_string,
};

/// Candidate filenames of the project's service definition.
const PROJECT_CONFIG_NAMES: &[&str] = &["convoy.yaml", "convoy.yml"];

/// Resolve the artifact's parameters and rewrite the project config.
///
/// With a `--parameters` payload the resolution is non-interactive (payload
/// value → schema default → error for required keys); otherwise schema
/// entries are prompted in `x-range`-then-declaration order and a
/// credential-selection question is appended.
///
/// # Errors
///
/// Returns an error when a required parameter is missing from the payload,
/// a prompt fails, or the config rewrite fails.
pub fn resolve_and_write(
    manifest: &serde_yaml::Value,
    application_path: &Path,
    mode: &RunMode,
    prompter: &impl Prompter,
    credentials: &impl CredentialStore,
    access_override: Option<&str>,
) -> Result<()> {
    let schema = ParameterSchema::from_manifest(manifest);
    let mut values: BTreeMap<String, String> = BTreeMap::new();

    if let Some(payload) = &mode.parameters {
        if let Some(schema) = &schema {
            for (key, value) in resolve_with_payload(schema, payload)? {
                values.insert(key, value_to_string(&value));
            }
        }
        if let Some(access) = access_override {
            values.insert("access".to_string(), access.to_string());
        }
    } else {
        if let Some(schema) = &schema {
            prompt_parameters(schema, prompter, &mut values)?;
        }
        if let Some(access) = select_credential(credentials, prompter, access_override)? {
            values.insert("access".to_string(), access);
        }
    }

    if values.is_empty() {
        return Ok(());
    }
    write_project_config(application_path, &values)
}

/// Prompt for schema entries in `x-range`-then-declaration order.
///
/// Only enum-bearing and plain string-typed entries are prompted; other
/// declared types are silently skipped.
fn prompt_parameters(
    schema: &ParameterSchema,
    prompter: &impl Prompter,
    values: &mut BTreeMap<String, String>,
) -> Result<()> {
    for (name, spec) in schema.prompt_order() {
        let message = spec
            .title
            .as_deref()
            .or(spec.description.as_deref())
            .unwrap_or(name);
        if !spec.choices.is_empty() {
            let items: Vec<String> = spec.choices.iter().map(value_to_string).collect();
            let default_idx = spec
                .default
                .as_ref()
                .and_then(|d| spec.choices.iter().position(|c| c == d))
                .unwrap_or(0);
            let idx = prompter.select(message, &items, default_idx)?;
            values.insert(name.clone(), items[idx].clone());
        } else if spec.kind.as_deref() == Some("string") {
            let default = spec.default.as_ref().map(value_to_string);
            let answer = prompter.input(message, default.as_deref(), schema.is_required(name))?;
            values.insert(name.clone(), answer);
        }
    }
    Ok(())
}

/// Append the credential question: pick an existing alias, or offer to
/// create one when none exist.
fn select_credential(
    credentials: &impl CredentialStore,
    prompter: &impl Prompter,
    access_override: Option<&str>,
) -> Result<Option<String>> {
    if let Some(access) = access_override {
        return Ok(Some(access.to_string()));
    }
    let aliases = credentials.alias_list().unwrap_or_default();
    if aliases.is_empty() {
        let create = prompter.confirm("create credential?", true)?;
        return Ok(create.then(|| "default".to_string()));
    }
    let idx = prompter.select("please select credential alias", &aliases, 0)?;
    Ok(Some(aliases[idx].clone()))
}

/// Locate the project's service definition file.
#[must_use]
pub fn find_project_config(application_path: &Path) -> Option<PathBuf> {
    PROJECT_CONFIG_NAMES
        .iter()
        .map(|name| application_path.join(name))
        .find(|p| p.exists())
}

/// Substitute the resolved values into the project config, in place.
fn write_project_config(application_path: &Path, values: &BTreeMap<String, String>) -> Result<()> {
    let Some(config_path) = find_project_config(application_path) else {
        // Nothing to rewrite — some artifacts ship no service definition.
        return Ok(());
    };
    let text = std::fs::read_to_string(&config_path)
        .with_context(|| format!("reading {}", config_path.display()))?;
    let rendered = render_placeholders(&text, values);
    std::fs::write(&config_path, rendered)
        .with_context(|| format!("writing {}", config_path.display()))
}

// ── Unit tests ────────────────────────────────────────────────────────────────
