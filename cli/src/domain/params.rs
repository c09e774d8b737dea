//! Declarative parameter schemas and placeholder substitution.
//!
//! Pure functions only — prompting and file rewriting live in the
//! application and infra layers.

use std::collections::BTreeMap;
use std::sync::LazyLock;

use regex::Regex;
use serde::Deserialize;

use crate::domain::error::ParamError;

#[allow(clippy::expect_used)] // pattern is a compile-time constant
static PLACEHOLDER_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\{\{\s*([A-Za-z0-9_.\-]+)\s*(?:\|([^}]*))?\}\}").expect("valid pattern")
});

// ── Placeholders ──────────────────────────────────────────────────────────────

/// A `{{ name }}` or `{{ name | description }}` placeholder found in a file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TemplateKey {
    pub name: String,
    pub description: Option<String>,
}

/// Extract the placeholders of `text`, first occurrence wins, order preserved.
#[must_use]
pub fn template_keys(text: &str) -> Vec<TemplateKey> {
    let mut seen = Vec::new();
    let mut keys = Vec::new();
    for caps in PLACEHOLDER_RE.captures_iter(text) {
        let name = caps[1].to_string();
        if seen.contains(&name) {
            continue;
        }
        seen.push(name.clone());
        keys.push(TemplateKey {
            name,
            description: caps
                .get(2)
                .map(|m| m.as_str().trim().to_string())
                .filter(|d| !d.is_empty()),
        });
    }
    keys
}

/// Substitute every placeholder whose name appears in `values`.
///
/// Unknown placeholders are left untouched, so the transform is deterministic
/// and re-runnable.
#[must_use]
pub fn render_placeholders(text: &str, values: &BTreeMap<String, String>) -> String {
    PLACEHOLDER_RE
        .replace_all(text, |caps: &regex::Captures<'_>| {
            values
                .get(&caps[1])
                .cloned()
                .unwrap_or_else(|| caps[0].to_string())
        })
        .into_owned()
}

// ── Parameter schema ──────────────────────────────────────────────────────────

/// One entry of a project's declarative parameter schema.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct PropertySpec {
    /// Declared type; only `string` (and enum-bearing) entries are prompted.
    #[serde(rename = "type", default)]
    pub kind: Option<String>,
    /// Fixed choice list; presence selects a select-style prompt.
    #[serde(rename = "enum", default)]
    pub choices: Vec<serde_json::Value>,
    #[serde(default)]
    pub default: Option<serde_json::Value>,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    /// Ordering hint: tagged entries are prompted first, ascending.
    #[serde(rename = "x-range", default)]
    pub x_range: Option<i64>,
}

/// A project's parameter schema, declaration order preserved.
#[derive(Debug, Clone, Default)]
pub struct ParameterSchema {
    pub properties: Vec<(String, PropertySpec)>,
    pub required: Vec<String>,
}

impl ParameterSchema {
    /// Read the `Parameters:` block of a publish manifest.
    ///
    /// Returns `None` when the manifest declares no parameters. Individual
    /// entries that fail to deserialize are skipped.
    #[must_use]
    pub fn from_manifest(manifest: &serde_yaml::Value) -> Option<Self> {
        let params = manifest.get("Parameters")?;
        let properties = params.get("properties")?.as_mapping()?;

        let mut entries = Vec::new();
        for (key, value) in properties {
            let Some(name) = key.as_str() else { continue };
            if let Ok(spec) = serde_yaml::from_value::<PropertySpec>(value.clone()) {
                entries.push((name.to_string(), spec));
            }
        }

        let required = params
            .get("required")
            .and_then(serde_yaml::Value::as_sequence)
            .map(|seq| {
                seq.iter()
                    .filter_map(|v| v.as_str().map(str::to_string))
                    .collect()
            })
            .unwrap_or_default();

        Some(Self {
            properties: entries,
            required,
        })
    }

    /// `true` when `key` is in the schema's required list.
    #[must_use]
    pub fn is_required(&self, key: &str) -> bool {
        self.required.iter().any(|r| r == key)
    }

    /// Entries in prompt order: `x-range`-tagged entries ascending by the
    /// hint, then untagged entries in declaration order.
    #[must_use]
    pub fn prompt_order(&self) -> Vec<&(String, PropertySpec)> {
        let mut tagged: Vec<&(String, PropertySpec)> = self
            .properties
            .iter()
            .filter(|(_, spec)| spec.x_range.is_some())
            .collect();
        tagged.sort_by_key(|(_, spec)| spec.x_range);
        tagged.extend(
            self.properties
                .iter()
                .filter(|(_, spec)| spec.x_range.is_none()),
        );
        tagged
    }
}

/// Resolve a schema against a literal `--parameters` payload.
///
/// For each schema key: payload value, else schema default, else an error
/// for required keys; non-required keys with neither are omitted.
///
/// # Errors
///
/// Returns [`ParamError::MissingRequired`] naming the first required key
/// that has neither a payload value nor a default.
pub fn resolve_with_payload(
    schema: &ParameterSchema,
    payload: &serde_json::Map<String, serde_json::Value>,
) -> Result<Vec<(String, serde_json::Value)>, ParamError> {
    let mut resolved = Vec::new();
    for (key, spec) in &schema.properties {
        if let Some(value) = payload.get(key) {
            resolved.push((key.clone(), value.clone()));
        } else if let Some(default) = &spec.default {
            resolved.push((key.clone(), default.clone()));
        } else if schema.is_required(key) {
            return Err(ParamError::MissingRequired { key: key.clone() });
        }
    }
    Ok(resolved)
}

/// Render a parameter value for placeholder substitution.
///
/// Strings substitute verbatim; everything else uses its JSON rendering.
#[must_use]
pub fn value_to_string(value: &serde_json::Value) -> String {
    match value {
        serde_json::Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

// ── Unit tests ────────────────────────────────────────────────────────────────
