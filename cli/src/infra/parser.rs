//! Infrastructure implementation of the `TemplateParser` port.
//!
//! Parses a YAML template into resolved variables plus a derived
//! service-dependency map. `${...}` expressions resolve against the
//! template's own `vars`, the process environment, and the outputs
//! accumulated in a [`RunContext`]. Each invocation derives a fresh tree —
//! nothing is patched in place between services.

#![allow(clippy::expect_used)] // regex patterns are compile-time constants

use std::path::Path;
use std::sync::LazyLock;

use anyhow::{Context, Result};
use regex::Regex;

use crate::application::ports::TemplateParser;
use crate::domain::graph::ServiceNode;
use crate::domain::template::{ParsedTemplate, RunContext};

static EXPR_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\$\{\s*([A-Za-z0-9_.\-]+)\s*\}").expect("valid pattern"));

static SERVICE_REF_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\$\{\s*services\.([A-Za-z0-9_\-]+)\.").expect("valid pattern")
});

/// Production template parser reading YAML from disk.
pub struct YamlTemplateParser;

impl TemplateParser for YamlTemplateParser {
    async fn parse(&self, path: &Path, prior: Option<&RunContext>) -> Result<ParsedTemplate> {
        let raw = std::fs::read_to_string(path)
            .with_context(|| format!("cannot read {}", path.display()))?;
        parse_str(&raw, prior)
    }
}

/// Parse raw template text, resolving expressions against `prior` outputs.
///
/// # Errors
///
/// Returns an error when the text is not valid YAML.
pub fn parse_str(raw: &str, prior: Option<&RunContext>) -> Result<ParsedTemplate> {
    let doc: serde_yaml::Value =
        serde_yaml::from_str(raw).context("template is not valid YAML")?;
    let dependencies = scan_dependencies(&doc);
    let variables = substitute(&doc, &doc, prior);
    Ok(ParsedTemplate {
        variables,
        dependencies,
    })
}

/// Derive the dependency map: service `a` depends on `b` when `a`'s subtree
/// references `${services.b. ...}` and `b` is a declared service.
fn scan_dependencies(doc: &serde_yaml::Value) -> Vec<ServiceNode> {
    let Some(services) = doc
        .get("services")
        .and_then(serde_yaml::Value::as_mapping)
    else {
        return Vec::new();
    };

    let declared: Vec<String> = services
        .iter()
        .filter_map(|(k, _)| k.as_str().map(str::to_string))
        .collect();

    let mut nodes = Vec::new();
    for (key, subtree) in services {
        let Some(name) = key.as_str() else { continue };
        let rendered = serde_yaml::to_string(subtree).unwrap_or_default();
        let depends_on: std::collections::BTreeSet<String> = SERVICE_REF_RE
            .captures_iter(&rendered)
            .map(|c| c[1].to_string())
            .filter(|dep| dep != name && declared.contains(dep))
            .collect();
        nodes.push(ServiceNode {
            name: name.to_string(),
            depends_on,
        });
    }
    nodes
}

fn substitute(
    value: &serde_yaml::Value,
    root: &serde_yaml::Value,
    prior: Option<&RunContext>,
) -> serde_yaml::Value {
    match value {
        serde_yaml::Value::Mapping(map) => serde_yaml::Value::Mapping(
            map.iter()
                .map(|(k, v)| (k.clone(), substitute(v, root, prior)))
                .collect(),
        ),
        serde_yaml::Value::Sequence(seq) => serde_yaml::Value::Sequence(
            seq.iter().map(|v| substitute(v, root, prior)).collect(),
        ),
        serde_yaml::Value::String(s) => resolve_string(s, root, prior),
        other => other.clone(),
    }
}

/// Resolve the expressions of one string value.
///
/// A string that is exactly one expression takes the resolved value's type;
/// embedded expressions substitute their string rendering. Expressions with
/// an unknown root are left untouched.
fn resolve_string(
    s: &str,
    root: &serde_yaml::Value,
    prior: Option<&RunContext>,
) -> serde_yaml::Value {
    if let Some(caps) = EXPR_RE.captures(s)
        && caps.get(0).map(|m| m.as_str()) == Some(s)
        && let Some(resolved) = resolve_expr(&caps[1], root, prior)
    {
        return resolved;
    }
    let replaced = EXPR_RE.replace_all(s, |caps: &regex::Captures<'_>| {
        match resolve_expr(&caps[1], root, prior) {
            Some(value) => scalar_to_string(&value),
            None => caps[0].to_string(),
        }
    });
    serde_yaml::Value::String(replaced.into_owned())
}

/// Resolve one dotted expression path. `None` means "not ours — leave the
/// placeholder alone"; a known root that resolves to nothing yields null.
fn resolve_expr(
    path: &str,
    root: &serde_yaml::Value,
    prior: Option<&RunContext>,
) -> Option<serde_yaml::Value> {
    let segments: Vec<&str> = path.split('.').collect();
    match segments.as_slice() {
        ["env", name] => Some(
            std::env::var(name)
                .map(serde_yaml::Value::String)
                .unwrap_or(serde_yaml::Value::Null),
        ),
        ["services", service, "output", rest @ ..] => Some(
            prior
                .and_then(|ctx| ctx.output_value(service, rest))
                .map_or(serde_yaml::Value::Null, json_to_yaml),
        ),
        ["vars", rest @ ..] => {
            let mut current = root.get("vars")?;
            for segment in rest {
                current = current.get(segment)?;
            }
            Some(current.clone())
        }
        _ => None,
    }
}

fn json_to_yaml(value: &serde_json::Value) -> serde_yaml::Value {
    match value {
        serde_json::Value::Null => serde_yaml::Value::Null,
        serde_json::Value::Bool(b) => serde_yaml::Value::Bool(*b),
        serde_json::Value::Number(n) => {
            if let Some(i) = n.as_i64() {
                serde_yaml::Value::Number(i.into())
            } else if let Some(u) = n.as_u64() {
                serde_yaml::Value::Number(u.into())
            } else {
                serde_yaml::Value::Number(n.as_f64().unwrap_or_default().into())
            }
        }
        serde_json::Value::String(s) => serde_yaml::Value::String(s.clone()),
        serde_json::Value::Array(items) => {
            serde_yaml::Value::Sequence(items.iter().map(json_to_yaml).collect())
        }
        serde_json::Value::Object(map) => serde_yaml::Value::Mapping(
            map.iter()
                .map(|(k, v)| (serde_yaml::Value::String(k.clone()), json_to_yaml(v)))
                .collect(),
        ),
    }
}

fn scalar_to_string(value: &serde_yaml::Value) -> String {
    match value {
        serde_yaml::Value::Null => String::new(),
        serde_yaml::Value::Bool(b) => b.to_string(),
        serde_yaml::Value::Number(n) => n.to_string(),
        serde_yaml::Value::String(s) => s.clone(),
        other => serde_yaml::to_string(other)
            .unwrap_or_default()
            .trim_end()
            .to_string(),
    }
}

// ── Unit tests ────────────────────────────────────────────────────────────────
