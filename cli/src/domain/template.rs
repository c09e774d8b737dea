//! Domain types for parsed templates and multi-service run state.
//!
//! Pure types only — the YAML parsing itself is an infra concern behind the
//! `TemplateParser` port.

use std::collections::BTreeMap;

use crate::domain::graph::ServiceNode;

// ── Parsed template ───────────────────────────────────────────────────────────

/// A template with fully resolved variables and derived dependency info.
///
/// Owned by the orchestrator for one run and re-derived (never mutated)
/// whenever new service outputs become available.
#[derive(Debug, Clone)]
pub struct ParsedTemplate {
    /// The resolved variable tree; services live under the `services` key.
    pub variables: serde_yaml::Value,
    /// One node per declared service, in declaration order.
    pub dependencies: Vec<ServiceNode>,
}

impl ParsedTemplate {
    /// The effective configuration subtree of one service.
    #[must_use]
    pub fn service_config(&self, name: &str) -> Option<&serde_yaml::Value> {
        self.variables.get("services")?.get(name)
    }

    /// Declared environment variable names whose resolved value is null,
    /// across all services, first occurrence wins.
    ///
    /// A detectable misconfiguration that warrants a warning but must not
    /// block the run.
    #[must_use]
    pub fn undefined_environment_keys(&self) -> Vec<String> {
        let mut keys = Vec::new();
        let Some(services) = self
            .variables
            .get("services")
            .and_then(serde_yaml::Value::as_mapping)
        else {
            return keys;
        };
        for (_, config) in services {
            let Some(env) = config
                .get("environment")
                .and_then(serde_yaml::Value::as_mapping)
            else {
                continue;
            };
            for (key, value) in env {
                if value.is_null()
                    && let Some(name) = key.as_str()
                    && !keys.iter().any(|k| k == name)
                {
                    keys.push(name.to_string());
                }
            }
        }
        keys
    }
}

// ── Run context ───────────────────────────────────────────────────────────────

/// The recorded output of one completed service.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ServiceRecord {
    pub output: serde_json::Map<String, serde_json::Value>,
}

/// Accumulated outputs of already-executed services within one run.
///
/// Read by the template parser to resolve cross-service references; written
/// only by the orchestrator after each service completes.
#[derive(Debug, Clone, Default)]
pub struct RunContext {
    pub services: BTreeMap<String, ServiceRecord>,
}

impl RunContext {
    /// Record a completed service's output.
    pub fn record(&mut self, name: &str, output: serde_json::Map<String, serde_json::Value>) {
        self.services
            .insert(name.to_string(), ServiceRecord { output });
    }

    /// Look up a dotted path inside a recorded service's output.
    #[must_use]
    pub fn output_value(&self, service: &str, path: &[&str]) -> Option<&serde_json::Value> {
        let record = self.services.get(service)?;
        let (first, rest) = path.split_first()?;
        let mut current = record.output.get(*first)?;
        for segment in rest {
            current = current.get(segment)?;
        }
        Some(current)
    }
}

// ── Unit tests ────────────────────────────────────────────────────────────────
