//! Typed domain error enums.
//!
//! This module has zero imports from `crate::infra`, `crate::commands`,
//! `crate::application`, `tokio`, `std::fs`, `std::process`, or `std::net`.
//! All error types implement `thiserror::Error` and convert to `anyhow::Error`
//! via the `?` operator.

use thiserror::Error;

// ── Source resolution errors ──────────────────────────────────────────────────

/// Errors related to resolving a source spec against the registry chain.
#[derive(Debug, Error)]
pub enum SourceError {
    #[error("No application found for '{spec}', please make sure the name or source is correct.")]
    NotFound { spec: String },
}

// ── Service graph errors ──────────────────────────────────────────────────────

/// Errors related to the inter-service dependency graph.
#[derive(Debug, Error)]
pub enum GraphError {
    #[error("Cyclic dependency detected among services: {}", services.join(", "))]
    CyclicDependency { services: Vec<String> },
}

// ── Parameter resolution errors ───────────────────────────────────────────────

/// Errors related to project parameter resolution.
#[derive(Debug, Error)]
pub enum ParamError {
    #[error("Parameter '{key}' is required.")]
    MissingRequired { key: String },

    #[error("--parameters is not a valid JSON object: {reason}")]
    MalformedPayload { reason: String },
}

// ── Execution errors ──────────────────────────────────────────────────────────

/// Errors related to service execution.
#[derive(Debug, Error)]
pub enum ExecError {
    #[error("Service '{service}' failed: {reason}")]
    ServiceFailed { service: String, reason: String },
}

// ── Settings errors ───────────────────────────────────────────────────────────

/// Errors related to configuration key/value validation.
#[derive(Debug, Error)]
pub enum SettingsError {
    #[error("Unknown setting: {key}\n\nValid settings: {valid}")]
    UnknownKey { key: String, valid: String },
}
