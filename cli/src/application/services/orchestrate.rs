//! Application service — multi-service execution orchestration.
//!
//! Computes a dependency-respecting execution order, then runs each
//! service's method in turn, re-deriving the template variables from the
//! accumulated run context between steps so later services see the outputs
//! of earlier ones.

use std::path::Path;

use anyhow::{Context, Result};

use crate::application::ports::{Reporter, ServiceInvocation, ServiceRunner, TemplateParser};
use crate::domain::error::ExecError;
use crate::domain::graph::execution_order;
use crate::domain::template::{ParsedTemplate, RunContext};

/// Inputs of one orchestrated run.
pub struct ExecutionRequest<'a> {
    /// Path of the template file.
    pub template_path: &'a Path,
    /// Method to invoke on every service, e.g. `deploy`.
    pub method: &'a str,
    /// Optional pinned service: execute only this one.
    pub service: Option<&'a str>,
    /// Positional arguments forwarded to each invocation.
    pub args: &'a [String],
    /// Directory the template lives in.
    pub project_dir: &'a Path,
}

/// Per-service outputs of a completed run, in execution order.
pub type ExecutionResults = Vec<(String, serde_json::Map<String, serde_json::Value>)>;

/// Execute the template's services in dependency order.
///
/// A single-service template (or an explicitly pinned service) executes
/// directly against the already-resolved variables. A multi-service run
/// re-parses the template with the accumulated [`RunContext`] before every
/// step. A failure aborts the remaining order; outputs already recorded for
/// completed services are kept.
///
/// # Errors
///
/// Returns [`crate::domain::error::GraphError::CyclicDependency`] when the
/// graph has no valid order and [`ExecError::ServiceFailed`] when a
/// service's method fails.
pub async fn execute(
    req: &ExecutionRequest<'_>,
    parser: &impl TemplateParser,
    runner: &impl ServiceRunner,
    reporter: &impl Reporter,
) -> Result<ExecutionResults> {
    let parsed = parser
        .parse(req.template_path, None)
        .await
        .with_context(|| format!("parsing {}", req.template_path.display()))?;

    warn_undefined_environment(&parsed, reporter);

    let order = execution_order(&parsed.dependencies)?;
    anyhow::ensure!(
        !order.is_empty(),
        "template {} declares no services",
        req.template_path.display()
    );

    if order.len() == 1 || req.service.is_some() {
        let name = req.service.unwrap_or(&order[0]);
        let output = run_service(name, &parsed, req, runner).await?;
        report_output(name, &output, req.method, reporter);
        return Ok(vec![(name.to_string(), output)]);
    }

    reporter.step(&format!(
        "Executing {} services in order: {}",
        order.len(),
        order.join(", ")
    ));

    let mut ctx = RunContext::default();
    let mut results = ExecutionResults::new();
    for name in &order {
        reporter.step(&format!("Executing service {name}"));
        // Re-derive the template so this service's variables reflect every
        // output recorded so far.
        let parsed = parser
            .parse(req.template_path, Some(&ctx))
            .await
            .with_context(|| format!("re-parsing {}", req.template_path.display()))?;
        let output = run_service(name, &parsed, req, runner).await?;
        ctx.record(name, output.clone());
        report_output(name, &output, req.method, reporter);
        results.push((name.clone(), output));
    }
    Ok(results)
}

async fn run_service(
    name: &str,
    parsed: &ParsedTemplate,
    req: &ExecutionRequest<'_>,
    runner: &impl ServiceRunner,
) -> Result<serde_json::Map<String, serde_json::Value>> {
    let config = parsed
        .service_config(name)
        .ok_or_else(|| anyhow::anyhow!("service '{name}' is not declared in the template"))?;
    runner
        .run(&ServiceInvocation {
            service: name,
            config,
            method: req.method,
            args: req.args,
            project_dir: req.project_dir,
        })
        .await
        .map_err(|e| {
            ExecError::ServiceFailed {
                service: name.to_string(),
                reason: e.to_string(),
            }
            .into()
        })
}

/// A service that produced no output keys gets a completion marker instead
/// of an empty result object.
fn report_output(
    name: &str,
    output: &serde_json::Map<String, serde_json::Value>,
    method: &str,
    reporter: &impl Reporter,
) {
    if output.is_empty() {
        reporter.success(&format!("{name}: end of method {method}"));
    } else {
        reporter.success(&format!("Service {name} completed"));
    }
}

/// Warn (non-fatally) about declared environment variables that resolved to
/// nothing.
fn warn_undefined_environment(parsed: &ParsedTemplate, reporter: &impl Reporter) {
    let keys = parsed.undefined_environment_keys();
    if !keys.is_empty() {
        reporter.warn(&format!(
            "The value of environment variable [{}] is undefined.",
            keys.join(", ")
        ));
    }
}

// ── Unit tests ────────────────────────────────────────────────────────────────
