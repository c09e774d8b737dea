//! Deploy command — execute the template's services in dependency order.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::Args;

use crate::app::AppContext;
use crate::application::services::orchestrate::{self, ExecutionRequest, ExecutionResults};
use crate::infra::executor::ProcessServiceRunner;
use crate::infra::parser::YamlTemplateParser;
use crate::output::TerminalReporter;

/// Candidate template filenames searched in the current directory.
const TEMPLATE_NAMES: &[&str] = &["convoy.yaml", "convoy.yml"];

/// Arguments for the `convoy deploy` command.
#[derive(Args)]
pub struct DeployArgs {
    /// Execute only this service
    pub service: Option<String>,

    /// Template file (defaults to convoy.yaml in the current directory)
    #[arg(long)]
    pub template: Option<PathBuf>,

    /// Method to invoke on each service
    #[arg(long, default_value = "deploy")]
    pub method: String,

    /// Extra arguments forwarded to each method
    #[arg(trailing_var_arg = true)]
    pub args: Vec<String>,
}

/// Entry point for `convoy deploy`.
///
/// # Errors
///
/// Returns an error when no template is found, the service graph is cyclic,
/// or a service's method fails.
pub async fn run(app: &AppContext, args: &DeployArgs) -> Result<()> {
    let template_path = find_template(args.template.as_deref())?;
    let project_dir = template_path
        .parent()
        .filter(|p| !p.as_os_str().is_empty())
        .unwrap_or(Path::new("."))
        .to_path_buf();

    let request = ExecutionRequest {
        template_path: &template_path,
        method: &args.method,
        service: args.service.as_deref(),
        args: &args.args,
        project_dir: &project_dir,
    };
    let reporter = TerminalReporter::new(&app.output);
    let results = orchestrate::execute(
        &request,
        &YamlTemplateParser,
        &ProcessServiceRunner,
        &reporter,
    )
    .await?;

    render_results(&results)?;
    Ok(())
}

/// Locate the template: the explicit `--template` path, or the first
/// conventional name present in the current directory.
fn find_template(explicit: Option<&Path>) -> Result<PathBuf> {
    if let Some(path) = explicit {
        anyhow::ensure!(path.exists(), "template not found: {}", path.display());
        return Ok(path.to_path_buf());
    }
    for name in TEMPLATE_NAMES {
        let path = PathBuf::from(name);
        if path.exists() {
            return Ok(path);
        }
    }
    anyhow::bail!(
        "No convoy.yaml found in the current directory.\n\n\
         Use --template <file>, or scaffold a project with 'convoy init <source>'."
    )
}

/// Print the non-empty service outputs as one JSON object, in execution
/// order. Services without output already got their completion marker.
fn render_results(results: &ExecutionResults) -> Result<()> {
    if results.iter().all(|(_, output)| output.is_empty()) {
        return Ok(());
    }
    let mut rendered = serde_json::Map::new();
    for (name, output) in results {
        rendered.insert(name.clone(), serde_json::Value::Object(output.clone()));
    }
    let text = serde_json::to_string_pretty(&serde_json::Value::Object(rendered))
        .context("rendering service outputs")?;
    println!("{text}");
    Ok(())
}

// ── Unit tests ────────────────────────────────────────────────────────────────
