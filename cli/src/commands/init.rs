//! Init command — scaffold a project from a registry source.

use std::path::PathBuf;

use anyhow::Result;
use clap::Args;

use crate::app::AppContext;
use crate::application::ports::RunMode;
use crate::application::services::acquire::acquire;
use crate::application::services::resolve::{SourceRequest, resolve_source};
use crate::domain::error::ParamError;
use crate::infra::credentials::YamlCredentialStore;
use crate::infra::download::UreqDownloader;
use crate::infra::hooks::ShellHookRunner;
use crate::infra::prompt::DialoguerPrompter;
use crate::infra::registry::{GithubClient, HubClient};
use crate::infra::settings::YamlSettingsStore;
use crate::output::TerminalReporter;

/// Arguments for the `convoy init` command.
#[derive(Args)]
pub struct InitArgs {
    /// Source identifier, e.g. acme/webapp or acme/webapp@v1.2.0
    pub source: String,

    /// Registry to resolve against: hub, github, or a direct URL
    #[arg(long)]
    pub registry: Option<String>,

    /// Directory to place the project under (defaults to the current one)
    #[arg(long)]
    pub target: Option<PathBuf>,

    /// Project directory name (defaults to the package name)
    #[arg(long)]
    pub name: Option<String>,

    /// JSON parameter payload; selects a fully non-interactive run
    #[arg(long)]
    pub parameters: Option<String>,

    /// Credential alias written into the project config
    #[arg(long)]
    pub access: Option<String>,
}

/// Entry point for `convoy init`.
///
/// # Errors
///
/// Returns an error when no registry yields an artifact, the parameter
/// payload is malformed, or materialization fails.
pub fn run(app: &AppContext, args: &InitArgs) -> Result<()> {
    let parameters = parse_parameters(args.parameters.as_deref())?;
    let mode = RunMode {
        non_interactive: app.non_interactive || parameters.is_some(),
        parameters,
    };

    let target = args.target.clone().unwrap_or_else(|| PathBuf::from("."));
    let request = SourceRequest {
        source: &args.source,
        registry: args.registry.as_deref(),
        target: &target,
        name: args.name.as_deref(),
    };
    let resolution = resolve_source(&request, &HubClient, &GithubClient, &YamlSettingsStore)?;

    let downloader = UreqDownloader {
        quiet: !app.output.show_progress(),
    };
    let reporter = TerminalReporter::new(&app.output);
    let path = acquire(
        resolution,
        &mode,
        &downloader,
        &ShellHookRunner,
        &DialoguerPrompter,
        &YamlCredentialStore,
        &reporter,
        args.access.as_deref(),
    )?;

    app.output
        .success(&format!("Project ready at {}", path.display()));
    Ok(())
}

/// Parse the `--parameters` payload into a JSON object.
fn parse_parameters(
    raw: Option<&str>,
) -> Result<Option<serde_json::Map<String, serde_json::Value>>> {
    let Some(raw) = raw else {
        return Ok(None);
    };
    let value: serde_json::Value =
        serde_json::from_str(raw).map_err(|e| ParamError::MalformedPayload {
            reason: e.to_string(),
        })?;
    let object = value.as_object().cloned().ok_or(ParamError::MalformedPayload {
        reason: "expected a JSON object".to_string(),
    })?;
    Ok(Some(object))
}

// ── Unit tests ────────────────────────────────────────────────────────────────
