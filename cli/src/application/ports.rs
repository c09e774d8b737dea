//! Port trait definitions for the Application layer.
//!
//! Ports are the interfaces (contracts) that infrastructure must fulfill.
//! This file imports only from `crate::domain` — never from `crate::infra`,
//! `crate::commands`, or `crate::output`.

use std::path::{Path, PathBuf};

use anyhow::Result;
use serde::{Deserialize, Serialize};

use crate::domain::template::{ParsedTemplate, RunContext};

// ── Value Types ───────────────────────────────────────────────────────────────

/// One release of a registry package.
///
/// Mirrors the GitHub release schema; the hub serves the same shape.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReleaseEntry {
    pub tag_name: String,
    pub zipball_url: String,
}

/// Options for one archive fetch.
#[derive(Debug, Clone, Default)]
pub struct FetchOptions {
    /// Decompress the downloaded archive in place.
    pub extract: bool,
    /// Leading path components to elide while extracting.
    pub strip: usize,
    /// Extension to give an extensionless archive before format dispatch.
    pub postfix: Option<String>,
}

/// How a run interacts with the user.
///
/// Carried explicitly through every acquisition call instead of being read
/// from the process environment inside the core.
#[derive(Debug, Clone, Default)]
pub struct RunMode {
    /// Never prompt; confirmations auto-accept their default.
    pub non_interactive: bool,
    /// Literal parameter payload supplied via `--parameters`.
    pub parameters: Option<serde_json::Map<String, serde_json::Value>>,
}

impl RunMode {
    /// `true` when confirmations should auto-accept without prompting.
    #[must_use]
    pub fn assume_yes(&self) -> bool {
        self.non_interactive || self.parameters.is_some()
    }
}

/// One service invocation handed to the executor.
pub struct ServiceInvocation<'a> {
    /// Service name, as declared in the template.
    pub service: &'a str,
    /// The service's effective configuration subtree.
    pub config: &'a serde_yaml::Value,
    /// Method to invoke, e.g. `deploy`.
    pub method: &'a str,
    /// Positional arguments forwarded to the method.
    pub args: &'a [String],
    /// Directory the template lives in.
    pub project_dir: &'a Path,
}

// ── Registry Port ─────────────────────────────────────────────────────────────

/// A release-listing registry backend (the hub or GitHub).
pub trait RegistryClient {
    /// Fetch the latest release of a package, `None` when the package or a
    /// release does not exist.
    fn latest_release(&self, provider: &str, name: &str) -> Result<Option<ReleaseEntry>>;

    /// Fetch the full release list of a package, newest first, `None` when
    /// the package does not exist.
    fn releases(&self, provider: &str, name: &str) -> Result<Option<Vec<ReleaseEntry>>>;
}

// ── Download Port ─────────────────────────────────────────────────────────────

/// Downloads a remote archive into a directory, optionally extracting it.
pub trait Downloader {
    /// Fetch `url` into the `dest` directory.
    ///
    /// Download and extraction failures are reported, not raised — callers
    /// must check the resulting filesystem state. Only preparing the
    /// destination directory itself can fail.
    ///
    /// # Errors
    ///
    /// Returns an error if `dest` cannot be created.
    fn fetch(&self, url: &str, dest: &Path, opts: &FetchOptions) -> Result<()>;
}

// ── Hook Port ─────────────────────────────────────────────────────────────────

/// Runs optional lifecycle hooks shipped inside a fetched artifact.
///
/// Both calls are best-effort: a missing or failing hook never propagates.
pub trait HookRunner {
    /// Run the artifact's pre-init hook, if any.
    fn pre_init(&self, temporary_path: &Path, application_path: &Path);
    /// Run the artifact's post-init hook, if any.
    fn post_init(&self, temporary_path: &Path, application_path: &Path);
}

// ── Template Parser Port ──────────────────────────────────────────────────────

/// Parses raw template text plus prior outputs into resolved variables and a
/// dependency map. Re-invoked with the accumulated [`RunContext`] between
/// service executions.
#[allow(async_fn_in_trait)]
pub trait TemplateParser {
    /// Parse the template at `path`, resolving cross-service references
    /// against `prior` when given.
    async fn parse(&self, path: &Path, prior: Option<&RunContext>) -> Result<ParsedTemplate>;
}

// ── Service Executor Port ─────────────────────────────────────────────────────

/// Executes one service's method and returns its output object.
#[allow(async_fn_in_trait)]
pub trait ServiceRunner {
    /// Run the method; output keys are arbitrary, set by the service.
    async fn run(
        &self,
        invocation: &ServiceInvocation<'_>,
    ) -> Result<serde_json::Map<String, serde_json::Value>>;
}

// ── Settings Port ─────────────────────────────────────────────────────────────

/// Abstracts persisted CLI settings (load/save of individual keys).
pub trait SettingsStore {
    /// Read a setting, `None` when unset.
    fn get(&self, key: &str) -> Result<Option<String>>;
    /// Persist a setting.
    fn set(&self, key: &str, value: &str) -> Result<()>;
    /// Remove a setting.
    fn unset(&self, key: &str) -> Result<()>;
    /// Location of the backing file.
    fn path(&self) -> Result<PathBuf>;
}

// ── Credential Port ───────────────────────────────────────────────────────────

/// Read-only view of stored credential aliases.
///
/// Credential creation and storage are external collaborators; the
/// acquisition flow only needs the alias list for its selection prompt.
pub trait CredentialStore {
    /// All known credential aliases.
    fn alias_list(&self) -> Result<Vec<String>>;
}

// ── Prompt Port ───────────────────────────────────────────────────────────────

/// Abstracts interactive prompts so services can be tested headless.
pub trait Prompter {
    /// Pick one of `choices`; returns the selected index.
    fn select(&self, message: &str, choices: &[String], default: usize) -> Result<usize>;
    /// Free-text input. `require_non_empty` blocks submission of blank
    /// values.
    fn input(&self, message: &str, default: Option<&str>, require_non_empty: bool)
    -> Result<String>;
    /// Yes/no confirmation.
    fn confirm(&self, message: &str, default: bool) -> Result<bool>;
}

// ── Progress Reporting Port ───────────────────────────────────────────────────

/// Abstracts progress reporting so services can emit events without
/// depending on the Presentation layer. Sync trait — no async needed.
pub trait Reporter {
    /// Emit an in-progress step message.
    fn step(&self, message: &str);
    /// Emit a success message.
    fn success(&self, message: &str);
    /// Emit a warning message.
    fn warn(&self, message: &str);
}
