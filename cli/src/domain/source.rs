//! Domain types for source specs, registries, and artifact locators.
//!
//! Pure functions only — no I/O, no async, no filesystem access.

use std::path::{Path, PathBuf};

// ── Registry constants ────────────────────────────────────────────────────────

/// Base URL of the default template hub.
pub const HUB_API_URL: &str = "https://hub.convoy.sh/api";
/// Base URL of the legacy template hub (still accepted as a registry hint).
pub const LEGACY_HUB_API_URL: &str = "https://registry.convoy.sh/simple";
/// Base URL of the GitHub releases API.
pub const GITHUB_API_URL: &str = "https://api.github.com";

// ── Source spec ───────────────────────────────────────────────────────────────

/// A parsed `provider/name[@version]` source identifier.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceSpec {
    /// Publisher (hub provider or GitHub user/org).
    pub provider: String,
    /// Package name.
    pub name: String,
    /// Optional release tag; `None` means "latest".
    pub version: Option<String>,
}

impl SourceSpec {
    /// Parse a raw source string of the form `provider/name[@version]`.
    ///
    /// Returns `None` when the string carries no `/` separator or either side
    /// of it is empty — registry-backed resolution treats that as a silent
    /// miss, not an error.
    #[must_use]
    pub fn parse(raw: &str) -> Option<Self> {
        let (provider, rest) = raw.split_once('/')?;
        if provider.is_empty() || rest.is_empty() {
            return None;
        }
        let (name, version) = match rest.split_once('@') {
            Some((n, v)) if !n.is_empty() && !v.is_empty() => (n, Some(v.to_string())),
            Some((n, _)) if !n.is_empty() => (n, None),
            Some(_) => return None,
            None => (rest, None),
        };
        Some(Self {
            provider: provider.to_string(),
            name: name.to_string(),
            version,
        })
    }
}

// ── Registry kind ─────────────────────────────────────────────────────────────

/// The resolution strategy selected by a registry hint.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RegistryKind {
    /// The default template hub.
    Hub,
    /// The legacy hub alias — resolves identically to [`RegistryKind::Hub`].
    HubLegacy,
    /// GitHub releases.
    GitHub,
    /// Any other registry string is a direct download URL.
    Custom(String),
}

impl RegistryKind {
    /// Classify a raw registry hint.
    ///
    /// Short aliases (`hub`, `github`) and the well-known API base URLs map
    /// to their kinds; everything else is treated as a custom URL.
    #[must_use]
    pub fn classify(raw: &str) -> Self {
        match raw {
            "hub" | HUB_API_URL => Self::Hub,
            LEGACY_HUB_API_URL => Self::HubLegacy,
            "github" | GITHUB_API_URL => Self::GitHub,
            other => Self::Custom(other.to_string()),
        }
    }

    /// `true` for kinds that go through version-aware release lookup.
    #[must_use]
    pub fn is_resolvable(&self) -> bool {
        !matches!(self, Self::Custom(_))
    }
}

// ── Artifact locator ──────────────────────────────────────────────────────────

/// A resolved download URL plus target path for one acquisition.
///
/// Ephemeral — produced by the resolver chain and consumed immediately by the
/// fetcher.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArtifactLocator {
    /// Archive download URL.
    pub download_url: String,
    /// Directory the project will be materialized into.
    pub application_path: PathBuf,
    /// Name shown in prompts and progress output.
    pub display_name: String,
}

/// Compute the application path for an acquisition.
///
/// The explicit `--name` override wins; otherwise the package name parsed
/// from the source spec (never the provider) is used.
#[must_use]
pub fn application_path(target: &Path, package_name: &str, name_override: Option<&str>) -> PathBuf {
    target.join(name_override.unwrap_or(package_name))
}

// ── Unit tests ────────────────────────────────────────────────────────────────
