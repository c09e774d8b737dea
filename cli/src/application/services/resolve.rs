//! Application service — source resolution over the registry fallback chain.
//!
//! Imports only from `crate::domain` and `crate::application::ports`.
//! All I/O is routed through injected port traits.

use std::path::PathBuf;

use anyhow::Result;

use crate::application::ports::{RegistryClient, SettingsStore};
use crate::domain::error::SourceError;
use crate::domain::source::{ArtifactLocator, RegistryKind, SourceSpec, application_path};

/// Inputs of one resolution attempt.
pub struct SourceRequest<'a> {
    /// Raw source identifier, `provider/name[@version]` for registry-backed
    /// sources.
    pub source: &'a str,
    /// Optional registry hint (alias, API base URL, or custom URL).
    pub registry: Option<&'a str>,
    /// Directory the project should land under.
    pub target: &'a std::path::Path,
    /// Optional directory-name override.
    pub name: Option<&'a str>,
}

/// Outcome of a successful resolution.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Resolution {
    /// A custom registry URL: download it directly, no version logic.
    Direct {
        url: String,
        application_path: PathBuf,
    },
    /// A release resolved through the hub or GitHub.
    Release(ArtifactLocator),
}

/// Resolve a source spec to an artifact through the ordered fallback chain.
///
/// Order: explicit custom URL → hinted registry → configured default
/// registry → hub → GitHub. Each step is attempted only if the previous
/// yielded nothing; a step's error is swallowed into a miss so optional
/// backends never abort the chain.
///
/// # Errors
///
/// Returns [`SourceError::NotFound`] carrying the original spec string when
/// every candidate is exhausted.
pub fn resolve_source(
    req: &SourceRequest<'_>,
    hub: &impl RegistryClient,
    github: &impl RegistryClient,
    settings: &impl SettingsStore,
) -> Result<Resolution> {
    if let Some(raw) = req.registry {
        match RegistryKind::classify(raw) {
            RegistryKind::Custom(url) => {
                return Ok(Resolution::Direct {
                    url,
                    application_path: req.target.join(req.source),
                });
            }
            kind => {
                if let Some(locator) = lookup_registry(&kind, req, hub, github) {
                    return Ok(Resolution::Release(locator));
                }
            }
        }
    }

    // A persisted default registry is an optional enrichment: unreadable
    // settings or a custom URL there are skipped, not surfaced.
    if let Ok(Some(configured)) = settings.get("registry") {
        let kind = RegistryKind::classify(&configured);
        if kind.is_resolvable()
            && let Some(locator) = lookup_registry(&kind, req, hub, github)
        {
            return Ok(Resolution::Release(locator));
        }
    }

    for kind in [RegistryKind::Hub, RegistryKind::GitHub] {
        if let Some(locator) = lookup_registry(&kind, req, hub, github) {
            return Ok(Resolution::Release(locator));
        }
    }

    Err(SourceError::NotFound {
        spec: req.source.to_string(),
    }
    .into())
}

fn lookup_registry(
    kind: &RegistryKind,
    req: &SourceRequest<'_>,
    hub: &impl RegistryClient,
    github: &impl RegistryClient,
) -> Option<ArtifactLocator> {
    match kind {
        RegistryKind::Hub | RegistryKind::HubLegacy => lookup(hub, req),
        RegistryKind::GitHub => lookup(github, req),
        RegistryKind::Custom(_) => None,
    }
}

/// Version-aware release lookup against one registry client.
///
/// Misses (unparseable spec, unknown package, missing tag, client error)
/// all yield `None`.
fn lookup(client: &impl RegistryClient, req: &SourceRequest<'_>) -> Option<ArtifactLocator> {
    let spec = SourceSpec::parse(req.source)?;
    let release = match &spec.version {
        Some(version) => client
            .releases(&spec.provider, &spec.name)
            .ok()
            .flatten()?
            .into_iter()
            .find(|r| &r.tag_name == version)?,
        None => client.latest_release(&spec.provider, &spec.name).ok().flatten()?,
    };
    Some(ArtifactLocator {
        download_url: release.zipball_url,
        application_path: application_path(req.target, &spec.name, req.name),
        display_name: req.name.unwrap_or(&spec.name).to_string(),
    })
}

// ── Unit tests ────────────────────────────────────────────────────────────────
