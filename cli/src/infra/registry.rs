//! Infrastructure implementations of the `RegistryClient` port.
//!
//! Two backends share one wire shape: the template hub and the GitHub
//! releases API. Base URLs are overridable through environment variables so
//! tests can point the clients at a local fixture server.

use anyhow::{Context, Result};

use crate::application::ports::{RegistryClient, ReleaseEntry};
use crate::domain::source::{GITHUB_API_URL, HUB_API_URL};

/// Uses the GitHub releases API for version lookup.
pub struct GithubClient;

impl GithubClient {
    fn base_url() -> String {
        std::env::var("CONVOY_GITHUB_API_URL").unwrap_or_else(|_| GITHUB_API_URL.to_string())
    }

    fn request(url: &str) -> ureq::Request {
        let req = ureq::get(url)
            .set("Accept", "application/vnd.github+json")
            .set("User-Agent", "convoy-cli");
        match std::env::var("GITHUB_TOKEN") {
            Ok(token) if !token.is_empty() => {
                req.set("Authorization", &format!("Bearer {token}"))
            }
            _ => req,
        }
    }
}

impl RegistryClient for GithubClient {
    fn latest_release(&self, provider: &str, name: &str) -> Result<Option<ReleaseEntry>> {
        let url = format!(
            "{}/repos/{provider}/{name}/releases/latest",
            Self::base_url()
        );
        get_json(Self::request(&url))
    }

    fn releases(&self, provider: &str, name: &str) -> Result<Option<Vec<ReleaseEntry>>> {
        let url = format!("{}/repos/{provider}/{name}/releases", Self::base_url());
        get_json(Self::request(&url))
    }
}

/// Uses the template hub's release API, which mirrors GitHub's shape.
pub struct HubClient;

impl HubClient {
    fn base_url() -> String {
        std::env::var("CONVOY_HUB_API_URL").unwrap_or_else(|_| HUB_API_URL.to_string())
    }

    fn request(url: &str) -> ureq::Request {
        ureq::get(url)
            .set("Accept", "application/json")
            .set("User-Agent", "convoy-cli")
    }
}

impl RegistryClient for HubClient {
    fn latest_release(&self, provider: &str, name: &str) -> Result<Option<ReleaseEntry>> {
        let url = format!(
            "{}/packages/{provider}/{name}/releases/latest",
            Self::base_url()
        );
        get_json(Self::request(&url))
    }

    fn releases(&self, provider: &str, name: &str) -> Result<Option<Vec<ReleaseEntry>>> {
        let url = format!("{}/packages/{provider}/{name}/releases", Self::base_url());
        get_json(Self::request(&url))
    }
}

/// Execute a registry request; 404 means "no such package", not an error.
fn get_json<T: serde::de::DeserializeOwned>(req: ureq::Request) -> Result<Option<T>> {
    match req.call() {
        Ok(resp) => {
            let body = resp
                .into_string()
                .context("failed to read registry response")?;
            Ok(Some(
                serde_json::from_str(&body).context("failed to parse registry response")?,
            ))
        }
        Err(ureq::Error::Status(404, _)) => Ok(None),
        Err(ureq::Error::Status(code, _)) => anyhow::bail!("registry error: HTTP {code}"),
        Err(e) => Err(anyhow::anyhow!(e)),
    }
}

// ── Unit tests ────────────────────────────────────────────────────────────────
