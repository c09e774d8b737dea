//! Infrastructure implementation of the `CredentialStore` port.
//!
//! Only the alias listing lives here — credential creation and secret
//! material are handled by external tooling writing `~/.convoy/access.yaml`.

use std::path::PathBuf;

use anyhow::{Context, Result};

use crate::application::ports::CredentialStore;

/// Reads credential aliases from `~/.convoy/access.yaml`.
pub struct YamlCredentialStore;

impl YamlCredentialStore {
    fn path() -> Result<PathBuf> {
        if let Ok(val) = std::env::var("CONVOY_ACCESS_FILE") {
            return Ok(PathBuf::from(val));
        }
        let home =
            dirs::home_dir().ok_or_else(|| anyhow::anyhow!("cannot determine home directory"))?;
        Ok(home.join(".convoy").join("access.yaml"))
    }
}

impl CredentialStore for YamlCredentialStore {
    fn alias_list(&self) -> Result<Vec<String>> {
        let path = Self::path()?;
        if !path.exists() {
            return Ok(Vec::new());
        }
        let content = std::fs::read_to_string(&path)
            .with_context(|| format!("cannot read {}", path.display()))?;
        let doc: serde_yaml::Value = serde_yaml::from_str(&content)
            .with_context(|| format!("cannot parse {}", path.display()))?;
        Ok(doc
            .as_mapping()
            .map(|m| {
                m.keys()
                    .filter_map(|k| k.as_str().map(str::to_string))
                    .collect()
            })
            .unwrap_or_default())
    }
}

// ── Unit tests ────────────────────────────────────────────────────────────────
