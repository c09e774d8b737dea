//! Infrastructure implementation of the `SettingsStore` port.

use std::collections::BTreeMap;
use std::path::PathBuf;

use anyhow::{Context, Result};

use crate::application::ports::SettingsStore;

/// Production implementation of `SettingsStore` that uses a YAML file on disk.
pub struct YamlSettingsStore;

impl YamlSettingsStore {
    fn load(&self) -> Result<BTreeMap<String, String>> {
        let path = self.path()?;
        if !path.exists() {
            return Ok(BTreeMap::new());
        }
        let content = std::fs::read_to_string(&path)
            .with_context(|| format!("cannot read {}", path.display()))?;
        serde_yaml::from_str(&content).with_context(|| format!("cannot parse {}", path.display()))
    }

    fn save(&self, settings: &BTreeMap<String, String>) -> Result<()> {
        let path = self.path()?;
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("cannot create {}", parent.display()))?;
        }
        let content = serde_yaml::to_string(settings).context("cannot serialize settings")?;
        std::fs::write(&path, content)
            .with_context(|| format!("cannot write {}", path.display()))?;

        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            std::fs::set_permissions(&path, std::fs::Permissions::from_mode(0o600))
                .with_context(|| format!("cannot set permissions on {}", path.display()))?;
        }
        Ok(())
    }
}

impl SettingsStore for YamlSettingsStore {
    fn get(&self, key: &str) -> Result<Option<String>> {
        Ok(self.load()?.get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> Result<()> {
        let mut settings = self.load()?;
        settings.insert(key.to_string(), value.to_string());
        self.save(&settings)
    }

    fn unset(&self, key: &str) -> Result<()> {
        let mut settings = self.load()?;
        settings.remove(key);
        self.save(&settings)
    }

    fn path(&self) -> Result<PathBuf> {
        if let Ok(val) = std::env::var("CONVOY_CONFIG") {
            return Ok(PathBuf::from(val));
        }
        let home =
            dirs::home_dir().ok_or_else(|| anyhow::anyhow!("cannot determine home directory"))?;
        Ok(home.join(".convoy").join("config.yaml"))
    }
}

// ── Unit tests ────────────────────────────────────────────────────────────────
