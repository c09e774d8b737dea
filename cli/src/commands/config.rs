//! `convoy config` — show and set persisted CLI settings.

use anyhow::Result;
use clap::Subcommand;

use crate::app::AppContext;
use crate::application::ports::SettingsStore;
use crate::domain::settings::{VALID_SETTING_KEYS, validate_setting_key};

/// Config subcommands.
#[derive(Subcommand)]
pub enum ConfigCommand {
    /// Show current configuration
    Show,
    /// Set configuration value
    Set {
        /// Configuration key
        key: String,
        /// Configuration value
        value: String,
    },
    /// Remove a configuration value
    Unset {
        /// Configuration key
        key: String,
    },
}

/// Run the config command.
///
/// # Errors
///
/// Returns an error for unknown settings keys or when the store fails.
pub fn run(app: &AppContext, cmd: ConfigCommand, store: &impl SettingsStore) -> Result<()> {
    match cmd {
        ConfigCommand::Show => show_config(app, store),
        ConfigCommand::Set { key, value } => {
            validate_setting_key(&key)?;
            store.set(&key, &value)?;
            app.output.success(&format!("Set {key} = {value}"));
            Ok(())
        }
        ConfigCommand::Unset { key } => {
            validate_setting_key(&key)?;
            store.unset(&key)?;
            app.output.success(&format!("Unset {key}"));
            Ok(())
        }
    }
}

fn show_config(app: &AppContext, store: &impl SettingsStore) -> Result<()> {
    app.output.header("Configuration");
    for key in VALID_SETTING_KEYS {
        let value = store.get(key)?.unwrap_or_else(|| "(unset)".to_string());
        app.output.kv(key, &value);
    }
    app.output.kv("file", &store.path()?.display().to_string());
    Ok(())
}

// ── Unit tests ────────────────────────────────────────────────────────────────
