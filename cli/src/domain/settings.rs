//! Validators for persisted CLI settings.
//!
//! Pure functions only — no I/O, no async, no filesystem access.

use anyhow::Result;

use crate::domain::error::SettingsError;

/// Keys the settings store accepts.
pub const VALID_SETTING_KEYS: &[&str] = &["registry"];

/// Validates a settings key against the whitelist.
///
/// # Errors
///
/// Returns an error if the key is not in the allowed list.
pub fn validate_setting_key(key: &str) -> Result<()> {
    if !VALID_SETTING_KEYS.contains(&key) {
        return Err(SettingsError::UnknownKey {
            key: key.to_string(),
            valid: VALID_SETTING_KEYS.join(", "),
        }
        .into());
    }
    Ok(())
}
