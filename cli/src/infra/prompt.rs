//! Infrastructure implementation of the `Prompter` port using dialoguer.

use anyhow::{Context, Result};

use crate::application::ports::Prompter;

/// Terminal prompter backed by dialoguer.
pub struct DialoguerPrompter;

impl Prompter for DialoguerPrompter {
    fn select(&self, message: &str, choices: &[String], default: usize) -> Result<usize> {
        dialoguer::Select::new()
            .with_prompt(message)
            .items(choices)
            .default(default)
            .interact()
            .context("selection prompt")
    }

    fn input(
        &self,
        message: &str,
        default: Option<&str>,
        require_non_empty: bool,
    ) -> Result<String> {
        let mut prompt = dialoguer::Input::<String>::new()
            .with_prompt(message)
            .allow_empty(!require_non_empty);
        if let Some(default) = default {
            prompt = prompt.default(default.to_string());
        }
        if require_non_empty {
            prompt = prompt.validate_with(|input: &String| {
                if input.trim().is_empty() {
                    Err("value cannot be empty.")
                } else {
                    Ok(())
                }
            });
        }
        prompt.interact_text().context("input prompt")
    }

    fn confirm(&self, message: &str, default: bool) -> Result<bool> {
        dialoguer::Confirm::new()
            .with_prompt(message)
            .default(default)
            .interact()
            .context("confirmation prompt")
    }
}
