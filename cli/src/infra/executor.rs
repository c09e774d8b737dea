//! Infrastructure implementation of the `ServiceRunner` port.
//!
//! A service declares its methods as shell commands under a `methods:`
//! mapping. The runner executes the method's command in the project
//! directory and reads the trailing JSON object line of stdout as the
//! service's output; plain-text output yields an empty output map.

use anyhow::{Context, Result};

use crate::application::ports::{ServiceInvocation, ServiceRunner};

/// Production service runner executing declared method commands.
pub struct ProcessServiceRunner;

impl ServiceRunner for ProcessServiceRunner {
    async fn run(
        &self,
        invocation: &ServiceInvocation<'_>,
    ) -> Result<serde_json::Map<String, serde_json::Value>> {
        let command = invocation
            .config
            .get("methods")
            .and_then(|m| m.get(invocation.method))
            .and_then(serde_yaml::Value::as_str)
            .ok_or_else(|| {
                anyhow::anyhow!(
                    "service '{}' does not define method '{}'",
                    invocation.service,
                    invocation.method
                )
            })?;

        let command_line = if invocation.args.is_empty() {
            command.to_string()
        } else {
            format!("{command} {}", invocation.args.join(" "))
        };

        let output = tokio::process::Command::new("sh")
            .arg("-c")
            .arg(&command_line)
            .current_dir(invocation.project_dir)
            .env("CONVOY_SERVICE", invocation.service)
            .env("CONVOY_METHOD", invocation.method)
            .output()
            .await
            .with_context(|| format!("spawning method '{}'", invocation.method))?;

        anyhow::ensure!(
            output.status.success(),
            "method '{}' exited with {}: {}",
            invocation.method,
            output.status,
            String::from_utf8_lossy(&output.stderr).trim()
        );

        Ok(parse_output(&String::from_utf8_lossy(&output.stdout)))
    }
}

/// Read the last non-empty stdout line as a JSON object, if it is one.
fn parse_output(stdout: &str) -> serde_json::Map<String, serde_json::Value> {
    stdout
        .lines()
        .rev()
        .find(|line| !line.trim().is_empty())
        .and_then(|line| serde_json::from_str::<serde_json::Value>(line.trim()).ok())
        .and_then(|value| value.as_object().cloned())
        .unwrap_or_default()
}

// ── Unit tests ────────────────────────────────────────────────────────────────
