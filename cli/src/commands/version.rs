//! Version command.

use anyhow::Result;

/// Print the CLI version.
///
/// # Errors
///
/// Infallible; returns `Result` for dispatch uniformity.
pub fn run() -> Result<()> {
    println!("convoy {}", env!("CARGO_PKG_VERSION"));
    Ok(())
}
