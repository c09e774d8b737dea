//! Application context — unified state passed to every command handler.

use crate::output::OutputContext;

/// Unified application context passed to every command handler.
///
/// Constructed once in `Cli::run()` and passed as `&AppContext` to all
/// command handlers.
pub struct AppContext {
    /// Terminal output context (colors, quiet mode).
    pub output: OutputContext,
    /// When `true`, skip interactive prompts and use defaults.
    ///
    /// Set when `--yes` / `-y` is passed, or when the `CI` or `CONVOY_YES`
    /// environment variables are present.
    pub non_interactive: bool,
}

impl AppContext {
    /// Construct an `AppContext` from top-level CLI flags.
    #[must_use]
    pub fn new(no_color: bool, quiet: bool, yes: bool) -> Self {
        let ci_env = std::env::var("CI").is_ok() || std::env::var("CONVOY_YES").is_ok();
        Self {
            output: OutputContext::new(no_color, quiet),
            non_interactive: yes || ci_env,
        }
    }
}
