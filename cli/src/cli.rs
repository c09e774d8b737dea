//! CLI argument parsing with clap derive

use anyhow::Result;
use clap::{Parser, Subcommand};

use crate::app::AppContext;
use crate::commands;

/// Scaffold and deploy multi-service projects from declarative templates
#[derive(Parser)]
#[command(
    name = "convoy",
    version,
    propagate_version = true,
    subcommand_required = true,
    arg_required_else_help = true
)]
pub struct Cli {
    /// Suppress non-error output
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Disable colored output
    #[arg(long, global = true, env = "NO_COLOR")]
    pub no_color: bool,

    /// Skip interactive prompts, accepting defaults
    #[arg(short = 'y', long, global = true)]
    pub yes: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand)]
pub enum Command {
    /// Scaffold a project from a registry source
    Init(commands::init::InitArgs),

    /// Execute the template's services in dependency order
    Deploy(commands::deploy::DeployArgs),

    /// Manage configuration
    #[command(subcommand)]
    Config(commands::config::ConfigCommand),

    /// Show version
    Version,
}

impl Cli {
    /// Execute the CLI command.
    ///
    /// # Errors
    ///
    /// Returns an error if the command fails.
    pub async fn run(self) -> Result<()> {
        let Cli {
            quiet,
            no_color,
            yes,
            command,
        } = self;
        let app = AppContext::new(no_color, quiet, yes);
        match command {
            Command::Init(args) => commands::init::run(&app, &args),
            Command::Deploy(args) => commands::deploy::run(&app, &args).await,
            Command::Config(cmd) => {
                commands::config::run(&app, cmd, &crate::infra::settings::YamlSettingsStore)
            }
            Command::Version => commands::version::run(),
        }
    }
}
