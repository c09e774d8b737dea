//! Convoy CLI - Scaffold and deploy multi-service projects from declarative templates

use clap::Parser;

use convoy_cli::cli::Cli;

#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    if let Err(e) = cli.run().await {
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}
