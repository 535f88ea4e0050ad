//! chunkspan command-line entry point

use anyhow::Result;
use chunkspan_cli::commands::Commands;
use clap::Parser;

/// Annotate long texts with a length-limited entity annotator
#[derive(Debug, Parser)]
#[command(name = "chunkspan", version, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    cli.command.execute()
}
