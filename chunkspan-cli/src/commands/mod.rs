//! CLI command implementations

use anyhow::Result;
use clap::{Subcommand, ValueEnum};

pub mod annotate;
pub mod chunk;
pub mod validate;

use crate::output::OutputFormat;
use annotate::ModeArg;

/// Available CLI commands
#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Annotate text files through the gazetteer annotator
    Annotate(annotate::AnnotateArgs),

    /// Show how text files split into fragments
    Chunk(chunk::ChunkArgs),

    /// Check a gazetteer file
    Validate(validate::ValidateArgs),

    /// List available components
    List {
        #[command(subcommand)]
        subcommand: ListCommands,
    },
}

/// List subcommands
#[derive(Debug, Subcommand)]
pub enum ListCommands {
    /// List available output formats
    Formats,

    /// List execution modes
    Modes,
}

impl Commands {
    /// Run the selected command
    pub fn execute(&self) -> Result<()> {
        match self {
            Commands::Annotate(args) => args.execute(),
            Commands::Chunk(args) => args.execute(),
            Commands::Validate(args) => args.execute(),
            Commands::List { subcommand } => {
                subcommand.execute();
                Ok(())
            }
        }
    }
}

impl ListCommands {
    /// Lines printed for this listing
    pub fn lines(&self) -> Vec<String> {
        match self {
            ListCommands::Formats => OutputFormat::value_variants()
                .iter()
                .filter_map(|f| {
                    let name = f.to_possible_value()?.get_name().to_string();
                    Some(format!("{name:<6} {}", f.description()))
                })
                .collect(),
            ListCommands::Modes => ModeArg::value_variants()
                .iter()
                .filter_map(|m| {
                    let value = m.to_possible_value()?;
                    let help = value.get_help().map(ToString::to_string).unwrap_or_default();
                    Some(format!("{:<10} {help}", value.get_name()))
                })
                .collect(),
        }
    }

    fn execute(&self) {
        for line in self.lines() {
            println!("{line}");
        }
    }
}
