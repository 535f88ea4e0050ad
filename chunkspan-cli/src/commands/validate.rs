//! Validate command implementation

use crate::gazetteer::GazetteerSpec;
use anyhow::Result;
use clap::Args;
use std::path::PathBuf;

/// Arguments for the validate command
#[derive(Debug, Args)]
pub struct ValidateArgs {
    /// Path to the gazetteer file to validate
    #[arg(short, long, value_name = "FILE", required = true)]
    pub gazetteer: PathBuf,
}

impl ValidateArgs {
    /// Execute the validate command
    pub fn execute(&self) -> Result<()> {
        println!("Validating gazetteer: {}", self.gazetteer.display());

        match GazetteerSpec::from_file(&self.gazetteer) {
            Ok(spec) => {
                println!("✓ Gazetteer is valid!");
                println!("  Name: {}", spec.name);
                println!("  Entries: {}", spec.entries.len());
                println!("  Concepts: {}", spec.concepts.len());
                if let Some(limit) = spec.max_requests {
                    println!("  Request budget: {limit}");
                }
                Ok(())
            }
            Err(e) => {
                println!("✗ Gazetteer is invalid!");
                println!("  Error: {e:#}");
                Err(anyhow::anyhow!("Validation failed: {e:#}"))
            }
        }
    }
}
