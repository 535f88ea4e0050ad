//! Configuration module

use crate::{commands::annotate::ModeArg, error::CliError, output::OutputFormat};
use anyhow::{Context, Result};
use chunkspan_engine::{
    config::{DEFAULT_MAX_FRAGMENT_LENGTH, DEFAULT_THREADS},
    EngineConfig,
};
use clap::ValueEnum;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// CLI configuration structure
#[derive(Debug, Deserialize, Serialize, Default)]
pub struct CliConfig {
    /// Engine configuration
    #[serde(default)]
    pub engine: EngineSection,

    /// Output configuration
    #[serde(default)]
    pub output: OutputSection,
}

/// Engine-related configuration
#[derive(Debug, Deserialize, Serialize)]
#[serde(default)]
pub struct EngineSection {
    /// Upper bound on chars per annotation request
    pub max_fragment_length: usize,

    /// Number of worker threads (0 = auto)
    pub threads: usize,

    /// Execution mode: sequential, parallel or adaptive
    pub mode: String,
}

impl Default for EngineSection {
    fn default() -> Self {
        Self {
            max_fragment_length: DEFAULT_MAX_FRAGMENT_LENGTH,
            threads: DEFAULT_THREADS,
            mode: "adaptive".to_string(),
        }
    }
}

/// Output-related configuration
#[derive(Debug, Deserialize, Serialize)]
#[serde(default)]
pub struct OutputSection {
    /// Default output format
    pub default_format: String,

    /// Pretty print JSON output
    pub pretty_json: bool,

    /// Print the annotation report for each document
    pub include_report: bool,
}

impl Default for OutputSection {
    fn default() -> Self {
        Self {
            default_format: "text".to_string(),
            pretty_json: true,
            include_report: false,
        }
    }
}

impl CliConfig {
    /// Load a configuration file
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config: {}", path.display()))?;
        let config: Self = toml::from_str(&content)
            .map_err(|e| CliError::ConfigError(e.to_string()))
            .with_context(|| format!("Invalid config: {}", path.display()))?;
        Ok(config)
    }

    /// Engine configuration described by the `[engine]` section
    pub fn engine_config(&self) -> Result<EngineConfig, CliError> {
        let mode = ModeArg::from_str(&self.engine.mode, true).map_err(|_| {
            CliError::ConfigError(format!("unknown execution mode '{}'", self.engine.mode))
        })?;

        Ok(EngineConfig {
            max_fragment_length: self.engine.max_fragment_length,
            execution_mode: mode.into(),
            threads: (self.engine.threads > 0).then_some(self.engine.threads),
        })
    }

    /// Output format named by `[output] default_format`
    pub fn default_format(&self) -> Result<OutputFormat, CliError> {
        OutputFormat::from_str(&self.output.default_format, true).map_err(|_| {
            CliError::ConfigError(format!(
                "unknown output format '{}'",
                self.output.default_format
            ))
        })
    }
}
