//! Chunk command implementation

use crate::{
    input::{resolve_patterns, FileReader},
    output::{self, OutputFormat},
};
use anyhow::Result;
use chunkspan_core::Chunker;
use chunkspan_engine::config::DEFAULT_MAX_FRAGMENT_LENGTH;
use clap::Args;
use std::path::PathBuf;

/// Arguments for the chunk command
#[derive(Debug, Args)]
pub struct ChunkArgs {
    /// Input files or patterns (supports glob)
    #[arg(short, long, value_name = "FILE/PATTERN", required = true)]
    pub input: Vec<String>,

    /// Maximum fragment length in chars
    #[arg(short, long, value_name = "CHARS", default_value_t = DEFAULT_MAX_FRAGMENT_LENGTH)]
    pub max_len: usize,

    /// Output format
    #[arg(short, long, value_enum, default_value = "text")]
    pub format: OutputFormat,

    /// Output file (default: stdout)
    #[arg(short, long, value_name = "FILE")]
    pub output: Option<PathBuf>,
}

impl ChunkArgs {
    /// Execute the chunk command
    pub fn execute(&self) -> Result<()> {
        let chunker = Chunker::new(self.max_len)?;
        let files = resolve_patterns(&self.input)?;

        let writer = output::open_writer(self.output.as_deref())?;
        let mut formatter = output::formatter(self.format, writer, true);

        for path in &files {
            let text = FileReader::read_text(path)?;
            let chunks = chunker.chunks(&text);
            log::debug!("{}: {} chunk(s)", path.display(), chunks.len());
            formatter.format_chunks(&path.display().to_string(), &chunks)?;
        }

        formatter.finish()
    }
}
