//! Output formatting module

use anyhow::Result;
use chunkspan_core::{AnnotationSet, Chunk};

/// Supported output formats
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum OutputFormat {
    /// Tab-separated spans under a per-document header
    Text,
    /// JSON array of documents with their spans
    Json,
}

impl OutputFormat {
    /// Short description shown by `list formats`
    pub fn description(&self) -> &'static str {
        match self {
            OutputFormat::Text => "tab-separated start, length, concept and surface",
            OutputFormat::Json => "array of documents with span objects",
        }
    }
}

/// Trait for output formatters
pub trait OutputFormatter: Send + Sync {
    /// Format the spans found in one document
    fn format_document(&mut self, document: &str, text: &str, spans: &AnnotationSet)
        -> Result<()>;

    /// Format the chunks one document splits into
    fn format_chunks(&mut self, document: &str, chunks: &[Chunk<'_>]) -> Result<()>;

    /// Finalize output (e.g., close JSON array)
    fn finish(&mut self) -> Result<()>;
}

pub mod json;
pub mod text;

pub use json::JsonFormatter;
pub use text::TextFormatter;

/// Build the formatter for `format` over `writer`
pub fn formatter<W>(format: OutputFormat, writer: W, pretty_json: bool) -> Box<dyn OutputFormatter>
where
    W: std::io::Write + Send + Sync + 'static,
{
    match format {
        OutputFormat::Text => Box::new(TextFormatter::new(writer)),
        OutputFormat::Json => Box::new(JsonFormatter::new(writer).pretty(pretty_json)),
    }
}

/// Open the output destination (default: stdout)
pub fn open_writer(path: Option<&std::path::Path>) -> Result<Box<dyn std::io::Write + Send + Sync>> {
    use anyhow::Context;

    match path {
        Some(path) => {
            let file = std::fs::File::create(path)
                .with_context(|| format!("Failed to create output file: {}", path.display()))?;
            Ok(Box::new(std::io::BufWriter::new(file)))
        }
        None => Ok(Box::new(std::io::stdout())),
    }
}
