//! Plain text output formatter

use super::OutputFormatter;
use anyhow::Result;
use chunkspan_core::{AnnotationSet, Chunk};
use std::io::Write;

/// Plain text formatter - one tab-separated line per span
pub struct TextFormatter<W: Write> {
    writer: W,
}

impl<W: Write> TextFormatter<W> {
    /// Create a new text formatter
    pub fn new(writer: W) -> Self {
        Self { writer }
    }

    /// Consume the formatter, returning the writer
    pub fn into_inner(self) -> W {
        self.writer
    }
}

impl<W: Write + Send + Sync> OutputFormatter for TextFormatter<W> {
    fn format_document(&mut self, document: &str, text: &str, spans: &AnnotationSet) -> Result<()> {
        writeln!(self.writer, "# {document}")?;
        for span in spans {
            writeln!(
                self.writer,
                "{}\t{}\t{}\t{}",
                span.start(),
                span.length(),
                span.concept(),
                span.slice(text).unwrap_or_default()
            )?;
        }
        Ok(())
    }

    fn format_chunks(&mut self, document: &str, chunks: &[Chunk<'_>]) -> Result<()> {
        writeln!(self.writer, "# {document}")?;
        for chunk in chunks {
            writeln!(self.writer, "{}\t{}\t{:?}", chunk.start, chunk.len, chunk.text)?;
        }
        Ok(())
    }

    fn finish(&mut self) -> Result<()> {
        self.writer.flush()?;
        Ok(())
    }
}
