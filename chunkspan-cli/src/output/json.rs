//! JSON output formatter

use super::OutputFormatter;
use anyhow::Result;
use chunkspan_core::{AnnotationSet, Chunk};
use serde::{Deserialize, Serialize};
use std::io::Write;

/// JSON formatter - collects documents and writes one array at the end
pub struct JsonFormatter<W: Write> {
    writer: W,
    pretty: bool,
    documents: Vec<DocumentData>,
}

/// One document in the JSON output
#[derive(Debug, Serialize, Deserialize)]
pub struct DocumentData {
    /// Source path
    pub document: String,
    /// Spans found, in order
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub spans: Option<Vec<SpanData>>,
    /// Chunks, for the `chunk` command
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub chunks: Option<Vec<ChunkData>>,
}

/// Data structure for one span
#[derive(Debug, Serialize, Deserialize)]
pub struct SpanData {
    /// Start char offset in the document
    pub start: usize,
    /// Length in chars
    pub length: usize,
    /// Canonical concept identifier
    pub concept: String,
    /// Covered text
    pub text: String,
}

/// Data structure for one chunk
#[derive(Debug, Serialize, Deserialize)]
pub struct ChunkData {
    /// Start char offset in the document
    pub start: usize,
    /// Length in chars
    pub length: usize,
    /// Chunk text
    pub text: String,
}

impl<W: Write> JsonFormatter<W> {
    /// Create a new JSON formatter
    pub fn new(writer: W) -> Self {
        Self {
            writer,
            pretty: true,
            documents: Vec::new(),
        }
    }

    /// Toggle pretty printing
    pub fn pretty(mut self, pretty: bool) -> Self {
        self.pretty = pretty;
        self
    }

    /// Consume the formatter, returning the writer
    pub fn into_inner(self) -> W {
        self.writer
    }
}

impl<W: Write + Send + Sync> OutputFormatter for JsonFormatter<W> {
    fn format_document(&mut self, document: &str, text: &str, spans: &AnnotationSet) -> Result<()> {
        let spans = spans
            .iter()
            .map(|span| SpanData {
                start: span.start(),
                length: span.length(),
                concept: span.concept().to_string(),
                text: span.slice(text).unwrap_or_default().to_string(),
            })
            .collect();

        self.documents.push(DocumentData {
            document: document.to_string(),
            spans: Some(spans),
            chunks: None,
        });
        Ok(())
    }

    fn format_chunks(&mut self, document: &str, chunks: &[Chunk<'_>]) -> Result<()> {
        let chunks = chunks
            .iter()
            .map(|chunk| ChunkData {
                start: chunk.start,
                length: chunk.len,
                text: chunk.text.to_string(),
            })
            .collect();

        self.documents.push(DocumentData {
            document: document.to_string(),
            spans: None,
            chunks: Some(chunks),
        });
        Ok(())
    }

    fn finish(&mut self) -> Result<()> {
        if self.pretty {
            serde_json::to_writer_pretty(&mut self.writer, &self.documents)?;
        } else {
            serde_json::to_writer(&mut self.writer, &self.documents)?;
        }
        writeln!(self.writer)?;
        self.writer.flush()?;
        Ok(())
    }
}
