//! Core types for chunked text annotation
//!
//! This crate provides the pure, I/O-free half of the pipeline:
//! - [`chunker`]: whitespace-bounded splitting of long texts into fragments
//! - [`span`]: annotated spans, concept identifiers and deduplicating sets
//!
//! All offsets and lengths are counted in `char`s of the original text.

#![warn(missing_docs)]

pub mod chunker;
pub mod error;
pub mod span;

// Re-export key types
pub use chunker::{split, Chunk, Chunker, SPLIT_CHAR};
pub use error::{CoreError, Result};
pub use span::{AnnotationSet, ConceptId, Span};
