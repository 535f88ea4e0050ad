//! Application orchestration for chunked annotation
//!
//! This crate drives a length-limited annotation service over texts of any
//! length: it chunks the text, dispatches one request per chunk (in order
//! or on a bounded worker pool), and reconciles the per-chunk spans into
//! one deduplicated set over the original text.

#![warn(missing_docs)]

pub mod annotator;
pub mod assembler;
pub mod config;
pub mod dispatcher;
pub mod error;
pub mod executor;
pub mod reconciler;

// Re-export key types
pub use annotator::{
    AnnotationResult, Annotator, ConceptResolver, IdentityResolver, RawAnnotation, TableResolver,
};
pub use assembler::{Assembly, ResultAssembler};
pub use config::EngineConfig;
pub use error::{AnnotatorError, EngineError, Result};
pub use executor::{ChunkOutcome, ExecutionMode, Executor};
pub use reconciler::{annotate, Annotated, AnnotationReport, Reconciler, ReconcilerBuilder};

// Re-export from core for convenience
pub use chunkspan_core::{AnnotationSet, Chunk, Chunker, ConceptId, Span};
