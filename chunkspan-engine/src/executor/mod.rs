//! Execution strategies for dispatching chunk requests
//!
//! An executor calls the annotator once per chunk and hands back one
//! outcome per chunk, in chunk order, however the calls were scheduled.

use crate::{
    annotator::{Annotator, RawAnnotation},
    error::AnnotatorError,
};
use chunkspan_core::Chunk;

#[cfg(feature = "parallel")]
pub mod parallel;
pub mod sequential;

// Re-export executors
#[cfg(feature = "parallel")]
pub use parallel::ParallelExecutor;
pub use sequential::SequentialExecutor;

/// Execution mode selector
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ExecutionMode {
    /// One request at a time on the calling thread
    Sequential,
    /// Bounded concurrent requests on a worker pool
    Parallel,
    /// Parallel when there is more than one chunk and worker
    #[default]
    Adaptive,
}

impl ExecutionMode {
    /// Lowercase name as used in configuration files
    pub fn as_str(&self) -> &'static str {
        match self {
            ExecutionMode::Sequential => "sequential",
            ExecutionMode::Parallel => "parallel",
            ExecutionMode::Adaptive => "adaptive",
        }
    }
}

/// What happened to one chunk's request
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ChunkOutcome {
    /// The service answered
    Annotated(Vec<RawAnnotation>),
    /// The request failed
    Failed(AnnotatorError),
    /// Not attempted because an earlier chunk failed fatally
    Skipped,
}

impl ChunkOutcome {
    /// Run the annotator on one chunk
    pub fn request(annotator: &dyn Annotator, chunk: &Chunk<'_>) -> Self {
        match annotator.annotate(chunk.text) {
            Ok(annotations) => ChunkOutcome::Annotated(annotations),
            Err(err) => ChunkOutcome::Failed(err),
        }
    }

    /// Whether further requests are pointless after this outcome
    pub fn is_fatal(&self) -> bool {
        matches!(self, ChunkOutcome::Failed(err) if err.is_fatal())
    }
}

/// Trait for execution strategies
pub trait Executor: Send + Sync {
    /// Request annotations for every chunk, returning outcomes in chunk order
    fn dispatch(&self, chunks: &[Chunk<'_>], annotator: &dyn Annotator) -> Vec<ChunkOutcome>;

    /// Get the execution mode
    fn mode(&self) -> ExecutionMode;
}

/// Resolve `Adaptive` into a concrete mode for one request
pub fn auto_select(chunk_count: usize, workers: usize) -> ExecutionMode {
    if chunk_count < 2 || workers < 2 {
        ExecutionMode::Sequential
    } else {
        #[cfg(feature = "parallel")]
        return ExecutionMode::Parallel;

        #[cfg(not(feature = "parallel"))]
        ExecutionMode::Sequential
    }
}
