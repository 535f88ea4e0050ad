//! Sequential execution strategy

use crate::{
    annotator::Annotator,
    executor::{ChunkOutcome, ExecutionMode, Executor},
};
use chunkspan_core::Chunk;

/// Sequential single-threaded executor
#[derive(Debug, Clone, Default)]
pub struct SequentialExecutor;

impl Executor for SequentialExecutor {
    fn dispatch(&self, chunks: &[Chunk<'_>], annotator: &dyn Annotator) -> Vec<ChunkOutcome> {
        let mut outcomes = Vec::with_capacity(chunks.len());

        for chunk in chunks {
            let outcome = ChunkOutcome::request(annotator, chunk);
            let fatal = outcome.is_fatal();
            outcomes.push(outcome);
            if fatal {
                break;
            }
        }

        outcomes.resize(chunks.len(), ChunkOutcome::Skipped);
        outcomes
    }

    fn mode(&self) -> ExecutionMode {
        ExecutionMode::Sequential
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        annotator::{AnnotationResult, RawAnnotation},
        error::AnnotatorError,
    };
    use chunkspan_core::Chunker;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[test]
    fn test_stops_after_fatal() {
        let calls = AtomicUsize::new(0);
        let annotator = |fragment: &str| -> AnnotationResult {
            calls.fetch_add(1, Ordering::SeqCst);
            if fragment.contains("BBBB") {
                Err(AnnotatorError::QuotaExceeded("limit reached".into()))
            } else {
                Ok(Vec::new())
            }
        };

        let chunker = Chunker::new(5).unwrap();
        let chunks = chunker.chunks("AAAA BBBB CCCC DDDD");
        let outcomes = SequentialExecutor.dispatch(&chunks, &annotator);

        assert_eq!(calls.load(Ordering::SeqCst), 2);
        assert_eq!(outcomes.len(), 4);
        assert!(outcomes[1].is_fatal());
        assert_eq!(outcomes[2], ChunkOutcome::Skipped);
        assert_eq!(outcomes[3], ChunkOutcome::Skipped);
    }

    #[test]
    fn test_transient_failure_does_not_stop() {
        let annotator = |fragment: &str| -> AnnotationResult {
            if fragment.contains("AAAA") {
                Err(AnnotatorError::Transient("connection reset".into()))
            } else {
                Ok(vec![RawAnnotation::new(1, 4, "x")])
            }
        };

        let chunker = Chunker::new(5).unwrap();
        let chunks = chunker.chunks("AAAA BBBB CCCC");
        let outcomes = SequentialExecutor.dispatch(&chunks, &annotator);

        assert!(matches!(outcomes[0], ChunkOutcome::Failed(_)));
        assert!(matches!(outcomes[1], ChunkOutcome::Annotated(_)));
        assert!(matches!(outcomes[2], ChunkOutcome::Annotated(_)));
    }
}
