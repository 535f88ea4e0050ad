//! Parallel execution strategy

use crate::{
    annotator::Annotator,
    error::{EngineError, Result},
    executor::{ChunkOutcome, ExecutionMode, Executor},
};
use chunkspan_core::Chunk;
use rayon::prelude::*;
use std::sync::atomic::{AtomicBool, Ordering};

/// Bounded worker-pool executor
///
/// Requests run concurrently but outcomes are collected in chunk order.
/// Once a fatal failure is seen, chunks that have not started are skipped;
/// requests already in flight still complete.
#[derive(Debug)]
pub struct ParallelExecutor {
    thread_pool: rayon::ThreadPool,
}

impl ParallelExecutor {
    /// Create an executor with `threads` workers (`None` = rayon default)
    pub fn new(threads: Option<usize>) -> Result<Self> {
        let mut builder =
            rayon::ThreadPoolBuilder::new().thread_name(|i| format!("chunkspan-worker-{i}"));
        if let Some(threads) = threads {
            builder = builder.num_threads(threads);
        }

        let thread_pool = builder
            .build()
            .map_err(|e| EngineError::ThreadPool(e.to_string()))?;

        Ok(Self { thread_pool })
    }

    /// Number of workers in the pool
    pub fn thread_count(&self) -> usize {
        self.thread_pool.current_num_threads()
    }
}

impl Executor for ParallelExecutor {
    fn dispatch(&self, chunks: &[Chunk<'_>], annotator: &dyn Annotator) -> Vec<ChunkOutcome> {
        let aborted = AtomicBool::new(false);

        self.thread_pool.install(|| {
            chunks
                .par_iter()
                .map(|chunk| {
                    if aborted.load(Ordering::Acquire) {
                        return ChunkOutcome::Skipped;
                    }
                    let outcome = ChunkOutcome::request(annotator, chunk);
                    if outcome.is_fatal() {
                        aborted.store(true, Ordering::Release);
                    }
                    outcome
                })
                .collect()
        })
    }

    fn mode(&self) -> ExecutionMode {
        ExecutionMode::Parallel
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
    use std::{thread, time::Duration};

    #[test]
    fn test_outcomes_keep_chunk_order() {
        // Earlier chunks sleep longer so they finish last
        let annotator = |fragment: &str| -> AnnotationResult {
            let delay = 40u64.saturating_sub(fragment.len() as u64 * 2);
            thread::sleep(Duration::from_millis(delay));
            Ok(vec![RawAnnotation::new(0, 1, fragment.trim())])
        };

        let text = "a bb ccc dddd eeeee ffffff";
        let chunks = Chunker::new(2).unwrap().chunks(text);
        let executor = ParallelExecutor::new(Some(4)).unwrap();
        let outcomes = executor.dispatch(&chunks, &annotator);

        let references: Vec<String> = outcomes
            .into_iter()
            .map(|o| match o {
                ChunkOutcome::Annotated(mut raw) => raw.remove(0).reference,
                other => panic!("unexpected outcome {other:?}"),
            })
            .collect();
        assert_eq!(references, vec!["a", "bb", "ccc", "dddd", "eeeee", "ffffff"]);
    }

    #[test]
    fn test_thread_count() {
        let executor = ParallelExecutor::new(Some(3)).unwrap();
        assert_eq!(executor.thread_count(), 3);
        assert_eq!(executor.mode(), ExecutionMode::Parallel);
    }

    #[test]
    fn test_fatal_failure_reported_in_place() {
        let annotator = |fragment: &str| -> AnnotationResult {
            if fragment.contains("ccc") {
                Err(AnnotatorError::Unauthorized("revoked".into()))
            } else {
                Ok(Vec::new())
            }
        };

        let chunks = Chunker::new(2).unwrap().chunks("a bb ccc dddd");
        let executor = ParallelExecutor::new(Some(2)).unwrap();
        let outcomes = executor.dispatch(&chunks, &annotator);

        assert_eq!(outcomes.len(), chunks.len());
        assert!(outcomes[2].is_fatal());
    }
}
