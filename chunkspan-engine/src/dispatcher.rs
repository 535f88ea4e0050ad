//! Adaptive execution dispatcher
//!
//! Picks the executor for each request from the configured mode and the
//! number of chunks the text produced.

use crate::{
    annotator::Annotator,
    config::EngineConfig,
    error::Result,
    executor::{auto_select, ChunkOutcome, ExecutionMode, Executor, SequentialExecutor},
};
use chunkspan_core::Chunk;

#[cfg(feature = "parallel")]
use crate::executor::ParallelExecutor;

/// Adaptive execution dispatcher
pub struct AdaptiveDispatcher {
    sequential_executor: SequentialExecutor,
    #[cfg(feature = "parallel")]
    parallel_executor: Option<ParallelExecutor>,
    mode: ExecutionMode,
}

impl AdaptiveDispatcher {
    /// Create a dispatcher; the worker pool is only built if it can be used
    pub fn new(config: &EngineConfig) -> Result<Self> {
        #[cfg(feature = "parallel")]
        let parallel_executor = match config.execution_mode {
            ExecutionMode::Sequential => None,
            ExecutionMode::Parallel | ExecutionMode::Adaptive => {
                Some(ParallelExecutor::new(config.threads)?)
            }
        };

        Ok(Self {
            sequential_executor: SequentialExecutor,
            #[cfg(feature = "parallel")]
            parallel_executor,
            mode: config.execution_mode,
        })
    }

    /// Workers available for one request
    pub fn workers(&self) -> usize {
        #[cfg(feature = "parallel")]
        if let Some(executor) = &self.parallel_executor {
            return executor.thread_count();
        }
        1
    }

    /// Select the execution mode for a text split into `chunk_count` chunks
    pub fn select_mode(&self, chunk_count: usize) -> ExecutionMode {
        match self.mode {
            ExecutionMode::Adaptive => auto_select(chunk_count, self.workers()),
            mode => mode,
        }
    }

    /// Dispatch the chunks, returning their outcomes and the mode used
    pub fn dispatch(
        &self,
        chunks: &[Chunk<'_>],
        annotator: &dyn Annotator,
    ) -> (Vec<ChunkOutcome>, ExecutionMode) {
        let executor = self.executor_for(self.select_mode(chunks.len()));
        (executor.dispatch(chunks, annotator), executor.mode())
    }

    #[cfg_attr(not(feature = "parallel"), allow(unused_variables))]
    fn executor_for(&self, mode: ExecutionMode) -> &dyn Executor {
        #[cfg(feature = "parallel")]
        if mode == ExecutionMode::Parallel {
            if let Some(executor) = &self.parallel_executor {
                return executor;
            }
        }

        // Parallel without the feature falls back to sequential
        &self.sequential_executor
    }
}
