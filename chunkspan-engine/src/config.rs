//! Configuration types for the engine

use crate::{
    error::{EngineError, Result},
    ExecutionMode,
};

/// Default fragment bound in chars
///
/// Kept well under a 3500-char service limit because the service measures
/// escaped text, which can be up to three times longer than the raw text.
pub const DEFAULT_MAX_FRAGMENT_LENGTH: usize = 1000;

/// Default size of the worker pool for concurrent requests
pub const DEFAULT_THREADS: usize = 4;

/// Engine configuration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EngineConfig {
    /// Upper bound on the chars sent in one annotation request
    pub max_fragment_length: usize,
    /// Execution mode selector
    pub execution_mode: ExecutionMode,
    /// Number of workers for parallel execution (None = rayon default)
    pub threads: Option<usize>,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            max_fragment_length: DEFAULT_MAX_FRAGMENT_LENGTH,
            execution_mode: ExecutionMode::Adaptive,
            threads: Some(DEFAULT_THREADS),
        }
    }
}

impl EngineConfig {
    /// One request at a time, in chunk order
    pub fn sequential() -> Self {
        Self {
            execution_mode: ExecutionMode::Sequential,
            threads: Some(1),
            ..Self::default()
        }
    }

    /// Concurrent requests on a pool of `threads` workers
    pub fn concurrent(threads: usize) -> Self {
        Self {
            execution_mode: ExecutionMode::Parallel,
            threads: Some(threads),
            ..Self::default()
        }
    }

    /// Replace the fragment bound
    pub fn with_max_fragment_length(mut self, max_fragment_length: usize) -> Self {
        self.max_fragment_length = max_fragment_length;
        self
    }

    /// Check the configuration for values the engine cannot run with
    pub fn validate(&self) -> Result<()> {
        if self.max_fragment_length == 0 {
            return Err(EngineError::ConfigError(
                "max_fragment_length must be greater than 0".to_string(),
            ));
        }
        if self.threads == Some(0) {
            return Err(EngineError::ConfigError(
                "thread count must be greater than 0".to_string(),
            ));
        }
        Ok(())
    }
}
