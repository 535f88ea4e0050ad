//! Layered error types
//!
//! `AnnotatorError` is what an annotation collaborator reports for one
//! fragment; `EngineError` is what a whole reconciliation call returns.

use chunkspan_core::CoreError;
use thiserror::Error;

/// Failure of a single annotation request
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AnnotatorError {
    /// The service rejected the caller's credential
    #[error("annotation service rejected the credential: {0}")]
    Unauthorized(String),

    /// The caller's request budget is exhausted
    #[error("annotation service quota exhausted: {0}")]
    QuotaExceeded(String),

    /// Network or protocol failure for this fragment only
    #[error("transient annotation failure: {0}")]
    Transient(String),
}

impl AnnotatorError {
    /// Whether this failure must abort the whole request
    pub fn is_fatal(&self) -> bool {
        matches!(
            self,
            AnnotatorError::Unauthorized(_) | AnnotatorError::QuotaExceeded(_)
        )
    }
}

impl From<std::io::Error> for AnnotatorError {
    fn from(err: std::io::Error) -> Self {
        AnnotatorError::Transient(err.to_string())
    }
}

/// Engine-level errors
#[derive(Error, Debug)]
pub enum EngineError {
    /// Core chunking or span error
    #[error("core error: {0}")]
    Core(#[from] CoreError),

    /// A fatal annotator failure aborted the request
    #[error("annotation aborted at chunk {chunk}: {source}")]
    Fatal {
        /// Index of the chunk whose request failed
        chunk: usize,
        /// The annotator's error
        #[source]
        source: AnnotatorError,
    },

    /// Configuration error
    #[error("invalid configuration: {0}")]
    ConfigError(String),

    /// Worker pool could not be created
    #[error("thread pool error: {0}")]
    ThreadPool(String),
}

/// Result type for engine operations
pub type Result<T> = std::result::Result<T, EngineError>;
