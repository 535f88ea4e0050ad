//! Core error types

use thiserror::Error;

/// Errors raised by chunking and span construction
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CoreError {
    /// Fragment length bound of zero
    #[error("maximum fragment length must be greater than 0")]
    ZeroFragmentLength,

    /// Span with no extent
    #[error("span at offset {start} has zero length")]
    EmptySpan {
        /// Start offset of the rejected span
        start: usize,
    },
}

/// Result type for core operations
pub type Result<T> = std::result::Result<T, CoreError>;
