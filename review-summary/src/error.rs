//! Error types for chunking and hierarchical summarisation.

use review_core::SummarizeError;
use thiserror::Error;

/// Errors raised by [`chunk`](crate::chunk).
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ChunkError {
    /// The token budget cannot hold any text.
    #[error("invalid chunk configuration: {reason}")]
    InvalidConfiguration {
        /// What was wrong with the configuration.
        reason: &'static str,
    },
}

/// Errors raised by [`summarize_all`](crate::summarize_all).
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ReduceError {
    /// No chunks were supplied.
    #[error("at least one chunk is required to summarise")]
    EmptyInput,
    /// Every chunk call failed or was cancelled.
    #[error("all {attempted} chunk summaries failed")]
    AllChunksFailed {
        /// Number of chunks that were attempted.
        attempted: usize,
    },
    /// The final merge call failed.
    #[error("failed to merge chunk summaries")]
    Merge {
        /// Source error from the summariser.
        #[source]
        source: SummarizeError,
    },
    /// The caller cancelled the reduction.
    #[error("summarisation was cancelled")]
    Cancelled,
}

/// Errors raised by [`summarize_reviews`](crate::summarize_reviews).
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SummaryError {
    /// The review texts could not be chunked.
    #[error(transparent)]
    Chunk(#[from] ChunkError),
    /// The chunks could not be reduced to one summary.
    #[error(transparent)]
    Reduce(#[from] ReduceError),
}
