//! Summarise text with an external language model.

use async_trait::async_trait;
use thiserror::Error;

/// Errors from [`Summarizer::summarize`].
///
/// Every variant is treated as transient by the reduce pipeline: a failed
/// chunk is logged and skipped rather than aborting the whole summary.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SummarizeError {
    /// The model endpoint could not be reached.
    #[error("network error calling {url}: {message}")]
    Network {
        /// Endpoint that failed.
        url: String,
        /// Underlying error message.
        message: String,
    },
    /// The model endpoint answered with a non-success HTTP status.
    #[error("HTTP {status} from {url}: {message}")]
    Http {
        /// Endpoint that failed.
        url: String,
        /// HTTP status code.
        status: u16,
        /// Response or client message.
        message: String,
    },
    /// The request timed out.
    #[error("request to {url} timed out after {timeout_secs}s")]
    Timeout {
        /// Endpoint that failed.
        url: String,
        /// Configured timeout in seconds.
        timeout_secs: u64,
    },
    /// The response did not contain a usable summary.
    #[error("model returned no usable summary: {message}")]
    EmptyResponse {
        /// Description of what was missing.
        message: String,
    },
}

/// Produce a summary of `text` guided by `prompt`.
///
/// Calls are independent of one another and may run concurrently, so
/// implementations must be `Send + Sync`.
#[async_trait]
pub trait Summarizer: Send + Sync {
    /// Summarise `text` using the instructions in `prompt`.
    ///
    /// # Errors
    /// Returns [`SummarizeError`] when the model call fails.
    async fn summarize(&self, prompt: &str, text: &str) -> Result<String, SummarizeError>;
}
