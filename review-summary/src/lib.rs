//! Hierarchical summarisation of review texts.
//!
//! Review lists can be far larger than a model's context window. The
//! pipeline therefore works in two stages:
//! 1. [`chunk`] packs the texts greedily into [`Chunk`]s that fit a token
//!    budget.
//! 2. [`summarize_all`] summarises every chunk concurrently and, when more
//!    than one chunk succeeded, merges the partial summaries with one more
//!    model call.
//!
//! [`summarize_reviews`] composes both stages using a [`SummaryConfig`].

#![forbid(unsafe_code)]
#![cfg_attr(docsrs, feature(doc_cfg))]

use std::num::NonZeroUsize;

use review_core::{Summarizer, TokenCounter};
use tokio_util::sync::CancellationToken;

mod chunk;
mod error;
mod reduce;

pub use chunk::{Chunk, MEMBER_SEPARATOR, chunk};
pub use error::{ChunkError, ReduceError, SummaryError};
pub use reduce::{
    DEFAULT_CONCURRENCY, ReduceOptions, SUMMARY_SEPARATOR, SummaryPrompts, summarize_all,
};

/// Default token budget per chunk, matching a 128k-token context window.
pub const DEFAULT_MAX_TOKENS: usize = 128_000;

/// Settings for [`summarize_reviews`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SummaryConfig {
    /// Token budget per chunk.
    pub max_tokens: usize,
    /// Maximum number of chunk calls in flight.
    pub concurrency: NonZeroUsize,
    /// Prompts for chunk and merge calls.
    pub prompts: SummaryPrompts,
}

impl Default for SummaryConfig {
    fn default() -> Self {
        Self {
            max_tokens: DEFAULT_MAX_TOKENS,
            concurrency: DEFAULT_CONCURRENCY,
            prompts: SummaryPrompts::default(),
        }
    }
}

impl SummaryConfig {
    /// Override the per-chunk token budget.
    #[must_use]
    pub const fn with_max_tokens(mut self, max_tokens: usize) -> Self {
        self.max_tokens = max_tokens;
        self
    }

    /// Override the number of concurrent chunk calls.
    #[must_use]
    pub const fn with_concurrency(mut self, concurrency: NonZeroUsize) -> Self {
        self.concurrency = concurrency;
        self
    }

    /// Override the prompts.
    #[must_use]
    pub fn with_prompts(mut self, prompts: SummaryPrompts) -> Self {
        self.prompts = prompts;
        self
    }

    /// Reduction options derived from this configuration.
    #[must_use]
    pub const fn reduce_options(&self) -> ReduceOptions {
        ReduceOptions {
            concurrency: self.concurrency,
        }
    }
}

/// Chunk `texts` and reduce them to a single summary.
///
/// # Errors
/// Returns [`SummaryError::Chunk`] for an invalid token budget and
/// [`SummaryError::Reduce`] when summarisation fails, including when `texts`
/// is empty.
///
/// # Examples
///
/// ```
/// use async_trait::async_trait;
/// use review_core::{SummarizeError, Summarizer, WhitespaceTokenCounter};
/// use review_summary::{SummaryConfig, summarize_reviews};
/// use tokio_util::sync::CancellationToken;
///
/// struct Echo;
///
/// #[async_trait]
/// impl Summarizer for Echo {
///     async fn summarize(&self, _prompt: &str, text: &str) -> Result<String, SummarizeError> {
///         Ok(text.to_uppercase())
///     }
/// }
///
/// # tokio::runtime::Builder::new_current_thread().build().expect("runtime").block_on(async {
/// let summary = summarize_reviews(
///     ["great food", "slow service"],
///     &WhitespaceTokenCounter,
///     &Echo,
///     &SummaryConfig::default(),
///     &CancellationToken::new(),
/// )
/// .await
/// .expect("summary");
/// assert_eq!(summary, "GREAT FOOD SLOW SERVICE");
/// # });
/// ```
pub async fn summarize_reviews<I, C, S>(
    texts: I,
    counter: &C,
    summarizer: &S,
    config: &SummaryConfig,
    cancel: &CancellationToken,
) -> Result<String, SummaryError>
where
    I: IntoIterator,
    I::Item: Into<String>,
    C: TokenCounter + ?Sized,
    S: Summarizer + ?Sized,
{
    let chunks = chunk(texts, config.max_tokens, counter)?;
    let summary = summarize_all(
        &chunks,
        summarizer,
        &config.prompts,
        config.reduce_options(),
        cancel,
    )
    .await?;
    Ok(summary)
}
