//! Map-then-merge reduction of chunk summaries.

use std::num::NonZeroUsize;

use futures_util::stream::{self, StreamExt};
use log::{debug, info, warn};
use review_core::{SummarizeError, Summarizer};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tokio_util::sync::CancellationToken;

use crate::{Chunk, ReduceError};

/// Separator placed between chunk summaries before the merge call.
pub const SUMMARY_SEPARATOR: &str = " | ";

/// Default number of chunk calls in flight at once.
pub const DEFAULT_CONCURRENCY: NonZeroUsize = NonZeroUsize::MIN.saturating_add(3);

const BASE_PROMPT: &str = r"Summarize the following reviews which came from multiple reviewers in the following format,
  (if there is nothing that fits the category based on the reviews then leave it empty):
  **Summary:**
   * **Positive Reviews:**
        - positive topic from reviews number 1
        - positive topic from reviews number 2

   * **Neutral Reviews:**
        - neutral topic 1

   * **Negative Reviews:**
        - negative topic, or constructive criticism 1

   * **Recommended Dishes:**
        - most recommended dish
        - slightly less recommended dish
   ";

const MERGE_PROMPT: &str = "Each summary separated by '|' is generated for about 500 reviews. \
Summarize the summaries into one summary and keep the same format: ";

/// Instructions sent to the summariser.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SummaryPrompts {
    /// Prompt applied to every chunk of reviews.
    pub base: String,
    /// Prompt applied to the `" | "`-joined chunk summaries.
    pub merge: String,
}

impl Default for SummaryPrompts {
    fn default() -> Self {
        Self {
            base: BASE_PROMPT.to_owned(),
            merge: MERGE_PROMPT.to_owned(),
        }
    }
}

impl SummaryPrompts {
    /// Replace the per-chunk prompt.
    #[must_use]
    pub fn with_base(mut self, base: impl Into<String>) -> Self {
        self.base = base.into();
        self
    }

    /// Replace the merge prompt.
    #[must_use]
    pub fn with_merge(mut self, merge: impl Into<String>) -> Self {
        self.merge = merge.into();
        self
    }
}

/// Tuning for [`summarize_all`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReduceOptions {
    /// Maximum number of chunk calls in flight.
    pub concurrency: NonZeroUsize,
}

impl Default for ReduceOptions {
    fn default() -> Self {
        Self {
            concurrency: DEFAULT_CONCURRENCY,
        }
    }
}

#[derive(Debug, Error)]
enum ChunkFailure {
    #[error(transparent)]
    Summarize(SummarizeError),
    #[error("cancelled")]
    Cancelled,
}

/// Summarise every chunk, then merge the partial summaries into one.
///
/// Chunk calls run concurrently, at most `options.concurrency` at a time,
/// each with `prompts.base`. Failed or cancelled chunks are logged and
/// skipped alike, so a cancelled run keeps the chunks that already finished.
/// Surviving summaries are ordered by chunk position:
/// - one survivor is returned as is, without a merge call;
/// - several survivors are joined with [`SUMMARY_SEPARATOR`] and summarised
///   once more with `prompts.merge`.
///
/// The merge only starts once every chunk call has finished.
///
/// # Errors
/// - [`ReduceError::EmptyInput`] when `chunks` is empty.
/// - [`ReduceError::AllChunksFailed`] when no chunk produced a summary.
/// - [`ReduceError::Cancelled`] when `cancel` fires before the merge call
///   completes.
/// - [`ReduceError::Merge`] when the merge call fails.
pub async fn summarize_all<S>(
    chunks: &[Chunk],
    summarizer: &S,
    prompts: &SummaryPrompts,
    options: ReduceOptions,
    cancel: &CancellationToken,
) -> Result<String, ReduceError>
where
    S: Summarizer + ?Sized,
{
    if chunks.is_empty() {
        return Err(ReduceError::EmptyInput);
    }
    let attempted = chunks.len();

    let mut outcomes: Vec<(usize, Result<String, ChunkFailure>)> =
        stream::iter(chunks.iter().enumerate())
            .map(|(index, chunk)| async move {
                let outcome = tokio::select! {
                    biased;
                    () = cancel.cancelled() => Err(ChunkFailure::Cancelled),
                    result = summarizer.summarize(&prompts.base, chunk.text()) => {
                        result.map_err(ChunkFailure::Summarize)
                    }
                };
                (index, outcome)
            })
            .buffer_unordered(options.concurrency.get())
            .collect()
            .await;
    outcomes.sort_unstable_by_key(|(index, _)| *index);

    let mut summaries = Vec::with_capacity(attempted);
    for (index, outcome) in outcomes {
        match outcome {
            Ok(summary) => {
                debug!("summarised chunk {}/{attempted}", index + 1);
                summaries.push(summary);
            }
            Err(failure) => warn!("skipping chunk {}/{attempted}: {failure}", index + 1),
        }
    }

    if summaries.len() <= 1 {
        let only = summaries
            .pop()
            .ok_or(ReduceError::AllChunksFailed { attempted })?;
        info!("summary completed from a single chunk");
        return Ok(only);
    }
    let combined = summaries.join(SUMMARY_SEPARATOR);

    let merged = tokio::select! {
        biased;
        () = cancel.cancelled() => Err(ReduceError::Cancelled),
        result = summarizer.summarize(&prompts.merge, &combined) => {
            result.map_err(|source| ReduceError::Merge { source })
        }
    }?;
    info!(
        "summary completed by merging {} of {attempted} chunk summaries",
        summaries.len()
    );
    Ok(merged)
}
