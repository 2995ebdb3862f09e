//! Score a single review body.
//!
//! The `TextScorer` trait wraps whatever model turns review text into a raw
//! numeric rating. The engine treats the model as opaque: it only needs a
//! number back for each text.

use thiserror::Error;

/// Errors from [`TextScorer::score_text`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ScoreTextError {
    /// The scoring service could not be reached or answered with a failure.
    #[error("scoring service unavailable: {message}")]
    Unavailable {
        /// Human-readable failure description.
        message: String,
    },
    /// The scoring service replied with something that is not a score.
    #[error("invalid score response: {message}")]
    InvalidResponse {
        /// Human-readable failure description.
        message: String,
    },
}

/// Turn one review's text into a raw score.
///
/// Implementations must be thread-safe (`Send` + `Sync`) and may block, for
/// example while waiting on a remote model. The engine imposes no timeout;
/// implementations own their timeout and retry policy.
///
/// # Examples
///
/// ```rust
/// use review_core::{ScoreTextError, TextScorer};
///
/// struct LengthScorer;
///
/// impl TextScorer for LengthScorer {
///     fn score_text(&self, text: &str) -> Result<f64, ScoreTextError> {
///         Ok(if text.len() > 10 { 5.0 } else { 1.0 })
///     }
/// }
///
/// assert_eq!(LengthScorer.score_text("short"), Ok(1.0));
/// ```
pub trait TextScorer: Send + Sync {
    /// Return the raw score for `text`.
    ///
    /// # Errors
    /// Returns [`ScoreTextError`] when the underlying model cannot produce a
    /// score.
    fn score_text(&self, text: &str) -> Result<f64, ScoreTextError>;
}
