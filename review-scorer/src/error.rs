//! Error types raised while weighting and aggregating review scores.
#![forbid(unsafe_code)]

use review_core::ScoreTextError;
use thiserror::Error;

/// Errors raised by [`aggregate`](crate::aggregate).
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AggregateError {
    /// No reviews were supplied.
    ///
    /// A place score is undefined without reviews. Callers should check for
    /// an empty review list before aggregating.
    #[error("at least one review is required to aggregate a score")]
    EmptyInput,
    /// The text scorer failed for one review.
    #[error("failed to score review {index}")]
    Score {
        /// Position of the review in the input slice.
        index: usize,
        /// Source error from the scorer.
        #[source]
        source: ScoreTextError,
    },
    /// Every review carried zero weight, so no mean exists.
    #[error("total review weight is zero")]
    ZeroWeight,
}

/// Errors raised by [`WeightingPolicy::validate`](crate::WeightingPolicy::validate).
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum WeightingPolicyError {
    /// A constant was NaN or infinite.
    #[error("weighting constant {field} must be finite")]
    NonFinite {
        /// Name of the offending field.
        field: &'static str,
    },
    /// A constant was negative.
    #[error("weighting constant {field} must not be negative")]
    Negative {
        /// Name of the offending field.
        field: &'static str,
    },
    /// The recency floor was zero, which would allow zero weights.
    #[error("recency floor must be positive")]
    NonPositiveFloor,
}

/// Error returned when parsing an unknown rounding policy name.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown rounding policy {name:?} (expected floor, half or none)")]
pub struct ParseRoundingError {
    /// The rejected input.
    pub name: String,
}
