//! Weighted aggregation of per-review scores into a place score.

use chrono::NaiveDateTime;
use log::debug;
use review_core::{Review, TextScorer};

use crate::{AggregateError, WeightedScore, WeightingPolicy, review_weight};

/// Streaming weighted arithmetic mean.
///
/// The mean is updated incrementally as `mean += (w / W) * (score - mean)`,
/// so a single observation yields its score exactly and large totals do not
/// accumulate a separate weighted sum.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct WeightedMean {
    total_weight: f64,
    mean: f64,
}

impl WeightedMean {
    /// Create an empty accumulator.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            total_weight: 0.0_f64,
            mean: 0.0_f64,
        }
    }

    /// Fold one weighted score into the mean.
    ///
    /// Observations with zero weight leave the mean unchanged.
    #[expect(clippy::float_arithmetic, reason = "incremental mean update")]
    pub fn push(&mut self, observation: WeightedScore) {
        if observation.weight <= 0.0_f64 {
            return;
        }
        self.total_weight += observation.weight;
        self.mean += (observation.weight / self.total_weight) * (observation.score - self.mean);
    }

    /// Sum of all positive weights seen so far.
    #[must_use]
    pub const fn total_weight(&self) -> f64 {
        self.total_weight
    }

    /// Current mean, or `None` when no positive weight has been observed.
    #[must_use]
    pub fn mean(&self) -> Option<f64> {
        (self.total_weight > 0.0_f64).then_some(self.mean)
    }
}

impl Extend<WeightedScore> for WeightedMean {
    fn extend<I: IntoIterator<Item = WeightedScore>>(&mut self, iter: I) {
        for observation in iter {
            self.push(observation);
        }
    }
}

/// Score and weight every review, then combine them into one place score.
///
/// Reviews are scored in input order with `scorer`. Each score is weighted by
/// [`review_weight`] relative to `now`. The result is the weighted mean of
/// the scores, without rounding.
///
/// # Errors
/// - [`AggregateError::EmptyInput`] when `reviews` is empty.
/// - [`AggregateError::Score`] when the scorer fails for a review.
/// - [`AggregateError::ZeroWeight`] when no review carries positive weight,
///   which a validated [`WeightingPolicy`] rules out.
///
/// # Examples
///
/// ```
/// use chrono::NaiveDate;
/// use review_core::{Review, ScoreTextError, TextScorer};
/// use review_scorer::{WeightingPolicy, aggregate};
///
/// struct Constant;
///
/// impl TextScorer for Constant {
///     fn score_text(&self, _text: &str) -> Result<f64, ScoreTextError> {
///         Ok(4.2)
///     }
/// }
///
/// let now = NaiveDate::from_ymd_opt(2025, 1, 1)
///     .and_then(|date| date.and_hms_opt(0, 0, 0))
///     .expect("valid date");
/// let reviews = [Review::new("Great food").with_likes(10)];
/// let score = aggregate(&reviews, &Constant, now, &WeightingPolicy::default())
///     .expect("score");
/// assert_eq!(score, 4.2);
/// ```
pub fn aggregate<S>(
    reviews: &[Review],
    scorer: &S,
    now: NaiveDateTime,
    policy: &WeightingPolicy,
) -> Result<f64, AggregateError>
where
    S: TextScorer + ?Sized,
{
    if reviews.is_empty() {
        return Err(AggregateError::EmptyInput);
    }
    let mut mean = WeightedMean::new();
    for (index, review) in reviews.iter().enumerate() {
        let score = scorer
            .score_text(&review.text)
            .map_err(|source| AggregateError::Score { index, source })?;
        let weight = review_weight(review, now, policy);
        debug!("review {index}: score {score:.3}, weight {weight:.3}");
        mean.push(WeightedScore { score, weight });
    }
    mean.mean().ok_or(AggregateError::ZeroWeight)
}
