//! Per-review weighting from likes, reviewer authority and recency.

use chrono::NaiveDateTime;
use review_core::Review;

use crate::{WeightingPolicy, parse_publish_date};

/// Weight contributed by a review's like count: `(likes + 1)^likes_exponent`.
#[expect(
    clippy::cast_precision_loss,
    reason = "like counts beyond 2^53 are not meaningful inputs"
)]
#[expect(clippy::float_arithmetic, reason = "weighting is floating point")]
#[must_use]
pub fn likes_weight(likes: u64, policy: &WeightingPolicy) -> f64 {
    (likes as f64 + 1.0_f64).powf(policy.likes_exponent)
}

/// Weight contributed by how many reviews the author has written:
/// `(reviews_by_reviewer + 1)^authority_exponent`.
#[expect(
    clippy::cast_precision_loss,
    reason = "review counts beyond 2^53 are not meaningful inputs"
)]
#[expect(clippy::float_arithmetic, reason = "weighting is floating point")]
#[must_use]
pub fn authority_weight(reviews_by_reviewer: u64, policy: &WeightingPolicy) -> f64 {
    (reviews_by_reviewer as f64 + 1.0_f64).powf(policy.authority_exponent)
}

/// Recency weight for a review published `days_ago` whole days before now.
///
/// With the default policy a review from today weighs `5` and the weight
/// decays towards `1` as the review ages.
///
/// # Examples
///
/// ```
/// use review_scorer::{WeightingPolicy, recency_weight};
///
/// let policy = WeightingPolicy::default();
/// assert_eq!(recency_weight(0, &policy), 5.0);
/// assert!(recency_weight(100, &policy) < recency_weight(10, &policy));
/// ```
#[expect(
    clippy::cast_precision_loss,
    reason = "day counts beyond 2^53 are not meaningful inputs"
)]
#[expect(clippy::float_arithmetic, reason = "weighting is floating point")]
#[must_use]
pub fn recency_weight(days_ago: u64, policy: &WeightingPolicy) -> f64 {
    let decay = policy.recency_decay_rate * (days_ago as f64).powf(policy.recency_decay_exponent);
    policy.recency_amplitude / (1.0_f64 + decay) + policy.recency_floor
}

/// Whole days elapsed between `published` and `now`.
///
/// Dates in the future count as zero days ago.
#[must_use]
pub fn days_ago(published: NaiveDateTime, now: NaiveDateTime) -> u64 {
    u64::try_from(now.signed_duration_since(published).num_days()).unwrap_or(0)
}

/// Recency weight for a raw publish date string.
///
/// Unparsable dates yield `1.0`, the neutral weight, independent of the
/// policy floor.
#[must_use]
pub fn publish_date_weight(raw: &str, now: NaiveDateTime, policy: &WeightingPolicy) -> f64 {
    parse_publish_date(raw).map_or(1.0_f64, |published| {
        recency_weight(days_ago(published, now), policy)
    })
}

/// Combined weight of one review.
///
/// The weight is the product of [`likes_weight`], [`authority_weight`] and
/// [`publish_date_weight`].
#[expect(clippy::float_arithmetic, reason = "weighting is floating point")]
#[must_use]
pub fn review_weight(review: &Review, now: NaiveDateTime, policy: &WeightingPolicy) -> f64 {
    likes_weight(review.likes, policy)
        * authority_weight(review.reviews_by_reviewer, policy)
        * publish_date_weight(&review.publish_date, now, policy)
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;
    use rstest::{fixture, rstest};

    use super::*;

    #[fixture]
    fn policy() -> WeightingPolicy {
        WeightingPolicy::default()
    }

    fn noon(year: i32, month: u32, day: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(year, month, day)
            .and_then(|date| date.and_hms_opt(12, 0, 0))
            .expect("valid date")
    }

    #[rstest]
    #[case(0, 1.0)]
    #[case(3, 2.0)]
    #[case(99, 10.0)]
    fn likes_use_square_root(policy: WeightingPolicy, #[case] likes: u64, #[case] expected: f64) {
        assert!((likes_weight(likes, &policy) - expected).abs() < 1e-12);
    }

    #[rstest]
    #[case(0, 1.0)]
    #[case(15, 2.0)]
    #[case(80, 3.0)]
    fn authority_uses_fourth_root(
        policy: WeightingPolicy,
        #[case] reviews: u64,
        #[case] expected: f64,
    ) {
        assert!((authority_weight(reviews, &policy) - expected).abs() < 1e-12);
    }

    #[rstest]
    fn recency_starts_at_five_and_decays(policy: WeightingPolicy) {
        assert!((recency_weight(0, &policy) - 5.0).abs() < 1e-12);
        assert!((recency_weight(100, &policy) - (1.0 + 4.0 / 11.0)).abs() < 1e-12);
        let old = recency_weight(100_000, &policy);
        assert!(old > 1.0 && old < 1.001, "old review weight {old}");
    }

    #[rstest]
    fn future_dates_count_as_today() {
        assert_eq!(days_ago(noon(2025, 1, 2), noon(2025, 1, 1)), 0);
        assert_eq!(days_ago(noon(2024, 12, 22), noon(2025, 1, 1)), 10);
    }

    #[rstest]
    fn partial_days_are_truncated() {
        let published = NaiveDate::from_ymd_opt(2024, 12, 31)
            .and_then(|date| date.and_hms_opt(13, 0, 0))
            .expect("valid date");
        assert_eq!(days_ago(published, noon(2025, 1, 1)), 0);
    }

    #[rstest]
    fn unparsable_date_is_neutral(policy: WeightingPolicy) {
        let weight = publish_date_weight("not a date", noon(2025, 1, 1), &policy);
        assert!((weight - 1.0).abs() < f64::EPSILON);
    }

    #[rstest]
    fn combined_weight_multiplies_factors(policy: WeightingPolicy) {
        let review = Review::new("Great food")
            .with_likes(3)
            .with_reviews_by_reviewer(15)
            .with_publish_date("2025-01-01T12:00:00");
        let weight = review_weight(&review, noon(2025, 1, 1), &policy);
        assert!((weight - 2.0 * 2.0 * 5.0).abs() < 1e-9, "weight {weight}");
    }

    #[rstest]
    fn review_without_signals_weighs_one(policy: WeightingPolicy) {
        let weight = review_weight(&Review::new("ok"), noon(2025, 1, 1), &policy);
        assert!((weight - 1.0).abs() < f64::EPSILON);
    }
}
