//! Weighted place scoring from individual reviews.
//!
//! Each review is scored by a [`TextScorer`](review_core::TextScorer) and
//! weighted by three signals:
//! - **Likes**: `(likes + 1)^0.5`, so popular reviews count for more.
//! - **Reviewer authority**: `(reviews_by_reviewer + 1)^0.25`, so prolific
//!   reviewers count slightly more.
//! - **Recency**: `4 / (1 + 0.01 * days^1.5) + 1`, so a fresh review weighs
//!   up to five times an ancient one. Unparsable publish dates weigh `1`.
//!
//! The place score is the weighted mean of the review scores. The constants
//! live in [`WeightingPolicy`]; [`Rounding`] controls how the final score is
//! presented.
//!
//! # Examples
//!
//! ```
//! use chrono::NaiveDate;
//! use review_core::{Review, ScoreTextError, TextScorer};
//! use review_scorer::{Rounding, WeightingPolicy, aggregate};
//!
//! struct Length;
//!
//! impl TextScorer for Length {
//!     fn score_text(&self, text: &str) -> Result<f64, ScoreTextError> {
//!         Ok(if text.len() > 10 { 4.75 } else { 2.0 })
//!     }
//! }
//!
//! let now = NaiveDate::from_ymd_opt(2025, 6, 1)
//!     .and_then(|date| date.and_hms_opt(0, 0, 0))
//!     .expect("valid date");
//! let reviews = [Review::new("Lovely terrace and staff")];
//! let raw = aggregate(&reviews, &Length, now, &WeightingPolicy::default())
//!     .expect("aggregate");
//! assert_eq!(Rounding::FloorToOneDecimal.apply(raw), 4.7);
//! ```

#![forbid(unsafe_code)]
#![cfg_attr(docsrs, feature(doc_cfg))]

mod aggregate;
mod date;
mod error;
mod types;
mod weight;

pub use aggregate::{WeightedMean, aggregate};
pub use date::{PublishDateFormat, parse_publish_date};
pub use error::{AggregateError, ParseRoundingError, WeightingPolicyError};
pub use types::{
    Rounding, WeightedScore, WeightingPolicy, floor_to_one_decimal, round_to_nearest_half,
};
pub use weight::{
    authority_weight, days_ago, likes_weight, publish_date_weight, recency_weight, review_weight,
};
