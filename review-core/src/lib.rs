//! Core domain types for the review engine.
//!
//! A [`Review`] is the unit every pipeline works on: the scoring pipeline
//! weights and aggregates reviews into a place score, the summary pipeline
//! chunks their texts for a summarisation model. The collaborator traits
//! ([`TextScorer`], [`Summarizer`], [`TokenCounter`], [`ReviewSource`]) are the
//! seams where external models and data providers plug in.

#![forbid(unsafe_code)]
#![cfg_attr(docsrs, feature(doc_cfg))]

use serde::{Deserialize, Serialize};

pub mod normalize;
pub mod scorer;
pub mod source;
pub mod summarizer;
pub mod tokens;

#[cfg(any(test, feature = "test-support"))]
#[cfg_attr(docsrs, doc(cfg(feature = "test-support")))]
pub mod test_support;

pub use normalize::{normalize, normalize_text};
pub use scorer::{ScoreTextError, TextScorer};
pub use source::{PlaceReviews, ReviewSource, ReviewSourceError};
pub use summarizer::{SummarizeError, Summarizer};
pub use tokens::{TokenCounter, WhitespaceTokenCounter};

/// A single text review of a place.
///
/// `publish_date` is kept as the raw string supplied by the data provider;
/// parsing happens when the review is weighted so unparsable dates never
/// reject a review.
///
/// # Examples
///
/// ```
/// use review_core::Review;
///
/// let review = Review::new("Great food")
///     .with_likes(3)
///     .with_reviews_by_reviewer(12)
///     .with_publish_date("2024-05-01T12:30:00");
/// assert_eq!(review.likes, 3);
/// assert_eq!(review.reviews_by_reviewer, 12);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Review {
    /// Free-form review body.
    pub text: String,
    /// Number of likes the review received.
    pub likes: u64,
    /// Number of reviews the author has written in total.
    pub reviews_by_reviewer: u64,
    /// Raw publish timestamp as reported by the provider.
    pub publish_date: String,
}

impl Review {
    /// Construct a review with no likes, no author history and no date.
    #[must_use]
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            likes: 0,
            reviews_by_reviewer: 0,
            publish_date: String::new(),
        }
    }

    /// Set the like count.
    #[must_use]
    pub const fn with_likes(mut self, likes: u64) -> Self {
        self.likes = likes;
        self
    }

    /// Set the author's total review count.
    #[must_use]
    pub const fn with_reviews_by_reviewer(mut self, reviews_by_reviewer: u64) -> Self {
        self.reviews_by_reviewer = reviews_by_reviewer;
        self
    }

    /// Set the raw publish date.
    #[must_use]
    pub fn with_publish_date(mut self, publish_date: impl Into<String>) -> Self {
        self.publish_date = publish_date.into();
        self
    }
}

/// Review payload as delivered by a data provider.
///
/// Providers omit fields freely, so every field is optional here. Converting
/// into [`Review`] fills the gaps with neutral values: empty text, zero
/// counters and an empty (unparsable) date.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawReview {
    /// Review body, if supplied.
    #[serde(default)]
    pub text: Option<String>,
    /// Like count, if supplied.
    #[serde(default)]
    pub likes: Option<u64>,
    /// Author review count, if supplied.
    #[serde(default)]
    pub reviews_by_reviewer: Option<u64>,
    /// Raw publish timestamp, if supplied.
    #[serde(default)]
    pub publish_date: Option<String>,
}

impl From<RawReview> for Review {
    fn from(raw: RawReview) -> Self {
        Self {
            text: raw.text.unwrap_or_default(),
            likes: raw.likes.unwrap_or_default(),
            reviews_by_reviewer: raw.reviews_by_reviewer.unwrap_or_default(),
            publish_date: raw.publish_date.unwrap_or_default(),
        }
    }
}
