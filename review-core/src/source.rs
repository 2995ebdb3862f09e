//! Fetch reviews for a named place from a data provider.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::Review;

/// Reviews for one place together with the provider's identifiers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlaceReviews {
    /// Provider-assigned place identifier.
    pub place_id: String,
    /// Canonical place name as reported by the provider.
    pub place_name: String,
    /// Reviews in provider order.
    pub reviews: Vec<Review>,
}

/// Errors from [`ReviewSource::fetch_reviews`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ReviewSourceError {
    /// The provider knows no reviews for the requested place.
    ///
    /// Callers surface this as an empty result rather than a failure.
    #[error("no reviews found for place {place_name:?}")]
    NotFound {
        /// Place name that was requested.
        place_name: String,
    },
    /// The provider could not be reached.
    #[error("network error calling {url}: {message}")]
    Network {
        /// Endpoint that failed.
        url: String,
        /// Underlying error message.
        message: String,
    },
    /// The provider answered with a non-success HTTP status.
    #[error("HTTP {status} from {url}: {message}")]
    Http {
        /// Endpoint that failed.
        url: String,
        /// HTTP status code.
        status: u16,
        /// Response or client message.
        message: String,
    },
    /// A local review file could not be read.
    #[error("failed to read reviews from {path}: {message}")]
    Io {
        /// File that failed.
        path: String,
        /// Underlying error message.
        message: String,
    },
    /// The provider payload could not be decoded.
    #[error("failed to parse review payload: {message}")]
    Parse {
        /// Decoder message.
        message: String,
    },
}

/// Retrieve up to `limit` reviews for a place.
///
/// # Examples
///
/// ```rust
/// use async_trait::async_trait;
/// use review_core::{PlaceReviews, Review, ReviewSource, ReviewSourceError};
///
/// struct SingleReview;
///
/// #[async_trait]
/// impl ReviewSource for SingleReview {
///     async fn fetch_reviews(
///         &self,
///         place_name: &str,
///         _limit: usize,
///     ) -> Result<PlaceReviews, ReviewSourceError> {
///         Ok(PlaceReviews {
///             place_id: "1".to_owned(),
///             place_name: place_name.to_owned(),
///             reviews: vec![Review::new("Lovely")],
///         })
///     }
/// }
/// ```
#[async_trait]
pub trait ReviewSource: Send + Sync {
    /// Fetch reviews for `place_name`.
    ///
    /// # Errors
    /// Returns [`ReviewSourceError::NotFound`] when the place has no reviews,
    /// or another variant when the provider fails.
    async fn fetch_reviews(
        &self,
        place_name: &str,
        limit: usize,
    ) -> Result<PlaceReviews, ReviewSourceError>;
}
