//! Request-level orchestration of review fetching, scoring and summarising.

use std::sync::Arc;

use chrono::{NaiveDateTime, Utc};
use log::info;
use review_core::{
    PlaceReviews, Review, ReviewSource, ReviewSourceError, ScoreTextError, Summarizer,
    TextScorer, TokenCounter, WhitespaceTokenCounter, normalize,
};
use review_scorer::{AggregateError, Rounding, WeightingPolicy, aggregate};
use review_summary::{SummaryConfig, SummaryError, summarize_reviews};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tokio_util::sync::CancellationToken;

/// Default number of reviews requested per place.
pub const DEFAULT_REVIEW_COUNT: usize = 10;

/// Weighted score of a place.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlaceScore {
    /// Provider place identifier.
    pub place_id: String,
    /// Canonical place name.
    pub place_name: String,
    /// Rounded weighted mean of the review scores.
    pub score: f64,
}

/// Summary of a place's reviews.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlaceSummary {
    /// Merged model summary.
    pub summary: String,
}

/// Score and summary computed from one fetch of a place's reviews.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlaceReport {
    /// Provider place identifier.
    pub place_id: String,
    /// Canonical place name.
    pub place_name: String,
    /// Rounded weighted mean of the review scores.
    pub score: f64,
    /// Merged model summary.
    pub summary: String,
}

/// Errors raised by [`PlaceReviewService`].
///
/// A place without usable reviews is not an error; operations return
/// `Ok(None)` instead.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ServiceError {
    /// The review provider failed.
    #[error("failed to fetch reviews")]
    Source(#[from] ReviewSourceError),
    /// Aggregating the place score failed.
    #[error("failed to score place")]
    Score(#[from] AggregateError),
    /// Scoring a single text failed.
    #[error("failed to score review text")]
    ScoreText(#[from] ScoreTextError),
    /// Summarising the reviews failed.
    #[error("failed to summarise reviews")]
    Summary(#[from] SummaryError),
    /// The background scoring task panicked or was aborted.
    #[error("scoring task failed: {message}")]
    Task {
        /// Join error message.
        message: String,
    },
}

/// Tunable behaviour of [`PlaceReviewService`].
#[derive(Debug, Clone, PartialEq)]
pub struct ServiceConfig {
    /// Review weighting constants.
    pub weighting: WeightingPolicy,
    /// Rounding applied to place scores.
    pub rounding: Rounding,
    /// Chunking and reduction settings.
    pub summary: SummaryConfig,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            weighting: WeightingPolicy::default(),
            rounding: Rounding::FloorToOneDecimal,
            summary: SummaryConfig::default(),
        }
    }
}

/// Entry point answering place score, summary and report requests.
///
/// Reviews are fetched from a [`ReviewSource`], cleaned with
/// [`normalize`], then scored with a [`TextScorer`] and summarised with a
/// [`Summarizer`]. A place whose provider has no reviews, or whose reviews
/// are all dropped by normalisation, yields `Ok(None)`.
///
/// # Examples
///
/// ```
/// use std::sync::Arc;
///
/// use review_core::test_support::{FixedScorer, MemorySource, StubSummarizer};
/// use review_core::Review;
/// use review_engine::PlaceReviewService;
///
/// let source = MemorySource::default()
///     .with_place("p1", "Cafe Rio", vec![Review::new("Great food!")]);
/// let service = PlaceReviewService::new(
///     Arc::new(source),
///     Arc::new(FixedScorer(4.27)),
///     Arc::new(StubSummarizer::new()),
/// );
/// let runtime = tokio::runtime::Builder::new_current_thread()
///     .build()
///     .expect("runtime");
/// let score = runtime
///     .block_on(service.get_place_score("Cafe Rio", 10))
///     .expect("score")
///     .expect("place exists");
/// assert_eq!(score.score, 4.2);
/// ```
pub struct PlaceReviewService {
    source: Arc<dyn ReviewSource>,
    scorer: Arc<dyn TextScorer>,
    summarizer: Arc<dyn Summarizer>,
    counter: Arc<dyn TokenCounter>,
    config: ServiceConfig,
    reference_time: Option<NaiveDateTime>,
    cancel: CancellationToken,
}

impl std::fmt::Debug for PlaceReviewService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PlaceReviewService")
            .field("config", &self.config)
            .field("reference_time", &self.reference_time)
            .field("cancelled", &self.cancel.is_cancelled())
            .finish_non_exhaustive()
    }
}

impl PlaceReviewService {
    /// Create a service with default configuration and a whitespace token
    /// counter.
    #[must_use]
    pub fn new(
        source: Arc<dyn ReviewSource>,
        scorer: Arc<dyn TextScorer>,
        summarizer: Arc<dyn Summarizer>,
    ) -> Self {
        Self {
            source,
            scorer,
            summarizer,
            counter: Arc::new(WhitespaceTokenCounter),
            config: ServiceConfig::default(),
            reference_time: None,
            cancel: CancellationToken::new(),
        }
    }

    /// Replace the token counter used for chunking.
    #[must_use]
    pub fn with_token_counter(mut self, counter: Arc<dyn TokenCounter>) -> Self {
        self.counter = counter;
        self
    }

    /// Replace the whole configuration.
    #[must_use]
    pub fn with_config(mut self, config: ServiceConfig) -> Self {
        self.config = config;
        self
    }

    /// Measure review age against a fixed instant instead of the current
    /// UTC time.
    #[must_use]
    pub const fn with_reference_time(mut self, now: NaiveDateTime) -> Self {
        self.reference_time = Some(now);
        self
    }

    /// Use `cancel` to abort in-flight summaries.
    #[must_use]
    pub fn with_cancellation(mut self, cancel: CancellationToken) -> Self {
        self.cancel = cancel;
        self
    }

    /// Active configuration.
    #[must_use]
    pub const fn config(&self) -> &ServiceConfig {
        &self.config
    }

    /// Token that cancels in-flight summaries when triggered.
    #[must_use]
    pub fn cancellation_token(&self) -> CancellationToken {
        self.cancel.clone()
    }

    /// Weighted, rounded score for `place_name` from up to `max_reviews`
    /// reviews.
    ///
    /// Scoring runs on the blocking thread pool because [`TextScorer`] is
    /// synchronous.
    ///
    /// # Errors
    /// Returns [`ServiceError`] when fetching or scoring fails.
    pub async fn get_place_score(
        &self,
        place_name: &str,
        max_reviews: usize,
    ) -> Result<Option<PlaceScore>, ServiceError> {
        let Some(place) = self.fetch_normalized(place_name, max_reviews).await? else {
            return Ok(None);
        };
        let score = self.score_blocking(place.reviews).await?;
        info!("scored {:?} at {score}", place.place_name);
        Ok(Some(PlaceScore {
            place_id: place.place_id,
            place_name: place.place_name,
            score,
        }))
    }

    /// Summary of up to `max_reviews` reviews of `place_name`.
    ///
    /// # Errors
    /// Returns [`ServiceError`] when fetching or summarising fails.
    pub async fn get_place_summary(
        &self,
        place_name: &str,
        max_reviews: usize,
    ) -> Result<Option<PlaceSummary>, ServiceError> {
        let Some(place) = self.fetch_normalized(place_name, max_reviews).await? else {
            return Ok(None);
        };
        let summary = self.summarize(&place.reviews).await?;
        info!("summarised {:?}", place.place_name);
        Ok(Some(PlaceSummary { summary }))
    }

    /// Score and summary from a single fetch, computed concurrently.
    ///
    /// Scoring runs on the blocking thread pool because [`TextScorer`] is
    /// synchronous.
    ///
    /// # Errors
    /// Returns [`ServiceError`] when fetching, scoring or summarising fails.
    pub async fn get_place_report(
        &self,
        place_name: &str,
        max_reviews: usize,
    ) -> Result<Option<PlaceReport>, ServiceError> {
        let Some(place) = self.fetch_normalized(place_name, max_reviews).await? else {
            return Ok(None);
        };
        let (score, summary) = tokio::join!(
            self.score_blocking(place.reviews.clone()),
            self.summarize(&place.reviews)
        );
        let (score, summary) = (score?, summary?);
        info!("reported {:?} at {score}", place.place_name);
        Ok(Some(PlaceReport {
            place_id: place.place_id,
            place_name: place.place_name,
            score,
            summary,
        }))
    }

    /// Raw model score for one piece of text.
    ///
    /// The text is neither normalised nor rounded. The scorer may block, so
    /// call this outside asynchronous contexts or from a blocking task.
    ///
    /// # Errors
    /// Returns [`ServiceError::ScoreText`] when the scorer fails.
    pub fn score_single_review(&self, text: &str) -> Result<f64, ServiceError> {
        Ok(self.scorer.score_text(text)?)
    }

    async fn fetch_normalized(
        &self,
        place_name: &str,
        max_reviews: usize,
    ) -> Result<Option<PlaceReviews>, ServiceError> {
        let mut place = match self.source.fetch_reviews(place_name, max_reviews).await {
            Ok(place) => place,
            Err(ReviewSourceError::NotFound { .. }) => {
                info!("no reviews found for {place_name:?}");
                return Ok(None);
            }
            Err(err) => return Err(err.into()),
        };
        let fetched = place.reviews.len();
        place.reviews = normalize(&place.reviews);
        if place.reviews.is_empty() {
            info!("all {fetched} reviews for {place_name:?} were dropped by normalisation");
            return Ok(None);
        }
        Ok(Some(place))
    }

    async fn score_blocking(&self, reviews: Vec<Review>) -> Result<f64, ServiceError> {
        let scorer = Arc::clone(&self.scorer);
        let now = self.now();
        let weighting = self.config.weighting;
        let scoring =
            tokio::task::spawn_blocking(move || aggregate(&reviews, &*scorer, now, &weighting));
        let raw = scoring.await.map_err(|err| ServiceError::Task {
            message: err.to_string(),
        })??;
        Ok(self.config.rounding.apply(raw))
    }

    async fn summarize(&self, reviews: &[Review]) -> Result<String, ServiceError> {
        let summary = summarize_reviews(
            reviews.iter().map(|review| review.text.as_str()),
            &*self.counter,
            &*self.summarizer,
            &self.config.summary,
            &self.cancel,
        )
        .await?;
        Ok(summary)
    }

    fn now(&self) -> NaiveDateTime {
        self.reference_time.unwrap_or_else(|| Utc::now().naive_utc())
    }
}
