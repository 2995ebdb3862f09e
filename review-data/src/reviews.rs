//! Review sources backed by the scraper HTTP API or a local JSON file.
//!
//! Both sources decode the same payload:
//!
//! ```json
//! {"id": "ChIJ...", "name": "Cafe Rio", "reviews": [{"text": "...", "likes": 3}]}
//! ```
//!
//! A file may also hold an array of such payloads, one per place.

use std::time::Duration;

use async_trait::async_trait;
use camino::{Utf8Path, Utf8PathBuf};
use log::debug;
use reqwest::{Client, StatusCode, Url};
use review_core::{PlaceReviews, RawReview, Review, ReviewSource, ReviewSourceError};
use serde::Deserialize;

use crate::client::{
    DEFAULT_TIMEOUT_SECS, DEFAULT_USER_AGENT, HttpFailure, ProviderBuildError, build_client,
    endpoint, parse_base_url,
};

/// Query parameter carrying the requested review count.
const MAX_REVIEWS_PARAM: &str = "max_reviews";

/// Wire shape of one place's reviews.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct PlaceReviewsPayload {
    /// Provider place identifier.
    #[serde(default)]
    pub id: Option<String>,
    /// Canonical place name.
    #[serde(default)]
    pub name: Option<String>,
    /// Reviews in provider order.
    #[serde(default)]
    pub reviews: Vec<RawReview>,
}

impl PlaceReviewsPayload {
    /// Convert into [`PlaceReviews`], keeping at most `limit` reviews.
    ///
    /// Missing identifiers fall back to the requested place name.
    ///
    /// # Errors
    /// Returns [`ReviewSourceError::NotFound`] when the payload has no reviews.
    pub fn into_place_reviews(
        self,
        requested: &str,
        limit: usize,
    ) -> Result<PlaceReviews, ReviewSourceError> {
        if self.reviews.is_empty() {
            return Err(ReviewSourceError::NotFound {
                place_name: requested.to_owned(),
            });
        }
        let reviews: Vec<Review> = self
            .reviews
            .into_iter()
            .take(limit)
            .map(Review::from)
            .collect();
        Ok(PlaceReviews {
            place_id: self.id.unwrap_or_default(),
            place_name: self.name.unwrap_or_else(|| requested.to_owned()),
            reviews,
        })
    }

    fn matches(&self, requested: &str) -> bool {
        [self.name.as_deref(), self.id.as_deref()]
            .into_iter()
            .flatten()
            .any(|candidate| candidate.eq_ignore_ascii_case(requested))
    }
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum ReviewFile {
    Many(Vec<PlaceReviewsPayload>),
    One(PlaceReviewsPayload),
}

/// Configuration for [`HttpReviewSource`].
#[derive(Debug, Clone)]
pub struct HttpReviewSourceConfig {
    /// Base URL of the review API, e.g. `"http://localhost:8080"`.
    pub base_url: String,
    /// Request timeout duration.
    pub timeout: Duration,
    /// User agent string for requests.
    pub user_agent: String,
}

impl Default for HttpReviewSourceConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:8080".to_owned(),
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            user_agent: DEFAULT_USER_AGENT.to_owned(),
        }
    }
}

impl HttpReviewSourceConfig {
    /// Create a configuration for the given base URL.
    #[must_use]
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            ..Self::default()
        }
    }

    /// Set the request timeout.
    #[must_use]
    pub const fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Set the user agent string.
    #[must_use]
    pub fn with_user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = user_agent.into();
        self
    }
}

/// [`ReviewSource`] fetching `GET {base}/place/{name}/reviews?max_reviews={n}`.
///
/// A `404` response or an empty review list maps to
/// [`ReviewSourceError::NotFound`].
#[derive(Debug)]
pub struct HttpReviewSource {
    client: Client,
    base_url: Url,
    config: HttpReviewSourceConfig,
}

impl HttpReviewSource {
    /// Create a source with default settings for `base_url`.
    ///
    /// # Errors
    /// Returns an error if the URL is unusable or the client fails to build.
    pub fn new(base_url: impl Into<String>) -> Result<Self, ProviderBuildError> {
        Self::with_config(HttpReviewSourceConfig::new(base_url))
    }

    /// Create a source with explicit configuration.
    ///
    /// # Errors
    /// Returns an error if the URL is unusable or the client fails to build.
    pub fn with_config(config: HttpReviewSourceConfig) -> Result<Self, ProviderBuildError> {
        let base_url = parse_base_url(&config.base_url)?;
        let client = build_client(&config.user_agent, config.timeout)?;
        Ok(Self {
            client,
            base_url,
            config,
        })
    }

    /// Build the reviews URL for `place_name`.
    fn reviews_url(&self, place_name: &str, limit: usize) -> Url {
        let mut url = endpoint(&self.base_url, ["place", place_name, "reviews"]);
        url.query_pairs_mut()
            .append_pair(MAX_REVIEWS_PARAM, &limit.to_string());
        url
    }

    fn convert_failure(&self, error: &reqwest::Error, url: &Url, place_name: &str) -> ReviewSourceError {
        if error.status() == Some(StatusCode::NOT_FOUND) {
            return ReviewSourceError::NotFound {
                place_name: place_name.to_owned(),
            };
        }
        match HttpFailure::from_reqwest(error, url, self.config.timeout) {
            HttpFailure::Status {
                url,
                status,
                message,
            } => ReviewSourceError::Http {
                url,
                status,
                message,
            },
            failure @ HttpFailure::Timeout { .. } => ReviewSourceError::Network {
                url: url.to_string(),
                message: failure.to_string(),
            },
            HttpFailure::Network { url, message } => ReviewSourceError::Network { url, message },
        }
    }
}

#[async_trait]
impl ReviewSource for HttpReviewSource {
    async fn fetch_reviews(
        &self,
        place_name: &str,
        limit: usize,
    ) -> Result<PlaceReviews, ReviewSourceError> {
        let url = self.reviews_url(place_name, limit);
        debug!("fetching up to {limit} reviews from {url}");
        let response = self
            .client
            .get(url.clone())
            .send()
            .await
            .and_then(reqwest::Response::error_for_status)
            .map_err(|err| self.convert_failure(&err, &url, place_name))?;
        let payload: PlaceReviewsPayload =
            response
                .json()
                .await
                .map_err(|err| ReviewSourceError::Parse {
                    message: err.to_string(),
                })?;
        payload.into_place_reviews(place_name, limit)
    }
}

/// [`ReviewSource`] reading review payloads from a JSON file.
///
/// The file holds either one payload or an array of payloads. A place is
/// matched by name or identifier, ignoring ASCII case. A single-payload file
/// only answers for its own place.
#[derive(Debug, Clone)]
pub struct FileReviewSource {
    path: Utf8PathBuf,
}

impl FileReviewSource {
    /// Create a source reading from `path`.
    #[must_use]
    pub fn new(path: impl Into<Utf8PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Path of the backing file.
    #[must_use]
    pub fn path(&self) -> &Utf8Path {
        &self.path
    }

    fn parse(&self, contents: &str) -> Result<Vec<PlaceReviewsPayload>, ReviewSourceError> {
        let file: ReviewFile =
            serde_json::from_str(contents).map_err(|err| ReviewSourceError::Parse {
                message: format!("{}: {err}", self.path),
            })?;
        Ok(match file {
            ReviewFile::Many(places) => places,
            ReviewFile::One(place) => vec![place],
        })
    }
}

#[async_trait]
impl ReviewSource for FileReviewSource {
    async fn fetch_reviews(
        &self,
        place_name: &str,
        limit: usize,
    ) -> Result<PlaceReviews, ReviewSourceError> {
        let path = self.path.clone();
        let contents = tokio::task::spawn_blocking(move || review_fs::read_utf8_file(&path))
            .await
            .map_err(|err| ReviewSourceError::Io {
                path: self.path.to_string(),
                message: err.to_string(),
            })?
            .map_err(|err| ReviewSourceError::Io {
                path: self.path.to_string(),
                message: err.to_string(),
            })?;
        let place = self
            .parse(&contents)?
            .into_iter()
            .find(|place| place.matches(place_name))
            .ok_or_else(|| ReviewSourceError::NotFound {
                place_name: place_name.to_owned(),
            })?;
        debug!("loaded reviews for {place_name:?} from {}", self.path);
        place.into_place_reviews(place_name, limit)
    }
}
