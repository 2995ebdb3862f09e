//! HTTP-backed [`TextScorer`] calling a review scoring model service.
//!
//! The service answers `GET {base}/predict_score_for_text?review={text}` with
//! `{"score": 4.2}`. [`TextScorer`] is synchronous, so the scorer blocks on
//! the request internally.

use std::time::Duration;

use log::debug;
use reqwest::{Client, Url};
use review_core::{ScoreTextError, TextScorer};
use serde::Deserialize;

use crate::client::{
    BlockingBridge, DEFAULT_TIMEOUT_SECS, DEFAULT_USER_AGENT, HttpFailure, ProviderBuildError,
    build_client, endpoint, parse_base_url,
};

const PREDICT_PATH: &str = "predict_score_for_text";
const REVIEW_PARAM: &str = "review";

/// Response body of the scoring endpoint.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
pub struct ScoreResponse {
    /// Predicted score for the submitted text.
    pub score: f64,
}

impl ScoreResponse {
    /// Return the score if it is a finite number.
    ///
    /// # Errors
    /// Returns [`ScoreTextError::InvalidResponse`] for NaN or infinite scores.
    pub fn into_score(self) -> Result<f64, ScoreTextError> {
        if self.score.is_finite() {
            Ok(self.score)
        } else {
            Err(ScoreTextError::InvalidResponse {
                message: format!("score {} is not finite", self.score),
            })
        }
    }
}

/// Configuration for [`HttpTextScorer`].
#[derive(Debug, Clone)]
pub struct HttpTextScorerConfig {
    /// Base URL of the scoring service, e.g. `"http://localhost:8000"`.
    pub base_url: String,
    /// Request timeout duration.
    pub timeout: Duration,
    /// User agent string for requests.
    pub user_agent: String,
}

impl Default for HttpTextScorerConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:8000".to_owned(),
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            user_agent: DEFAULT_USER_AGENT.to_owned(),
        }
    }
}

impl HttpTextScorerConfig {
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

/// Scores review text with a remote model.
///
/// # Runtime behaviour
///
/// The scorer owns a `current_thread` runtime used when it is called from
/// outside Tokio. Called from a multi-threaded runtime it borrows the
/// caller's runtime via [`tokio::task::block_in_place`]. Calling it from a
/// task on a `current_thread` runtime panics; run it through
/// [`tokio::task::spawn_blocking`] there instead.
///
/// The owned runtime must be dropped outside asynchronous contexts.
#[derive(Debug)]
pub struct HttpTextScorer {
    client: Client,
    base_url: Url,
    config: HttpTextScorerConfig,
    bridge: BlockingBridge,
}

impl HttpTextScorer {
    /// Create a scorer with default settings for `base_url`.
    ///
    /// # Errors
    /// Returns an error if the URL is unusable or the client or runtime fails
    /// to build.
    pub fn new(base_url: impl Into<String>) -> Result<Self, ProviderBuildError> {
        Self::with_config(HttpTextScorerConfig::new(base_url))
    }

    /// Create a scorer with explicit configuration.
    ///
    /// # Errors
    /// Returns an error if the URL is unusable or the client or runtime fails
    /// to build.
    pub fn with_config(config: HttpTextScorerConfig) -> Result<Self, ProviderBuildError> {
        let base_url = parse_base_url(&config.base_url)?;
        let client = build_client(&config.user_agent, config.timeout)?;
        let bridge = BlockingBridge::new()?;
        Ok(Self {
            client,
            base_url,
            config,
            bridge,
        })
    }

    fn predict_url(&self, text: &str) -> Url {
        let mut url = endpoint(&self.base_url, [PREDICT_PATH]);
        url.query_pairs_mut().append_pair(REVIEW_PARAM, text);
        url
    }

    async fn score_async(&self, text: &str) -> Result<f64, ScoreTextError> {
        let url = self.predict_url(text);
        let unavailable = |err: &reqwest::Error| ScoreTextError::Unavailable {
            message: HttpFailure::from_reqwest(err, &url, self.config.timeout).to_string(),
        };
        let response = self
            .client
            .get(url.clone())
            .send()
            .await
            .and_then(reqwest::Response::error_for_status)
            .map_err(|err| unavailable(&err))?;
        let body: ScoreResponse =
            response
                .json()
                .await
                .map_err(|err| ScoreTextError::InvalidResponse {
                    message: err.to_string(),
                })?;
        let score = body.into_score()?;
        debug!("scored {} characters of text as {score:.3}", text.len());
        Ok(score)
    }
}

impl TextScorer for HttpTextScorer {
    fn score_text(&self, text: &str) -> Result<f64, ScoreTextError> {
        self.bridge.block_on(self.score_async(text))
    }
}
