//! Deterministic collaborator doubles used by unit and behaviour tests.

use std::collections::HashMap;
use std::sync::{Mutex, PoisonError};

use async_trait::async_trait;

use crate::{
    PlaceReviews, Review, ReviewSource, ReviewSourceError, ScoreTextError, SummarizeError,
    Summarizer, TextScorer,
};

/// `TextScorer` returning the same score for every text.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FixedScorer(pub f64);

impl TextScorer for FixedScorer {
    fn score_text(&self, _text: &str) -> Result<f64, ScoreTextError> {
        Ok(self.0)
    }
}

/// `TextScorer` looking scores up by exact text.
///
/// Unknown texts fall back to the configured default.
#[derive(Debug, Clone, Default)]
pub struct TableScorer {
    scores: HashMap<String, f64>,
    fallback: f64,
}

impl TableScorer {
    /// Create a scorer returning `fallback` for unknown texts.
    #[must_use]
    pub fn with_fallback(fallback: f64) -> Self {
        Self {
            scores: HashMap::new(),
            fallback,
        }
    }

    /// Register the score for `text`.
    #[must_use]
    pub fn with_score(mut self, text: impl Into<String>, score: f64) -> Self {
        self.scores.insert(text.into(), score);
        self
    }
}

impl TextScorer for TableScorer {
    fn score_text(&self, text: &str) -> Result<f64, ScoreTextError> {
        Ok(self.scores.get(text).copied().unwrap_or(self.fallback))
    }
}

/// `TextScorer` that always fails.
#[derive(Debug, Clone, Copy, Default)]
pub struct FailingScorer;

impl TextScorer for FailingScorer {
    fn score_text(&self, _text: &str) -> Result<f64, ScoreTextError> {
        Err(ScoreTextError::Unavailable {
            message: "scorer offline".to_owned(),
        })
    }
}

/// One recorded call to [`StubSummarizer`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SummarizeCall {
    /// Prompt passed to the model.
    pub prompt: String,
    /// Text passed to the model.
    pub text: String,
}

/// `Summarizer` that echoes its input and records every call.
///
/// Each successful call returns `"summary(<text>)"`. Texts containing a
/// configured marker fail with [`SummarizeError::EmptyResponse`]; texts
/// containing a hang marker never complete, which lets tests exercise
/// cancellation.
#[derive(Debug, Default)]
pub struct StubSummarizer {
    fail_markers: Vec<String>,
    hang_markers: Vec<String>,
    calls: Mutex<Vec<SummarizeCall>>,
}

impl StubSummarizer {
    /// Create a summariser where every call succeeds.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Fail every call whose text contains `marker`.
    #[must_use]
    pub fn failing_on(mut self, marker: impl Into<String>) -> Self {
        self.fail_markers.push(marker.into());
        self
    }

    /// Never resolve calls whose text contains `marker`.
    #[must_use]
    pub fn hanging_on(mut self, marker: impl Into<String>) -> Self {
        self.hang_markers.push(marker.into());
        self
    }

    /// Snapshot of recorded calls in the order they started.
    #[must_use]
    pub fn calls(&self) -> Vec<SummarizeCall> {
        self.calls
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Number of calls made with `prompt`.
    #[must_use]
    pub fn calls_with_prompt(&self, prompt: &str) -> usize {
        self.calls()
            .iter()
            .filter(|call| call.prompt == prompt)
            .count()
    }

    fn record(&self, prompt: &str, text: &str) {
        self.calls
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(SummarizeCall {
                prompt: prompt.to_owned(),
                text: text.to_owned(),
            });
    }
}

#[async_trait]
impl Summarizer for StubSummarizer {
    async fn summarize(&self, prompt: &str, text: &str) -> Result<String, SummarizeError> {
        self.record(prompt, text);
        if self.hang_markers.iter().any(|marker| text.contains(marker)) {
            std::future::pending::<()>().await;
        }
        if self.fail_markers.iter().any(|marker| text.contains(marker)) {
            return Err(SummarizeError::EmptyResponse {
                message: format!("stub refused {text:?}"),
            });
        }
        Ok(format!("summary({text})"))
    }
}

/// In-memory `ReviewSource` keyed by place name.
#[derive(Debug, Clone, Default)]
pub struct MemorySource {
    places: HashMap<String, PlaceReviews>,
}

impl MemorySource {
    /// Add a place with the given identifier and reviews.
    #[must_use]
    pub fn with_place(
        mut self,
        place_id: impl Into<String>,
        place_name: impl Into<String>,
        reviews: Vec<Review>,
    ) -> Self {
        let name: String = place_name.into();
        self.places.insert(
            name.clone(),
            PlaceReviews {
                place_id: place_id.into(),
                place_name: name,
                reviews,
            },
        );
        self
    }
}

#[async_trait]
impl ReviewSource for MemorySource {
    async fn fetch_reviews(
        &self,
        place_name: &str,
        limit: usize,
    ) -> Result<PlaceReviews, ReviewSourceError> {
        let not_found = || ReviewSourceError::NotFound {
            place_name: place_name.to_owned(),
        };
        let place = self.places.get(place_name).ok_or_else(not_found)?;
        if place.reviews.is_empty() {
            return Err(not_found());
        }
        let mut found = place.clone();
        found.reviews.truncate(limit);
        Ok(found)
    }
}
