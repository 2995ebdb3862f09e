//! Facade crate for the review engine.
//!
//! [`PlaceReviewService`] answers three questions about a named place: how
//! good is it (a weighted, rounded score), what do reviewers say (a model
//! summary), and both at once. The building blocks are re-exported so
//! callers can depend on this crate alone. HTTP adapters for review
//! providers, scoring services and chat models are available behind the
//! `http` feature.

#![forbid(unsafe_code)]

mod service;

pub use review_core::{
    PlaceReviews, RawReview, Review, ReviewSource, ReviewSourceError, ScoreTextError,
    SummarizeError, Summarizer, TextScorer, TokenCounter, WhitespaceTokenCounter, normalize,
    normalize_text,
};
pub use review_scorer::{AggregateError, Rounding, WeightingPolicy, aggregate};
pub use review_summary::{SummaryConfig, SummaryError, SummaryPrompts, summarize_reviews};
pub use service::{
    DEFAULT_REVIEW_COUNT, PlaceReport, PlaceReviewService, PlaceScore, PlaceSummary,
    ServiceConfig, ServiceError,
};

#[cfg(feature = "http")]
pub use review_data::{
    ChatSummarizer, ChatSummarizerConfig, FileReviewSource, HttpReviewSource,
    HttpReviewSourceConfig, HttpTextScorer, HttpTextScorerConfig, ProviderBuildError,
};
