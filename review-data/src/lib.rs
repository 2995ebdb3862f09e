//! Provider adapters for the review engine.
//!
//! Responsibilities:
//! - Fetch reviews over HTTP ([`HttpReviewSource`]) or from disk
//!   ([`FileReviewSource`]).
//! - Score review text with a remote model ([`HttpTextScorer`]).
//! - Summarise text with an OpenAI-compatible chat model
//!   ([`ChatSummarizer`]).
//!
//! Boundaries:
//! - Do not encode scoring or summarisation rules (those live in
//!   `review-scorer` and `review-summary`).
//! - Keep blocking I/O off async executors.
//!
//! # Example
//!
//! ```no_run
//! use review_core::ReviewSource;
//! use review_data::HttpReviewSource;
//!
//! # async fn demo() -> Result<(), Box<dyn std::error::Error>> {
//! let source = HttpReviewSource::new("http://localhost:8080")?;
//! let place = source.fetch_reviews("Cafe Rio", 10).await?;
//! println!("{} reviews for {}", place.reviews.len(), place.place_name);
//! # Ok(())
//! # }
//! ```

#![forbid(unsafe_code)]
#![cfg_attr(docsrs, feature(doc_cfg))]

mod chat;
mod client;
mod reviews;
mod scorer;

#[cfg(any(test, feature = "test-support"))]
#[cfg_attr(docsrs, doc(cfg(feature = "test-support")))]
pub mod test_support;

pub use chat::{
    ChatChoice, ChatChoiceMessage, ChatMessage, ChatRequest, ChatResponse, ChatSummarizer,
    ChatSummarizerConfig, DEFAULT_CHAT_BASE_URL, DEFAULT_MAX_COMPLETION_TOKENS, DEFAULT_MODEL,
};
pub use client::{DEFAULT_USER_AGENT, ProviderBuildError};
pub use reviews::{FileReviewSource, HttpReviewSource, HttpReviewSourceConfig, PlaceReviewsPayload};
pub use scorer::{HttpTextScorer, HttpTextScorerConfig, ScoreResponse};
