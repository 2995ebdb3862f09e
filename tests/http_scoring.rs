//! Scoring through the HTTP scorer on single-threaded runtimes.

use std::sync::Arc;

use chrono::{NaiveDate, NaiveDateTime};
use review_core::test_support::{MemorySource, StubSummarizer};
use review_data::HttpTextScorer;
use review_data::test_support::{CannedResponse, CannedServer};
use review_engine::{DEFAULT_REVIEW_COUNT, PlaceReviewService, Review};
use rstest::{fixture, rstest};

fn reference_time() -> NaiveDateTime {
    NaiveDate::from_ymd_opt(2025, 1, 1)
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .unwrap_or_else(|| panic!("valid reference date"))
}

/// Scoring service answering 4.25 for every text.
#[fixture]
fn scoring_server() -> CannedServer {
    CannedServer::start()
        .unwrap_or_else(|err| panic!("bind loopback: {err}"))
        .route("/predict_score_for_text", CannedResponse::ok(r#"{"score": 4.25}"#))
}

fn service(server: &CannedServer) -> PlaceReviewService {
    let source = MemorySource::default().with_place(
        "p1",
        "Cafe Rio",
        vec![Review::new("Great food!"), Review::new("1234")],
    );
    let scorer = HttpTextScorer::new(server.base_url())
        .unwrap_or_else(|err| panic!("build scorer: {err}"));
    PlaceReviewService::new(
        Arc::new(source),
        Arc::new(scorer),
        Arc::new(StubSummarizer::new()),
    )
    .with_reference_time(reference_time())
}

fn current_thread() -> tokio::runtime::Runtime {
    tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .unwrap_or_else(|err| panic!("runtime: {err}"))
}

#[rstest]
fn place_score_on_a_current_thread_runtime(scoring_server: CannedServer) {
    let service = service(&scoring_server);
    let score = current_thread()
        .block_on(service.get_place_score("Cafe Rio", DEFAULT_REVIEW_COUNT))
        .unwrap_or_else(|err| panic!("score: {err}"))
        .unwrap_or_else(|| panic!("place found"));
    assert_eq!(score.score, 4.2);
    assert_eq!(scoring_server.requests().len(), 1);
}

#[rstest]
fn place_report_on_a_current_thread_runtime(scoring_server: CannedServer) {
    let service = service(&scoring_server);
    let report = current_thread()
        .block_on(service.get_place_report("Cafe Rio", DEFAULT_REVIEW_COUNT))
        .unwrap_or_else(|err| panic!("report: {err}"))
        .unwrap_or_else(|| panic!("place found"));
    assert_eq!(report.score, 4.2);
    assert_eq!(report.summary, "summary(Great food)");
}
