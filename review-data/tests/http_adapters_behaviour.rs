//! Behavioural tests for the HTTP adapters against a loopback server.

use std::cell::RefCell;

use review_core::{
    PlaceReviews, ReviewSource, ReviewSourceError, ScoreTextError, SummarizeError, Summarizer,
    TextScorer,
};
use review_data::test_support::{CannedResponse, CannedServer};
use review_data::{ChatSummarizer, ChatSummarizerConfig, HttpReviewSource, HttpTextScorer};
use rstest::fixture;
use rstest_bdd_macros::{given, scenario, then, when};

const API_KEY: &str = "sk-test";

/// Outcome of whichever adapter call the scenario made.
#[derive(Debug)]
enum Outcome {
    Reviews(Result<PlaceReviews, ReviewSourceError>),
    Score(Result<f64, ScoreTextError>),
    Summary(Result<String, SummarizeError>),
}

/// Server and outcome shared between steps.
#[derive(Debug, Default)]
struct World {
    server: Option<CannedServer>,
    outcome: Option<Outcome>,
}

#[fixture]
fn world() -> RefCell<World> {
    RefCell::new(World::default())
}

fn start(world: &RefCell<World>, configure: impl FnOnce(CannedServer) -> CannedServer) {
    let server = CannedServer::start().unwrap_or_else(|err| panic!("bind loopback: {err}"));
    world.borrow_mut().server = Some(configure(server));
}

fn base_url(world: &RefCell<World>) -> String {
    world
        .borrow()
        .server
        .as_ref()
        .map(|server| server.base_url().to_owned())
        .unwrap_or_else(|| panic!("server must be started first"))
}

fn block_on<F: std::future::Future>(future: F) -> F::Output {
    tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .unwrap_or_else(|err| panic!("runtime: {err}"))
        .block_on(future)
}

fn only_request(world: &RefCell<World>) -> review_data::test_support::RecordedRequest {
    let requests = world
        .borrow()
        .server
        .as_ref()
        .map(CannedServer::requests)
        .unwrap_or_default();
    assert_eq!(requests.len(), 1, "expected one request, got {requests:?}");
    requests
        .into_iter()
        .next()
        .unwrap_or_else(|| panic!("one request"))
}

#[given("a review API with two reviews for Cafe Rio")]
fn api_with_reviews(world: &RefCell<World>) {
    start(world, |server| {
        server.route(
            "/place/Cafe%20Rio/reviews",
            CannedResponse::ok(
                r#"{"id": "place-1", "name": "Cafe Rio", "reviews": [
                    {"text": "Great food!", "likes": 3, "reviews_by_reviewer": 1,
                     "publish_date": "2024-05-01T10:00:00.000Z"},
                    {"text": "Slow service", "likes": 0}
                ]}"#,
            ),
        )
    });
}

#[given("a review API without Cafe Rio")]
fn api_without_place(world: &RefCell<World>) {
    start(world, |server| server);
}

#[given("a review API that fails with a server error")]
fn api_failing(world: &RefCell<World>) {
    start(world, |server| {
        server.route("/place/", CannedResponse::status(500, r#"{"detail": "boom"}"#))
    });
}

#[given("a scoring service answering 4.25")]
fn scoring_service(world: &RefCell<World>) {
    start(world, |server| {
        server.route("/predict_score_for_text", CannedResponse::ok(r#"{"score": 4.25}"#))
    });
}

#[given("a chat model answering Lovely place")]
fn chat_model(world: &RefCell<World>) {
    start(world, |server| {
        server.route(
            "/v1/chat/completions",
            CannedResponse::ok(
                r#"{"choices": [{"index": 0, "message": {"role": "assistant", "content": "Lovely place"}}]}"#,
            ),
        )
    });
}

#[given("a chat model answering with no choices")]
fn empty_chat_model(world: &RefCell<World>) {
    start(world, |server| {
        server.route("/v1/chat/completions", CannedResponse::ok(r#"{"choices": []}"#))
    });
}

#[when("I fetch five reviews for Cafe Rio")]
fn fetch_reviews(world: &RefCell<World>) {
    let source = HttpReviewSource::new(base_url(world))
        .unwrap_or_else(|err| panic!("review source: {err}"));
    let outcome = block_on(source.fetch_reviews("Cafe Rio", 5));
    world.borrow_mut().outcome = Some(Outcome::Reviews(outcome));
}

#[when("I score the text Great food")]
fn score_text(world: &RefCell<World>) {
    let scorer =
        HttpTextScorer::new(base_url(world)).unwrap_or_else(|err| panic!("scorer: {err}"));
    let outcome = scorer.score_text("Great food");
    world.borrow_mut().outcome = Some(Outcome::Score(outcome));
}

#[when("I summarise the text good food with an API key")]
fn summarise_text(world: &RefCell<World>) {
    let config =
        ChatSummarizerConfig::new(format!("{}/v1", base_url(world))).with_api_key(API_KEY);
    let summarizer =
        ChatSummarizer::with_config(config).unwrap_or_else(|err| panic!("summarizer: {err}"));
    let outcome = block_on(summarizer.summarize("Summarise: ", "good food"));
    world.borrow_mut().outcome = Some(Outcome::Summary(outcome));
}

#[then("two reviews are returned with the provider identifiers")]
fn two_reviews(world: &RefCell<World>) {
    let state = world.borrow();
    let Some(Outcome::Reviews(Ok(place))) = &state.outcome else {
        panic!("expected reviews, got {:?}", state.outcome);
    };
    assert_eq!(place.place_id, "place-1");
    assert_eq!(place.place_name, "Cafe Rio");
    let texts: Vec<&str> = place.reviews.iter().map(|review| review.text.as_str()).collect();
    assert_eq!(texts, vec!["Great food!", "Slow service"]);
    assert_eq!(place.reviews.first().map(|review| review.likes), Some(3));
}

#[then("the request asked for five reviews")]
fn asked_for_five(world: &RefCell<World>) {
    let request = only_request(world);
    assert_eq!(request.method, "GET");
    assert_eq!(request.target, "/place/Cafe%20Rio/reviews?max_reviews=5");
}

#[then("the place is reported as not found")]
fn not_found(world: &RefCell<World>) {
    let state = world.borrow();
    assert!(
        matches!(
            &state.outcome,
            Some(Outcome::Reviews(Err(ReviewSourceError::NotFound { .. })))
        ),
        "got {:?}",
        state.outcome
    );
}

#[then("an HTTP error with status 500 is reported")]
fn server_error(world: &RefCell<World>) {
    let state = world.borrow();
    assert!(
        matches!(
            &state.outcome,
            Some(Outcome::Reviews(Err(ReviewSourceError::Http { status: 500, .. })))
        ),
        "got {:?}",
        state.outcome
    );
}

#[then("the score is 4.25")]
fn score_is(world: &RefCell<World>) {
    let state = world.borrow();
    assert!(
        matches!(&state.outcome, Some(Outcome::Score(Ok(score))) if (*score - 4.25).abs() < f64::EPSILON),
        "got {:?}",
        state.outcome
    );
}

#[then("the scoring request carried the review text")]
fn scoring_request(world: &RefCell<World>) {
    let request = only_request(world);
    assert_eq!(request.target, "/predict_score_for_text?review=Great+food");
}

#[then("the summary is Lovely place")]
fn summary_is(world: &RefCell<World>) {
    let state = world.borrow();
    assert!(
        matches!(&state.outcome, Some(Outcome::Summary(Ok(text))) if text == "Lovely place"),
        "got {:?}",
        state.outcome
    );
}

#[then("the chat request was authorised with the API key")]
fn chat_request(world: &RefCell<World>) {
    let request = only_request(world);
    assert_eq!(request.method, "POST");
    assert_eq!(request.target, "/v1/chat/completions");
    assert_eq!(request.header("authorization"), Some("Bearer sk-test"));
    let body: serde_json::Value =
        serde_json::from_str(&request.body).unwrap_or_else(|err| panic!("json body: {err}"));
    assert_eq!(body["model"], "gpt-4o-mini");
    assert_eq!(body["messages"][0]["content"], "Summarise: good food");
}

#[then("an empty response error is reported")]
fn empty_response(world: &RefCell<World>) {
    let state = world.borrow();
    assert!(
        matches!(
            &state.outcome,
            Some(Outcome::Summary(Err(SummarizeError::EmptyResponse { .. })))
        ),
        "got {:?}",
        state.outcome
    );
}

macro_rules! register_scenario {
    ($fn_name:ident, $index:literal) => {
        #[scenario(path = "tests/features/http_adapters.feature", index = $index)]
        fn $fn_name(world: RefCell<World>) {
            let _ = (world,);
        }
    };
}

register_scenario!(fetching_known_place, 0);
register_scenario!(fetching_unknown_place, 1);
register_scenario!(fetching_from_failing_api, 2);
register_scenario!(scoring_text, 3);
register_scenario!(summarising_text, 4);
register_scenario!(empty_chat_response, 5);
