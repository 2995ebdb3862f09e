//! Behaviour-driven step definitions driving the place command scenarios.

use std::cell::RefCell;

use rstest::fixture;
use rstest_bdd_macros::{given, scenario, then, when};

use super::helpers::{ReviewFiles, StubServiceBuilder};
use super::*;
use crate::place::run_place_with;

#[derive(Default)]
struct PlaceWorld {
    files: Option<ReviewFiles>,
    write_reviews: RefCell<bool>,
    command: RefCell<Vec<String>>,
    extra_args: RefCell<Vec<String>>,
    builder: StubServiceBuilder,
    stdout: RefCell<Vec<u8>>,
    result: RefCell<Option<Result<(), CliError>>>,
}

impl PlaceWorld {
    fn new() -> Self {
        Self {
            files: Some(ReviewFiles::new()),
            ..Self::default()
        }
    }

    fn files(&self) -> &ReviewFiles {
        self.files.as_ref().expect("review files initialised")
    }

    fn build_command_line(&self) -> Vec<String> {
        let reviews_file = if *self.write_reviews.borrow() {
            self.files().reviews_file()
        } else {
            self.files().root().join("absent.json")
        };
        let mut argv = vec!["reviews".to_owned()];
        argv.extend(self.command.borrow().iter().cloned());
        argv.extend([format!("--{ARG_REVIEWS_FILE}"), reviews_file.to_string()]);
        argv.extend(self.extra_args.borrow().iter().cloned());
        argv
    }

    fn printed(&self) -> serde_json::Value {
        let borrowed = self.result.borrow();
        let result = borrowed.as_ref().expect("result recorded");
        result.as_ref().expect("expected success");
        serde_json::from_slice(&self.stdout.borrow()).expect("output should be JSON")
    }

    fn error(&self) -> std::cell::Ref<'_, CliError> {
        std::cell::Ref::map(self.result.borrow(), |result| {
            result
                .as_ref()
                .expect("result recorded")
                .as_ref()
                .expect_err("expected error")
        })
    }
}

#[fixture]
fn world() -> PlaceWorld {
    PlaceWorld::new()
}

fn request(world: &PlaceWorld, subcommand: &str, place: &str) {
    world
        .command
        .replace(vec![subcommand.to_owned(), place.to_owned()]);
}

#[given("a review file exists on disk")]
fn review_file_exists(#[from(world)] world: &PlaceWorld) {
    *world.write_reviews.borrow_mut() = true;
}

#[given("I request the score for Cafe Rio")]
fn request_score(#[from(world)] world: &PlaceWorld) {
    request(world, "score", "Cafe Rio");
}

#[given("I request the report for Cafe Rio")]
fn request_report(#[from(world)] world: &PlaceWorld) {
    request(world, "report", "Cafe Rio");
}

#[given("I request the summary for an unknown place")]
fn request_unknown_summary(#[from(world)] world: &PlaceWorld) {
    request(world, "summary", "Nowhere");
}

#[given("I ask for half rounding and two concurrent summaries")]
fn half_rounding_two_workers(#[from(world)] world: &PlaceWorld) {
    world.extra_args.borrow_mut().extend([
        format!("--{ARG_ROUNDING}"),
        "half".to_owned(),
        format!("--{ARG_CONCURRENCY}"),
        "2".to_owned(),
    ]);
}

#[when("I run the place command")]
fn run_place_command(#[from(world)] world: &PlaceWorld) {
    let invocation = world.build_command_line();
    let parsed = Cli::try_parse_from(invocation).map_err(CliError::from);
    let outcome = parsed.and_then(|cli| {
        let (command, args) = match cli.command {
            Command::Score(args) => (PlaceCommand::Score, args),
            Command::Summary(args) => (PlaceCommand::Summary, args),
            Command::Report(args) => (PlaceCommand::Report, args),
            Command::ScoreText(_) => panic!("expected a place command"),
        };
        let mut buffer = world.stdout.borrow_mut();
        run_place_with(command, args, &world.builder, &mut *buffer)
    });
    world.result.replace(Some(outcome));
}

#[then("the command succeeds and prints a score of 4.2")]
fn prints_score(#[from(world)] world: &PlaceWorld) {
    let printed = world.printed();
    assert_eq!(printed["place_id"], "p1");
    assert_eq!(printed["place_name"], "Cafe Rio");
    assert_eq!(printed["score"], 4.2);
}

#[then("the command succeeds and prints a score and a summary")]
fn prints_report(#[from(world)] world: &PlaceWorld) {
    let printed = world.printed();
    assert_eq!(printed["score"], 4.2);
    assert_eq!(printed["summary"], "summary(Great food)");
}

#[then("the command fails because the review file is missing")]
fn fails_missing_file(#[from(world)] world: &PlaceWorld) {
    match &*world.error() {
        CliError::MissingSourceFile { field, .. } => assert_eq!(*field, ARG_REVIEWS_FILE),
        other => panic!("expected MissingSourceFile, found {other:?}"),
    }
}

#[then("the command fails because the place was not found")]
fn fails_not_found(#[from(world)] world: &PlaceWorld) {
    match &*world.error() {
        CliError::PlaceNotFound { place } => assert_eq!(place, "Nowhere"),
        other => panic!("expected PlaceNotFound, found {other:?}"),
    }
}

#[then("the service is built with half rounding and two concurrent summaries")]
fn built_with_settings(#[from(world)] world: &PlaceWorld) {
    let seen = world.builder.seen.borrow();
    let settings = seen.as_ref().expect("service built");
    assert_eq!(settings.rounding, review_engine::Rounding::NearestHalf);
    assert_eq!(settings.concurrency.get(), 2);
}

macro_rules! register_place_scenario {
    ($fn_name:ident, $scenario_title:literal) => {
        #[scenario(path = "tests/features/place_command.feature", name = $scenario_title)]
        fn $fn_name(#[from(world)] world: PlaceWorld) {
            let _ = world;
        }
    };
}

register_place_scenario!(place_score, "scoring a place from a review file");
register_place_scenario!(place_report, "reporting on a place");
register_place_scenario!(place_missing_file, "rejecting a missing review file");
register_place_scenario!(place_not_found, "reporting an unknown place");
register_place_scenario!(place_settings, "passing settings to the service builder");
