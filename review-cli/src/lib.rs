//! Command-line interface for the review engine.
//!
//! The `reviews` binary answers place score, summary and report requests
//! and scores single texts. Settings layer CLI flags over `REVIEWS_*`
//! environment variables and configuration files via `ortho_config`.
#![forbid(unsafe_code)]

use clap::{Parser, Subcommand};

mod error;
mod place;
mod score_text;
mod settings;

pub use error::CliError;
use place::{PlaceArgs, PlaceCommand};
use score_text::ScoreTextArgs;

const ARG_PLACE: &str = "place";
const ARG_TEXT: &str = "text";
const ARG_REVIEWS: &str = "reviews";
const ARG_REVIEWS_URL: &str = "reviews-url";
const ARG_REVIEWS_FILE: &str = "reviews-file";
const ARG_SCORER_URL: &str = "scorer-url";
const ARG_SUMMARIZER_URL: &str = "summarizer-url";
const ARG_MODEL: &str = "model";
const ARG_API_KEY: &str = "api-key";
const ARG_MAX_TOKENS: &str = "max-tokens";
const ARG_CONCURRENCY: &str = "concurrency";
const ARG_ROUNDING: &str = "rounding";
const ENV_PLACE: &str = "REVIEWS_CMDS_PLACE_PLACE";
const ENV_TEXT: &str = "REVIEWS_CMDS_SCORE_TEXT_TEXT";
const ENV_OPENAI_API_KEY: &str = "OPENAI_API_KEY";

/// Run the CLI with the current process arguments and environment.
///
/// # Errors
/// Returns [`CliError`] when arguments are invalid, configuration cannot be
/// resolved or the requested operation fails.
pub fn run() -> Result<(), CliError> {
    let cli = Cli::try_parse().map_err(CliError::ArgumentParsing)?;
    match cli.command {
        Command::Score(args) => place::run_place(PlaceCommand::Score, args),
        Command::Summary(args) => place::run_place(PlaceCommand::Summary, args),
        Command::Report(args) => place::run_place(PlaceCommand::Report, args),
        Command::ScoreText(args) => score_text::run_score_text(args),
    }
}

#[derive(Debug, Parser)]
#[command(
    name = "reviews",
    about = "Score and summarise place reviews",
    version
)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Compute the weighted review score of a place.
    Score(PlaceArgs),
    /// Summarise the reviews of a place.
    Summary(PlaceArgs),
    /// Compute score and summary from one fetch of a place's reviews.
    Report(PlaceArgs),
    /// Score a single piece of review text.
    ScoreText(ScoreTextArgs),
}

#[cfg(test)]
mod tests;
