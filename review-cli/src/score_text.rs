//! `score-text` command implementation.

use std::io::Write;

use clap::Parser;
use ortho_config::{OrthoConfig, SubcmdConfigMerge};
use serde::{Deserialize, Serialize};

use crate::place::write_json;
use crate::settings::{DefaultServiceBuilder, ServiceBuilder, ServiceSettings};
use crate::{ARG_SCORER_URL, ARG_TEXT, CliError, ENV_TEXT};

/// CLI arguments for the `score-text` subcommand.
#[derive(Debug, Clone, Parser, Deserialize, Serialize, OrthoConfig, Default)]
#[command(
    name = "score-text",
    long_about = "Send one piece of text to the scoring model and print the \
                 raw score. The text is neither cleaned nor rounded.",
    about = "Score a single piece of review text"
)]
#[ortho_config(prefix = "REVIEWS")]
pub(crate) struct ScoreTextArgs {
    /// Review text to score.
    #[arg(value_name = "text")]
    #[serde(default)]
    pub(crate) text: Option<String>,
    /// Root URL of the scoring model service.
    #[arg(long = ARG_SCORER_URL, value_name = "url")]
    #[serde(default)]
    pub(crate) scorer_url: Option<String>,
}

impl ScoreTextArgs {
    fn into_config(self) -> Result<ScoreTextConfig, CliError> {
        let merged = self.load_and_merge().map_err(CliError::Configuration)?;
        ScoreTextConfig::try_from(merged)
    }
}

/// Resolved `score-text` configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct ScoreTextConfig {
    pub(crate) text: String,
    pub(crate) service: ServiceSettings,
}

impl TryFrom<ScoreTextArgs> for ScoreTextConfig {
    type Error = CliError;

    fn try_from(args: ScoreTextArgs) -> Result<Self, Self::Error> {
        let text = args.text.ok_or(CliError::MissingArgument {
            field: ARG_TEXT,
            env: ENV_TEXT,
        })?;
        let mut service = ServiceSettings::default();
        if let Some(url) = args.scorer_url {
            service.scorer_url = url;
        }
        Ok(Self { text, service })
    }
}

pub(crate) fn run_score_text(args: ScoreTextArgs) -> Result<(), CliError> {
    let mut stdout = std::io::stdout().lock();
    run_score_text_with(args, &DefaultServiceBuilder, &mut stdout)
}

pub(crate) fn run_score_text_with(
    args: ScoreTextArgs,
    builder: &dyn ServiceBuilder,
    writer: &mut dyn Write,
) -> Result<(), CliError> {
    let config = args.into_config()?;
    let service = builder.build(&config.service)?;
    let score = service.score_single_review(&config.text)?;
    write_json(writer, &serde_json::json!({ "score": score }))
}
