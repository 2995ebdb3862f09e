//! `score`, `summary` and `report` command implementation.

use std::io::Write;
use std::num::NonZeroUsize;

use camino::Utf8PathBuf;
use clap::Parser;
use log::info;
use ortho_config::{OrthoConfig, SubcmdConfigMerge};
use review_engine::{DEFAULT_REVIEW_COUNT, PlaceReviewService, Rounding};
use serde::{Deserialize, Serialize};

use crate::settings::{DefaultServiceBuilder, ServiceBuilder, ServiceSettings, SourceSetting};
use crate::{
    ARG_API_KEY, ARG_CONCURRENCY, ARG_MAX_TOKENS, ARG_MODEL, ARG_PLACE, ARG_REVIEWS,
    ARG_REVIEWS_FILE, ARG_REVIEWS_URL, ARG_ROUNDING, ARG_SCORER_URL, ARG_SUMMARIZER_URL,
    CliError, ENV_OPENAI_API_KEY, ENV_PLACE,
};

/// Which place question to answer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum PlaceCommand {
    Score,
    Summary,
    Report,
}

/// CLI arguments shared by the place commands.
#[derive(Debug, Clone, Parser, Deserialize, Serialize, OrthoConfig, Default)]
#[command(
    name = "place",
    long_about = "Fetch the reviews of a place and answer from them. Settings \
                 can come from CLI flags, configuration files, or environment \
                 variables.",
    about = "Answer a question about a place's reviews"
)]
#[ortho_config(prefix = "REVIEWS")]
pub(crate) struct PlaceArgs {
    /// Name of the place to look up.
    #[arg(value_name = "name")]
    #[serde(default)]
    pub(crate) place: Option<String>,
    /// Maximum number of reviews to fetch (default 10).
    #[arg(long = ARG_REVIEWS, value_name = "count")]
    #[serde(default)]
    pub(crate) reviews: Option<usize>,
    /// Root URL of the review API (e.g. "http://localhost:8080").
    #[arg(long = ARG_REVIEWS_URL, value_name = "url")]
    #[serde(default)]
    pub(crate) reviews_url: Option<String>,
    /// JSON file holding reviews, used instead of the review API.
    #[arg(long = ARG_REVIEWS_FILE, value_name = "path")]
    #[serde(default)]
    pub(crate) reviews_file: Option<Utf8PathBuf>,
    /// Root URL of the scoring model service.
    #[arg(long = ARG_SCORER_URL, value_name = "url")]
    #[serde(default)]
    pub(crate) scorer_url: Option<String>,
    /// Root URL of the OpenAI-compatible chat API.
    #[arg(long = ARG_SUMMARIZER_URL, value_name = "url")]
    #[serde(default)]
    pub(crate) summarizer_url: Option<String>,
    /// Chat model used for summaries.
    #[arg(long = ARG_MODEL, value_name = "name")]
    #[serde(default)]
    pub(crate) model: Option<String>,
    /// Bearer token for the chat API (falls back to `OPENAI_API_KEY`).
    #[arg(long = ARG_API_KEY, value_name = "key")]
    #[serde(default)]
    pub(crate) api_key: Option<String>,
    /// Token budget per summary chunk (default 128000).
    #[arg(long = ARG_MAX_TOKENS, value_name = "tokens")]
    #[serde(default)]
    pub(crate) max_tokens: Option<NonZeroUsize>,
    /// Concurrent chunk summaries (default 4).
    #[arg(long = ARG_CONCURRENCY, value_name = "count")]
    #[serde(default)]
    pub(crate) concurrency: Option<NonZeroUsize>,
    /// Score rounding: floor, half or none.
    #[arg(long = ARG_ROUNDING, value_name = "policy")]
    #[serde(default)]
    pub(crate) rounding: Option<String>,
}

impl PlaceArgs {
    pub(crate) fn into_config(self) -> Result<PlaceConfig, CliError> {
        let mut merged = self.load_and_merge().map_err(CliError::Configuration)?;
        if merged.api_key.is_none() {
            merged.api_key = std::env::var(ENV_OPENAI_API_KEY).ok();
        }
        PlaceConfig::try_from(merged)
    }
}

/// Resolved place command configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct PlaceConfig {
    pub(crate) place: String,
    pub(crate) reviews: usize,
    pub(crate) service: ServiceSettings,
}

impl TryFrom<PlaceArgs> for PlaceConfig {
    type Error = CliError;

    fn try_from(args: PlaceArgs) -> Result<Self, Self::Error> {
        let place = args.place.ok_or(CliError::MissingArgument {
            field: ARG_PLACE,
            env: ENV_PLACE,
        })?;
        let defaults = ServiceSettings::default();
        let rounding = match args.rounding {
            Some(name) => name.parse::<Rounding>()?,
            None => defaults.rounding,
        };
        let service = ServiceSettings {
            source: SourceSetting::from_flags(args.reviews_url, args.reviews_file)?,
            scorer_url: args.scorer_url.unwrap_or(defaults.scorer_url),
            summarizer_url: args.summarizer_url.unwrap_or(defaults.summarizer_url),
            model: args.model.unwrap_or(defaults.model),
            api_key: args.api_key,
            max_tokens: args.max_tokens.unwrap_or(defaults.max_tokens),
            concurrency: args.concurrency.unwrap_or(defaults.concurrency),
            rounding,
        };
        Ok(Self {
            place,
            reviews: args.reviews.unwrap_or(DEFAULT_REVIEW_COUNT),
            service,
        })
    }
}

pub(crate) fn run_place(command: PlaceCommand, args: PlaceArgs) -> Result<(), CliError> {
    let mut stdout = std::io::stdout().lock();
    run_place_with(command, args, &DefaultServiceBuilder, &mut stdout)
}

pub(crate) fn run_place_with(
    command: PlaceCommand,
    args: PlaceArgs,
    builder: &dyn ServiceBuilder,
    writer: &mut dyn Write,
) -> Result<(), CliError> {
    let config = resolve_place_config(args)?;
    let service = builder.build(&config.service)?;
    let payload = execute_place(command, &config, &service)?;
    write_json(writer, &payload)
}

fn resolve_place_config(args: PlaceArgs) -> Result<PlaceConfig, CliError> {
    let config = args.into_config()?;
    config.service.source.validate()?;
    Ok(config)
}

fn execute_place(
    command: PlaceCommand,
    config: &PlaceConfig,
    service: &PlaceReviewService,
) -> Result<serde_json::Value, CliError> {
    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
        .map_err(CliError::Runtime)?;
    let (place, limit) = (config.place.as_str(), config.reviews);
    info!("running {command:?} for {place:?} with up to {limit} reviews");
    let payload = runtime.block_on(async {
        match command {
            PlaceCommand::Score => service
                .get_place_score(place, limit)
                .await
                .map(|found| found.map(serde_json::to_value)),
            PlaceCommand::Summary => service
                .get_place_summary(place, limit)
                .await
                .map(|found| found.map(serde_json::to_value)),
            PlaceCommand::Report => service
                .get_place_report(place, limit)
                .await
                .map(|found| found.map(serde_json::to_value)),
        }
    })?;
    payload
        .ok_or_else(|| CliError::PlaceNotFound {
            place: place.to_owned(),
        })?
        .map_err(CliError::SerialiseOutput)
}

pub(crate) fn write_json(
    writer: &mut dyn Write,
    payload: &serde_json::Value,
) -> Result<(), CliError> {
    let rendered = serde_json::to_string_pretty(payload).map_err(CliError::SerialiseOutput)?;
    writer
        .write_all(rendered.as_bytes())
        .map_err(CliError::WriteOutput)?;
    writer.write_all(b"\n").map_err(CliError::WriteOutput)?;
    Ok(())
}

#[cfg(test)]
pub(crate) fn config_from_layers_for_test(
    layers: Vec<ortho_config::MergeLayer<'static>>,
) -> Result<PlaceConfig, CliError> {
    let merged = PlaceArgs::merge_from_layers(layers).map_err(CliError::from)?;
    PlaceConfig::try_from(merged)
}
