//! Resolved collaborator settings shared by every command.

use std::num::NonZeroUsize;
use std::sync::Arc;

use camino::{Utf8Path, Utf8PathBuf};
use review_data::{
    ChatSummarizer, ChatSummarizerConfig, DEFAULT_CHAT_BASE_URL, DEFAULT_MODEL,
    FileReviewSource, HttpReviewSource, HttpReviewSourceConfig, HttpTextScorer,
    HttpTextScorerConfig,
};
use review_engine::{
    PlaceReviewService, ReviewSource, Rounding, ServiceConfig, SummaryConfig,
};
use review_summary::{DEFAULT_CONCURRENCY, DEFAULT_MAX_TOKENS};

use crate::{ARG_REVIEWS_FILE, ARG_REVIEWS_URL, CliError};

/// Where reviews are read from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum SourceSetting {
    /// Review API root URL.
    Http(String),
    /// JSON file on disk.
    File(Utf8PathBuf),
}

impl SourceSetting {
    /// Pick the source from the optional URL and file flags.
    ///
    /// Neither flag selects the default review API.
    pub(crate) fn from_flags(
        url: Option<String>,
        file: Option<Utf8PathBuf>,
    ) -> Result<Self, CliError> {
        match (url, file) {
            (Some(_), Some(_)) => Err(CliError::ConflictingArguments {
                first: ARG_REVIEWS_URL,
                second: ARG_REVIEWS_FILE,
            }),
            (None, Some(path)) => Ok(Self::File(path)),
            (Some(url), None) => Ok(Self::Http(url)),
            (None, None) => Ok(Self::Http(HttpReviewSourceConfig::default().base_url)),
        }
    }

    /// Ensure a file source points at an existing regular file.
    pub(crate) fn validate(&self) -> Result<(), CliError> {
        match self {
            Self::Http(_) => Ok(()),
            Self::File(path) => require_existing(path, ARG_REVIEWS_FILE),
        }
    }
}

pub(crate) fn require_existing(path: &Utf8Path, field: &'static str) -> Result<(), CliError> {
    match review_fs::file_is_file(path) {
        Ok(true) => Ok(()),
        Ok(false) if path.exists() => Err(CliError::SourcePathNotFile {
            field,
            path: path.to_path_buf(),
        }),
        Ok(false) => Err(CliError::MissingSourceFile {
            field,
            path: path.to_path_buf(),
        }),
        Err(source) if source.kind() == std::io::ErrorKind::NotFound => {
            Err(CliError::MissingSourceFile {
                field,
                path: path.to_path_buf(),
            })
        }
        Err(source) => Err(CliError::InspectSourcePath {
            field,
            path: path.to_path_buf(),
            source,
        }),
    }
}

/// Everything needed to wire a [`PlaceReviewService`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct ServiceSettings {
    pub(crate) source: SourceSetting,
    pub(crate) scorer_url: String,
    pub(crate) summarizer_url: String,
    pub(crate) model: String,
    pub(crate) api_key: Option<String>,
    pub(crate) max_tokens: NonZeroUsize,
    pub(crate) concurrency: NonZeroUsize,
    pub(crate) rounding: Rounding,
}

impl Default for ServiceSettings {
    fn default() -> Self {
        Self {
            source: SourceSetting::Http(HttpReviewSourceConfig::default().base_url),
            scorer_url: HttpTextScorerConfig::default().base_url,
            summarizer_url: DEFAULT_CHAT_BASE_URL.to_owned(),
            model: DEFAULT_MODEL.to_owned(),
            api_key: None,
            max_tokens: NonZeroUsize::new(DEFAULT_MAX_TOKENS).unwrap_or(NonZeroUsize::MIN),
            concurrency: DEFAULT_CONCURRENCY,
            rounding: Rounding::default(),
        }
    }
}

impl ServiceSettings {
    /// Service configuration derived from these settings.
    pub(crate) fn service_config(&self) -> ServiceConfig {
        ServiceConfig {
            rounding: self.rounding,
            summary: SummaryConfig::default()
                .with_max_tokens(self.max_tokens.get())
                .with_concurrency(self.concurrency),
            ..ServiceConfig::default()
        }
    }
}

/// Builds a service instance for the current invocation.
pub(crate) trait ServiceBuilder {
    fn build(&self, settings: &ServiceSettings) -> Result<PlaceReviewService, CliError>;
}

/// Wires the HTTP and file adapters from `review-data`.
pub(crate) struct DefaultServiceBuilder;

impl ServiceBuilder for DefaultServiceBuilder {
    fn build(&self, settings: &ServiceSettings) -> Result<PlaceReviewService, CliError> {
        let source: Arc<dyn ReviewSource> = match &settings.source {
            SourceSetting::Http(url) => Arc::new(HttpReviewSource::new(url.clone()).map_err(
                |source| CliError::BuildProvider {
                    component: "review source",
                    base_url: url.clone(),
                    source,
                },
            )?),
            SourceSetting::File(path) => Arc::new(FileReviewSource::new(path.clone())),
        };
        let scorer = HttpTextScorer::new(settings.scorer_url.clone()).map_err(|source| {
            CliError::BuildProvider {
                component: "scorer",
                base_url: settings.scorer_url.clone(),
                source,
            }
        })?;
        let mut chat = ChatSummarizerConfig::new(settings.summarizer_url.clone())
            .with_model(settings.model.clone());
        if let Some(key) = &settings.api_key {
            chat = chat.with_api_key(key.clone());
        }
        let summarizer =
            ChatSummarizer::with_config(chat).map_err(|source| CliError::BuildProvider {
                component: "summarizer",
                base_url: settings.summarizer_url.clone(),
                source,
            })?;
        Ok(
            PlaceReviewService::new(source, Arc::new(scorer), Arc::new(summarizer))
                .with_config(settings.service_config()),
        )
    }
}
