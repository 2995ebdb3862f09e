//! Error types emitted by the review CLI.
//!
//! Keep this error type reasonably small, as many CLI helpers return
//! `Result<_, CliError>` and the workspace enables `clippy::result_large_err`.

use std::sync::Arc;

use camino::Utf8PathBuf;
use review_data::ProviderBuildError;
use review_engine::ServiceError;
use review_scorer::ParseRoundingError;
use thiserror::Error;

/// Errors emitted by the review CLI.
#[derive(Debug, Error)]
pub enum CliError {
    /// Provided arguments failed Clap validation.
    #[error(transparent)]
    ArgumentParsing(#[from] clap::Error),
    /// Configuration layering failed (files, env, CLI).
    #[error("failed to load configuration: {0}")]
    Configuration(#[from] Arc<ortho_config::OrthoError>),
    /// A required option is missing after configuration merging.
    #[error("missing {field} (set --{field} or {env})")]
    MissingArgument {
        /// Flag name.
        field: &'static str,
        /// Environment variable that can supply the value.
        env: &'static str,
    },
    /// Two mutually exclusive options were both supplied.
    #[error("--{first} and --{second} cannot be combined")]
    ConflictingArguments {
        /// First flag name.
        first: &'static str,
        /// Second flag name.
        second: &'static str,
    },
    /// The rounding policy name is not recognised.
    #[error(transparent)]
    InvalidRounding(#[from] ParseRoundingError),
    /// A referenced input path does not exist on disk.
    #[error("{field} path {path:?} does not exist")]
    MissingSourceFile {
        /// Flag name.
        field: &'static str,
        /// Offending path.
        path: Utf8PathBuf,
    },
    /// A referenced input path exists but is not a file.
    #[error("{field} path {path:?} exists but is not a file")]
    SourcePathNotFile {
        /// Flag name.
        field: &'static str,
        /// Offending path.
        path: Utf8PathBuf,
    },
    /// A referenced input path could not be inspected due to an IO error.
    #[error("failed to inspect {field} path {path:?}: {source}")]
    InspectSourcePath {
        /// Flag name.
        field: &'static str,
        /// Offending path.
        path: Utf8PathBuf,
        /// Underlying IO error.
        #[source]
        source: std::io::Error,
    },
    /// Constructing an HTTP adapter failed.
    #[error("failed to build {component} client for {base_url:?}: {source}")]
    BuildProvider {
        /// Adapter being built.
        component: &'static str,
        /// Configured base URL.
        base_url: String,
        /// Underlying build error.
        #[source]
        source: ProviderBuildError,
    },
    /// Starting the async runtime failed.
    #[error("failed to start async runtime: {0}")]
    Runtime(#[source] std::io::Error),
    /// The provider has no usable reviews for the place.
    #[error("no reviews found for place {place:?}")]
    PlaceNotFound {
        /// Requested place name.
        place: String,
    },
    /// The service failed to answer the request.
    #[error("request failed: {0}")]
    Service(#[from] ServiceError),
    /// Serialising the command output failed.
    #[error("failed to serialise output: {0}")]
    SerialiseOutput(#[source] serde_json::Error),
    /// Writing the command output failed.
    #[error("failed to write output: {0}")]
    WriteOutput(#[source] std::io::Error),
}
