//! Shared HTTP plumbing for the provider adapters.

use std::future::Future;
use std::time::Duration;

use reqwest::{Client, Url};
use tokio::runtime::{Handle, Runtime, RuntimeFlavor};

/// Default user agent for outgoing requests.
pub const DEFAULT_USER_AGENT: &str = "review-engine/0.1";

/// Default request timeout in seconds.
pub(crate) const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Error type for adapter construction failures.
#[derive(Debug)]
pub enum ProviderBuildError {
    /// Failed to build the HTTP client.
    HttpClient(reqwest::Error),
    /// Failed to build the Tokio runtime.
    Runtime(std::io::Error),
    /// The configured base URL cannot be used as an endpoint root.
    InvalidBaseUrl {
        /// Rejected URL.
        url: String,
        /// Why it was rejected.
        message: String,
    },
}

impl std::fmt::Display for ProviderBuildError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::HttpClient(err) => write!(f, "failed to build HTTP client: {err}"),
            Self::Runtime(err) => write!(f, "failed to build Tokio runtime: {err}"),
            Self::InvalidBaseUrl { url, message } => {
                write!(f, "invalid base URL {url:?}: {message}")
            }
        }
    }
}

impl std::error::Error for ProviderBuildError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::HttpClient(err) => Some(err),
            Self::Runtime(err) => Some(err),
            Self::InvalidBaseUrl { .. } => None,
        }
    }
}

/// Build a client with the adapter's user agent and timeouts.
pub(crate) fn build_client(
    user_agent: &str,
    timeout: Duration,
) -> Result<Client, ProviderBuildError> {
    Client::builder()
        .user_agent(user_agent)
        .connect_timeout(timeout)
        .timeout(timeout)
        .build()
        .map_err(ProviderBuildError::HttpClient)
}

/// Parse and check a base URL so endpoint paths can be appended to it.
pub(crate) fn parse_base_url(raw: &str) -> Result<Url, ProviderBuildError> {
    let url = Url::parse(raw).map_err(|err| ProviderBuildError::InvalidBaseUrl {
        url: raw.to_owned(),
        message: err.to_string(),
    })?;
    if url.cannot_be_a_base() {
        return Err(ProviderBuildError::InvalidBaseUrl {
            url: raw.to_owned(),
            message: "URL cannot carry a path".to_owned(),
        });
    }
    Ok(url)
}

/// Append percent-encoded `segments` to the path of `base`.
pub(crate) fn endpoint<'a>(base: &Url, segments: impl IntoIterator<Item = &'a str>) -> Url {
    let mut url = base.clone();
    if let Ok(mut path) = url.path_segments_mut() {
        path.pop_if_empty().extend(segments);
    }
    url
}

/// Transport-level failure shared by all adapters.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum HttpFailure {
    Timeout { url: String, timeout_secs: u64 },
    Status { url: String, status: u16, message: String },
    Network { url: String, message: String },
}

impl HttpFailure {
    /// Classify a reqwest error.
    pub(crate) fn from_reqwest(error: &reqwest::Error, url: &Url, timeout: Duration) -> Self {
        let url = url.to_string();
        if error.is_timeout() {
            return Self::Timeout {
                url,
                timeout_secs: timeout.as_secs(),
            };
        }
        if let Some(status) = error.status() {
            return Self::Status {
                url,
                status: status.as_u16(),
                message: error.to_string(),
            };
        }
        Self::Network {
            url,
            message: error.to_string(),
        }
    }
}

impl std::fmt::Display for HttpFailure {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Timeout { url, timeout_secs } => {
                write!(f, "request to {url} timed out after {timeout_secs}s")
            }
            Self::Status {
                url,
                status,
                message,
            } => write!(f, "HTTP {status} from {url}: {message}"),
            Self::Network { url, message } => write!(f, "network error calling {url}: {message}"),
        }
    }
}

/// Runtime used to drive async requests behind a synchronous trait.
///
/// Outside any Tokio runtime the stored `current_thread` runtime is used.
/// Inside a multi-threaded runtime the caller's handle is used with
/// [`tokio::task::block_in_place`] to avoid nested runtime panics. On a
/// blocking-pool thread of a `current_thread` runtime the stored runtime is
/// used. Called directly from a task on a `current_thread` runtime, the
/// stored runtime refuses to start and the call panics.
pub(crate) struct BlockingBridge {
    runtime: Runtime,
}

impl BlockingBridge {
    pub(crate) fn new() -> Result<Self, ProviderBuildError> {
        let runtime = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
            .map_err(ProviderBuildError::Runtime)?;
        Ok(Self { runtime })
    }

    pub(crate) fn block_on<F: Future>(&self, future: F) -> F::Output {
        match Handle::try_current() {
            Ok(handle) if handle.runtime_flavor() == RuntimeFlavor::MultiThread => {
                tokio::task::block_in_place(|| handle.block_on(future))
            }
            _ => self.runtime.block_on(future),
        }
    }
}

impl std::fmt::Debug for BlockingBridge {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("<tokio::runtime::Runtime>")
    }
}
