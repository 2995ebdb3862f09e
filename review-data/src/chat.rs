//! [`Summarizer`] backed by an OpenAI-compatible chat completions API.

use std::fmt;
use std::time::Duration;

use async_trait::async_trait;
use log::debug;
use reqwest::{Client, Url};
use review_core::{SummarizeError, Summarizer};
use serde::{Deserialize, Serialize};

use crate::client::{
    DEFAULT_USER_AGENT, HttpFailure, ProviderBuildError, build_client, endpoint, parse_base_url,
};

/// Default API root.
pub const DEFAULT_CHAT_BASE_URL: &str = "https://api.openai.com/v1";
/// Default model name.
pub const DEFAULT_MODEL: &str = "gpt-4o-mini";
/// Default completion budget in tokens.
pub const DEFAULT_MAX_COMPLETION_TOKENS: u32 = 4096;

const DEFAULT_CHAT_TIMEOUT_SECS: u64 = 120;

/// Configuration for [`ChatSummarizer`].
#[derive(Clone)]
pub struct ChatSummarizerConfig {
    /// API root; `/chat/completions` is appended.
    pub base_url: String,
    /// Bearer token, if the endpoint requires one.
    pub api_key: Option<String>,
    /// Model name sent with each request.
    pub model: String,
    /// Maximum tokens in each completion.
    pub max_tokens: u32,
    /// Sampling temperature.
    pub temperature: f32,
    /// Nucleus sampling probability mass.
    pub top_p: f32,
    /// Request timeout duration.
    pub timeout: Duration,
    /// User agent string for requests.
    pub user_agent: String,
}

impl fmt::Debug for ChatSummarizerConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ChatSummarizerConfig")
            .field("base_url", &self.base_url)
            .field("api_key", &self.api_key.as_ref().map(|_| "<redacted>"))
            .field("model", &self.model)
            .field("max_tokens", &self.max_tokens)
            .field("temperature", &self.temperature)
            .field("top_p", &self.top_p)
            .field("timeout", &self.timeout)
            .field("user_agent", &self.user_agent)
            .finish()
    }
}

impl Default for ChatSummarizerConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_CHAT_BASE_URL.to_owned(),
            api_key: None,
            model: DEFAULT_MODEL.to_owned(),
            max_tokens: DEFAULT_MAX_COMPLETION_TOKENS,
            temperature: 0.7,
            top_p: 0.95,
            timeout: Duration::from_secs(DEFAULT_CHAT_TIMEOUT_SECS),
            user_agent: DEFAULT_USER_AGENT.to_owned(),
        }
    }
}

impl ChatSummarizerConfig {
    /// Create a configuration for the given API root.
    #[must_use]
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            ..Self::default()
        }
    }

    /// Set the bearer token.
    #[must_use]
    pub fn with_api_key(mut self, api_key: impl Into<String>) -> Self {
        self.api_key = Some(api_key.into());
        self
    }

    /// Set the model name.
    #[must_use]
    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    /// Set the completion token budget.
    #[must_use]
    pub const fn with_max_tokens(mut self, max_tokens: u32) -> Self {
        self.max_tokens = max_tokens;
        self
    }

    /// Set the request timeout.
    #[must_use]
    pub const fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }
}

/// Request body for `POST /chat/completions`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChatRequest<'a> {
    /// Model name.
    pub model: &'a str,
    /// Conversation; always a single user message.
    pub messages: Vec<ChatMessage<'a>>,
    /// Completion token budget.
    pub max_tokens: u32,
    /// Sampling temperature.
    pub temperature: f32,
    /// Nucleus sampling probability mass.
    pub top_p: f32,
}

/// One chat message.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ChatMessage<'a> {
    /// Author role.
    pub role: &'a str,
    /// Message body.
    pub content: String,
}

/// Subset of the chat completions response used here.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct ChatResponse {
    /// Candidate completions.
    #[serde(default)]
    pub choices: Vec<ChatChoice>,
}

/// One completion candidate.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct ChatChoice {
    /// Generated message.
    #[serde(default)]
    pub message: ChatChoiceMessage,
}

/// Generated message content.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct ChatChoiceMessage {
    /// Text of the message; absent for refusals and tool calls.
    #[serde(default)]
    pub content: Option<String>,
}

impl ChatResponse {
    /// Extract the first non-blank completion.
    ///
    /// # Errors
    /// Returns [`SummarizeError::EmptyResponse`] when no choice carries text.
    pub fn into_summary(self) -> Result<String, SummarizeError> {
        self.choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message.content)
            .filter(|content| !content.trim().is_empty())
            .ok_or_else(|| SummarizeError::EmptyResponse {
                message: "response contained no message content".to_owned(),
            })
    }
}

/// Summarises text with a chat completions model.
///
/// Each call sends one user message consisting of the prompt immediately
/// followed by the text.
pub struct ChatSummarizer {
    client: Client,
    completions_url: Url,
    config: ChatSummarizerConfig,
}

impl fmt::Debug for ChatSummarizer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ChatSummarizer")
            .field("completions_url", &self.completions_url.as_str())
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

impl ChatSummarizer {
    /// Create a summariser with explicit configuration.
    ///
    /// # Errors
    /// Returns an error if the URL is unusable or the client fails to build.
    pub fn with_config(config: ChatSummarizerConfig) -> Result<Self, ProviderBuildError> {
        let base_url = parse_base_url(&config.base_url)?;
        let completions_url = endpoint(&base_url, ["chat", "completions"]);
        let client = build_client(&config.user_agent, config.timeout)?;
        Ok(Self {
            client,
            completions_url,
            config,
        })
    }

    /// Build the request body for one call.
    #[must_use]
    pub fn request<'a>(&'a self, prompt: &str, text: &str) -> ChatRequest<'a> {
        ChatRequest {
            model: &self.config.model,
            messages: vec![ChatMessage {
                role: "user",
                content: format!("{prompt}{text}"),
            }],
            max_tokens: self.config.max_tokens,
            temperature: self.config.temperature,
            top_p: self.config.top_p,
        }
    }

    fn convert_failure(&self, error: &reqwest::Error) -> SummarizeError {
        match HttpFailure::from_reqwest(error, &self.completions_url, self.config.timeout) {
            HttpFailure::Timeout { url, timeout_secs } => {
                SummarizeError::Timeout { url, timeout_secs }
            }
            HttpFailure::Status {
                url,
                status,
                message,
            } => SummarizeError::Http {
                url,
                status,
                message,
            },
            HttpFailure::Network { url, message } => SummarizeError::Network { url, message },
        }
    }
}

#[async_trait]
impl Summarizer for ChatSummarizer {
    async fn summarize(&self, prompt: &str, text: &str) -> Result<String, SummarizeError> {
        let body = self.request(prompt, text);
        let mut request = self.client.post(self.completions_url.clone()).json(&body);
        if let Some(key) = &self.config.api_key {
            request = request.bearer_auth(key);
        }
        let response = request
            .send()
            .await
            .and_then(reqwest::Response::error_for_status)
            .map_err(|err| self.convert_failure(&err))?;
        let parsed: ChatResponse =
            response
                .json()
                .await
                .map_err(|err| SummarizeError::EmptyResponse {
                    message: format!("undecodable response: {err}"),
                })?;
        let summary = parsed.into_summary()?;
        debug!(
            "model {} returned {} characters",
            self.config.model,
            summary.len()
        );
        Ok(summary)
    }
}
