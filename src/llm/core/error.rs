//! Errors raised while opening a chat session or talking to the model

use std::time::Duration;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum LlmError {
    /// No API key in the environment
    #[error("GEMINI_API_KEY is not set")]
    MissingApiKey,

    /// The provider refused the key (401/403)
    #[error("Authentication error: {0}")]
    AuthenticationError(String),

    /// Model identifier the client does not know
    #[error("unsupported Gemini model: {0}")]
    UnsupportedModel(String),

    /// A generation setting that could not be parsed
    #[error("invalid value for {key}: {value:?} ({reason})")]
    InvalidSetting {
        key: &'static str,
        value: String,
        reason: String,
    },

    /// Transport failure or unexpected HTTP status
    #[error("HTTP error (status {status}): {body}")]
    HttpError { status: u16, body: String },

    /// Broken SSE stream
    #[error("Stream error: {0}")]
    StreamError(String),

    /// SSE payload that is not a valid response chunk
    #[error("Malformed response chunk: {0}")]
    MalformedChunk(String),

    #[error("Rate limit exceeded (retry after {retry_after:?})")]
    RateLimitExceeded { retry_after: Option<Duration> },

    /// Structured error envelope returned by the API
    #[error("Provider error ({code}): {message}")]
    ProviderError { code: String, message: String },

    /// The stream ended without any text, e.g. blocked by a safety filter
    #[error("model returned no text (finish reason {finish_reason})")]
    EmptyReply { finish_reason: String },
}

impl From<serde_json::Error> for LlmError {
    fn from(err: serde_json::Error) -> Self {
        LlmError::MalformedChunk(err.to_string())
    }
}

impl From<reqwest::Error> for LlmError {
    fn from(err: reqwest::Error) -> Self {
        LlmError::HttpError {
            status: err.status().map(|s| s.as_u16()).unwrap_or(0),
            body: err.to_string(),
        }
    }
}
