//! Gemini client implementation

use async_trait::async_trait;
use futures::StreamExt;
use reqwest::{header::RETRY_AFTER, Client, Response, StatusCode};
use std::fmt;
use std::str::FromStr;
use std::time::Duration;

use crate::llm::core::{
    error::LlmError,
    provider::{EventStream, LlmProvider},
    types::GenerateRequest,
};

use super::mapper::{from_gemini_response, to_gemini_request};
use super::sse::parse_sse_stream;
use super::types::ErrorResponse;

/// Public endpoint of the Generative Language API
pub const DEFAULT_BASE_URL: &str = "https://generativelanguage.googleapis.com";

const API_KEY_HEADER: &str = "x-goog-api-key";

/// Gemini model identifiers
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GeminiModel {
    /// Gemini 2.5 Pro
    Gemini25Pro,
    /// Gemini 2.5 Flash
    Gemini25Flash,
    /// Gemini 2.5 Flash Lite
    Gemini25FlashLite,
}

impl GeminiModel {
    /// Get the model identifier string
    pub fn as_str(&self) -> &'static str {
        match self {
            GeminiModel::Gemini25Pro => "gemini-2.5-pro",
            GeminiModel::Gemini25Flash => "gemini-2.5-flash",
            GeminiModel::Gemini25FlashLite => "gemini-2.5-flash-lite",
        }
    }
}

impl fmt::Display for GeminiModel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for GeminiModel {
    type Err = LlmError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "gemini-2.5-pro" => Ok(GeminiModel::Gemini25Pro),
            "gemini-2.5-flash" => Ok(GeminiModel::Gemini25Flash),
            "gemini-2.5-flash-lite" => Ok(GeminiModel::Gemini25FlashLite),
            other => Err(LlmError::UnsupportedModel(other.to_string())),
        }
    }
}

/// Client for interacting with Gemini models through an API key
pub struct GeminiClient {
    /// HTTP client for making requests
    http_client: Client,
    /// API key sent with every request
    api_key: String,
    /// Scheme and host of the API, without trailing slash
    base_url: String,
    /// Model to use
    model: GeminiModel,
}

impl GeminiClient {
    /// Create a new Gemini client
    ///
    /// # Errors
    ///
    /// Returns an error if the API key is blank or the HTTP client cannot be built.
    pub fn new(api_key: impl Into<String>, model: GeminiModel) -> Result<Self, LlmError> {
        let api_key = api_key.into();
        if api_key.trim().is_empty() {
            return Err(LlmError::AuthenticationError(
                "Gemini API key is empty".to_string(),
            ));
        }

        let http_client = Client::builder()
            .connect_timeout(Duration::from_secs(5))
            .build()
            .map_err(|e| LlmError::HttpError {
                status: 0,
                body: format!("Failed to create HTTP client: {}", e),
            })?;

        Ok(Self {
            http_client,
            api_key,
            base_url: DEFAULT_BASE_URL.to_string(),
            model,
        })
    }

    /// Point the client at another deployment of the API
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }

    /// The configured model
    pub fn model(&self) -> GeminiModel {
        self.model
    }

    fn model_url(&self) -> String {
        format!("{}/v1beta/models/{}", self.base_url, self.model.as_str())
    }

    fn stream_url(&self) -> String {
        format!("{}:streamGenerateContent?alt=sse", self.model_url())
    }

    /// Check that the key is accepted and the model exists
    ///
    /// Fetches the model resource; any non-success answer is turned into the
    /// matching `LlmError`.
    pub async fn verify(&self) -> Result<(), LlmError> {
        let response = self
            .http_client
            .get(self.model_url())
            .header(API_KEY_HEADER, &self.api_key)
            .send()
            .await?;

        ensure_success(response).await.map(|_| ())
    }

    /// Make a streaming request to Gemini
    async fn make_streaming_request(&self, request: GenerateRequest) -> Result<EventStream, LlmError> {
        let gemini_request = to_gemini_request(request);

        let response = self
            .http_client
            .post(self.stream_url())
            .header(API_KEY_HEADER, &self.api_key)
            .json(&gemini_request)
            .send()
            .await?;
        let response = ensure_success(response).await?;

        let sse_stream = parse_sse_stream(response.bytes_stream());

        let events = sse_stream.flat_map(|result| {
            futures::stream::iter(match result {
                Ok(chunk) => from_gemini_response(chunk).into_iter().map(Ok).collect::<Vec<_>>(),
                Err(e) => vec![Err(e)],
            })
        });

        Ok(Box::pin(events))
    }
}

#[async_trait]
impl LlmProvider for GeminiClient {
    async fn stream_generate(&self, request: GenerateRequest) -> Result<EventStream, LlmError> {
        self.make_streaming_request(request).await
    }
}

/// Pass successful responses through, turn the others into errors
async fn ensure_success(response: Response) -> Result<Response, LlmError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let retry_after = response
        .headers()
        .get(RETRY_AFTER)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.parse::<u64>().ok())
        .map(Duration::from_secs);
    let body = response.text().await.unwrap_or_default();

    Err(error_from_status(status, body, retry_after))
}

fn error_from_status(status: StatusCode, body: String, retry_after: Option<Duration>) -> LlmError {
    match status {
        StatusCode::TOO_MANY_REQUESTS => LlmError::RateLimitExceeded { retry_after },
        StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => LlmError::AuthenticationError(body),
        _ => match serde_json::from_str::<ErrorResponse>(&body) {
            Ok(parsed) if !parsed.error.status.is_empty() => LlmError::ProviderError {
                code: parsed.error.status,
                message: parsed.error.message,
            },
            _ => LlmError::HttpError {
                status: status.as_u16(),
                body,
            },
        },
    }
}
