//! Gemini-specific request and response types
//!
//! These types map directly to the Generative Language API schema.

use serde::{Deserialize, Serialize};

/// Request to generate content from Gemini
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerateContentRequest {
    /// Array of content items representing the conversation
    pub contents: Vec<Content>,
    /// Generation configuration parameters
    #[serde(skip_serializing_if = "Option::is_none")]
    pub generation_config: Option<GeminiGenerationConfig>,
}

/// A single content item in the conversation
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Content {
    /// Role: "user" or "model"
    #[serde(default)]
    pub role: String,
    /// Parts of the content (may be empty when hitting limits like MAX_TOKENS)
    #[serde(default)]
    pub parts: Vec<Part>,
}

/// A part of content
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Part {
    /// Text content
    Text { text: String },
    /// Any other part kind (inline data, function calls, ...)
    Other(serde_json::Value),
}

/// Generation configuration for Gemini
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GeminiGenerationConfig {
    /// Maximum number of output tokens
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_output_tokens: Option<u32>,
    /// Temperature for sampling
    #[serde(skip_serializing_if = "Option::is_none")]
    pub temperature: Option<f32>,
}

/// Response chunk from Gemini's streaming endpoint
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerateContentResponse {
    /// Candidates (usually just one; absent when the prompt is blocked)
    #[serde(default)]
    pub candidates: Vec<Candidate>,
    /// Usage metadata
    #[serde(skip_serializing_if = "Option::is_none")]
    pub usage_metadata: Option<UsageMetadata>,
}

/// A candidate response
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Candidate {
    /// The generated content
    #[serde(default)]
    pub content: Option<Content>,
    /// Why the candidate finished
    #[serde(skip_serializing_if = "Option::is_none")]
    pub finish_reason: Option<String>,
}

/// Usage metadata from Gemini
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UsageMetadata {
    /// Number of tokens in the prompt
    #[serde(default)]
    pub prompt_token_count: u32,
    /// Number of tokens in the response
    #[serde(default)]
    pub candidates_token_count: u32,
    /// Total token count
    #[serde(default)]
    pub total_token_count: u32,
}

/// Error envelope returned by the API on non-success statuses
#[derive(Debug, Clone, Deserialize)]
pub struct ErrorResponse {
    pub error: ErrorDetail,
}

/// Body of an API error
#[derive(Debug, Clone, Deserialize)]
pub struct ErrorDetail {
    #[serde(default)]
    pub code: u16,
    #[serde(default)]
    pub message: String,
    #[serde(default)]
    pub status: String,
}
