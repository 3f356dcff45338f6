//! Mapping between abstraction types and Gemini types

use crate::llm::core::{
    config::GenerationConfig,
    types::{
        ContentDelta, FinishReason, GenerateRequest, Message, MessageRole, StreamEvent,
        UsageMetadata,
    },
};

use super::types::{
    Content, GeminiGenerationConfig, GenerateContentRequest, GenerateContentResponse, Part,
};

/// Convert our abstraction request to Gemini's request format
pub fn to_gemini_request(request: GenerateRequest) -> GenerateContentRequest {
    let generation_config = if request.config.is_empty() {
        None
    } else {
        Some(to_gemini_generation_config(request.config))
    };

    GenerateContentRequest {
        contents: request.messages.into_iter().map(to_gemini_content).collect(),
        generation_config,
    }
}

/// Convert a message to Gemini's content format
fn to_gemini_content(message: Message) -> Content {
    let role = match message.role {
        MessageRole::User => "user",
        MessageRole::Assistant => "model",
    };

    Content {
        role: role.to_string(),
        parts: vec![Part::Text { text: message.text }],
    }
}

fn to_gemini_generation_config(config: GenerationConfig) -> GeminiGenerationConfig {
    GeminiGenerationConfig {
        max_output_tokens: config.max_tokens,
        temperature: config.temperature,
    }
}

/// Convert a Gemini response chunk to our abstraction's stream events
///
/// Text parts become `ContentDelta` events; other part kinds are skipped.
/// A finish reason on the candidate closes the message with `MessageEnd`.
pub fn from_gemini_response(response: GenerateContentResponse) -> Vec<StreamEvent> {
    let mut events = Vec::new();

    let Some(candidate) = response.candidates.into_iter().next() else {
        return events;
    };

    if let Some(content) = candidate.content {
        for part in content.parts {
            if let Part::Text { text } = part {
                events.push(StreamEvent::ContentDelta {
                    index: 0,
                    delta: ContentDelta::TextDelta { text },
                });
            }
        }
    }

    if let Some(finish_reason) = candidate.finish_reason {
        let usage = response
            .usage_metadata
            .map(|usage| UsageMetadata {
                input_tokens: usage.prompt_token_count,
                output_tokens: usage.candidates_token_count,
                total_tokens: usage.total_token_count,
            })
            .unwrap_or_default();

        events.push(StreamEvent::MessageEnd {
            finish_reason: map_finish_reason(&finish_reason),
            usage,
        });
    }

    events
}

/// Map Gemini's finish reason to our abstraction
fn map_finish_reason(reason: &str) -> FinishReason {
    match reason {
        "STOP" => FinishReason::Stop,
        "MAX_TOKENS" => FinishReason::MaxTokens,
        "SAFETY" => FinishReason::Safety,
        other => FinishReason::Other(other.to_string()),
    }
}
