//! LLM Abstraction Layer
//!
//! A provider-neutral core (`core`), the Gemini implementation (`gemini`) and
//! the long-lived chat session the gateway talks to (`session`).

pub mod core;
pub mod gemini;
pub mod session;

// Re-export commonly used types
pub use self::core::{
    config::GenerationConfig,
    error::LlmError,
    provider::{EventStream, LlmProvider},
    types::{
        ContentDelta, FinishReason, GenerateRequest, Message, MessageRole, StreamEvent,
        UsageMetadata,
    },
};
pub use gemini::{GeminiClient, GeminiModel};
pub use session::{start_session, ChatSession, Conversation, SessionSettings};
