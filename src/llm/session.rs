//! Long-lived chat session over an LLM provider
//!
//! The gateway holds exactly one session for the lifetime of the process and
//! shares it between all requests. Each exchange is appended to the session
//! history, and the whole history is replayed to the provider on the next call.

use async_trait::async_trait;
use futures::StreamExt;
use std::sync::{Mutex, PoisonError};
use tracing::{debug, info};

use super::core::{
    config::GenerationConfig,
    error::LlmError,
    provider::LlmProvider,
    types::{ContentDelta, FinishReason, GenerateRequest, Message, StreamEvent},
};
use super::gemini::{GeminiClient, GeminiModel};

/// Narrow interface for sending one prompt through a conversation
#[async_trait]
pub trait Conversation: Send + Sync {
    /// Send `prompt` as the next user turn and return the model's full reply
    async fn send_message(&self, prompt: &str) -> Result<String, LlmError>;
}

/// Stateful conversation with a remote model
///
/// Every successful exchange is kept and replayed in full on the next call.
/// Since each prompt embeds the whole knowledge base, the history grows without
/// bound: a long-running process eventually exceeds the model's context window,
/// after which every call fails until the process restarts.
pub struct ChatSession {
    provider: Box<dyn LlmProvider>,
    config: GenerationConfig,
    /// Completed exchanges. Only locked for snapshot/append, never across a call.
    history: Mutex<Vec<Message>>,
}

impl ChatSession {
    /// Open a session with an empty history
    pub fn new(provider: Box<dyn LlmProvider>, config: GenerationConfig) -> Self {
        Self {
            provider,
            config,
            history: Mutex::new(Vec::new()),
        }
    }

    /// Copy of the exchanges recorded so far
    pub fn history(&self) -> Vec<Message> {
        self.history
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    fn record(&self, prompt: Message, reply: Message) {
        let mut history = self.history.lock().unwrap_or_else(PoisonError::into_inner);
        history.push(prompt);
        history.push(reply);
    }
}

#[async_trait]
impl Conversation for ChatSession {
    async fn send_message(&self, prompt: &str) -> Result<String, LlmError> {
        let user_message = Message::user(prompt);

        let mut messages = self.history();
        messages.push(user_message.clone());
        let request = GenerateRequest {
            messages,
            config: self.config.clone(),
        };

        let mut stream = self.provider.stream_generate(request).await?;

        let mut text = String::new();
        let mut finish_reason = None;
        while let Some(event) = stream.next().await {
            match event? {
                StreamEvent::ContentDelta {
                    delta: ContentDelta::TextDelta { text: chunk },
                    ..
                } => text.push_str(&chunk),
                StreamEvent::MessageEnd {
                    finish_reason: reason,
                    usage,
                } => {
                    debug!(
                        finish_reason = reason.code(),
                        input_tokens = usage.input_tokens,
                        output_tokens = usage.output_tokens,
                        "model reply finished"
                    );
                    finish_reason = Some(reason);
                }
                StreamEvent::Error { error } => return Err(LlmError::StreamError(error)),
            }
        }

        if text.is_empty() {
            return Err(LlmError::EmptyReply {
                finish_reason: finish_reason
                    .as_ref()
                    .map(FinishReason::code)
                    .unwrap_or("NONE")
                    .to_string(),
            });
        }

        self.record(user_message, Message::assistant(text.clone()));
        Ok(text)
    }
}

/// What is needed to open the Gemini session
#[derive(Debug, Clone)]
pub struct SessionSettings {
    /// Provider API key; `None` when not configured
    pub api_key: Option<String>,
    /// Model identifier, e.g. `gemini-2.5-flash`
    pub model: String,
    /// API base URL
    pub base_url: String,
    /// Raw `GEMINI_MAX_OUTPUT_TOKENS`, parsed when the session starts
    pub max_output_tokens: Option<String>,
    /// Raw `GEMINI_TEMPERATURE`, parsed when the session starts
    pub temperature: Option<String>,
}

impl SessionSettings {
    /// Generation parameters applied to every call
    pub fn generation(&self) -> Result<GenerationConfig, LlmError> {
        let mut config = GenerationConfig::new();
        if let Some(max_tokens) = parse_setting("GEMINI_MAX_OUTPUT_TOKENS", &self.max_output_tokens)? {
            config = config.with_max_tokens(max_tokens);
        }
        if let Some(temperature) = parse_setting::<f32>("GEMINI_TEMPERATURE", &self.temperature)? {
            if !(0.0..=2.0).contains(&temperature) {
                return Err(LlmError::InvalidSetting {
                    key: "GEMINI_TEMPERATURE",
                    value: temperature.to_string(),
                    reason: "must be between 0 and 2".to_string(),
                });
            }
            config = config.with_temperature(temperature);
        }
        Ok(config)
    }
}

fn parse_setting<T>(key: &'static str, raw: &Option<String>) -> Result<Option<T>, LlmError>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    raw.as_deref()
        .map(|value| {
            value.trim().parse().map_err(|e: T::Err| LlmError::InvalidSetting {
                key,
                value: value.to_string(),
                reason: e.to_string(),
            })
        })
        .transpose()
}

/// Configure the Gemini client and open the process-wide chat session
///
/// # Errors
///
/// Fails when the API key is missing, a generation setting does not parse, the
/// model identifier is unknown, or the provider rejects the key/model check.
pub async fn start_session(settings: &SessionSettings) -> Result<ChatSession, LlmError> {
    let api_key = settings
        .api_key
        .as_deref()
        .filter(|key| !key.trim().is_empty())
        .ok_or(LlmError::MissingApiKey)?;
    let generation = settings.generation()?;
    let model: GeminiModel = settings.model.parse()?;

    let client = GeminiClient::new(api_key, model)?.with_base_url(&settings.base_url);
    client.verify().await?;

    info!(model = %client.model(), "Gemini chat session opened");
    Ok(ChatSession::new(Box::new(client), generation))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::llm::core::provider::EventStream;
    use crate::llm::core::types::{MessageRole, UsageMetadata};
    use std::sync::Arc;

    /// Provider that replays canned replies and records every request
    struct ScriptedProvider {
        replies: Mutex<Vec<Result<Vec<StreamEvent>, LlmError>>>,
        requests: Arc<Mutex<Vec<GenerateRequest>>>,
    }

    impl ScriptedProvider {
        fn new(replies: Vec<Result<Vec<StreamEvent>, LlmError>>) -> (Self, Arc<Mutex<Vec<GenerateRequest>>>) {
            let requests = Arc::new(Mutex::new(Vec::new()));
            let provider = Self {
                replies: Mutex::new(replies.into_iter().rev().collect()),
                requests: requests.clone(),
            };
            (provider, requests)
        }
    }

    #[async_trait]
    impl LlmProvider for ScriptedProvider {
        async fn stream_generate(&self, request: GenerateRequest) -> Result<EventStream, LlmError> {
            self.requests.lock().unwrap().push(request);
            let events = self
                .replies
                .lock()
                .unwrap()
                .pop()
                .expect("no scripted reply left")?;
            Ok(Box::pin(futures::stream::iter(events.into_iter().map(Ok))))
        }
    }

    fn text(chunk: &str) -> StreamEvent {
        StreamEvent::ContentDelta {
            index: 0,
            delta: ContentDelta::TextDelta {
                text: chunk.to_string(),
            },
        }
    }

    fn end(reason: FinishReason) -> StreamEvent {
        StreamEvent::MessageEnd {
            finish_reason: reason,
            usage: UsageMetadata::new(10, 2),
        }
    }

    #[tokio::test]
    async fn test_send_message_concatenates_deltas() {
        let (provider, _) = ScriptedProvider::new(vec![Ok(vec![
            text("O produto "),
            text("custa R$10."),
            end(FinishReason::Stop),
        ])]);
        let session = ChatSession::new(Box::new(provider), GenerationConfig::default());

        let reply = session.send_message("Quanto custa?").await.unwrap();
        assert_eq!(reply, "O produto custa R$10.");
    }

    #[tokio::test]
    async fn test_history_is_replayed_on_next_call() {
        let (provider, requests) = ScriptedProvider::new(vec![
            Ok(vec![text("primeira"), end(FinishReason::Stop)]),
            Ok(vec![text("segunda"), end(FinishReason::Stop)]),
        ]);
        let session = ChatSession::new(Box::new(provider), GenerationConfig::default());

        session.send_message("um").await.unwrap();
        session.send_message("dois").await.unwrap();

        let requests = requests.lock().unwrap();
        assert_eq!(requests[0].messages, vec![Message::user("um")]);
        assert_eq!(
            requests[1].messages,
            vec![
                Message::user("um"),
                Message::assistant("primeira"),
                Message::user("dois"),
            ]
        );
        assert_eq!(session.history().len(), 4);
    }

    #[tokio::test]
    async fn test_failed_call_leaves_history_untouched() {
        let (provider, _) = ScriptedProvider::new(vec![
            Ok(vec![text("ok"), end(FinishReason::Stop)]),
            Err(LlmError::HttpError {
                status: 503,
                body: "unavailable".to_string(),
            }),
        ]);
        let session = ChatSession::new(Box::new(provider), GenerationConfig::default());

        session.send_message("um").await.unwrap();
        let err = session.send_message("dois").await.unwrap_err();

        assert!(matches!(err, LlmError::HttpError { status: 503, .. }));
        let history = session.history();
        assert_eq!(history.len(), 2);
        assert_eq!(history[1].role, MessageRole::Assistant);
    }

    #[tokio::test]
    async fn test_empty_reply_reports_finish_reason() {
        let (provider, _) = ScriptedProvider::new(vec![Ok(vec![end(FinishReason::Safety)])]);
        let session = ChatSession::new(Box::new(provider), GenerationConfig::default());

        match session.send_message("?").await {
            Err(LlmError::EmptyReply { finish_reason }) => assert_eq!(finish_reason, "SAFETY"),
            other => panic!("Expected empty reply, got {:?}", other),
        }
        assert!(session.history().is_empty());
    }

    #[tokio::test]
    async fn test_stream_error_event_is_propagated() {
        let (provider, _) = ScriptedProvider::new(vec![Ok(vec![
            text("parcial"),
            StreamEvent::Error {
                error: "connection reset".to_string(),
            },
        ])]);
        let session = ChatSession::new(Box::new(provider), GenerationConfig::default());

        let err = session.send_message("?").await.unwrap_err();
        assert!(matches!(err, LlmError::StreamError(msg) if msg == "connection reset"));
    }

    #[tokio::test]
    async fn test_generation_config_is_forwarded() {
        let (provider, requests) =
            ScriptedProvider::new(vec![Ok(vec![text("ok"), end(FinishReason::Stop)])]);
        let config = GenerationConfig::new().with_max_tokens(256);
        let session = ChatSession::new(Box::new(provider), config.clone());

        session.send_message("?").await.unwrap();
        assert_eq!(requests.lock().unwrap()[0].config, config);
    }

    fn settings(api_key: Option<&str>, model: &str) -> SessionSettings {
        SessionSettings {
            api_key: api_key.map(str::to_string),
            model: model.to_string(),
            base_url: "http://127.0.0.1:9".to_string(),
            max_output_tokens: None,
            temperature: None,
        }
    }

    #[tokio::test]
    async fn test_start_session_without_api_key() {
        let result = start_session(&settings(None, "gemini-2.5-flash")).await;
        assert!(matches!(result, Err(LlmError::MissingApiKey)));

        let result = start_session(&settings(Some("  "), "gemini-2.5-flash")).await;
        assert!(matches!(result, Err(LlmError::MissingApiKey)));
    }

    #[tokio::test]
    async fn test_start_session_with_unknown_model() {
        let result = start_session(&settings(Some("key"), "gpt-4")).await;
        assert!(matches!(result, Err(LlmError::UnsupportedModel(_))));
    }

    #[tokio::test]
    async fn test_start_session_with_invalid_temperature() {
        let mut settings = settings(Some("key"), "gemini-2.5-flash");
        settings.temperature = Some("warm".to_string());

        match start_session(&settings).await {
            Err(LlmError::InvalidSetting { key, value, .. }) => {
                assert_eq!(key, "GEMINI_TEMPERATURE");
                assert_eq!(value, "warm");
            }
            Err(other) => panic!("Expected invalid setting, got {:?}", other),
            Ok(_) => panic!("Expected invalid setting, got a session"),
        }
    }

    #[test]
    fn test_generation_settings_parse() {
        let mut settings = settings(Some("key"), "gemini-2.5-flash");
        assert!(settings.generation().unwrap().is_empty());

        settings.max_output_tokens = Some(" 512 ".to_string());
        settings.temperature = Some("0.3".to_string());
        let config = settings.generation().unwrap();
        assert_eq!(config.max_tokens, Some(512));
        assert_eq!(config.temperature, Some(0.3));

        settings.max_output_tokens = Some("-1".to_string());
        assert!(matches!(
            settings.generation(),
            Err(LlmError::InvalidSetting { key: "GEMINI_MAX_OUTPUT_TOKENS", .. })
        ));

        settings.max_output_tokens = None;
        settings.temperature = Some("5".to_string());
        assert!(matches!(
            settings.generation(),
            Err(LlmError::InvalidSetting { key: "GEMINI_TEMPERATURE", .. })
        ));
    }
}
