//! Shared fixtures for the gateway tests

#![allow(dead_code)]

use async_trait::async_trait;
use bytezinho::knowledge::KnowledgeBase;
use bytezinho::leads::LeadStore;
use bytezinho::llm::{Conversation, LlmError};
use bytezinho::pages::Pages;
use bytezinho::state::{AppState, ChatState};
use std::path::Path;
use std::sync::{Arc, Mutex};

pub const TEMPLATES_DIR: &str = concat!(env!("CARGO_MANIFEST_DIR"), "/templates");

/// Stand-in for the remote model: records prompts, replays one canned outcome
pub struct RecordingConversation {
    prompts: Mutex<Vec<String>>,
    reply: Result<String, String>,
}

impl RecordingConversation {
    pub fn replying(reply: &str) -> Arc<Self> {
        Arc::new(Self {
            prompts: Mutex::new(Vec::new()),
            reply: Ok(reply.to_string()),
        })
    }

    pub fn failing(error: &str) -> Arc<Self> {
        Arc::new(Self {
            prompts: Mutex::new(Vec::new()),
            reply: Err(error.to_string()),
        })
    }

    pub fn prompts(&self) -> Vec<String> {
        self.prompts.lock().unwrap().clone()
    }
}

#[async_trait]
impl Conversation for RecordingConversation {
    async fn send_message(&self, prompt: &str) -> Result<String, LlmError> {
        self.prompts.lock().unwrap().push(prompt.to_string());
        self.reply.clone().map_err(|body| LlmError::HttpError { status: 503, body })
    }
}

pub fn ready(session: Arc<RecordingConversation>, knowledge: &str) -> ChatState {
    ChatState::Ready {
        session,
        knowledge: KnowledgeBase::from(knowledge),
    }
}

pub fn degraded() -> ChatState {
    ChatState::Degraded {
        reason: "GEMINI_API_KEY is not set".to_string(),
    }
}

pub fn app_state(chat: ChatState, leads_file: &Path) -> Arc<AppState> {
    let pages = Pages::from_dir(TEMPLATES_DIR).expect("shipped templates must load");
    Arc::new(AppState::new(chat, LeadStore::new(leads_file), pages))
}

pub fn line_count(path: &Path) -> usize {
    std::fs::read_to_string(path)
        .map(|content| content.lines().count())
        .unwrap_or(0)
}
