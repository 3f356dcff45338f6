//! Process-wide application state
//!
//! Built once before the server starts and shared by every handler as
//! `Arc<AppState>`. Chat setup failures never abort startup; they put the chat
//! route into `ChatState::Degraded`.

use std::sync::Arc;
use tracing::{error, info};

use crate::config::Settings;
use crate::knowledge::KnowledgeBase;
use crate::leads::LeadStore;
use crate::llm::{start_session, Conversation};
use crate::pages::Pages;

/// Availability of the chat route
#[derive(Clone)]
pub enum ChatState {
    Ready {
        session: Arc<dyn Conversation>,
        knowledge: KnowledgeBase,
    },
    Degraded {
        reason: String,
    },
}

impl ChatState {
    /// Load the knowledge base, then open the model session.
    /// The first failure is logged and becomes the degraded reason.
    pub async fn initialize(settings: &Settings) -> Self {
        let knowledge = match KnowledgeBase::load(&settings.knowledge_file).await {
            Ok(knowledge) => {
                info!(
                    path = %settings.knowledge_file.display(),
                    bytes = knowledge.len(),
                    "knowledge base loaded"
                );
                knowledge
            }
            Err(e) => return Self::degraded(e),
        };

        match start_session(&settings.session).await {
            Ok(session) => Self::Ready {
                session: Arc::new(session),
                knowledge,
            },
            Err(e) => Self::degraded(e),
        }
    }

    fn degraded(reason: impl std::fmt::Display) -> Self {
        let reason = reason.to_string();
        error!(%reason, "chatbot unavailable, serving in degraded mode");
        Self::Degraded { reason }
    }

    pub fn is_ready(&self) -> bool {
        matches!(self, Self::Ready { .. })
    }
}

impl std::fmt::Debug for ChatState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Ready { knowledge, .. } => f
                .debug_struct("Ready")
                .field("knowledge", knowledge)
                .finish_non_exhaustive(),
            Self::Degraded { reason } => f.debug_struct("Degraded").field("reason", reason).finish(),
        }
    }
}

/// Everything the handlers need
pub struct AppState {
    pub chat: ChatState,
    pub leads: LeadStore,
    pub pages: Pages,
}

impl AppState {
    pub fn new(chat: ChatState, leads: LeadStore, pages: Pages) -> Self {
        Self { chat, leads, pages }
    }

    /// Build the state from settings. Only template loading can fail here.
    pub async fn initialize(settings: &Settings) -> Result<Self, tera::Error> {
        let pages = Pages::from_dir(&settings.templates_dir)?;
        let chat = ChatState::initialize(settings).await;
        let leads = LeadStore::new(settings.leads_file.clone());
        Ok(Self::new(chat, leads, pages))
    }
}
