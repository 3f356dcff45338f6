// POST /chat handler

use std::convert::Infallible;
use std::sync::Arc;
use tracing::{debug, error};
use warp::reply::Response;
use warp::Reply;

use crate::answer;
use crate::error::{ApiError, CHAT_FAILED, CHAT_UNAVAILABLE, EMPTY_MESSAGE};
use crate::models::{ChatRequest, ChatResponse};
use crate::state::{AppState, ChatState};

pub async fn chat_handler(
    state: Arc<AppState>,
    request: ChatRequest,
) -> Result<Response, Infallible> {
    Ok(match respond(&state.chat, &request.message).await {
        Ok(body) => warp::reply::json(&body).into_response(),
        Err(e) => e.into_response(),
    })
}

/// Answer one chat message.
///
/// An empty message is rejected before the chat availability is looked at.
pub async fn respond(chat: &ChatState, message: &str) -> Result<ChatResponse, ApiError> {
    if message.is_empty() {
        return Err(ApiError::Validation(EMPTY_MESSAGE.to_string()));
    }

    let (session, knowledge) = match chat {
        ChatState::Ready { session, knowledge } => (session, knowledge),
        ChatState::Degraded { reason } => {
            debug!(%reason, "chat requested while degraded");
            return Err(ApiError::Unavailable(CHAT_UNAVAILABLE.to_string()));
        }
    };

    debug!(chars = message.chars().count(), "POST /chat");

    let response = answer::ask(session.as_ref(), knowledge.as_str(), message)
        .await
        .map_err(|e| {
            error!(error = %e, "model call failed");
            ApiError::Internal(CHAT_FAILED.to_string())
        })?;

    Ok(ChatResponse { response })
}
