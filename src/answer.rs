//! Grounded answers: prompt rendering plus one model exchange

use crate::llm::{Conversation, LlmError};
use crate::prompt;

/// Ask `question` against `knowledge` through the shared session.
///
/// No retry and no local timeout; provider errors go straight back to the caller.
pub async fn ask(
    session: &dyn Conversation,
    knowledge: &str,
    question: &str,
) -> Result<String, LlmError> {
    let prompt = prompt::render(knowledge, question);
    let reply = session.send_message(&prompt).await?;
    Ok(reply.trim().to_string())
}
