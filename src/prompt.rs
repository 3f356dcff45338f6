//! Prompt template for knowledge-grounded answers

/// Header placed right before the knowledge text
pub const KNOWLEDGE_MARKER: &str = "=== BASE DE CONHECIMENTO ===";

/// Header placed right before the user's question
pub const QUESTION_MARKER: &str = "=== PERGUNTA ===";

const INSTRUCTION: &str = "Use o conteúdo abaixo como base para responder a pergunta de forma direta, sem inventar nada que não esteja no texto.";

const CLOSING: &str = "Responda com base apenas no conteúdo da base acima.";

/// Render the prompt sent to the model.
///
/// Both values are inserted verbatim in a single pass, so placeholder-like
/// text inside the knowledge is never substituted again.
pub fn render(knowledge: &str, question: &str) -> String {
    format!(
        "\n{INSTRUCTION}\n\n{KNOWLEDGE_MARKER}\n{knowledge}\n\n{QUESTION_MARKER}\n{question}\n\n{CLOSING}\n"
    )
}
