//! Prompts for retrieval-augmented questions

use crate::models::Document;
use crate::models::Message;

/// Lead-in of the system message that carries retrieved context
pub const CONTEXT_PREAMBLE: &str = "Use the following pieces of context to answer the question: ";

/// Build the system prompt embedding retrieved documents verbatim.
///
/// Documents are rendered as a bracketed, comma-separated list in ranking
/// order, so an empty retrieval produces `[]`.
#[must_use]
pub fn build_context_prompt(documents: &[Document]) -> String {
    let joined = documents
        .iter()
        .map(|d| d.content.as_str())
        .collect::<Vec<_>>()
        .join(", ");
    format!("{CONTEXT_PREAMBLE}[{joined}]")
}

/// The two messages sent for one question: retrieved context, then the question
#[must_use]
pub fn build_turn_messages(documents: &[Document], question: &str) -> Vec<Message> {
    vec![
        Message::system(build_context_prompt(documents)),
        Message::human(question),
    ]
}
