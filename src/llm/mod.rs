//! Chat model access
//!
//! A [`ChatModel`] maps an ordered sequence of role-tagged messages to one
//! assistant message. [`ChatClient`] implements it against an
//! OpenAI-compatible `/chat/completions` endpoint.

pub mod client;

use async_trait::async_trait;

pub use client::ChatClient;

use crate::errors::Result;
use crate::models::Message;

#[async_trait]
pub trait ChatModel: Send + Sync {
    /// Send the full conversation and return the assistant reply
    async fn invoke(&self, messages: &[Message]) -> Result<Message>;
}

/// Remove `<think>...</think>` blocks that reasoning models prepend to answers.
/// An unterminated block swallows the rest of the text.
#[must_use]
pub fn strip_reasoning(text: &str) -> String {
    const OPEN: &str = "<think>";
    const CLOSE: &str = "</think>";

    let mut out = String::with_capacity(text.len());
    let mut rest = text;
    while let Some(start) = rest.find(OPEN) {
        out.push_str(&rest[..start]);
        match rest[start..].find(CLOSE) {
            Some(end) => rest = &rest[start + end + CLOSE.len()..],
            None => {
                rest = "";
                break;
            }
        }
    }
    out.push_str(rest);
    out.trim().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_strip_reasoning_block() {
        let text = "<think>The user asks about France.</think>\n\nParis.";
        assert_eq!(strip_reasoning(text), "Paris.");
    }

    #[test]
    fn test_strip_reasoning_without_block() {
        assert_eq!(strip_reasoning("  Paris is the capital. "), "Paris is the capital.");
    }

    #[test]
    fn test_strip_reasoning_unterminated() {
        assert_eq!(strip_reasoning("Answer: <think>never closed"), "Answer:");
    }
}
