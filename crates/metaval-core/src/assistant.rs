//! # Contract Assistant Chat
//!
//! Transcript handling for the draft edit chat. Reply text comes from an
//! injected [`ResponseProvider`]; the core ships only deterministic
//! providers.

use serde::{Deserialize, Serialize};

/// Opening message of every transcript.
pub const ASSISTANT_GREETING: &str = "Hello! I'm your AI contract assistant. I can help you review, suggest changes, and optimize your contract. What would you like to improve?";

/// Canned suggestions the assistant replies with.
pub const ASSISTANT_SUGGESTIONS: [&str; 5] = [
    "I suggest modifying the payment terms to Net 30. This is more favorable for cash flow management.",
    "Consider adding a force majeure clause to protect both parties from unforeseen circumstances.",
    "The inspection period of 5 days seems reasonable. Would you like to extend the warranty to 12 months?",
    "I recommend clarifying the damages clause. The current wording could be more specific about liability caps.",
    "Great suggestion! I've noted that you want to update the delivery method to FOB Shipping Point.",
];

// =============================================================================
// RESPONSE PROVIDERS
// =============================================================================

/// Source of assistant replies.
pub trait ResponseProvider {
    /// Reply to a user message.
    fn respond(&mut self, prompt: &str) -> String;
}

/// Always answers with the same text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FixedResponse(pub String);

impl FixedResponse {
    #[must_use]
    pub fn new(text: impl Into<String>) -> Self {
        Self(text.into())
    }
}

impl ResponseProvider for FixedResponse {
    fn respond(&mut self, _prompt: &str) -> String {
        self.0.clone()
    }
}

/// Walks a reply list in order, wrapping around.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CyclingResponses {
    replies: Vec<String>,
    next: usize,
}

impl Default for CyclingResponses {
    fn default() -> Self {
        Self::new(ASSISTANT_SUGGESTIONS)
    }
}

impl CyclingResponses {
    /// An empty list falls back to the built-in suggestions.
    pub fn new<S: Into<String>>(replies: impl IntoIterator<Item = S>) -> Self {
        let mut replies: Vec<String> = replies.into_iter().map(Into::into).collect();
        if replies.is_empty() {
            replies = ASSISTANT_SUGGESTIONS.iter().map(|s| (*s).to_string()).collect();
        }
        Self { replies, next: 0 }
    }
}

impl ResponseProvider for CyclingResponses {
    fn respond(&mut self, _prompt: &str) -> String {
        let reply = self
            .replies
            .get(self.next)
            .cloned()
            .unwrap_or_default();
        self.next = self.next.saturating_add(1) % self.replies.len().max(1);
        reply
    }
}

// =============================================================================
// TRANSCRIPT
// =============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Sender {
    User,
    Ai,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatMessage {
    /// Sequence number within the transcript, starting at 1.
    pub id: u64,
    pub sender: Sender,
    pub text: String,
}

/// The chat transcript. Replies are appended by the caller once the reply
/// delay has elapsed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChatSession {
    messages: Vec<ChatMessage>,
    next_id: u64,
}

impl Default for ChatSession {
    fn default() -> Self {
        Self::new()
    }
}

impl ChatSession {
    /// A transcript holding only the greeting.
    #[must_use]
    pub fn new() -> Self {
        let mut session = Self {
            messages: Vec::new(),
            next_id: 1,
        };
        session.push(Sender::Ai, ASSISTANT_GREETING.to_string());
        session
    }

    fn push(&mut self, sender: Sender, text: String) -> u64 {
        let id = self.next_id;
        self.next_id = self.next_id.saturating_add(1);
        self.messages.push(ChatMessage { id, sender, text });
        id
    }

    /// Append a user message. Whitespace-only input is ignored and returns
    /// `None`; otherwise returns the trimmed prompt to answer.
    pub fn send(&mut self, text: &str) -> Option<String> {
        let trimmed = text.trim();
        if trimmed.is_empty() {
            return None;
        }
        self.push(Sender::User, text.to_string());
        Some(trimmed.to_string())
    }

    /// Append an assistant reply.
    pub fn receive(&mut self, text: impl Into<String>) -> u64 {
        self.push(Sender::Ai, text.into())
    }

    #[must_use]
    pub fn messages(&self) -> &[ChatMessage] {
        &self.messages
    }

    #[must_use]
    pub fn last(&self) -> Option<&ChatMessage> {
        self.messages.last()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn transcript_opens_with_greeting() {
        let chat = ChatSession::new();
        assert_eq!(chat.messages().len(), 1);
        assert_eq!(chat.messages()[0].sender, Sender::Ai);
        assert_eq!(chat.messages()[0].text, ASSISTANT_GREETING);
    }

    #[test]
    fn blank_messages_are_ignored() {
        let mut chat = ChatSession::new();
        assert_eq!(chat.send("   "), None);
        assert_eq!(chat.messages().len(), 1);
    }

    #[test]
    fn ids_increase_monotonically() {
        let mut chat = ChatSession::new();
        chat.send("Review payment terms");
        chat.receive("ok");
        let ids: Vec<_> = chat.messages().iter().map(|m| m.id).collect();
        assert_eq!(ids, vec![1, 2, 3]);
    }

    #[test]
    fn cycling_wraps_around() {
        let mut provider = CyclingResponses::new(["a", "b"]);
        let replies: Vec<_> = (0..3).map(|_| provider.respond("x")).collect();
        assert_eq!(replies, vec!["a", "b", "a"]);
    }

    #[test]
    fn cycling_defaults_to_suggestions() {
        let mut provider = CyclingResponses::new(Vec::<String>::new());
        assert_eq!(provider.respond("x"), ASSISTANT_SUGGESTIONS[0]);
    }
}
