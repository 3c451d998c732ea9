//! Conversation transcript types.
//!
//! A conversation is an append-only sequence of messages. Messages are
//! immutable once created and display order is always append order.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Greeting seeded into every new conversation.
pub const GREETING: &str = "Hello! How can I help you with your booking today?";

/// Who authored a message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Sender {
    /// The person typing (or speaking) into the widget.
    User,
    /// The booking assistant.
    Bot,
}

/// A single turn in the conversation.
///
/// Only `text` and `sender` travel over the wire; the timestamp is local
/// display metadata.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Message {
    /// Message content.
    pub text: String,
    /// Who authored the message.
    pub sender: Sender,
    /// When the message was appended locally.
    #[serde(skip, default = "Utc::now")]
    pub timestamp: DateTime<Utc>,
}

impl Message {
    /// Create a new user message.
    pub fn user(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            sender: Sender::User,
            timestamp: Utc::now(),
        }
    }

    /// Create a new bot message.
    pub fn bot(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            sender: Sender::Bot,
            timestamp: Utc::now(),
        }
    }
}

/// Append-only message transcript, seeded with the bot greeting.
#[derive(Debug, Clone)]
pub struct Conversation {
    messages: Vec<Message>,
}

impl Conversation {
    /// Create a conversation seeded with the default greeting.
    pub fn new() -> Self {
        Self::with_greeting(GREETING)
    }

    /// Create a conversation seeded with a specific greeting.
    pub fn with_greeting(greeting: impl Into<String>) -> Self {
        Self {
            messages: vec![Message::bot(greeting)],
        }
    }

    /// All messages, in append order.
    pub fn messages(&self) -> &[Message] {
        &self.messages
    }

    /// Number of messages in the transcript.
    pub fn len(&self) -> usize {
        self.messages.len()
    }

    /// A seeded conversation is never empty, but keep the pair complete.
    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }

    /// Append a message. Messages are never edited or removed afterwards.
    pub fn push(&mut self, message: Message) {
        self.messages.push(message);
    }

    /// The most recent message, if any.
    pub fn last(&self) -> Option<&Message> {
        self.messages.last()
    }
}

impl Default for Conversation {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_message_creation() {
        let user_msg = Message::user("Hi");
        assert_eq!(user_msg.sender, Sender::User);
        assert_eq!(user_msg.text, "Hi");

        let bot_msg = Message::bot("Hello!");
        assert_eq!(bot_msg.sender, Sender::Bot);
    }

    #[test]
    fn test_conversation_seeded_with_greeting() {
        let convo = Conversation::new();
        assert_eq!(convo.len(), 1);
        let first = &convo.messages()[0];
        assert_eq!(first.sender, Sender::Bot);
        assert_eq!(first.text, GREETING);
    }

    #[test]
    fn test_append_order_preserved() {
        let mut convo = Conversation::new();
        convo.push(Message::user("one"));
        convo.push(Message::bot("two"));
        convo.push(Message::user("three"));

        let texts: Vec<&str> = convo.messages().iter().map(|m| m.text.as_str()).collect();
        assert_eq!(texts, vec![GREETING, "one", "two", "three"]);
    }

    #[test]
    fn test_wire_serialization_omits_timestamp() {
        let msg = Message::user("check availability");
        let json = serde_json::to_value(&msg).unwrap();
        assert_eq!(
            json,
            serde_json::json!({"text": "check availability", "sender": "user"})
        );
    }

    #[test]
    fn test_wire_deserialization() {
        let msg: Message =
            serde_json::from_str(r#"{"text": "Room 4 is free", "sender": "bot"}"#).unwrap();
        assert_eq!(msg.sender, Sender::Bot);
        assert_eq!(msg.text, "Room 4 is free");
    }
}
