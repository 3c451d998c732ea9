//! Remote chat endpoint client.
//!
//! One request per submission: the full transcript is posted to `/chat`
//! and the reply text comes back as `{"response": "..."}`. There are no
//! retries, no timeouts, and no status-specific handling beyond treating
//! any non-success outcome as a generic failure.

use crate::conversation::Message;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

/// Request body for the chat endpoint.
#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    messages: &'a [Message],
}

/// Response body from the chat endpoint.
#[derive(Debug, Deserialize)]
struct ChatResponse {
    response: String,
}

/// A remote collaborator that turns a transcript into a reply.
///
/// The controller only ever sees this trait; tests substitute scripted
/// backends and the TUI holds the HTTP implementation behind an `Arc`.
#[async_trait]
pub trait ChatBackend: Send + Sync {
    /// Send the full message history and return the reply text.
    async fn send(&self, messages: &[Message]) -> Result<String, ClientError>;
}

/// HTTP implementation of [`ChatBackend`].
#[derive(Debug, Clone)]
pub struct HttpChatClient {
    client: reqwest::Client,
    base_url: String,
}

impl HttpChatClient {
    /// Create a client for the given base URL (e.g. `http://localhost:5000`).
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url: base_url.into(),
        }
    }

    fn chat_url(&self) -> String {
        format!("{}/chat", self.base_url.trim_end_matches('/'))
    }
}

#[async_trait]
impl ChatBackend for HttpChatClient {
    async fn send(&self, messages: &[Message]) -> Result<String, ClientError> {
        let response = self
            .client
            .post(self.chat_url())
            .json(&ChatRequest { messages })
            .send()
            .await
            .map_err(ClientError::Http)?;

        let status = response.status();
        if !status.is_success() {
            return Err(ClientError::Status(status.as_u16()));
        }

        let body: ChatResponse = response.json().await.map_err(ClientError::Http)?;
        Ok(body.response)
    }
}

/// Errors from the chat endpoint. All variants are recovered locally by
/// the controller; none surfaces past the widget boundary.
#[derive(Debug, thiserror::Error)]
pub enum ClientError {
    /// Transport or body decoding failure.
    #[error("HTTP error: {0}")]
    Http(#[source] reqwest::Error),

    /// The endpoint answered with a non-success status.
    #[error("chat endpoint returned status {0}")]
    Status(u16),

    /// The in-flight request task stopped before producing a result.
    #[error("chat request did not complete")]
    Interrupted,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::conversation::{Conversation, Message};

    #[test]
    fn test_request_body_shape() {
        let mut convo = Conversation::with_greeting("Hello!");
        convo.push(Message::user("Is the cabin free in June?"));

        let body = serde_json::to_value(ChatRequest {
            messages: convo.messages(),
        })
        .unwrap();

        assert_eq!(
            body,
            serde_json::json!({
                "messages": [
                    {"text": "Hello!", "sender": "bot"},
                    {"text": "Is the cabin free in June?", "sender": "user"},
                ]
            })
        );
    }

    #[test]
    fn test_response_parse() {
        let parsed: ChatResponse =
            serde_json::from_str(r#"{"response": "Yes, June 3-10 is open."}"#).unwrap();
        assert_eq!(parsed.response, "Yes, June 3-10 is open.");
    }

    #[test]
    fn test_response_parse_rejects_missing_field() {
        let parsed: Result<ChatResponse, _> = serde_json::from_str(r#"{"reply": "nope"}"#);
        assert!(parsed.is_err());
    }

    #[test]
    fn test_chat_url_normalizes_trailing_slash() {
        let client = HttpChatClient::new("http://localhost:5000/");
        assert_eq!(client.chat_url(), "http://localhost:5000/chat");

        let client = HttpChatClient::new("http://localhost:5000");
        assert_eq!(client.chat_url(), "http://localhost:5000/chat");
    }
}
