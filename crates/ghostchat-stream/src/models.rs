//! Chat request types accepted by the dev server.
//!
//! The shapes follow the UI message format sent by the embedded chat widget.
//! Unknown fields are tolerated everywhere; only the text parts of the last
//! message are interpreted.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Part type carrying user-visible text.
pub const TEXT_PART: &str = "text";

fn default_model() -> String {
    "gpt-4o".to_string()
}

/// A full chat request: the conversation so far plus client options.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChatRequest {
    pub messages: Vec<ChatMessage>,
    /// Model the client asked for. Accepted and logged, never used.
    #[serde(default = "default_model")]
    pub model: String,
    #[serde(default)]
    pub web_search: bool,
}

impl ChatRequest {
    pub fn new(messages: Vec<ChatMessage>) -> Self {
        Self {
            messages,
            model: default_model(),
            web_search: false,
        }
    }

    /// Text of the last message in the conversation.
    ///
    /// Returns `None` for an empty conversation. A last message without a text
    /// part yields an empty string rather than an error.
    pub fn last_message_text(&self) -> Option<&str> {
        self.messages.last().map(ChatMessage::text)
    }
}

/// A single message of the conversation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatMessage {
    pub id: String,
    /// Free-form role string (`user`, `assistant`, ...).
    pub role: String,
    pub parts: Vec<MessagePart>,
}

impl ChatMessage {
    pub fn new(id: impl Into<String>, role: impl Into<String>, parts: Vec<MessagePart>) -> Self {
        Self {
            id: id.into(),
            role: role.into(),
            parts,
        }
    }

    /// Shorthand for a message with one text part.
    pub fn user_text(id: impl Into<String>, text: impl Into<String>) -> Self {
        Self::new(id, "user", vec![MessagePart::text(text)])
    }

    /// Text of the first `text` part, or `""` when there is none.
    pub fn text(&self) -> &str {
        self.parts
            .iter()
            .find(|part| part.is_text())
            .and_then(|part| part.text.as_deref())
            .unwrap_or("")
    }
}

/// A typed payload inside a message.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MessagePart {
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub state: Option<String>,
    /// Fields this server does not know about, kept as-is.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl MessagePart {
    pub fn text(text: impl Into<String>) -> Self {
        Self {
            kind: TEXT_PART.to_string(),
            text: Some(text.into()),
            state: None,
            extra: Map::new(),
        }
    }

    pub fn is_text(&self) -> bool {
        self.kind == TEXT_PART
    }
}
