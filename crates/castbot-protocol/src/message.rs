//! The chat message record exchanged in both directions.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::DecodeError;
use crate::kind::MessageType;

/// An Owncast chat message.
///
/// Every field except `type` is optional and omitted from the wire form
/// when absent. A missing `type` decodes as an empty unknown kind.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Message {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub author: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub body: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(rename = "type", default)]
    pub kind: MessageType,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub visible: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<DateTime<Utc>>,
}

impl Message {
    /// A message carrying only its kind.
    pub fn new(kind: MessageType) -> Self {
        Self {
            author: None,
            body: None,
            id: None,
            kind,
            visible: None,
            timestamp: None,
        }
    }

    /// The keepalive answer. No field of the `PING` is echoed.
    pub fn pong() -> Self {
        Self::new(MessageType::Pong)
    }

    /// A `CHAT` message from `author`.
    pub fn chat(author: impl Into<String>, body: impl Into<String>) -> Self {
        Self {
            author: Some(author.into()),
            body: Some(body.into()),
            ..Self::new(MessageType::Chat)
        }
    }

    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = Some(id.into());
        self
    }

    pub fn body_str(&self) -> &str {
        self.body.as_deref().unwrap_or_default()
    }

    pub fn author_str(&self) -> &str {
        self.author.as_deref().unwrap_or_default()
    }

    pub fn encode(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }

    /// Decode one frame payload.
    ///
    /// On failure the error keeps whatever `body` and `type` could still be
    /// read from the payload so the caller can log them.
    pub fn decode(payload: &[u8]) -> Result<Self, DecodeError> {
        serde_json::from_slice(payload).map_err(|source| DecodeError::from_payload(payload, source))
    }
}

impl std::fmt::Display for Message {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self.encode() {
            Ok(json) => f.write_str(&json),
            Err(_) => write!(f, "{{\"type\":\"{}\"}}", self.kind),
        }
    }
}
