//! Message kinds and the routing table that maps each kind to a handler.

use serde::{Deserialize, Serialize};

/// The `type` field of a chat message.
///
/// The server speaks a closed set of kinds. Anything else decodes into
/// [`MessageType::Unknown`] so it can be reported without failing the read.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum MessageType {
    Chat,
    Ping,
    Pong,
    System,
    NameChange,
    Unknown(String),
}

impl MessageType {
    pub const CHAT: &str = "CHAT";
    pub const PING: &str = "PING";
    pub const PONG: &str = "PONG";
    pub const SYSTEM: &str = "SYSTEM";
    pub const NAME_CHANGE: &str = "NAME_CHANGE";

    pub fn as_str(&self) -> &str {
        match self {
            Self::Chat => Self::CHAT,
            Self::Ping => Self::PING,
            Self::Pong => Self::PONG,
            Self::System => Self::SYSTEM,
            Self::NameChange => Self::NAME_CHANGE,
            Self::Unknown(raw) => raw,
        }
    }

    pub fn is_known(&self) -> bool {
        !matches!(self, Self::Unknown(_))
    }

    /// Where the read side sends a message of this kind.
    pub fn route(&self) -> Route {
        match self {
            Self::Ping => Route::Keepalive,
            Self::Chat => Route::Content,
            Self::System | Self::NameChange => Route::Discard,
            // A PONG from the server is never expected; treat it like any
            // other kind the bot does not consume.
            Self::Pong | Self::Unknown(_) => Route::Unrecognized,
        }
    }
}

impl Default for MessageType {
    /// The kind of a message that carries no `type` at all.
    fn default() -> Self {
        Self::Unknown(String::new())
    }
}

impl From<String> for MessageType {
    fn from(raw: String) -> Self {
        match raw.as_str() {
            Self::CHAT => Self::Chat,
            Self::PING => Self::Ping,
            Self::PONG => Self::Pong,
            Self::SYSTEM => Self::System,
            Self::NAME_CHANGE => Self::NameChange,
            _ => Self::Unknown(raw),
        }
    }
}

impl From<&str> for MessageType {
    fn from(raw: &str) -> Self {
        Self::from(raw.to_string())
    }
}

impl From<MessageType> for String {
    fn from(kind: MessageType) -> Self {
        match kind {
            MessageType::Unknown(raw) => raw,
            known => known.as_str().to_string(),
        }
    }
}

impl std::fmt::Display for MessageType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Destination of an inbound message.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Route {
    /// Answered automatically with a `PONG`.
    Keepalive,
    /// Handed to the message processor.
    Content,
    /// Dropped silently.
    Discard,
    /// Dropped with a warning.
    Unrecognized,
}
