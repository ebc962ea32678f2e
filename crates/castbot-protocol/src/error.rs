//! Decode errors for inbound frames.

use serde_json::Value;

/// A frame that could not be decoded into a [`crate::Message`].
#[derive(Debug, thiserror::Error)]
#[error("failed to decode chat message: {source}")]
pub struct DecodeError {
    /// Best-known `body` of the frame, empty when unreadable.
    pub body: String,
    /// Best-known `type` of the frame, empty when unreadable.
    pub kind: String,
    #[source]
    pub source: serde_json::Error,
}

impl DecodeError {
    pub(crate) fn from_payload(payload: &[u8], source: serde_json::Error) -> Self {
        let value: Option<Value> = serde_json::from_slice(payload).ok();
        let field = |name: &str| {
            value
                .as_ref()
                .and_then(|v| v.get(name))
                .and_then(Value::as_str)
                .unwrap_or_default()
                .to_string()
        };

        Self {
            body: field("body"),
            kind: field("type"),
            source,
        }
    }
}
