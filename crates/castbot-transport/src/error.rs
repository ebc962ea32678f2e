//! Transport error types.

use tokio_tungstenite::tungstenite;

/// A configuration field is missing or invalid. Raised before any dial.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("missing websocket scheme")]
    MissingScheme,
    #[error("missing websocket host")]
    MissingHost,
    #[error("missing message processor")]
    MissingProcessor,
    #[error("invalid websocket url: {0}")]
    InvalidUrl(#[from] url::ParseError),
}

/// Errors surfaced by a chat session.
#[derive(Debug, thiserror::Error)]
pub enum ChatError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("failed to connect to {url}: {source}")]
    Dial {
        url: String,
        #[source]
        source: tungstenite::Error,
    },

    #[error("websocket write failed: {0}")]
    Io(#[from] tungstenite::Error),

    #[error("timeout exceeded while closing websocket connection")]
    CloseTimeout,

    #[error("websocket connection is already closed")]
    Closed,
}
