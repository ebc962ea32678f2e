//! Command and status lookup errors.

use std::path::PathBuf;

#[derive(Debug, thiserror::Error)]
pub enum CommandError {
    #[error("failed to read command file {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse command file: {0}")]
    Parse(#[from] serde_saphyr::Error),

    #[error("invalid template for {trigger}: {reason}")]
    Template { trigger: String, reason: String },
}

#[derive(Debug, thiserror::Error)]
pub enum StatusError {
    #[error("status request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("server has no last connect time")]
    NeverConnected,
}
