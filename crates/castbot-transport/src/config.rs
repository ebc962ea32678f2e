//! Session configuration and validation.

use std::sync::Arc;

use url::Url;

use crate::error::ConfigError;
use crate::processor::MessageProcessor;

/// `Origin` header sent on the websocket handshake.
pub const REQUEST_ORIGIN: &str = "http://localhost";

/// Everything needed to open a chat session.
///
/// Built once and validated by [`ChatConfig::validate`] before any network
/// activity; the session never mutates it.
#[derive(Debug)]
pub struct ChatConfig<P> {
    /// `ws` or `wss`
    pub scheme: String,
    /// Host with optional port, e.g. `stream.example.com:8080`
    pub host: String,
    /// Websocket path, e.g. `/entry`
    pub path: String,
    /// Handler for inbound chat messages
    pub processor: Option<Arc<P>>,
}

impl<P: MessageProcessor> ChatConfig<P> {
    pub fn new(scheme: impl Into<String>, host: impl Into<String>, path: impl Into<String>) -> Self {
        Self {
            scheme: scheme.into(),
            host: host.into(),
            path: path.into(),
            processor: None,
        }
    }

    pub fn with_processor(mut self, processor: P) -> Self {
        self.processor = Some(Arc::new(processor));
        self
    }

    /// Check every field and return the composed endpoint URL.
    pub fn validate(&self) -> Result<Url, ConfigError> {
        if self.scheme.is_empty() {
            return Err(ConfigError::MissingScheme);
        }
        if self.host.is_empty() {
            return Err(ConfigError::MissingHost);
        }
        if self.processor.is_none() {
            return Err(ConfigError::MissingProcessor);
        }

        let path = if self.path.is_empty() || self.path.starts_with('/') {
            self.path.clone()
        } else {
            format!("/{}", self.path)
        };
        Ok(Url::parse(&format!("{}://{}{}", self.scheme, self.host, path))?)
    }

    pub(crate) fn into_parts(self) -> Result<(Url, Arc<P>), ConfigError> {
        let url = self.validate()?;
        let processor = self.processor.ok_or(ConfigError::MissingProcessor)?;
        Ok((url, processor))
    }
}
