//! Castbot Transport Layer
//!
//! Owns the websocket session with the chat server. The transport handles:
//! - Configuration validation and dialing
//! - The read loop, which decodes and routes inbound messages
//! - The write loop, the only task that ever writes to the socket
//! - The close handshake with a caller-supplied deadline
//!
//! Message handling is decoupled from the transport via the
//! `MessageProcessor` trait.

pub mod config;
pub mod dialer;
pub mod error;
pub mod processor;
mod reader;
pub mod session;
mod writer;

pub use config::{ChatConfig, REQUEST_ORIGIN};
pub use dialer::{Dialer, Transport, WsDialer};
pub use error::{ChatError, ConfigError};
pub use processor::MessageProcessor;
pub use session::{ChatService, SessionState};
