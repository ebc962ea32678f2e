//! Castbot Protocol Types
//!
//! Wire types for the Owncast chat websocket. This crate is the single
//! source of truth for the message record, the closed set of message
//! kinds, and how each kind is routed by the connection engine.

pub mod error;
pub mod kind;
pub mod message;

pub use error::DecodeError;
pub use kind::{MessageType, Route};
pub use message::Message;
