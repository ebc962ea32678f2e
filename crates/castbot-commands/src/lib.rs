//! Castbot Commands
//!
//! The bot's answer to chat: `!trigger` commands loaded from a YAML file,
//! rendered from templates that can pull live stream status.
//!
//! - `command` — the command file and trigger lookup
//! - `template` — placeholder substitution and emoji shortcodes
//! - `status` — cached stream status lookup and uptime text
//! - `processor` — the `MessageProcessor` that ties them together

pub mod command;
pub mod error;
pub mod processor;
pub mod status;
pub mod template;

pub use command::{Command, CommandSet};
pub use error::{CommandError, StatusError};
pub use processor::CommandProcessor;
pub use status::{HttpStatusProvider, ServerStatus, StatusProvider, format_elapsed, uptime_text};
pub use template::Template;
