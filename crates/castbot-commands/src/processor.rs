//! Command processor — answers `!trigger` chat messages.

use std::sync::{Arc, LazyLock};

use castbot_protocol::Message;
use castbot_transport::MessageProcessor;
use regex::Regex;
use tracing::{debug, trace};

use crate::command::CommandSet;
use crate::status::StatusProvider;

/// A chat body that is nothing but a command, as the Owncast web client
/// wraps it: `<p>!uptime</p>`.
static COMMAND_BODY: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^<p>(?P<command>![a-z]+)</p>$").expect("valid regex"));

pub struct CommandProcessor<S> {
    commands: CommandSet,
    status: Arc<S>,
    bot_name: String,
}

impl<S: StatusProvider> CommandProcessor<S> {
    pub fn new(commands: CommandSet, status: Arc<S>, bot_name: impl Into<String>) -> Self {
        Self {
            commands,
            status,
            bot_name: bot_name.into(),
        }
    }
}

impl<S: StatusProvider> MessageProcessor for CommandProcessor<S> {
    async fn process(&self, input: Message) -> Option<Message> {
        let id = input.id.as_deref().unwrap_or_default();
        trace!(id, "Received message {}", input.body_str());

        let Some(trigger) = COMMAND_BODY
            .captures(input.body_str())
            .and_then(|caps| caps.name("command"))
            .map(|m| m.as_str())
        else {
            trace!("message {id:?} is not a command: {:?}", input.body_str());
            return None;
        };

        let Some(command) = self.commands.find(trigger) else {
            trace!("{trigger:?}: command not found");
            return None;
        };

        debug!("running command {trigger:?}");
        let rendered = command.template.render(self.status.as_ref()).await;

        Some(Message::chat(
            self.bot_name.clone(),
            format!("@{} {}", input.author_str(), rendered),
        ))
    }
}
