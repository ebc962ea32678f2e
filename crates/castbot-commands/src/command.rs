//! Command definitions loaded from YAML.
//!
//! ```yaml
//! commands:
//!   - trigger: "!uptime"
//!     template: "Live for {{ uptime }} :rocket:"
//! ```

use std::path::Path;

use serde::Deserialize;
use tracing::info;

use crate::error::CommandError;
use crate::template::Template;

#[derive(Debug, Deserialize)]
struct CommandFile {
    #[serde(default)]
    commands: Vec<RawCommand>,
}

#[derive(Debug, Deserialize)]
struct RawCommand {
    trigger: String,
    template: String,
}

/// One chat command: a `!trigger` and the reply it renders.
#[derive(Debug, Clone)]
pub struct Command {
    pub trigger: String,
    pub template: Template,
}

/// Commands in file order. The first matching trigger wins.
#[derive(Debug, Clone, Default)]
pub struct CommandSet {
    commands: Vec<Command>,
}

impl CommandSet {
    pub async fn from_file(path: impl AsRef<Path>) -> Result<Self, CommandError> {
        let path = path.as_ref();
        let text = tokio::fs::read_to_string(path)
            .await
            .map_err(|source| CommandError::Read {
                path: path.to_path_buf(),
                source,
            })?;

        let set = Self::from_yaml(&text)?;
        info!("Loaded {} commands from {}", set.len(), path.display());
        Ok(set)
    }

    pub fn from_yaml(text: &str) -> Result<Self, CommandError> {
        let file: CommandFile = serde_saphyr::from_str(text)?;
        let commands = file
            .commands
            .into_iter()
            .map(|raw| {
                let template = Template::parse(&raw.template).map_err(|reason| {
                    CommandError::Template {
                        trigger: raw.trigger.clone(),
                        reason,
                    }
                })?;
                Ok(Command {
                    trigger: raw.trigger,
                    template,
                })
            })
            .collect::<Result<Vec<_>, CommandError>>()?;

        Ok(Self { commands })
    }

    pub fn find(&self, trigger: &str) -> Option<&Command> {
        self.commands.iter().find(|c| c.trigger == trigger)
    }

    pub fn triggers(&self) -> impl Iterator<Item = &str> {
        self.commands.iter().map(|c| c.trigger.as_str())
    }

    pub fn len(&self) -> usize {
        self.commands.len()
    }

    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }
}
