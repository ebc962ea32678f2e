//! Castbot — Owncast chat bot
//!
//! Connects to an Owncast server's chat websocket, keeps the connection
//! alive, and answers `!trigger` commands defined in a YAML file.
//!
//! Usage:
//!   castbot                                       # commands.yml, stream.skynewz.dev
//!   castbot --host stream.example.com             # Another server
//!   castbot --commands-file bot.yml --verbose     # Custom commands, debug logs
//!   LOG_LEVEL=trace castbot                       # Explicit log filter

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use anyhow::Context;
use castbot_commands::{CommandProcessor, CommandSet, HttpStatusProvider};
use castbot_transport::{ChatConfig, ChatService};
use clap::Parser;
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "castbot", about = "Owncast chat bot")]
struct Cli {
    /// YAML file with the bot's commands
    #[arg(long, default_value = "commands.yml")]
    commands_file: PathBuf,

    /// Websocket scheme
    #[arg(long, default_value = "wss")]
    scheme: String,

    /// Owncast server host (and optional port)
    #[arg(long, default_value = "stream.skynewz.dev")]
    host: String,

    /// Chat websocket path
    #[arg(long, default_value = "/entry")]
    path: String,

    /// Base URL for the status API
    #[arg(long, default_value = "https://stream.skynewz.dev")]
    status_url: String,

    /// Author name on the bot's replies
    #[arg(long, default_value = "Bot")]
    bot_name: String,

    /// Seconds to wait for the server to acknowledge a close
    #[arg(long, default_value = "10")]
    close_timeout: u64,

    /// Seconds to wait for the status API before giving up on a lookup
    #[arg(long, default_value = "10")]
    status_timeout: u64,

    /// Seconds a status lookup stays cached (0 caches forever)
    #[arg(long, default_value = "60")]
    status_ttl: u64,

    /// Enable verbose logging
    #[arg(long)]
    verbose: bool,

    /// Write logs to a file (defaults to ~/.castbot/logs/castbot.log if no path given)
    #[arg(long, default_missing_value = "DEFAULT", num_args = 0..=1)]
    log_file: Option<String>,
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    if let Err(e) = init_tracing(&cli) {
        eprintln!("{e:#}");
        std::process::exit(1);
    }

    if let Err(e) = run(cli).await {
        error!("{e:#}");
        std::process::exit(1);
    }
}

/// `LOG_LEVEL` wins over `--verbose`.
fn init_tracing(cli: &Cli) -> anyhow::Result<()> {
    let filter = match std::env::var("LOG_LEVEL") {
        Ok(level) if !level.is_empty() => {
            EnvFilter::try_new(&level).with_context(|| format!("invalid LOG_LEVEL {level:?}"))?
        }
        _ if cli.verbose => EnvFilter::new("debug"),
        _ => EnvFilter::new("info"),
    };

    let Some(ref log_file_arg) = cli.log_file else {
        tracing_subscriber::fmt().with_env_filter(filter).init();
        return Ok(());
    };

    let log_path = if log_file_arg == "DEFAULT" {
        dirs::home_dir()
            .unwrap_or_else(std::env::temp_dir)
            .join(".castbot/logs/castbot.log")
    } else {
        PathBuf::from(log_file_arg)
    };

    if let Some(parent) = log_path.parent() {
        let _ = std::fs::create_dir_all(parent);
    }

    let file = std::fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(&log_path)
        .with_context(|| format!("failed to open log file {}", log_path.display()))?;

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::sync::Mutex::new(file))
        .with_ansi(false)
        .init();

    eprintln!("Logging to {}", log_path.display());
    Ok(())
}

async fn run(cli: Cli) -> anyhow::Result<()> {
    let commands = CommandSet::from_file(&cli.commands_file).await?;
    if commands.is_empty() {
        warn!("{} defines no commands", cli.commands_file.display());
    }

    let ttl = (cli.status_ttl > 0).then(|| Duration::from_secs(cli.status_ttl));
    let status = Arc::new(HttpStatusProvider::with_timeout(
        &cli.status_url,
        ttl,
        Duration::from_secs(cli.status_timeout),
    ));
    let processor = CommandProcessor::new(commands, status, cli.bot_name);

    let config = ChatConfig::new(cli.scheme, cli.host, cli.path).with_processor(processor);
    let mut service = ChatService::connect(config).await?;
    service.listen();

    tokio::select! {
        _ = tokio::signal::ctrl_c() => {
            info!("Interrupted, closing chat connection");
        }
        _ = service.closed() => {
            info!("Chat connection ended");
            return Ok(());
        }
    }

    service
        .close(Duration::from_secs(cli.close_timeout))
        .await
        .context("failed to close chat connection")?;

    info!("Disconnected");
    Ok(())
}
