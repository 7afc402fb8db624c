use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

pub mod chat;
pub mod config;
pub mod history;

use crate::core::AppConfig;

#[derive(Subcommand)]
enum Command {
    /// Start a chat session (the default)
    Chat {},
    /// List saved session transcripts
    History {},
    /// Print a saved session transcript
    Show {
        /// Transcript name as shown by `history`
        #[arg(long)]
        name: String,
    },
    /// Print the config file and whether it is usable
    Config {},
}

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    #[command(subcommand)]
    command: Option<Command>,

    /// Path to the `key: value` config file
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Directory where transcripts are stored
    #[arg(long, global = true)]
    history_dir: Option<PathBuf>,
}

fn init_tracing() {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                format!("{}=info", env!("CARGO_CRATE_NAME")).into()
            }),
        )
        // Keep logs off stdout so they don't interleave with the chat
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

pub async fn run() -> Result<()> {
    let args = Cli::parse();
    init_tracing();

    let mut app_config = AppConfig::default();
    if let Some(path) = args.config {
        app_config.config_path = path;
    }
    if let Some(dir) = args.history_dir {
        app_config.history_dir = dir;
    }

    // Handle each sub command
    match args.command {
        Some(Command::Chat {}) | None => {
            chat::run(&app_config).await?;
        }
        Some(Command::History {}) => {
            history::list(&app_config)?;
        }
        Some(Command::Show { name }) => {
            history::show(&app_config, &name)?;
        }
        Some(Command::Config {}) => {
            config::run(&app_config)?;
        }
    }

    Ok(())
}
