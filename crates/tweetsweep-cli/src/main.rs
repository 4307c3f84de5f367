use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use tweetsweep_core::AppConfig;

mod commands;

#[derive(Parser)]
#[command(name = "tweetsweep")]
#[command(author, version, about = "Delete your oldest tweets a few at a time")]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Path to config.toml (defaults to ~/.config/tweetsweep/config.toml)
    #[arg(short = 'c', long, global = true)]
    config: Option<PathBuf>,

    /// Maximum tweets to delete in this run
    #[arg(short = 'm', long, global = true)]
    max_deletions: Option<u32>,

    /// Show what would be deleted without deleting anything
    #[arg(long, global = true)]
    dry_run: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Delete the oldest of your recent tweets via the API
    Api,
    /// Delete tweets listed in a downloaded account archive
    Archive {
        /// Archive zip (defaults to archive.path from config)
        #[arg(short = 'p', long)]
        path: Option<PathBuf>,
        /// Entry inside the archive holding the tweets
        #[arg(short = 'e', long)]
        entry: Option<String>,
    },
    /// Show how many tweets are tracked as deleted
    Status,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Load configuration
    let mut config = match &cli.config {
        Some(path) => AppConfig::load_from(path)?,
        None => AppConfig::load()?,
    };
    if let Some(max) = cli.max_deletions {
        config.sweep.max_deletions = max;
    }

    // Initialize logging
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| config.general.log_level.clone()),
        ))
        .with(tracing_subscriber::fmt::layer().with_target(false))
        .init();

    // Secrets may live in a .env file next to the state
    if let Ok(path) = dotenvy::dotenv() {
        tracing::debug!("Loaded environment from {}", path.display());
    }

    match cli.command {
        Commands::Api => commands::api::run(&config, cli.dry_run).await,
        Commands::Archive { path, entry } => {
            if let Some(path) = path {
                config.archive.path = path;
            }
            if let Some(entry) = entry {
                config.archive.entry = entry;
            }
            commands::archive::run(&config, cli.dry_run).await
        }
        Commands::Status => commands::status::run(&config),
    }
}
