//! Kimsufi Watcher CLI
//!
//! Long-running entry point. Chat credentials are read from `API_TOKEN` and
//! `CHAT_ID`, optionally through a `.env` file.

use std::path::{Path, PathBuf};

use clap::{Parser, Subcommand};
use kimsufi_watcher::{
    error::Result,
    models::{Config, Credentials},
    pipeline::{HttpSource, Poller, SnapshotSource},
    services::notifier,
    utils::http,
};

/// kimsufi-watcher - Server price and availability notifier
#[derive(Parser, Debug)]
#[command(
    name = "kimsufi-watcher",
    version,
    about = "Reports Kimsufi server availability changes"
)]
struct Cli {
    /// Path to the TOML configuration file
    #[arg(short, long, default_value = "config.toml")]
    config: PathBuf,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Poll forever and notify every change
    Watch,

    /// Fetch one snapshot and print the listing
    Once,

    /// Validate the configuration file
    Validate,
}

/// Initialize logging based on verbosity flag.
fn init_logging(verbose: bool) {
    let level = if verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level))
        .format_timestamp_secs()
        .init();
}

/// Load the configuration, falling back to defaults, and validate it.
fn load_config(path: &Path) -> Result<Config> {
    let config = Config::load_or_default(path);
    config.validate()?;
    Ok(config)
}

/// Main entry point for the CLI application.
#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    if let Ok(path) = dotenvy::dotenv() {
        log::debug!("Loaded environment from {}", path.display());
    }

    match cli.command {
        Command::Watch => {
            let config = load_config(&cli.config)?;
            log::info!(
                "Watching {} every {}s (±{}s)",
                config.sources.catalog_url,
                config.poller.interval_secs,
                config.poller.jitter_secs
            );

            let client = http::create_client(&config.http)?;
            let notifier =
                notifier::from_credentials(&client, &config.notifier, Credentials::from_env());
            let source = HttpSource::new(client, config.sources.clone());

            let poller = Poller::new(Box::new(source), notifier, config.poller.clone());
            poller.run().await?;
        }

        Command::Once => {
            let config = load_config(&cli.config)?;
            let client = http::create_client(&config.http)?;
            let snapshot = HttpSource::new(client, config.sources.clone())
                .fetch_snapshot()
                .await?;

            log::info!("Fetched {} offers at {}", snapshot.len(), snapshot.taken_at());
            print!("{}", snapshot.summary_message());
        }

        Command::Validate => {
            log::info!("Validating {}...", cli.config.display());
            let config = Config::load(&cli.config)?;
            if let Err(e) = config.validate() {
                log::error!("Config validation failed: {}", e);
                return Err(e);
            }
            log::info!("✓ Config OK");
        }
    }

    Ok(())
}
