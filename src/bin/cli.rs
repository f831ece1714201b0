//! review-watch CLI
//!
//! Polls the homework review API and forwards status changes to Telegram.

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use review_watch::{
    error::{AppError, Result},
    models::{Config, Credentials},
    pipeline::{self, CycleReport},
};

/// review-watch - Homework Review Notifier
#[derive(Parser, Debug)]
#[command(name = "review-watch", version, about = "Homework review status notifier")]
struct Cli {
    /// Path to the configuration file
    #[arg(short, long, default_value = "config.toml", global = true)]
    config: PathBuf,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Poll forever, notifying on every status change
    Run {
        /// Initial window start as a unix timestamp (default: now)
        #[arg(long)]
        from_date: Option<i64>,
    },

    /// Run a single poll cycle and exit
    Once {
        /// Window start as a unix timestamp (default: now)
        #[arg(long)]
        from_date: Option<i64>,
    },

    /// Validate configuration and credentials
    Validate,
}

/// Initialize logging; `RUST_LOG` overrides the configured level.
fn init_logging(verbose: bool, level: &str) {
    let level = if verbose { "debug" } else { level };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level))
        .format_timestamp_secs()
        .init();
}

/// Main entry point for the CLI application.
#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();

    let loaded = Config::load(&cli.config);
    let level = loaded
        .as_ref()
        .map(|c| c.logging.level.clone())
        .unwrap_or_else(|_| "info".to_string());
    init_logging(cli.verbose, &level);

    let config = loaded.unwrap_or_else(|e| {
        log::warn!(
            "Config load failed from {}: {}. Using defaults.",
            cli.config.display(),
            e
        );
        Config::default()
    });
    config.validate()?;

    let credentials = Credentials::from_env();
    log::debug!("Loaded {:?}", credentials);

    match cli.command {
        Command::Run { from_date } => {
            let mut poller = pipeline::prepare(&config, &credentials, from_date).await?;
            log::info!("review-watch starting...");
            poller
                .run_until(async {
                    if let Err(e) = tokio::signal::ctrl_c().await {
                        log::error!("Cannot listen for shutdown signal: {}", e);
                        std::future::pending::<()>().await;
                    }
                })
                .await?;
        }

        Command::Once { from_date } => {
            let mut poller = pipeline::prepare(&config, &credentials, from_date).await?;
            match poller.tick().await? {
                CycleReport::StatusChanged { message, delivered } => {
                    log::info!("Status changed (delivered: {}): {}", delivered, message);
                }
                CycleReport::NoChange => log::info!("No changes"),
                CycleReport::Failed { error, delivery } => {
                    log::error!("Cycle failed ({:?}): {}", delivery, error);
                }
            }
            log::info!("Next window starts at {}", poller.window().from_date());
        }

        Command::Validate => {
            log::info!("✓ Config OK ({})", cli.config.display());
            let missing = credentials.missing();
            if !missing.is_empty() {
                let error = AppError::MissingCredentials(missing);
                log::error!("{}", error);
                return Err(error);
            }
            log::info!("✓ Credentials OK");
        }
    }

    Ok(())
}
