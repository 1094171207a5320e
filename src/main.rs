//! Finn CLI entry point.

use anyhow::Result;
use clap::Parser;
use finn::cli::{commands, Cli, Commands};
use finn::config::Settings;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Load configuration
    let settings = match &cli.config {
        Some(path) => Settings::load_from(Some(&std::path::PathBuf::from(path)))?,
        None => Settings::load()?,
    };

    // Initialize logging; -v overrides the configured level
    let log_level = match cli.verbose {
        0 => settings.general.log_level.as_str(),
        1 => "info",
        2 => "debug",
        _ => "trace",
    };

    tracing_subscriber::registry()
        .with(EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| format!("finn={}", log_level)),
        ))
        .with(tracing_subscriber::fmt::layer().with_target(false))
        .init();

    // Execute command
    match &cli.command {
        Commands::Chat {
            message,
            max_auto_replies,
        } => {
            commands::run_chat(message.clone(), *max_auto_replies, settings).await?;
        }

        Commands::Retrieve { query } => {
            commands::run_retrieve(query, settings).await?;
        }

        Commands::Search { query, top } => {
            commands::run_search(query, *top, settings).await?;
        }

        Commands::Doctor => {
            commands::run_doctor(cli.config.as_deref(), &settings)?;
        }

        Commands::Cache { action } => {
            commands::run_cache(action, settings).await?;
        }

        Commands::Config { action } => {
            commands::run_config(action, cli.config.as_deref(), settings)?;
        }
    }

    Ok(())
}
