//! Verktoy CLI entry point.

use anyhow::Result;
use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};
use verktoy::cli::{commands, Cli, Commands};
use verktoy::config::Settings;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    let log_level = match cli.verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };

    tracing_subscriber::registry()
        .with(EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| format!("verktoy={}", log_level)),
        ))
        .with(tracing_subscriber::fmt::layer().with_target(false))
        .init();

    // Load configuration
    let settings = match &cli.config {
        Some(path) => Settings::load_from(Some(&std::path::PathBuf::from(path)))?,
        None => Settings::load()?,
    };

    // Ensure data directory exists
    std::fs::create_dir_all(settings.data_dir())?;

    // Execute command
    match &cli.command {
        Commands::Init => {
            commands::run_init(&settings)?;
        }

        Commands::Index { file, source, replace } => {
            commands::run_index(file, source.clone(), *replace, settings).await?;
        }

        Commands::List => {
            commands::run_list(settings).await?;
        }

        Commands::Search { query, limit, source } => {
            commands::run_search(query, *limit, source, settings).await?;
        }

        Commands::Sql { query, db } => {
            commands::run_sql(query, db.clone(), settings).await?;
        }

        Commands::Imagine { prompt, output } => {
            commands::run_imagine(prompt, output.clone(), settings).await?;
        }

        Commands::Agent { task, model, images } => {
            commands::run_agent(task, model.clone(), *images, settings).await?;
        }

        Commands::Config { action } => {
            commands::run_config(action, settings)?;
        }
    }

    Ok(())
}
