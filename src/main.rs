mod api;
mod cli;
mod config;
mod db;
mod error;
mod models;
mod service;

use cli::{App, ConsoleTerminal};
use colored::*;
use config::Config;
use error::Result;
use service::BookmarkManager;
use std::fs;
use tracing::{error, info};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::EnvFilter;

/// Sends logs to a file, the terminal belongs to the prompt.
fn init_logging(config: &Config) -> Result<WorkerGuard> {
    fs::create_dir_all(&config.log_dir)?;
    let file_appender = tracing_appender::rolling::never(&config.log_dir, "bookmarks.log");
    let (writer, guard) = tracing_appender::non_blocking(file_appender);

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(writer)
        .with_ansi(false)
        .init();

    Ok(guard)
}

#[tokio::main]
async fn main() -> Result<()> {
    let config = Config::from_env()?;
    // Keep the guard alive so buffered log lines are flushed on exit.
    let _guard = init_logging(&config)?;

    info!("Initializing bookmark manager...");

    let service = match BookmarkManager::connect(&config).await {
        Ok(service) => {
            info!("Bookmark store ready at {}", config.database_url);
            service
        },
        Err(e) => {
            error!("Failed to initialize bookmark store: {:?}", e);
            println!(
                "{} {}",
                "Error: Failed to open the bookmark store.".red(),
                e.to_string().red()
            );
            return Err(e);
        },
    };

    let mut app = App::new(service, ConsoleTerminal::new(), config.export_dir.clone());
    app.run().await?;

    info!("Bookmark manager stopped");
    Ok(())
}
