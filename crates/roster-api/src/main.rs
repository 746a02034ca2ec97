//! # roster-api — Binary Entry Point
//!
//! `roster-api serve` (the default) starts the HTTP server;
//! `roster-api openapi` prints the OpenAPI document.

use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::Context;
use clap::{Parser, Subcommand};
use roster_api::config::{AppConfig, LogFormat};
use roster_api::AppState;
use roster_store::{InMemoryUserStore, PgUserStore, UserStore};
use tracing_subscriber::EnvFilter;

/// Roster HTTP service.
#[derive(Parser, Debug)]
#[command(name = "roster-api", version, about, args_conflicts_with_subcommands = true)]
struct Cli {
    #[command(subcommand)]
    command: Option<Command>,

    /// Server flags when no subcommand is given.
    #[command(flatten)]
    serve: AppConfig,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Start the HTTP server (default).
    Serve(AppConfig),
    /// Print the OpenAPI document to stdout.
    Openapi,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    match cli.command.unwrap_or(Command::Serve(cli.serve)) {
        Command::Openapi => {
            println!("{}", roster_api::openapi::render()?);
            Ok(())
        }
        Command::Serve(config) => {
            init_tracing(config.log_format);
            serve(config).await
        }
    }
}

fn init_tracing(format: LogFormat) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr);
    match format {
        LogFormat::Pretty => builder.init(),
        LogFormat::Json => builder.json().init(),
    }
}

async fn serve(config: AppConfig) -> anyhow::Result<()> {
    let store: Arc<dyn UserStore> = match config.pg_config() {
        Some(pg) => Arc::new(
            PgUserStore::connect(&pg)
                .await
                .context("failed to initialize the Postgres user store")?,
        ),
        None => {
            tracing::warn!("DATABASE_URL not set. Users are kept in memory and lost on restart.");
            Arc::new(InMemoryUserStore::new())
        }
    };

    let state = AppState::with_store(store, config.store_timeout())
        .context("failed to compile request schemas")?;
    let app = roster_api::app(state);

    let addr = SocketAddr::from(([0, 0, 0, 0], config.port));
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("failed to bind {addr}"))?;
    tracing::info!("Roster API listening on {}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("Roster API stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("failed to listen for shutdown signal: {e}");
        std::future::pending::<()>().await;
    }
    tracing::info!("shutdown signal received");
}
