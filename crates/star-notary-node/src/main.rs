//! # Star Notary Node
//!
//! Entry point for the `star-notary-node` binary. Parses CLI arguments,
//! initializes logging, opens the ledger, and serves the HTTP API until
//! Ctrl-C or SIGTERM.

mod api;
mod cli;
mod logging;

use anyhow::{Context, Result};
use clap::Parser;
use tokio::signal;

use star_notary::store::SqliteStore;
use star_notary::Notary;

use cli::Cli;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    logging::init_logging(&cli.log_level, cli.log_format);

    let store = match cli.ledger_path() {
        Some(path) => SqliteStore::open(path)
            .with_context(|| format!("failed to open ledger at {}", path.display()))?,
        None => SqliteStore::open_memory().context("failed to open in-memory ledger")?,
    };

    let notary = Notary::open(store, cli.notary_config())
        .await
        .context("failed to initialize ledger")?;
    let height = notary.blockchain().height().await?;

    tracing::info!(
        listen = %cli.listen,
        db = ?cli.ledger_path(),
        memory = cli.memory,
        ?height,
        "starting star-notary-node"
    );

    let router = api::create_router(api::AppState::new(notary));
    let listener = tokio::net::TcpListener::bind(cli.listen)
        .await
        .with_context(|| format!("failed to bind HTTP listener on {}", cli.listen))?;
    tracing::info!("API server listening on {}", cli.listen);

    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("API server error")?;

    // Dropping the router releases the last handle on the store.
    tracing::info!("star-notary-node stopped");
    Ok(())
}

/// Resolves on Ctrl-C or SIGTERM.
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            tracing::error!("failed to install Ctrl+C handler: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(e) => {
                tracing::error!("failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {}
        _ = terminate => {}
    }

    tracing::info!("shutdown signal received, draining connections");
}
