mod config;
mod server;

use anyhow::{Context, Result};
use clap::Parser;
use libreceipt::{JsonFileTable, Ledger};
use std::sync::Arc;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

fn init_tracing() {
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_env("RECEIPTBOX_LOG").unwrap_or_else(|_| EnvFilter::new("info")))
        .with(tracing_subscriber::fmt::layer())
        .init();
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "cannot listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    info!("shutting down");
}

#[tokio::main]
async fn main() -> Result<()> {
    init_tracing();

    let config = config::Config::parse();
    let year = config.ambient_year();

    let table = JsonFileTable::new(&config.ledger);
    let ledger = tokio::task::spawn_blocking(move || Ledger::open(table, year))
        .await?
        .with_context(|| format!("cannot open ledger `{}'", config.ledger.display()))?;

    let listener = tokio::net::TcpListener::bind(config.listen)
        .await
        .with_context(|| format!("cannot listen on {}", config.listen))?;
    info!(
        addr = %config.listen,
        ledger = %config.ledger.display(),
        year,
        "running receiptbox"
    );

    axum::serve(listener, server::app(Arc::new(ledger)))
        .with_graceful_shutdown(shutdown_signal())
        .await?;
    Ok(())
}
