//! API server entry point.

use anyhow::{Context, Result};
use catalog::seed::load_seed;
use clap::Parser;
use server::{router, AppState, ServerConfig};
use std::sync::Arc;
use tokio::net::TcpListener;
use tracing::info;

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let config = ServerConfig::parse();

    info!("loading seed data from {}", config.data_dir.display());
    let store = Arc::new(
        load_seed(&config.data_dir)
            .with_context(|| format!("Failed to load seed data from {}", config.data_dir.display()))?,
    );

    let state = AppState::new(
        store.clone(),
        store.clone(),
        store,
        config.listing_cache(),
        config.token_map(),
    );
    let app = router(state);

    let listener = TcpListener::bind(config.bind)
        .await
        .with_context(|| format!("Failed to bind {}", config.bind))?;
    info!("listening on {}", listener.local_addr()?);

    axum::serve(listener, app)
        .await
        .context("Server terminated unexpectedly")?;
    Ok(())
}
