//! poem-server: serves `GET /poem?id=` over HTTP.
//!
//! Configuration comes from `POEMS_*` environment variables (see
//! `artwork_poems::config`). Log verbosity follows `RUST_LOG`, default `info`.

use anyhow::Context;
use artwork_poems::api::{build_router, AppState};
use artwork_poems::{GenerationPipeline, ServiceConfig, SqlitePoemStore};
use std::sync::Arc;
use tokio_util::sync::CancellationToken;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let config = ServiceConfig::from_env().context("loading configuration")?;

    // One connection pool shared by the catalog and generation clients.
    let http_client = config.http.build_client()?;
    let source = config.artwork_source(http_client.clone())?;
    let generator = config.poem_generator(http_client)?;
    let store = SqlitePoemStore::connect(
        &config.database_url,
        &config.table_name,
        config.db_max_connections,
    )
    .await
    .with_context(|| format!("opening poem store {}", config.database_url))?;

    tracing::info!(
        table = %config.table_name,
        catalog = %source.base_url(),
        model = %generator.model(),
        "collaborators ready"
    );

    let pipeline = Arc::new(GenerationPipeline::new(
        Arc::new(source),
        Arc::new(generator),
        Arc::new(store),
    ));

    let shutdown = CancellationToken::new();
    let state = AppState::new(pipeline)
        .with_request_timeout(config.request_timeout)
        .with_shutdown(shutdown.clone());
    let app = build_router(state);

    let listener = tokio::net::TcpListener::bind(config.listen_addr)
        .await
        .with_context(|| format!("binding {}", config.listen_addr))?;
    tracing::info!(addr = %config.listen_addr, "poem-server listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(async move {
            if let Err(e) = tokio::signal::ctrl_c().await {
                tracing::error!(error = %e, "failed to listen for shutdown signal");
                std::future::pending::<()>().await;
            }
            tracing::info!("shutting down");
            shutdown.cancel();
        })
        .await
        .context("server error")?;

    Ok(())
}
