//! StudySync - syllabus study tracker with calendar-scheduled reviews
//!
//! Main entry point: load configuration, open the store, serve HTTP.

use std::sync::Arc;

use anyhow::Context;
use studysync_lib::utils::logging::init_tracing;
use studysync_lib::{router, AppContext};
use tokio::net::TcpListener;
use tracing::{info, warn};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // .env must be read before the config loader looks at the environment
    let dotenv = dotenvy::dotenv();

    let config = studysync_infra::config::load().context("failed to load configuration")?;
    init_tracing(&config.logging)?;

    match dotenv {
        Ok(path) => info!(path = %path.display(), "Loaded .env"),
        Err(e) if e.not_found() => {}
        Err(e) => warn!(error = %e, "Could not read .env file"),
    }

    let bind_addr = config.server.bind_addr.clone();
    let ctx = Arc::new(AppContext::new(config).context("failed to initialise application")?);

    let listener =
        TcpListener::bind(&bind_addr).await.with_context(|| format!("failed to bind {bind_addr}"))?;
    info!(addr = %bind_addr, "StudySync listening");

    axum::serve(listener, router(ctx))
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("HTTP server failed")?;

    info!("StudySync stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!(error = %e, "Failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
}
