//! HTTP server lifecycle.

use std::net::SocketAddr;

use anyhow::Context;
use gradebook_server::handler::routes;
use gradebook_server::service::ServiceState;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use crate::{TRACING_TARGET_SERVER_SHUTDOWN, TRACING_TARGET_SERVER_STARTUP};

/// Binds the listener and serves the API until shutdown.
pub async fn serve(address: SocketAddr, state: ServiceState) -> anyhow::Result<()> {
    let router = routes()
        .with_state(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive());

    let listener = tokio::net::TcpListener::bind(address)
        .await
        .with_context(|| format!("failed to bind {address}"))?;

    tracing::info!(
        target: TRACING_TARGET_SERVER_STARTUP,
        address = %address,
        "server ready"
    );

    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("server error")?;

    Ok(())
}

/// Resolves when the process receives a shutdown request.
async fn shutdown_signal() {
    if let Err(error) = tokio::signal::ctrl_c().await {
        tracing::error!(
            target: TRACING_TARGET_SERVER_SHUTDOWN,
            error = %error,
            "failed to listen for shutdown signal"
        );
        return;
    }

    tracing::info!(
        target: TRACING_TARGET_SERVER_SHUTDOWN,
        "shutdown signal received, draining connections"
    );
}
