//! HTTP facade over the strength predictor.
//!
//! Exposes `/health`, `/metadata`, `/predict` and `/explain`. The predictor
//! is constructed by the caller and injected here.

mod api;
mod error;
mod handlers;
mod state;

pub use api::{cors_layer, create_router};
pub use state::AppState;

use std::sync::Arc;
use tracing::info;

use crate::config::ServiceConfig;
use crate::core::predictor::StrengthPredictor;
use crate::core::ConfigProvider;

/// Build the router for a config and an already-loaded predictor.
pub fn build_app(config: &ServiceConfig, predictor: StrengthPredictor) -> anyhow::Result<axum::Router> {
    let schema = config.mix_schema()?;
    let state = Arc::new(AppState::new(predictor, schema));
    Ok(create_router(state, &config.server.cors_origins))
}

/// Bind the configured address. The host may be an IP or a hostname.
pub async fn bind_listener(config: &ServiceConfig) -> anyhow::Result<tokio::net::TcpListener> {
    let address = config.bind_address();
    let listener = tokio::net::TcpListener::bind(&address)
        .await
        .map_err(|e| anyhow::anyhow!("failed to bind {}: {}", address, e))?;
    Ok(listener)
}

/// Start the server with the given configuration
pub async fn run_server(config: ServiceConfig, predictor: StrengthPredictor) -> anyhow::Result<()> {
    let start_time = chrono::Utc::now();
    let metadata = predictor.metadata();
    let app = build_app(&config, predictor)?;

    info!(
        address = %config.bind_address(),
        model_type = %metadata.model_type,
        model_version = %metadata.model_version,
        cors_origins = ?config.server.cors_origins,
        started_at = %start_time.to_rfc3339(),
        "Concrete strength API starting"
    );

    let listener = bind_listener(&config).await?;
    let addr = listener.local_addr()?;
    info!(address = %addr, pid = std::process::id(), "Server listening and ready to accept connections");

    let shutdown_signal = async move {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %e, "Failed to install CTRL+C signal handler");
            std::future::pending::<()>().await;
        }
        let uptime = chrono::Utc::now().signed_duration_since(start_time);
        info!(
            uptime_secs = uptime.num_seconds(),
            "Shutdown signal received, stopping server gracefully"
        );
    };

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal)
        .await?;

    info!("Server shut down cleanly");
    Ok(())
}
