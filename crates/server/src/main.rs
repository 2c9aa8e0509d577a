//! Loan agent demo server
//!
//! Usage: `loan-agent [CONFIG_PATH]`

use anyhow::{Context, Result};
use loan_agent_config::Settings;
use loan_agent_server::{create_router, monitoring, telemetry, AppState};
use std::path::PathBuf;

#[tokio::main]
async fn main() -> Result<()> {
    let config_path = std::env::args().nth(1).map(PathBuf::from);
    let settings = Settings::load(config_path.as_deref()).with_context(|| match &config_path {
        Some(path) => format!("Failed to load config file: {}", path.display()),
        None => "Failed to load configuration".to_string(),
    })?;

    telemetry::init_tracing(&settings.observability)
        .context("Failed to initialize logging")?;

    tracing::info!(version = env!("CARGO_PKG_VERSION"), "Starting loan agent server");

    let mut state = AppState::from_settings(settings.clone()).context("Failed to load agent script")?;

    if settings.observability.metrics_enabled {
        let handle = monitoring::install_recorder().context("Failed to install metrics recorder")?;
        state = state.with_metrics(handle);
        tracing::info!("Prometheus metrics enabled at /metrics");
    }

    tracing::info!(
        stages = state.sequencer.script().stages().len(),
        total_delay = ?state.sequencer.script().total_delay(),
        handler_delay_ms = settings.handler.delay_ms,
        "Agent script ready"
    );

    let _sweeper = state
        .sessions
        .spawn_sweeper(settings.sessions.sweep_interval());

    let app = create_router(state);

    let addr = settings.server.bind_address();
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind {}", addr))?;
    tracing::info!(address = %addr, "Listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Server error")?;

    tracing::info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "Failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutdown signal received");
}
