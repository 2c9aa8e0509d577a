//! Health and metrics endpoints

use axum::{extract::State, Json};
use serde::Serialize;

use crate::error::ServerError;
use crate::state::AppState;

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub version: &'static str,
    pub active_sessions: usize,
}

/// GET /health
pub async fn health_check(State(state): State<AppState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy",
        version: env!("CARGO_PKG_VERSION"),
        active_sessions: state.sessions.len(),
    })
}

/// GET /metrics
pub async fn render_metrics(State(state): State<AppState>) -> Result<String, ServerError> {
    state
        .metrics
        .as_ref()
        .map(|handle| handle.render())
        .ok_or(ServerError::MetricsDisabled)
}
