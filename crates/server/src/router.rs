//! Router construction

use axum::{
    http::{HeaderName, Method},
    routing::{get, post},
    Router,
};
use loan_agent_config::constants::server::CORS_ALLOWED_HEADERS;
use tower_http::cors::{Any, CorsLayer};
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::TraceLayer;

use crate::handlers::{chat, dashboard, health, loan_agent};
use crate::state::AppState;

/// Permissive CORS: any origin, the four standard client headers.
///
/// Every OPTIONS request is answered here with an empty 200.
pub fn cors_layer() -> CorsLayer {
    CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::GET, Method::POST, Method::DELETE, Method::OPTIONS])
        .allow_headers(CORS_ALLOWED_HEADERS.map(HeaderName::from_static))
}

/// Create the application router
pub fn create_router(state: AppState) -> Router {
    let request_timeout = state.settings.server.request_timeout();

    Router::new()
        .route("/health", get(health::health_check))
        .route("/metrics", get(health::render_metrics))
        // Mock loan-agent function
        .route("/loan-agent", post(loan_agent::handle_loan_agent))
        .route("/functions/v1/loan-agent", post(loan_agent::handle_loan_agent))
        // Chat
        .route("/api/agents", get(chat::list_agents))
        .route("/api/sessions", post(chat::create_session))
        .route(
            "/api/sessions/:id",
            get(chat::get_session).delete(chat::delete_session),
        )
        .route("/api/sessions/:id/messages", post(chat::submit_message))
        .route("/api/sessions/:id/events", get(chat::session_events))
        // Dashboard
        .route("/api/loans", get(dashboard::list_loans))
        .route("/api/loans/:id", get(dashboard::get_loan))
        .route(
            "/api/loans/:id/sanction-letter",
            get(dashboard::sanction_letter),
        )
        .layer(TimeoutLayer::new(request_timeout))
        .layer(cors_layer())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
