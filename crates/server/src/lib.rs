//! HTTP server for the loan agent demo
//!
//! Exposes the mock loan-agent endpoint, the chat-session API (with a
//! server-sent event stream of agent progress), the read-only dashboard and
//! health/metrics endpoints.

pub mod error;
pub mod handlers;
pub mod monitoring;
pub mod router;
pub mod state;
pub mod telemetry;

pub use error::ServerError;
pub use router::create_router;
pub use state::AppState;
