//! Chat Session API
//!
//! The chat page as a resource: create a session, post a loan request, and
//! follow the agents through a server-sent event stream or by polling the
//! session snapshot.

use axum::{
    body::Bytes,
    extract::{Path, State},
    http::StatusCode,
    response::sse::{Event, KeepAlive, Sse},
    Json,
};
use futures::Stream;
use loan_agent_core::AgentKind;
use loan_agent_workflow::{SessionError, SessionSnapshot};
use serde::{Deserialize, Serialize};
use std::convert::Infallible;
use tokio::sync::broadcast::error::RecvError;
use uuid::Uuid;

use crate::error::ServerError;
use crate::monitoring::{SEQUENCES_COMPLETED, SEQUENCES_STARTED, SUBMISSIONS_REJECTED};
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct SubmitMessageRequest {
    pub content: String,
}

#[derive(Debug, Serialize)]
pub struct AgentInfo {
    pub key: &'static str,
    pub label: &'static str,
    pub description: &'static str,
    pub position: usize,
}

/// GET /api/agents
pub async fn list_agents() -> Json<Vec<AgentInfo>> {
    Json(
        AgentKind::ALL
            .iter()
            .map(|agent| AgentInfo {
                key: agent.key(),
                label: agent.label(),
                description: agent.description(),
                position: agent.position(),
            })
            .collect(),
    )
}

/// POST /api/sessions
pub async fn create_session(
    State(state): State<AppState>,
) -> Result<(StatusCode, Json<SessionSnapshot>), ServerError> {
    let session = state.sessions.create()?;
    Ok((StatusCode::CREATED, Json(session.snapshot())))
}

/// GET /api/sessions/:id
pub async fn get_session(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<SessionSnapshot>, ServerError> {
    Ok(Json(state.sessions.get(id)?.snapshot()))
}

/// DELETE /api/sessions/:id
pub async fn delete_session(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, ServerError> {
    state.sessions.remove(id)?;
    Ok(StatusCode::NO_CONTENT)
}

/// POST /api/sessions/:id/messages
///
/// Accepts the message and starts the agents in the background. Returns 409
/// while a previous submission is still running.
pub async fn submit_message(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    body: Bytes,
) -> Result<(StatusCode, Json<SessionSnapshot>), ServerError> {
    let request: SubmitMessageRequest =
        serde_json::from_slice(&body).map_err(|e| ServerError::InvalidBody(e.to_string()))?;
    let session = state.sessions.get(id)?;

    let submission = session.begin(&request.content).map_err(|e| {
        let reason = match e {
            SessionError::EmptyMessage => "empty",
            SessionError::Busy => "busy",
            SessionError::NotFound(_) => "not_found",
            SessionError::AtCapacity(_) => "capacity",
        };
        metrics::counter!(SUBMISSIONS_REJECTED, "reason" => reason).increment(1);
        e
    })?;

    metrics::counter!(SEQUENCES_STARTED).increment(1);
    let snapshot = session.snapshot();

    tokio::spawn(async move {
        session.run(submission).await;
        metrics::counter!(SEQUENCES_COMPLETED).increment(1);
    });

    Ok((StatusCode::ACCEPTED, Json(snapshot)))
}

/// GET /api/sessions/:id/events
///
/// Streams session events as SSE. Each event's name is its `type`.
pub async fn session_events(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Sse<impl Stream<Item = Result<Event, Infallible>>>, ServerError> {
    let session = state.sessions.get(id)?;
    let mut rx = session.subscribe();
    drop(session);

    let stream = async_stream::stream! {
        loop {
            match rx.recv().await {
                Ok(event) => match Event::default().event(event.name()).json_data(&event) {
                    Ok(sse_event) => yield Ok::<Event, Infallible>(sse_event),
                    Err(e) => tracing::warn!(error = %e, "Failed to encode session event"),
                },
                Err(RecvError::Lagged(skipped)) => {
                    tracing::warn!(session_id = %id, skipped, "Event subscriber lagged");
                },
                Err(RecvError::Closed) => break,
            }
        }
    };

    Ok(Sse::new(stream).keep_alive(KeepAlive::default()))
}
