//! Mock Loan-Agent Endpoint
//!
//! POST /functions/v1/loan-agent (also /loan-agent)
//!
//! Waits a fixed delay and returns all four agent messages at once. The
//! messages come from the same script the chat sessions play, so there is
//! only one copy of them. The endpoint is stateless: the same request always
//! gets the same `stages`.

use axum::{body::Bytes, extract::State, Json};
use loan_agent_core::AgentKind;
use loan_agent_workflow::Script;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::ServerError;
use crate::monitoring::HANDLER_REQUESTS;
use crate::state::AppState;

/// Pull `userMessage` out of whatever JSON arrived.
///
/// Only a body that is not JSON, or is JSON `null`, is rejected. Any other
/// value is accepted: a missing field reads as empty and a non-string
/// `userMessage` is kept as its JSON text.
pub fn extract_user_message(body: &[u8]) -> Result<String, ServerError> {
    let value: Value =
        serde_json::from_slice(body).map_err(|e| ServerError::MalformedBody(e.to_string()))?;

    match value {
        Value::Null => Err(ServerError::MalformedBody(
            "Request body must not be null".to_string(),
        )),
        Value::Object(mut fields) => Ok(match fields.remove("userMessage") {
            Some(Value::String(text)) => text,
            Some(Value::Null) | None => String::new(),
            Some(other) => other.to_string(),
        }),
        _ => Ok(String::new()),
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoanAgentResponse {
    pub success: bool,
    pub stages: StageMessages,
}

/// One message per agent
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StageMessages {
    pub master: String,
    pub verification: String,
    pub underwriting: String,
    pub sanction: String,
}

impl StageMessages {
    pub fn from_script(script: &Script) -> Self {
        let message = |agent: AgentKind| script.message(agent).unwrap_or_default().to_string();
        Self {
            master: message(AgentKind::Master),
            verification: message(AgentKind::Verification),
            underwriting: message(AgentKind::Underwriting),
            sanction: message(AgentKind::Sanction),
        }
    }
}

/// Handle a loan-agent call.
///
/// The body is read raw, whatever the content type. Bodies rejected by
/// [`extract_user_message`] get a 500 with an `error` field.
pub async fn handle_loan_agent(
    State(state): State<AppState>,
    body: Bytes,
) -> Result<Json<LoanAgentResponse>, ServerError> {
    metrics::counter!(HANDLER_REQUESTS).increment(1);

    let user_message = extract_user_message(&body)?;
    tracing::info!(chars = user_message.chars().count(), "Processing loan application");
    tracing::debug!(user_message = %user_message, "Loan application text");

    tokio::time::sleep(state.settings.handler.delay()).await;

    Ok(Json(LoanAgentResponse {
        success: true,
        stages: StageMessages::from_script(state.sequencer.script()),
    }))
}
