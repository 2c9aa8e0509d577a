//! Server Errors
//!
//! Every error leaves the server as `{ "error": "<message>" }` with a
//! status code chosen per variant.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use loan_agent_core::CoreError;
use loan_agent_workflow::SessionError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ServerError {
    /// Request body for the mock endpoint could not be parsed
    #[error("{0}")]
    MalformedBody(String),

    /// Request body for an API endpoint could not be parsed
    #[error("Invalid request body: {0}")]
    InvalidBody(String),

    #[error(transparent)]
    Session(#[from] SessionError),

    #[error(transparent)]
    Core(#[from] CoreError),

    #[error("Loan not found: {0}")]
    LoanNotFound(String),

    #[error("Metrics are disabled")]
    MetricsDisabled,
}

impl ServerError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            Self::MalformedBody(_) => StatusCode::INTERNAL_SERVER_ERROR,
            Self::Session(SessionError::EmptyMessage) => StatusCode::UNPROCESSABLE_ENTITY,
            Self::Session(SessionError::Busy) => StatusCode::CONFLICT,
            Self::Session(SessionError::NotFound(_)) => StatusCode::NOT_FOUND,
            Self::Session(SessionError::AtCapacity(_)) => StatusCode::SERVICE_UNAVAILABLE,
            Self::InvalidBody(_) => StatusCode::BAD_REQUEST,
            Self::Core(CoreError::NotSanctioned(_)) => StatusCode::CONFLICT,
            Self::Core(_) => StatusCode::BAD_REQUEST,
            Self::LoanNotFound(_) | Self::MetricsDisabled => StatusCode::NOT_FOUND,
        }
    }
}

impl IntoResponse for ServerError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        if status.is_server_error() {
            tracing::error!(error = %self, "Request failed");
        } else {
            tracing::debug!(error = %self, status = status.as_u16(), "Request rejected");
        }

        (status, Json(serde_json::json!({ "error": self.to_string() }))).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use uuid::Uuid;

    #[test]
    fn test_status_codes() {
        assert_eq!(
            ServerError::MalformedBody("bad".into()).status_code(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
        assert_eq!(
            ServerError::from(SessionError::Busy).status_code(),
            StatusCode::CONFLICT
        );
        assert_eq!(
            ServerError::from(SessionError::EmptyMessage).status_code(),
            StatusCode::UNPROCESSABLE_ENTITY
        );
        assert_eq!(
            ServerError::from(SessionError::NotFound(Uuid::nil())).status_code(),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            ServerError::from(SessionError::AtCapacity(10)).status_code(),
            StatusCode::SERVICE_UNAVAILABLE
        );
        assert_eq!(
            ServerError::InvalidBody("bad".into()).status_code(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            ServerError::from(CoreError::NotSanctioned("LOAN-002".into())).status_code(),
            StatusCode::CONFLICT
        );
    }

    #[test]
    fn test_message_passthrough() {
        let err = ServerError::from(SessionError::Busy);
        assert_eq!(
            err.to_string(),
            "A loan application is already being processed"
        );
    }
}
