use thiserror::Error;
use uuid::Uuid;

/// Errors when submitting to or looking up a chat session
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SessionError {
    #[error("Message must not be empty")]
    EmptyMessage,

    #[error("A loan application is already being processed")]
    Busy,

    #[error("Session not found: {0}")]
    NotFound(Uuid),

    #[error("Session limit of {0} reached")]
    AtCapacity(usize),
}
