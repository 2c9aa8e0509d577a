//! Core error types

use thiserror::Error;

use crate::agent::{AgentKind, AgentStatus};

/// Errors raised by the core domain types
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CoreError {
    /// Agent name did not match any pipeline agent
    #[error("Unknown agent: {0}")]
    UnknownAgent(String),

    /// Status change that would reorder, skip or regress a stage
    #[error("Invalid status transition for {agent}: {from} -> {to}")]
    InvalidTransition {
        agent: AgentKind,
        from: AgentStatus,
        to: AgentStatus,
    },

    /// Sanction letter requested for a loan that has not been sanctioned
    #[error("Loan {0} has not been sanctioned")]
    NotSanctioned(String),
}
