//! Core types for the loan agent demo
//!
//! Everything here is plain data: chat messages, the four pipeline agents
//! and their statuses, and the read-only loan records shown on the dashboard.
//! No crate in the workspace keeps any of this beyond the lifetime of a
//! session.

pub mod agent;
pub mod currency;
pub mod error;
pub mod loan;
pub mod message;

pub use agent::{AgentKind, AgentStatus, AgentStatusBoard};
pub use currency::{format_inr, format_rate};
pub use error::CoreError;
pub use loan::{DashboardSummary, LoanRecord, LoanStatus};
pub use message::{ChatMessage, MessageRole};
