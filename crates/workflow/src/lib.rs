//! Scripted Multi-Agent Loan Workflow
//!
//! A user message kicks off a fixed four-stage script. Each stage marks its
//! agent as processing, waits, posts a canned message and marks the agent
//! complete. Nothing about the input changes what happens.
//!
//! - [`Sequencer`] plays the script and reports each step to a callback.
//! - [`ChatSession`] owns one conversation's transcript and status board and
//!   allows only one sequence in flight.
//! - [`SessionManager`] keeps sessions by id for the HTTP layer.

pub mod error;
pub mod manager;
pub mod sequencer;
pub mod session;

pub use error::SessionError;
pub use manager::SessionManager;
pub use sequencer::{Script, Sequencer, SequencerEvent, Stage};
pub use session::{ChatSession, SessionEvent, SessionSnapshot, Submission};
