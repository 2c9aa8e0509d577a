//! Chat Session
//!
//! Session-scoped state for one conversation: the append-only transcript,
//! the agent status board, and a one-slot guard so that a second submission
//! is rejected while a sequence is still playing.
//!
//! Submitting is split in two so the caller can choose where the sequence
//! runs:
//!
//! ```ignore
//! let submission = session.begin("need a personal loan")?; // sync checks
//! tokio::spawn(async move { session.run(submission).await });
//! ```

use chrono::{DateTime, Utc};
use loan_agent_core::{AgentKind, AgentStatus, AgentStatusBoard, ChatMessage};
use parking_lot::{Mutex, RwLock};
use serde::Serialize;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::broadcast;
use tokio::time::Instant;
use uuid::Uuid;

use crate::error::SessionError;
use crate::sequencer::{Sequencer, SequencerEvent};

const EVENT_CHANNEL_CAPACITY: usize = 64;

/// Change notifications for subscribers (e.g. an SSE stream)
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum SessionEvent {
    /// The user's message was accepted and the agents are starting
    SequenceStarted { message: ChatMessage },
    StatusChanged {
        agent: AgentKind,
        status: AgentStatus,
    },
    MessageAppended { message: ChatMessage },
    /// All four agents have finished; the session accepts input again
    SequenceCompleted,
}

impl SessionEvent {
    /// Event name, matching the serialized `type` tag
    pub fn name(&self) -> &'static str {
        match self {
            Self::SequenceStarted { .. } => "sequence_started",
            Self::StatusChanged { .. } => "status_changed",
            Self::MessageAppended { .. } => "message_appended",
            Self::SequenceCompleted => "sequence_completed",
        }
    }
}

/// Point-in-time copy of a session
#[derive(Debug, Clone, Serialize)]
pub struct SessionSnapshot {
    pub id: Uuid,
    pub messages: Vec<ChatMessage>,
    pub statuses: AgentStatusBoard,
    pub processing: bool,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Default)]
struct SessionState {
    messages: Vec<ChatMessage>,
    statuses: AgentStatusBoard,
}

/// Holds the in-flight flag; clearing happens on drop, so an aborted task
/// still frees the slot.
#[derive(Debug)]
struct BusyGuard {
    flag: Arc<AtomicBool>,
}

impl BusyGuard {
    fn try_acquire(flag: &Arc<AtomicBool>) -> Option<Self> {
        flag.compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .ok()
            .map(|_| Self {
                flag: Arc::clone(flag),
            })
    }
}

impl Drop for BusyGuard {
    fn drop(&mut self) {
        self.flag.store(false, Ordering::Release);
    }
}

/// An accepted submission that has not been played yet
#[derive(Debug)]
pub struct Submission {
    text: String,
    guard: BusyGuard,
}

impl Submission {
    pub fn text(&self) -> &str {
        &self.text
    }
}

/// One conversation
pub struct ChatSession {
    id: Uuid,
    created_at: DateTime<Utc>,
    last_activity: Mutex<Instant>,
    sequencer: Arc<Sequencer>,
    state: RwLock<SessionState>,
    busy: Arc<AtomicBool>,
    event_tx: broadcast::Sender<SessionEvent>,
}

impl ChatSession {
    pub fn new(sequencer: Arc<Sequencer>) -> Self {
        let (event_tx, _) = broadcast::channel(EVENT_CHANNEL_CAPACITY);
        Self {
            id: Uuid::new_v4(),
            created_at: Utc::now(),
            last_activity: Mutex::new(Instant::now()),
            sequencer,
            state: RwLock::new(SessionState::default()),
            busy: Arc::new(AtomicBool::new(false)),
            event_tx,
        }
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn is_processing(&self) -> bool {
        self.busy.load(Ordering::Acquire)
    }

    /// Mark the session as used now
    pub fn touch(&self) {
        *self.last_activity.lock() = Instant::now();
    }

    /// Time since the last lookup, submission or completed sequence
    pub fn idle_for(&self) -> Duration {
        self.last_activity.lock().elapsed()
    }

    pub fn messages(&self) -> Vec<ChatMessage> {
        self.state.read().messages.clone()
    }

    pub fn statuses(&self) -> AgentStatusBoard {
        self.state.read().statuses.clone()
    }

    pub fn snapshot(&self) -> SessionSnapshot {
        let state = self.state.read();
        SessionSnapshot {
            id: self.id,
            messages: state.messages.clone(),
            statuses: state.statuses.clone(),
            processing: self.is_processing(),
            created_at: self.created_at,
        }
    }

    /// Subscribe to session events
    pub fn subscribe(&self) -> broadcast::Receiver<SessionEvent> {
        self.event_tx.subscribe()
    }

    /// Accept a user message.
    ///
    /// Rejects blank text and rejects anything while a sequence is in
    /// flight. On success the user message is already in the transcript and
    /// every agent is back to idle; call [`run`](Self::run) to play the agents.
    pub fn begin(&self, text: &str) -> Result<Submission, SessionError> {
        let text = text.trim();
        if text.is_empty() {
            return Err(SessionError::EmptyMessage);
        }

        let guard = BusyGuard::try_acquire(&self.busy).ok_or(SessionError::Busy)?;
        self.touch();

        let message = ChatMessage::user(text);
        {
            let mut state = self.state.write();
            state.messages.push(message.clone());
            state.statuses.reset();
        }

        tracing::info!(session_id = %self.id, chars = text.chars().count(), "Loan application received");
        self.emit(SessionEvent::SequenceStarted { message });

        Ok(Submission {
            text: text.to_string(),
            guard,
        })
    }

    /// Play the agent script for an accepted submission
    pub async fn run(&self, submission: Submission) {
        let Submission { text, guard } = submission;

        self.sequencer.run(&text, |event| self.apply(event)).await;

        tracing::info!(session_id = %self.id, "Loan application sanctioned");
        self.touch();
        // Completion goes out while the slot is still held, so it always
        // precedes the next submission's start event.
        self.emit(SessionEvent::SequenceCompleted);
        drop(guard);
    }

    /// [`begin`](Self::begin) and [`run`](Self::run) in one call
    pub async fn submit(&self, text: &str) -> Result<(), SessionError> {
        let submission = self.begin(text)?;
        self.run(submission).await;
        Ok(())
    }

    fn apply(&self, event: SequencerEvent) {
        match event {
            SequencerEvent::StatusChanged { agent, status } => {
                let result = self.state.write().statuses.transition(agent, status);
                match result {
                    Ok(_) => self.emit(SessionEvent::StatusChanged { agent, status }),
                    Err(e) => {
                        tracing::warn!(session_id = %self.id, error = %e, "Ignoring status change")
                    },
                }
            },
            SequencerEvent::Message { message } => {
                self.state.write().messages.push(message.clone());
                self.emit(SessionEvent::MessageAppended { message });
            },
        }
    }

    fn emit(&self, event: SessionEvent) {
        // No subscribers is fine
        let _ = self.event_tx.send(event);
    }
}

impl std::fmt::Debug for ChatSession {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ChatSession")
            .field("id", &self.id)
            .field("processing", &self.is_processing())
            .finish()
    }
}
