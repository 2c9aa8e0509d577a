//! Session Manager
//!
//! Keeps chat sessions by id. Each session is independent; only the
//! sequencer (and therefore the script) is shared.
//!
//! Sessions are dropped after sitting idle for `idle_timeout`, either by the
//! background sweeper or when a new session would exceed `max_sessions`.
//! A session with a sequence in flight is never expired.

use dashmap::DashMap;
use loan_agent_config::constants::sessions;
use std::sync::{Arc, Weak};
use std::time::Duration;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use uuid::Uuid;

use crate::error::SessionError;
use crate::sequencer::Sequencer;
use crate::session::ChatSession;

pub struct SessionManager {
    sequencer: Arc<Sequencer>,
    sessions: DashMap<Uuid, Arc<ChatSession>>,
    idle_timeout: Duration,
    max_sessions: usize,
}

impl SessionManager {
    pub fn new(sequencer: Arc<Sequencer>) -> Self {
        Self {
            sequencer,
            sessions: DashMap::new(),
            idle_timeout: Duration::from_secs(sessions::IDLE_TIMEOUT_SECS),
            max_sessions: sessions::MAX_SESSIONS,
        }
    }

    pub fn with_limits(mut self, idle_timeout: Duration, max_sessions: usize) -> Self {
        self.idle_timeout = idle_timeout;
        self.max_sessions = max_sessions.max(1);
        self
    }

    /// Create and register a new session
    pub fn create(&self) -> Result<Arc<ChatSession>, SessionError> {
        if self.sessions.len() >= self.max_sessions {
            self.expire_idle();
            if self.sessions.len() >= self.max_sessions {
                tracing::warn!(max_sessions = self.max_sessions, "Session limit reached");
                return Err(SessionError::AtCapacity(self.max_sessions));
            }
        }

        let session = Arc::new(ChatSession::new(Arc::clone(&self.sequencer)));
        self.sessions.insert(session.id(), Arc::clone(&session));
        tracing::debug!(session_id = %session.id(), "Session created");
        Ok(session)
    }

    /// Look up a session and mark it as used
    pub fn get(&self, id: Uuid) -> Result<Arc<ChatSession>, SessionError> {
        let session = self
            .sessions
            .get(&id)
            .map(|entry| Arc::clone(entry.value()))
            .ok_or(SessionError::NotFound(id))?;
        session.touch();
        Ok(session)
    }

    /// Drop a session. A sequence already running keeps its own handle and
    /// finishes in the background.
    pub fn remove(&self, id: Uuid) -> Result<(), SessionError> {
        self.sessions
            .remove(&id)
            .map(|_| tracing::debug!(session_id = %id, "Session removed"))
            .ok_or(SessionError::NotFound(id))
    }

    /// Drop every idle session past the timeout, returning how many went
    pub fn expire_idle(&self) -> usize {
        let before = self.sessions.len();
        self.sessions
            .retain(|_, session| session.is_processing() || session.idle_for() < self.idle_timeout);
        let expired = before.saturating_sub(self.sessions.len());
        if expired > 0 {
            tracing::debug!(expired, remaining = self.sessions.len(), "Expired idle sessions");
        }
        expired
    }

    /// Run [`expire_idle`](Self::expire_idle) every `every` until the
    /// manager is dropped
    pub fn spawn_sweeper(self: &Arc<Self>, every: Duration) -> JoinHandle<()> {
        let manager: Weak<Self> = Arc::downgrade(self);
        let every = every.max(Duration::from_millis(1));

        tokio::spawn(async move {
            let mut ticker = tokio::time::interval(every);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
            // First tick completes immediately
            ticker.tick().await;

            loop {
                ticker.tick().await;
                let Some(manager) = manager.upgrade() else {
                    break;
                };
                manager.expire_idle();
            }
        })
    }

    pub fn len(&self) -> usize {
        self.sessions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sessions.is_empty()
    }
}

impl Default for SessionManager {
    fn default() -> Self {
        Self::new(Arc::new(Sequencer::default()))
    }
}
