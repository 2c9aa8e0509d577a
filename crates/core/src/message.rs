//! Chat Messages
//!
//! Messages are created once and never edited. Fields are private so that
//! the only way to "change" the conversation is to append a new message.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::agent::AgentKind;

/// Who authored a message
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MessageRole {
    User,
    Assistant,
    System,
}

/// A single entry in the chat transcript
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatMessage {
    id: Uuid,
    role: MessageRole,
    content: String,
    /// Label of the agent that produced the message, for assistant messages
    #[serde(default, skip_serializing_if = "Option::is_none")]
    agent: Option<String>,
    created_at: DateTime<Utc>,
}

impl ChatMessage {
    fn new(role: MessageRole, content: impl Into<String>, agent: Option<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            role,
            content: content.into(),
            agent,
            created_at: Utc::now(),
        }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self::new(MessageRole::User, content, None)
    }

    /// Assistant message attributed to one of the pipeline agents
    pub fn from_agent(agent: AgentKind, content: impl Into<String>) -> Self {
        Self::new(
            MessageRole::Assistant,
            content,
            Some(agent.label().to_string()),
        )
    }

    pub fn system(content: impl Into<String>) -> Self {
        Self::new(MessageRole::System, content, None)
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn role(&self) -> MessageRole {
        self.role
    }

    pub fn content(&self) -> &str {
        &self.content
    }

    pub fn agent(&self) -> Option<&str> {
        self.agent.as_deref()
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }
}
