//! Pipeline Agents and Their Statuses
//!
//! The workflow has exactly four agents, always run in the same order.
//! An agent here is only a label attached to a canned message; the status
//! board tracks where the scripted run currently is.

use serde::ser::SerializeMap;
use serde::{Deserialize, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

use crate::error::CoreError;

/// A named stage of the loan pipeline
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AgentKind {
    Master,
    Verification,
    Underwriting,
    Sanction,
}

impl AgentKind {
    /// All agents in pipeline order
    pub const ALL: [AgentKind; 4] = [
        AgentKind::Master,
        AgentKind::Verification,
        AgentKind::Underwriting,
        AgentKind::Sanction,
    ];

    /// Machine key, as used in JSON payloads (`master`, `verification`, ...)
    pub fn key(&self) -> &'static str {
        match self {
            Self::Master => "master",
            Self::Verification => "verification",
            Self::Underwriting => "underwriting",
            Self::Sanction => "sanction",
        }
    }

    /// Label attached to chat messages emitted by this agent
    pub fn label(&self) -> &'static str {
        match self {
            Self::Master => "Master Agent",
            Self::Verification => "Verification Agent",
            Self::Underwriting => "Underwriting Agent",
            Self::Sanction => "Sanction Agent",
        }
    }

    /// One-line description of what the agent pretends to do
    pub fn description(&self) -> &'static str {
        match self {
            Self::Master => "Orchestrates the entire loan workflow",
            Self::Verification => "Validates KYC and identity documents",
            Self::Underwriting => "Assesses creditworthiness and risk",
            Self::Sanction => "Generates instant sanction letters",
        }
    }

    /// Zero-based position in the pipeline
    pub fn position(&self) -> usize {
        match self {
            Self::Master => 0,
            Self::Verification => 1,
            Self::Underwriting => 2,
            Self::Sanction => 3,
        }
    }
}

impl fmt::Display for AgentKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for AgentKind {
    type Err = CoreError;

    /// Accepts either the key (`underwriting`) or the label (`Underwriting Agent`)
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let needle = s.trim();
        Self::ALL
            .into_iter()
            .find(|agent| {
                agent.key().eq_ignore_ascii_case(needle)
                    || agent.label().eq_ignore_ascii_case(needle)
            })
            .ok_or_else(|| CoreError::UnknownAgent(s.to_string()))
    }
}

/// Per-agent status shown in the pipeline bar
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AgentStatus {
    #[default]
    Idle,
    Processing,
    Complete,
    Error,
}

impl AgentStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Idle => "idle",
            Self::Processing => "processing",
            Self::Complete => "complete",
            Self::Error => "error",
        }
    }

    /// Whether `next` is a legal forward step from this status.
    ///
    /// Only `idle -> processing` and `processing -> complete | error` are
    /// allowed. Going back to idle happens through [`AgentStatusBoard::reset`].
    pub fn can_transition_to(self, next: AgentStatus) -> bool {
        matches!(
            (self, next),
            (Self::Idle, Self::Processing)
                | (Self::Processing, Self::Complete)
                | (Self::Processing, Self::Error)
        )
    }
}

impl fmt::Display for AgentStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Status of every agent for one chat session
///
/// Serializes as a JSON object keyed by agent key, in pipeline order.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct AgentStatusBoard {
    statuses: [AgentStatus; 4],
}

impl AgentStatusBoard {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, agent: AgentKind) -> AgentStatus {
        self.statuses[agent.position()]
    }

    /// Move `agent` to `next`, returning the previous status.
    pub fn transition(
        &mut self,
        agent: AgentKind,
        next: AgentStatus,
    ) -> Result<AgentStatus, CoreError> {
        let current = self.get(agent);
        if !current.can_transition_to(next) {
            return Err(CoreError::InvalidTransition {
                agent,
                from: current,
                to: next,
            });
        }
        self.statuses[agent.position()] = next;
        Ok(current)
    }

    /// Put every agent back to idle
    pub fn reset(&mut self) {
        self.statuses = [AgentStatus::Idle; 4];
    }

    pub fn is_idle(&self) -> bool {
        self.statuses.iter().all(|s| *s == AgentStatus::Idle)
    }

    pub fn all_complete(&self) -> bool {
        self.statuses.iter().all(|s| *s == AgentStatus::Complete)
    }

    /// Agents and statuses in pipeline order
    pub fn iter(&self) -> impl Iterator<Item = (AgentKind, AgentStatus)> + '_ {
        AgentKind::ALL.into_iter().map(move |agent| (agent, self.get(agent)))
    }
}

impl Serialize for AgentStatusBoard {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.statuses.len()))?;
        for (agent, status) in self.iter() {
            map.serialize_entry(agent.key(), &status)?;
        }
        map.end()
    }
}
