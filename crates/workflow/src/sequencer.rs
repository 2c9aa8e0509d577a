//! Agent Sequencer
//!
//! Plays the agent script as an ordered async pipeline. For every stage:
//!
//! ```text
//! status(agent) = processing -> sleep(delay) -> message -> status(agent) = complete
//! ```
//!
//! Stages never overlap and never reorder. The sequencer holds no state of
//! its own; callers receive every step through a single callback and decide
//! what to do with it.

use loan_agent_config::{default_script, ScriptConfig};
use loan_agent_core::{AgentKind, AgentStatus, ChatMessage};
use serde::Serialize;
use std::sync::Arc;
use std::time::Duration;

/// One step of the script, with its delay already scaled
#[derive(Debug, Clone, PartialEq)]
pub struct Stage {
    pub agent: AgentKind,
    pub delay: Duration,
    pub message: String,
}

/// Immutable, cheaply cloneable script
#[derive(Debug, Clone)]
pub struct Script {
    stages: Arc<[Stage]>,
}

impl Script {
    /// Build from config, multiplying every delay by `time_scale`.
    ///
    /// A negative or non-finite scale is treated as 1.0.
    pub fn from_config(config: &ScriptConfig, time_scale: f64) -> Self {
        let scale = if time_scale.is_finite() && time_scale >= 0.0 {
            time_scale
        } else {
            1.0
        };

        let stages: Vec<Stage> = config
            .stages
            .iter()
            .map(|s| Stage {
                agent: s.agent,
                delay: Duration::from_millis(s.delay_ms).mul_f64(scale),
                message: s.message.clone(),
            })
            .collect();

        Self {
            stages: stages.into(),
        }
    }

    pub fn stages(&self) -> &[Stage] {
        &self.stages
    }

    /// Canned message for an agent
    pub fn message(&self, agent: AgentKind) -> Option<&str> {
        self.stages
            .iter()
            .find(|s| s.agent == agent)
            .map(|s| s.message.as_str())
    }

    pub fn total_delay(&self) -> Duration {
        self.stages.iter().map(|s| s.delay).sum()
    }
}

impl Default for Script {
    fn default() -> Self {
        Self::from_config(default_script(), 1.0)
    }
}

/// A step reported by the sequencer
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum SequencerEvent {
    StatusChanged {
        agent: AgentKind,
        status: AgentStatus,
    },
    Message {
        message: ChatMessage,
    },
}

/// Plays a [`Script`]
#[derive(Debug, Clone, Default)]
pub struct Sequencer {
    script: Script,
}

impl Sequencer {
    pub fn new(script: Script) -> Self {
        Self { script }
    }

    pub fn script(&self) -> &Script {
        &self.script
    }

    /// Run the whole script once.
    ///
    /// `input` is the user's text. It is accepted as-is and does not affect
    /// the output; the same events are produced for every input.
    pub async fn run<F>(&self, input: &str, mut on_event: F)
    where
        F: FnMut(SequencerEvent),
    {
        tracing::debug!(
            input_chars = input.chars().count(),
            stages = self.script.stages().len(),
            "Starting agent sequence"
        );

        for stage in self.script.stages() {
            on_event(SequencerEvent::StatusChanged {
                agent: stage.agent,
                status: AgentStatus::Processing,
            });

            tokio::time::sleep(stage.delay).await;

            on_event(SequencerEvent::Message {
                message: ChatMessage::from_agent(stage.agent, stage.message.clone()),
            });
            on_event(SequencerEvent::StatusChanged {
                agent: stage.agent,
                status: AgentStatus::Complete,
            });

            tracing::trace!(agent = stage.agent.key(), "Stage complete");
        }
    }
}
