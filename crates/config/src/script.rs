//! Agent Script Configuration
//!
//! The script is the ordered list of (agent, delay, message) stages that the
//! sequencer plays back. The built-in script mirrors [`crate::constants`];
//! a YAML file can replace it for demos with different timings or wording,
//! but it must still name the four agents once each, in pipeline order.

use loan_agent_core::AgentKind;
use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::constants::{messages, stage_delays};
use crate::error::ConfigError;

static DEFAULT_SCRIPT: Lazy<ScriptConfig> = Lazy::new(|| ScriptConfig {
    stages: vec![
        StageConfig::new(AgentKind::Master, stage_delays::MASTER_MS, messages::MASTER),
        StageConfig::new(
            AgentKind::Verification,
            stage_delays::VERIFICATION_MS,
            messages::VERIFICATION,
        ),
        StageConfig::new(
            AgentKind::Underwriting,
            stage_delays::UNDERWRITING_MS,
            messages::UNDERWRITING,
        ),
        StageConfig::new(AgentKind::Sanction, stage_delays::SANCTION_MS, messages::SANCTION),
    ],
});

/// The built-in four-stage script
pub fn default_script() -> &'static ScriptConfig {
    &DEFAULT_SCRIPT
}

/// Script loaded from YAML
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScriptConfig {
    pub stages: Vec<StageConfig>,
}

/// One scripted stage
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StageConfig {
    pub agent: AgentKind,
    /// Wait before the agent's message is emitted
    pub delay_ms: u64,
    pub message: String,
}

impl StageConfig {
    pub fn new(agent: AgentKind, delay_ms: u64, message: impl Into<String>) -> Self {
        Self {
            agent,
            delay_ms,
            message: message.into(),
        }
    }
}

impl Default for ScriptConfig {
    fn default() -> Self {
        default_script().clone()
    }
}

impl ScriptConfig {
    /// Load and validate a script from a YAML file
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let content =
            std::fs::read_to_string(path.as_ref()).map_err(|e| ConfigError::ScriptNotFound {
                path: path.as_ref().display().to_string(),
                reason: e.to_string(),
            })?;

        Self::from_yaml(&content)
    }

    /// Parse and validate a script from YAML text
    pub fn from_yaml(yaml: &str) -> Result<Self, ConfigError> {
        let script: ScriptConfig =
            serde_yaml::from_str(yaml).map_err(|e| ConfigError::ScriptParse(e.to_string()))?;
        script.validate()?;
        Ok(script)
    }

    /// Every agent exactly once, in pipeline order, with a non-empty message
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.stages.len() != AgentKind::ALL.len() {
            return Err(ConfigError::InvalidScript(format!(
                "expected {} stages, found {}",
                AgentKind::ALL.len(),
                self.stages.len()
            )));
        }

        for (stage, expected) in self.stages.iter().zip(AgentKind::ALL) {
            if stage.agent != expected {
                return Err(ConfigError::InvalidScript(format!(
                    "stage {} must be {}, found {}",
                    expected.position() + 1,
                    expected.key(),
                    stage.agent.key()
                )));
            }
            if stage.message.trim().is_empty() {
                return Err(ConfigError::InvalidScript(format!(
                    "{} message is empty",
                    stage.agent.key()
                )));
            }
        }

        Ok(())
    }

    /// Stage for a given agent
    pub fn stage(&self, agent: AgentKind) -> Option<&StageConfig> {
        self.stages.iter().find(|s| s.agent == agent)
    }

    /// Message for a given agent, empty if the agent is not in the script
    pub fn message(&self, agent: AgentKind) -> &str {
        self.stage(agent).map(|s| s.message.as_str()).unwrap_or("")
    }
}
