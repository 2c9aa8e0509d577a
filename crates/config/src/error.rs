use thiserror::Error;

/// Errors when loading settings or the agent script
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to load settings: {0}")]
    Load(#[from] config::ConfigError),

    #[error("Script file not found at {path}: {reason}")]
    ScriptNotFound { path: String, reason: String },

    #[error("Failed to parse script: {0}")]
    ScriptParse(String),

    #[error("Invalid script: {0}")]
    InvalidScript(String),

    #[error("Invalid settings: {0}")]
    InvalidSettings(String),
}
