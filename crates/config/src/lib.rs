//! Configuration for the loan agent demo
//!
//! Layered the usual way:
//! 1. Built-in defaults (see [`constants`])
//! 2. Optional config file (`config/default.yaml` or a path given on the CLI)
//! 3. `LOAN_AGENT__*` environment variables
//!
//! The agent script (which agent speaks, after how long, and what it says)
//! lives here too, so the chat sequencer and the mock HTTP handler read the
//! same copy.

pub mod constants;
pub mod error;
pub mod samples;
pub mod script;
pub mod settings;

pub use error::ConfigError;
pub use samples::{dashboard_summary, sample_loans};
pub use script::{default_script, ScriptConfig, StageConfig};
pub use settings::{
    HandlerSettings, LogFormat, ObservabilitySettings, SequencerSettings, ServerSettings,
    SessionSettings, Settings,
};
