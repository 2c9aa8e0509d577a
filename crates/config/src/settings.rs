//! Runtime Settings
//!
//! Loaded with the `config` crate: defaults, then an optional file, then
//! `LOAN_AGENT__SECTION__KEY` environment variables.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::constants;
use crate::error::ConfigError;
use crate::script::{default_script, ScriptConfig};

/// Default config file looked up when no path is given
pub const DEFAULT_CONFIG_FILE: &str = "config/default";

/// Environment variable prefix
pub const ENV_PREFIX: &str = "LOAN_AGENT";

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Settings {
    #[serde(default)]
    pub server: ServerSettings,
    #[serde(default)]
    pub handler: HandlerSettings,
    #[serde(default)]
    pub sequencer: SequencerSettings,
    #[serde(default)]
    pub sessions: SessionSettings,
    #[serde(default)]
    pub observability: ObservabilitySettings,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ServerSettings {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
    /// Timeout applied to every HTTP request (ms)
    #[serde(default = "default_request_timeout_ms")]
    pub request_timeout_ms: u64,
    /// Name printed on generated sanction letters
    #[serde(default = "default_lender_name")]
    pub lender_name: String,
}

fn default_host() -> String {
    constants::server::DEFAULT_HOST.to_string()
}

fn default_port() -> u16 {
    constants::server::DEFAULT_PORT
}

fn default_request_timeout_ms() -> u64 {
    constants::server::REQUEST_TIMEOUT_MS
}

fn default_lender_name() -> String {
    constants::brand::LENDER_NAME.to_string()
}

impl Default for ServerSettings {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            request_timeout_ms: default_request_timeout_ms(),
            lender_name: default_lender_name(),
        }
    }
}

impl ServerSettings {
    /// `host:port` for binding
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_millis(self.request_timeout_ms)
    }
}

/// Mock loan-agent endpoint
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HandlerSettings {
    #[serde(default = "default_handler_delay_ms")]
    pub delay_ms: u64,
}

fn default_handler_delay_ms() -> u64 {
    constants::handler::DELAY_MS
}

impl Default for HandlerSettings {
    fn default() -> Self {
        Self {
            delay_ms: default_handler_delay_ms(),
        }
    }
}

impl HandlerSettings {
    pub fn delay(&self) -> Duration {
        Duration::from_millis(self.delay_ms)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SequencerSettings {
    /// Multiplier applied to every stage delay (1.0 = real time)
    #[serde(default = "default_time_scale")]
    pub time_scale: f64,
    /// Optional YAML script replacing the built-in one
    #[serde(default)]
    pub script_path: Option<PathBuf>,
}

fn default_time_scale() -> f64 {
    1.0
}

impl Default for SequencerSettings {
    fn default() -> Self {
        Self {
            time_scale: default_time_scale(),
            script_path: None,
        }
    }
}

/// Chat session limits
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionSettings {
    #[serde(default = "default_idle_timeout_secs")]
    pub idle_timeout_secs: u64,
    #[serde(default = "default_max_sessions")]
    pub max_sessions: usize,
    #[serde(default = "default_sweep_interval_secs")]
    pub sweep_interval_secs: u64,
}

fn default_idle_timeout_secs() -> u64 {
    constants::sessions::IDLE_TIMEOUT_SECS
}

fn default_max_sessions() -> usize {
    constants::sessions::MAX_SESSIONS
}

fn default_sweep_interval_secs() -> u64 {
    constants::sessions::SWEEP_INTERVAL_SECS
}

impl Default for SessionSettings {
    fn default() -> Self {
        Self {
            idle_timeout_secs: default_idle_timeout_secs(),
            max_sessions: default_max_sessions(),
            sweep_interval_secs: default_sweep_interval_secs(),
        }
    }
}

impl SessionSettings {
    pub fn idle_timeout(&self) -> Duration {
        Duration::from_secs(self.idle_timeout_secs)
    }

    pub fn sweep_interval(&self) -> Duration {
        Duration::from_secs(self.sweep_interval_secs)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Pretty,
    Json,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ObservabilitySettings {
    /// Default filter when `RUST_LOG` is unset
    #[serde(default = "default_log_level")]
    pub log_level: String,
    #[serde(default)]
    pub log_format: LogFormat,
    /// Install the Prometheus recorder and serve `/metrics`
    #[serde(default = "default_metrics_enabled")]
    pub metrics_enabled: bool,
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_metrics_enabled() -> bool {
    true
}

impl Default for ObservabilitySettings {
    fn default() -> Self {
        Self {
            log_level: default_log_level(),
            log_format: LogFormat::default(),
            metrics_enabled: default_metrics_enabled(),
        }
    }
}

impl Settings {
    /// Load settings.
    ///
    /// With `path`, that file must exist. Without it, `config/default.*` is
    /// read when present. Environment variables override both.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let file = match path {
            Some(p) => config::File::from(p).required(true),
            None => config::File::with_name(DEFAULT_CONFIG_FILE).required(false),
        };

        let settings: Settings = config::Config::builder()
            .add_source(file)
            .add_source(
                config::Environment::with_prefix(ENV_PREFIX)
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?
            .try_deserialize()?;

        settings.validate()?;
        tracing::debug!(
            server = %settings.server.bind_address(),
            handler_delay_ms = settings.handler.delay_ms,
            time_scale = settings.sequencer.time_scale,
            "Settings loaded"
        );
        Ok(settings)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if !self.sequencer.time_scale.is_finite() || self.sequencer.time_scale < 0.0 {
            return Err(ConfigError::InvalidSettings(format!(
                "sequencer.time_scale must be a non-negative number, got {}",
                self.sequencer.time_scale
            )));
        }
        if self.sessions.max_sessions == 0 {
            return Err(ConfigError::InvalidSettings(
                "sessions.max_sessions must be greater than zero".to_string(),
            ));
        }
        if self.sessions.sweep_interval_secs == 0 {
            return Err(ConfigError::InvalidSettings(
                "sessions.sweep_interval_secs must be greater than zero".to_string(),
            ));
        }
        if self.server.request_timeout_ms == 0 {
            return Err(ConfigError::InvalidSettings(
                "server.request_timeout_ms must be greater than zero".to_string(),
            ));
        }
        Ok(())
    }

    /// The script named by `sequencer.script_path`, or the built-in one
    pub fn load_script(&self) -> Result<ScriptConfig, ConfigError> {
        match &self.sequencer.script_path {
            Some(path) => {
                let script = ScriptConfig::load(path)?;
                tracing::info!(path = %path.display(), "Loaded agent script");
                Ok(script)
            },
            None => Ok(default_script().clone()),
        }
    }
}
