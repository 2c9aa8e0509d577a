//! Shared application state

use loan_agent_config::{dashboard_summary, sample_loans, ConfigError, ScriptConfig, Settings};
use loan_agent_core::{DashboardSummary, LoanRecord};
use loan_agent_workflow::{Script, Sequencer, SessionManager};
use metrics_exporter_prometheus::PrometheusHandle;
use std::sync::Arc;

/// State handed to every handler
#[derive(Clone)]
pub struct AppState {
    pub settings: Arc<Settings>,
    /// Canonical agent script, shared by the chat sessions and the mock endpoint
    pub sequencer: Arc<Sequencer>,
    pub sessions: Arc<SessionManager>,
    pub loans: Arc<[LoanRecord]>,
    pub summary: Arc<DashboardSummary>,
    pub metrics: Option<PrometheusHandle>,
}

impl AppState {
    pub fn new(settings: Settings, script: &ScriptConfig) -> Self {
        let sequencer = Arc::new(Sequencer::new(Script::from_config(
            script,
            settings.sequencer.time_scale,
        )));

        let sessions = SessionManager::new(Arc::clone(&sequencer)).with_limits(
            settings.sessions.idle_timeout(),
            settings.sessions.max_sessions,
        );

        Self {
            settings: Arc::new(settings),
            sessions: Arc::new(sessions),
            sequencer,
            loans: sample_loans().into(),
            summary: Arc::new(dashboard_summary()),
            metrics: None,
        }
    }

    /// Build from settings, loading the script file if one is configured
    pub fn from_settings(settings: Settings) -> Result<Self, ConfigError> {
        let script = settings.load_script()?;
        Ok(Self::new(settings, &script))
    }

    pub fn with_metrics(mut self, handle: PrometheusHandle) -> Self {
        self.metrics = Some(handle);
        self
    }

    pub fn find_loan(&self, id: &str) -> Option<&LoanRecord> {
        self.loans.iter().find(|l| l.id.eq_ignore_ascii_case(id))
    }
}
