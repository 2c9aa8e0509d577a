//! Prometheus metrics
//!
//! Counters go through the `metrics` facade and are no-ops until
//! [`install_recorder`] has been called.

use metrics_exporter_prometheus::{BuildError, PrometheusBuilder, PrometheusHandle};

pub const HANDLER_REQUESTS: &str = "loan_agent_handler_requests_total";
pub const SEQUENCES_STARTED: &str = "loan_agent_sequences_started_total";
pub const SEQUENCES_COMPLETED: &str = "loan_agent_sequences_completed_total";
pub const SUBMISSIONS_REJECTED: &str = "loan_agent_submissions_rejected_total";

/// Install the global Prometheus recorder
pub fn install_recorder() -> Result<PrometheusHandle, BuildError> {
    let handle = PrometheusBuilder::new().install_recorder()?;

    metrics::describe_counter!(HANDLER_REQUESTS, "Calls to the mock loan-agent endpoint");
    metrics::describe_counter!(SEQUENCES_STARTED, "Agent sequences started from chat sessions");
    metrics::describe_counter!(SEQUENCES_COMPLETED, "Agent sequences that ran to completion");
    metrics::describe_counter!(SUBMISSIONS_REJECTED, "Chat submissions rejected, by reason");

    Ok(handle)
}
