//! Centralized constants for the loan agent demo
//!
//! Single source of truth for the canned agent script and for server
//! defaults. Settings and the script config fall back to these values.

/// Delay before each agent speaks (milliseconds)
pub mod stage_delays {
    pub const MASTER_MS: u64 = 1_000;
    pub const VERIFICATION_MS: u64 = 1_500;
    pub const UNDERWRITING_MS: u64 = 2_000;
    pub const SANCTION_MS: u64 = 1_500;
}

/// Canned agent messages
///
/// The content never depends on what the user typed.
pub mod messages {
    pub const MASTER: &str = "Master Agent: I'll coordinate your loan application process. Let me engage the verification team.";

    pub const VERIFICATION: &str = "Verification Agent: KYC documents validated successfully. Identity confirmed with 98% confidence. Proceeding to credit assessment.";

    pub const UNDERWRITING: &str = "Underwriting Agent: Credit score verified at 720. Income-to-debt ratio is healthy. Approved for requested loan amount with 9.5% interest rate.";

    pub const SANCTION: &str = "Sanction Agent: Congratulations! Your loan has been sanctioned. Generating your sanction letter now. You can view it in the dashboard.";
}

/// Mock loan-agent endpoint
pub mod handler {
    /// Simulated processing delay before the endpoint answers (ms)
    pub const DELAY_MS: u64 = 1_000;
}

/// HTTP server defaults
pub mod server {
    pub const DEFAULT_HOST: &str = "0.0.0.0";
    pub const DEFAULT_PORT: u16 = 8080;

    /// Request timeout for the HTTP boundary (ms)
    pub const REQUEST_TIMEOUT_MS: u64 = 30_000;

    /// Request headers accepted from any origin
    pub const CORS_ALLOWED_HEADERS: [&str; 4] =
        ["authorization", "x-client-info", "apikey", "content-type"];
}

/// Chat session housekeeping
pub mod sessions {
    /// A session unused for this long is dropped (seconds)
    pub const IDLE_TIMEOUT_SECS: u64 = 30 * 60;

    /// Upper bound on live sessions
    pub const MAX_SESSIONS: usize = 10_000;

    /// How often idle sessions are swept (seconds)
    pub const SWEEP_INTERVAL_SECS: u64 = 60;
}

/// Branding used in generated documents
pub mod brand {
    pub const LENDER_NAME: &str = "LoanAI";
}
