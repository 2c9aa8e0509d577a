//! Sample Dashboard Data
//!
//! Stand-in for a data store that does not exist. The records and headline
//! numbers are fixed.

use chrono::NaiveDate;
use loan_agent_core::{DashboardSummary, LoanRecord, LoanStatus};

fn date(year: i32, month: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(year, month, day).unwrap_or_default()
}

/// The three sample applications, most recent first
pub fn sample_loans() -> Vec<LoanRecord> {
    vec![
        LoanRecord {
            id: "LOAN-001".to_string(),
            applicant_name: "John Doe".to_string(),
            loan_type: "Personal Loan".to_string(),
            amount_inr: 500_000,
            status: LoanStatus::Sanctioned,
            credit_score: Some(720),
            interest_rate: Some(9.5),
            applied_at: date(2025, 11, 9),
        },
        LoanRecord {
            id: "LOAN-002".to_string(),
            applicant_name: "Jane Smith".to_string(),
            loan_type: "Home Loan".to_string(),
            amount_inr: 2_500_000,
            status: LoanStatus::Underwriting,
            credit_score: Some(785),
            interest_rate: None,
            applied_at: date(2025, 11, 9),
        },
        LoanRecord {
            id: "LOAN-003".to_string(),
            applicant_name: "Rajesh Kumar".to_string(),
            loan_type: "Business Loan".to_string(),
            amount_inr: 1_000_000,
            status: LoanStatus::Verification,
            credit_score: None,
            interest_rate: None,
            applied_at: date(2025, 11, 8),
        },
    ]
}

pub fn dashboard_summary() -> DashboardSummary {
    DashboardSummary {
        total_applications: 156,
        sanctioned: 124,
        processing: 28,
        average_time: "4.2m".to_string(),
    }
}
