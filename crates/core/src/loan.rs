//! Dashboard Loan Records
//!
//! Sample applications shown on the admin dashboard. Nothing creates,
//! updates or deletes them at runtime.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::currency::{format_inr, format_rate};
use crate::error::CoreError;

/// Where an application currently sits in the pipeline
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LoanStatus {
    Verification,
    Underwriting,
    Sanctioned,
}

impl LoanStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Verification => "verification",
            Self::Underwriting => "underwriting",
            Self::Sanctioned => "sanctioned",
        }
    }

    /// Capitalised form used as a badge label
    pub fn label(&self) -> &'static str {
        match self {
            Self::Verification => "Verification",
            Self::Underwriting => "Underwriting",
            Self::Sanctioned => "Sanctioned",
        }
    }
}

impl fmt::Display for LoanStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A sample loan application
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoanRecord {
    /// Application id, e.g. `LOAN-001`
    pub id: String,
    pub applicant_name: String,
    pub loan_type: String,
    /// Requested amount in whole rupees
    pub amount_inr: u64,
    pub status: LoanStatus,
    #[serde(default)]
    pub credit_score: Option<u16>,
    /// Annual rate in percent, only known once underwriting has priced the loan
    #[serde(default)]
    pub interest_rate: Option<f64>,
    pub applied_at: NaiveDate,
}

impl LoanRecord {
    pub fn amount_display(&self) -> String {
        format_inr(self.amount_inr)
    }

    pub fn interest_rate_display(&self) -> Option<String> {
        self.interest_rate.map(format_rate)
    }

    /// The download affordance is offered for sanctioned loans only
    pub fn sanction_letter_available(&self) -> bool {
        self.status == LoanStatus::Sanctioned
    }

    /// Render a plain-text sanction letter.
    ///
    /// Fails with [`CoreError::NotSanctioned`] unless the loan is sanctioned.
    pub fn sanction_letter(&self, lender: &str) -> Result<String, CoreError> {
        if !self.sanction_letter_available() {
            return Err(CoreError::NotSanctioned(self.id.clone()));
        }

        let mut letter = String::new();
        letter.push_str(&format!("{}\nSANCTION LETTER\n\n", lender));
        letter.push_str(&format!("Reference: {}\n", self.id));
        letter.push_str(&format!(
            "Date of application: {}\n\n",
            self.applied_at.format("%Y-%m-%d")
        ));
        letter.push_str(&format!("Dear {},\n\n", self.applicant_name));
        letter.push_str(&format!(
            "We are pleased to inform you that your {} application has been sanctioned.\n\n",
            self.loan_type
        ));
        letter.push_str(&format!("Sanctioned amount: {}\n", self.amount_display()));
        if let Some(rate) = self.interest_rate_display() {
            letter.push_str(&format!("Interest rate: {} p.a.\n", rate));
        }
        if let Some(score) = self.credit_score {
            letter.push_str(&format!("Credit score on record: {}\n", score));
        }
        letter.push_str(&format!("\nRegards,\n{}\n", lender));

        Ok(letter)
    }
}

/// Headline numbers shown above the application list
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DashboardSummary {
    pub total_applications: u32,
    pub sanctioned: u32,
    pub processing: u32,
    /// Average end-to-end time, already formatted (e.g. `4.2m`)
    pub average_time: String,
}
