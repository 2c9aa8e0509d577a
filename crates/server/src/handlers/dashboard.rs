//! Dashboard API
//!
//! Read-only view over the sample loan records.

use axum::{
    extract::{Path, State},
    http::header,
    response::{IntoResponse, Response},
    Json,
};
use loan_agent_core::{DashboardSummary, LoanRecord};
use serde::Serialize;

use crate::error::ServerError;
use crate::state::AppState;

/// A loan record plus its display fields
#[derive(Debug, Clone, Serialize)]
pub struct LoanView {
    #[serde(flatten)]
    pub record: LoanRecord,
    pub amount_display: String,
    pub interest_rate_display: Option<String>,
    pub status_label: &'static str,
    pub sanction_letter_available: bool,
}

impl From<&LoanRecord> for LoanView {
    fn from(record: &LoanRecord) -> Self {
        Self {
            amount_display: record.amount_display(),
            interest_rate_display: record.interest_rate_display(),
            status_label: record.status.label(),
            sanction_letter_available: record.sanction_letter_available(),
            record: record.clone(),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct LoansResponse {
    pub summary: DashboardSummary,
    pub loans: Vec<LoanView>,
}

/// GET /api/loans
pub async fn list_loans(State(state): State<AppState>) -> Json<LoansResponse> {
    Json(LoansResponse {
        summary: (*state.summary).clone(),
        loans: state.loans.iter().map(LoanView::from).collect(),
    })
}

/// GET /api/loans/:id
pub async fn get_loan(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<LoanView>, ServerError> {
    state
        .find_loan(&id)
        .map(|loan| Json(LoanView::from(loan)))
        .ok_or(ServerError::LoanNotFound(id))
}

/// GET /api/loans/:id/sanction-letter
///
/// Plain-text download, only for sanctioned loans.
pub async fn sanction_letter(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Response, ServerError> {
    let loan = state
        .find_loan(&id)
        .ok_or_else(|| ServerError::LoanNotFound(id.clone()))?;

    let letter = loan.sanction_letter(&state.settings.server.lender_name)?;
    tracing::info!(loan_id = %loan.id, "Sanction letter generated");

    let headers = [
        (
            header::CONTENT_TYPE,
            "text/plain; charset=utf-8".to_string(),
        ),
        (
            header::CONTENT_DISPOSITION,
            format!("attachment; filename=\"sanction-letter-{}.txt\"", loan.id),
        ),
    ];
    Ok((headers, letter).into_response())
}
