//! Reporting endpoints

use axum::extract::{Query, State};
use chrono::{NaiveDate, Utc};
use serde::Deserialize;

use super::{ok, ApiResult};
use crate::app::{AccountsPayable, CostCenterExecution, Dashboard};
use crate::AppState;

#[derive(Debug, Default, Deserialize)]
pub struct DateRangeQuery {
    pub from: Option<NaiveDate>,
    pub to: Option<NaiveDate>,
}

/// GET /api/reports/cost-centers?from=&to=
///
/// Budget execution per cost center for invoices issued in the range.
pub async fn cost_center_report(
    State(state): State<AppState>,
    Query(range): Query<DateRangeQuery>,
) -> ApiResult<Vec<CostCenterExecution>> {
    ok(state
        .report_service
        .cost_center_report(range.from, range.to)
        .await?)
}

/// GET /api/reports/accounts-payable
pub async fn accounts_payable(State(state): State<AppState>) -> ApiResult<AccountsPayable> {
    let today = Utc::now().date_naive();
    ok(state.report_service.accounts_payable(today).await?)
}

/// GET /api/dashboard
pub async fn dashboard(State(state): State<AppState>) -> ApiResult<Dashboard> {
    ok(state.report_service.dashboard().await?)
}
