//! Read-only pass-through to the Siigo accounting API

use axum::{
    extract::{Query, State},
    Json,
};
use serde::Deserialize;

use crate::domain::ports::{AccountingPage, AccountingResource};
use crate::error::AppError;
use crate::AppState;

#[derive(Debug, Deserialize)]
pub struct SiigoQuery {
    #[serde(default = "default_page")]
    pub page: u32,
    #[serde(default = "default_page_size")]
    pub page_size: u32,
}

fn default_page() -> u32 {
    1
}

fn default_page_size() -> u32 {
    25
}

impl SiigoQuery {
    fn page(&self) -> AccountingPage {
        AccountingPage::new(self.page, self.page_size)
    }
}

async fn fetch(
    state: &AppState,
    resource: AccountingResource,
    query: &SiigoQuery,
) -> Result<Json<serde_json::Value>, AppError> {
    tracing::debug!("Siigo {} page {}", resource.path(), query.page);
    let body = state.accounting.list(resource, query.page()).await?;
    Ok(Json(body))
}

/// GET /api/siigo/products
pub async fn products(
    State(state): State<AppState>,
    Query(query): Query<SiigoQuery>,
) -> Result<Json<serde_json::Value>, AppError> {
    fetch(&state, AccountingResource::Products, &query).await
}

/// GET /api/siigo/invoices
pub async fn invoices(
    State(state): State<AppState>,
    Query(query): Query<SiigoQuery>,
) -> Result<Json<serde_json::Value>, AppError> {
    fetch(&state, AccountingResource::Invoices, &query).await
}

/// GET /api/siigo/customers
pub async fn customers(
    State(state): State<AppState>,
    Query(query): Query<SiigoQuery>,
) -> Result<Json<serde_json::Value>, AppError> {
    fetch(&state, AccountingResource::Customers, &query).await
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn query_defaults_and_clamps() {
        let q: SiigoQuery = serde_json::from_str("{}").unwrap();
        assert_eq!(q.page(), AccountingPage::new(1, 25));

        let q: SiigoQuery = serde_json::from_str(r#"{"page":0,"page_size":1000}"#).unwrap();
        assert_eq!(q.page(), AccountingPage::new(1, AccountingPage::MAX_PAGE_SIZE));
    }
}
