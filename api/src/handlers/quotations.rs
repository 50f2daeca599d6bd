//! Quotation endpoints

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Extension, Json,
};
use serde::Deserialize;
use uuid::Uuid;

use super::{created, done, ok, ApiResponse, ApiResult};
use crate::app::{QuotationInput, QuotationPreview, QuotationView};
use crate::auth::{authorize, SALES};
use crate::domain::entities::{
    ClientId, CurrentUser, Page, Quotation, QuotationDetails, QuotationFilter, QuotationId,
    QuotationStatus,
};
use crate::error::AppError;
use crate::AppState;

#[derive(Debug, Deserialize)]
pub struct ListQuotationsQuery {
    pub status: Option<QuotationStatus>,
    pub client_id: Option<Uuid>,
    #[serde(default = "default_limit")]
    pub limit: u64,
    #[serde(default)]
    pub offset: u64,
}

fn default_limit() -> u64 {
    50
}

#[derive(Debug, Deserialize)]
pub struct StatusRequest {
    pub status: QuotationStatus,
}

/// GET /api/quotations
pub async fn list_quotations(
    State(state): State<AppState>,
    Query(query): Query<ListQuotationsQuery>,
) -> ApiResult<Vec<Quotation>> {
    let filter = QuotationFilter {
        status: query.status,
        client_id: query.client_id.map(ClientId),
        page: Page::new(query.limit, query.offset),
    };
    ok(state.quotation_service.list(&filter).await?)
}

/// GET /api/quotations/:id
///
/// Header, client, used products and items.
pub async fn get_quotation(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> ApiResult<QuotationView> {
    ok(state.quotation_service.show(&QuotationId(id)).await?)
}

/// POST /api/quotations/preview
///
/// Price a quotation without saving it.
pub async fn preview_quotation(
    State(state): State<AppState>,
    Json(input): Json<QuotationInput>,
) -> ApiResult<QuotationPreview> {
    ok(state.quotation_service.preview(&input).await?)
}

/// POST /api/quotations
pub async fn create_quotation(
    State(state): State<AppState>,
    Extension(current): Extension<CurrentUser>,
    Json(input): Json<QuotationInput>,
) -> Result<(StatusCode, Json<ApiResponse<QuotationDetails>>), AppError> {
    authorize(&current, SALES)?;
    let quotation = state
        .quotation_service
        .create(current.user.id, input)
        .await?;
    created("Quotation created", quotation)
}

/// PUT /api/quotations/:id
///
/// Replaces every line and recomputes the totals.
pub async fn update_quotation(
    State(state): State<AppState>,
    Extension(current): Extension<CurrentUser>,
    Path(id): Path<Uuid>,
    Json(input): Json<QuotationInput>,
) -> ApiResult<QuotationDetails> {
    authorize(&current, SALES)?;
    ok(state
        .quotation_service
        .update(&QuotationId(id), input)
        .await?)
}

/// PATCH /api/quotations/:id/status
pub async fn update_quotation_status(
    State(state): State<AppState>,
    Extension(current): Extension<CurrentUser>,
    Path(id): Path<Uuid>,
    Json(req): Json<StatusRequest>,
) -> ApiResult<Quotation> {
    authorize(&current, SALES)?;
    ok(state
        .quotation_service
        .set_status(&QuotationId(id), req.status)
        .await?)
}

/// POST /api/quotations/:id/duplicate
pub async fn duplicate_quotation(
    State(state): State<AppState>,
    Extension(current): Extension<CurrentUser>,
    Path(id): Path<Uuid>,
) -> Result<(StatusCode, Json<ApiResponse<QuotationDetails>>), AppError> {
    authorize(&current, SALES)?;
    let copy = state
        .quotation_service
        .duplicate(&QuotationId(id), current.user.id)
        .await?;
    created("Quotation duplicated", copy)
}

/// DELETE /api/quotations/:id
pub async fn delete_quotation(
    State(state): State<AppState>,
    Extension(current): Extension<CurrentUser>,
    Path(id): Path<Uuid>,
) -> ApiResult<()> {
    authorize(&current, SALES)?;
    state.quotation_service.delete(&QuotationId(id)).await?;
    done("Quotation deleted")
}
