//! Provider and supplier endpoints

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    routing::{get, patch},
    Extension, Json, Router,
};
use uuid::Uuid;

use super::{created, done, ok, ApiResponse, ApiResult, ListQuery};
use crate::app::VendorInput;
use crate::domain::entities::{Vendor, VendorFilter, VendorId, VendorKind};
use crate::error::AppError;
use crate::AppState;

/// Routes for one vendor kind, nested under `/providers` or `/suppliers`
pub fn routes(kind: VendorKind) -> Router<AppState> {
    Router::new()
        .route("/", get(list_vendors).post(create_vendor))
        .route(
            "/:id",
            get(get_vendor).put(update_vendor).delete(delete_vendor),
        )
        .route("/:id/toggle-active", patch(toggle_vendor_active))
        .layer(Extension(kind))
}

/// GET /api/{providers|suppliers}
pub async fn list_vendors(
    State(state): State<AppState>,
    Extension(kind): Extension<VendorKind>,
    Query(query): Query<ListQuery>,
) -> ApiResult<Vec<Vendor>> {
    let filter = VendorFilter {
        search: query.search.clone(),
        is_active: query.is_active,
        page: query.page(),
    };
    ok(state.vendor_service.list(kind, &filter).await?)
}

/// GET /api/{providers|suppliers}/:id
pub async fn get_vendor(
    State(state): State<AppState>,
    Extension(kind): Extension<VendorKind>,
    Path(id): Path<Uuid>,
) -> ApiResult<Vendor> {
    ok(state.vendor_service.get(kind, &VendorId(id)).await?)
}

/// POST /api/{providers|suppliers}
pub async fn create_vendor(
    State(state): State<AppState>,
    Extension(kind): Extension<VendorKind>,
    Json(input): Json<VendorInput>,
) -> Result<(StatusCode, Json<ApiResponse<Vendor>>), AppError> {
    let vendor = state.vendor_service.create(kind, input).await?;
    created(format!("{} created", kind.label()), vendor)
}

/// PUT /api/{providers|suppliers}/:id
pub async fn update_vendor(
    State(state): State<AppState>,
    Extension(kind): Extension<VendorKind>,
    Path(id): Path<Uuid>,
    Json(input): Json<VendorInput>,
) -> ApiResult<Vendor> {
    ok(state
        .vendor_service
        .update(kind, &VendorId(id), input)
        .await?)
}

/// PATCH /api/{providers|suppliers}/:id/toggle-active
pub async fn toggle_vendor_active(
    State(state): State<AppState>,
    Extension(kind): Extension<VendorKind>,
    Path(id): Path<Uuid>,
) -> ApiResult<Vendor> {
    ok(state.vendor_service.toggle_active(kind, &VendorId(id)).await?)
}

/// DELETE /api/{providers|suppliers}/:id
///
/// Refused with 400 while the vendor has invoices.
pub async fn delete_vendor(
    State(state): State<AppState>,
    Extension(kind): Extension<VendorKind>,
    Path(id): Path<Uuid>,
) -> ApiResult<()> {
    state.vendor_service.delete(kind, &VendorId(id)).await?;
    done(format!("{} deleted", kind.label()))
}
