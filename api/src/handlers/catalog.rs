//! Panel, inverter and battery catalog endpoints
//!
//! The three catalogs share these handlers; the product kind is attached to
//! each nested router as an extension.

use axum::{
    extract::{Multipart, Path, Query, State},
    http::StatusCode,
    response::Response,
    routing::{get, patch},
    Extension, Json, Router,
};
use uuid::Uuid;

use super::{created, done, ok, pdf_download, read_file_field, ApiResponse, ApiResult, ListQuery};
use crate::app::ProductInput;
use crate::auth::{authorize, SALES};
use crate::domain::entities::{CurrentUser, Product, ProductFilter, ProductId, ProductKind};
use crate::error::AppError;
use crate::AppState;

/// Routes for one catalog, to be nested under `/panels`, `/inverters` or `/batteries`
pub fn routes(kind: ProductKind) -> Router<AppState> {
    Router::new()
        .route("/", get(list_products).post(create_product))
        .route(
            "/:id",
            get(get_product).put(update_product).delete(delete_product),
        )
        .route("/:id/toggle-active", patch(toggle_product_active))
        .route(
            "/:id/technical-sheet",
            get(download_technical_sheet).post(upload_technical_sheet),
        )
        .layer(Extension(kind))
}

/// GET /api/{kind}
pub async fn list_products(
    State(state): State<AppState>,
    Extension(kind): Extension<ProductKind>,
    Query(query): Query<ListQuery>,
) -> ApiResult<Vec<Product>> {
    let filter = ProductFilter {
        search: query.search.clone(),
        is_active: query.is_active,
        page: query.page(),
    };
    ok(state.catalog_service.list(kind, &filter).await?)
}

/// GET /api/{kind}/:id
pub async fn get_product(
    State(state): State<AppState>,
    Extension(kind): Extension<ProductKind>,
    Path(id): Path<Uuid>,
) -> ApiResult<Product> {
    ok(state.catalog_service.get(kind, &ProductId(id)).await?)
}

/// POST /api/{kind}
pub async fn create_product(
    State(state): State<AppState>,
    Extension(kind): Extension<ProductKind>,
    Extension(current): Extension<CurrentUser>,
    Json(input): Json<ProductInput>,
) -> Result<(StatusCode, Json<ApiResponse<Product>>), AppError> {
    authorize(&current, SALES)?;
    let product = state.catalog_service.create(kind, input).await?;
    created(format!("{} created", kind), product)
}

/// PUT /api/{kind}/:id
pub async fn update_product(
    State(state): State<AppState>,
    Extension(kind): Extension<ProductKind>,
    Extension(current): Extension<CurrentUser>,
    Path(id): Path<Uuid>,
    Json(input): Json<ProductInput>,
) -> ApiResult<Product> {
    authorize(&current, SALES)?;
    ok(state
        .catalog_service
        .update(kind, &ProductId(id), input)
        .await?)
}

/// PATCH /api/{kind}/:id/toggle-active
pub async fn toggle_product_active(
    State(state): State<AppState>,
    Extension(kind): Extension<ProductKind>,
    Extension(current): Extension<CurrentUser>,
    Path(id): Path<Uuid>,
) -> ApiResult<Product> {
    authorize(&current, SALES)?;
    ok(state
        .catalog_service
        .toggle_active(kind, &ProductId(id))
        .await?)
}

/// DELETE /api/{kind}/:id
///
/// Also removes the stored technical sheet.
pub async fn delete_product(
    State(state): State<AppState>,
    Extension(kind): Extension<ProductKind>,
    Extension(current): Extension<CurrentUser>,
    Path(id): Path<Uuid>,
) -> ApiResult<()> {
    authorize(&current, SALES)?;
    state.catalog_service.delete(kind, &ProductId(id)).await?;
    done(format!("{} deleted", kind))
}

/// POST /api/{kind}/:id/technical-sheet
///
/// Multipart form with a `file` part; PDF only, 10 MB max.
pub async fn upload_technical_sheet(
    State(state): State<AppState>,
    Extension(kind): Extension<ProductKind>,
    Extension(current): Extension<CurrentUser>,
    Path(id): Path<Uuid>,
    multipart: Multipart,
) -> ApiResult<Product> {
    authorize(&current, SALES)?;
    let upload = read_file_field(multipart).await?;
    ok(state
        .catalog_service
        .upload_sheet(kind, &ProductId(id), upload)
        .await?)
}

/// GET /api/{kind}/:id/technical-sheet
pub async fn download_technical_sheet(
    State(state): State<AppState>,
    Extension(kind): Extension<ProductKind>,
    Path(id): Path<Uuid>,
) -> Result<Response, AppError> {
    let bytes = state
        .catalog_service
        .download_sheet(kind, &ProductId(id))
        .await?;
    Ok(pdf_download(bytes, &format!("{}-{}.pdf", kind, id)))
}
