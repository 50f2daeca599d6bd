//! Client endpoints

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Extension, Json,
};
use uuid::Uuid;

use super::{created, done, ok, ApiResponse, ApiResult, ListQuery};
use crate::app::{ClientDetails, ClientInput};
use crate::auth::{authorize, SALES};
use crate::domain::entities::{Client, ClientFilter, ClientId, CurrentUser};
use crate::error::AppError;
use crate::AppState;

/// GET /api/clients
///
/// Search by name or NIC, optionally only active ones.
pub async fn list_clients(
    State(state): State<AppState>,
    Query(query): Query<ListQuery>,
) -> ApiResult<Vec<Client>> {
    let filter = ClientFilter {
        search: query.search.clone(),
        is_active: query.is_active,
        page: query.page(),
    };
    ok(state.client_service.list(&filter).await?)
}

/// GET /api/clients/:id
pub async fn get_client(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> ApiResult<ClientDetails> {
    ok(state.client_service.show(&ClientId(id)).await?)
}

/// POST /api/clients
pub async fn create_client(
    State(state): State<AppState>,
    Extension(current): Extension<CurrentUser>,
    Json(input): Json<ClientInput>,
) -> Result<(StatusCode, Json<ApiResponse<Client>>), AppError> {
    authorize(&current, SALES)?;
    let client = state.client_service.create(input).await?;
    created("Client created", client)
}

/// PUT /api/clients/:id
pub async fn update_client(
    State(state): State<AppState>,
    Extension(current): Extension<CurrentUser>,
    Path(id): Path<Uuid>,
    Json(input): Json<ClientInput>,
) -> ApiResult<Client> {
    authorize(&current, SALES)?;
    ok(state.client_service.update(&ClientId(id), input).await?)
}

/// PATCH /api/clients/:id/toggle-active
pub async fn toggle_client_active(
    State(state): State<AppState>,
    Extension(current): Extension<CurrentUser>,
    Path(id): Path<Uuid>,
) -> ApiResult<Client> {
    authorize(&current, SALES)?;
    ok(state.client_service.toggle_active(&ClientId(id)).await?)
}

/// DELETE /api/clients/:id
///
/// The client's quotations are deleted with it.
pub async fn delete_client(
    State(state): State<AppState>,
    Extension(current): Extension<CurrentUser>,
    Path(id): Path<Uuid>,
) -> ApiResult<()> {
    authorize(&current, SALES)?;
    state.client_service.delete(&ClientId(id)).await?;
    done("Client deleted")
}
