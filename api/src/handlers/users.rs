//! User and role administration (admin only)

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Extension, Json,
};
use uuid::Uuid;

use super::{created, done, ok, ApiResponse, ApiResult};
use crate::app::{RoleInput, UserInput};
use crate::domain::entities::{CurrentUser, Role, RoleId, User, UserId};
use crate::error::AppError;
use crate::AppState;

/// GET /api/users
pub async fn list_users(State(state): State<AppState>) -> ApiResult<Vec<User>> {
    ok(state.user_service.list_users().await?)
}

/// GET /api/users/:id
pub async fn get_user(State(state): State<AppState>, Path(id): Path<Uuid>) -> ApiResult<User> {
    ok(state.user_service.get_user(&UserId(id)).await?)
}

/// POST /api/users
pub async fn create_user(
    State(state): State<AppState>,
    Json(input): Json<UserInput>,
) -> Result<(StatusCode, Json<ApiResponse<User>>), AppError> {
    let user = state.user_service.create_user(input).await?;
    created("User created", user)
}

/// PUT /api/users/:id
///
/// The password is only changed when present.
pub async fn update_user(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(input): Json<UserInput>,
) -> ApiResult<User> {
    ok(state.user_service.update_user(&UserId(id), input).await?)
}

/// PATCH /api/users/:id/toggle-active
pub async fn toggle_user_active(
    State(state): State<AppState>,
    Extension(current): Extension<CurrentUser>,
    Path(id): Path<Uuid>,
) -> ApiResult<User> {
    ok(state
        .user_service
        .toggle_user_active(&current, &UserId(id))
        .await?)
}

/// DELETE /api/users/:id
pub async fn delete_user(
    State(state): State<AppState>,
    Extension(current): Extension<CurrentUser>,
    Path(id): Path<Uuid>,
) -> ApiResult<()> {
    state.user_service.delete_user(&current, &UserId(id)).await?;
    done("User deleted")
}

/// GET /api/roles
pub async fn list_roles(State(state): State<AppState>) -> ApiResult<Vec<Role>> {
    ok(state.user_service.list_roles().await?)
}

/// GET /api/roles/:id
pub async fn get_role(State(state): State<AppState>, Path(id): Path<Uuid>) -> ApiResult<Role> {
    ok(state.user_service.get_role(&RoleId(id)).await?)
}

/// POST /api/roles
pub async fn create_role(
    State(state): State<AppState>,
    Json(input): Json<RoleInput>,
) -> Result<(StatusCode, Json<ApiResponse<Role>>), AppError> {
    let role = state.user_service.create_role(input).await?;
    created("Role created", role)
}

/// PUT /api/roles/:id
pub async fn update_role(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(input): Json<RoleInput>,
) -> ApiResult<Role> {
    ok(state.user_service.update_role(&RoleId(id), input).await?)
}

/// DELETE /api/roles/:id
pub async fn delete_role(State(state): State<AppState>, Path(id): Path<Uuid>) -> ApiResult<()> {
    state.user_service.delete_role(&RoleId(id)).await?;
    done("Role deleted")
}
