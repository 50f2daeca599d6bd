//! Login, logout and current-user endpoints

use axum::{extract::State, Extension, Json};
use serde::Deserialize;

use super::{done, ok, ok_with, ApiResult};
use crate::app::LoginOutcome;
use crate::domain::entities::CurrentUser;
use crate::AppState;

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub password: String,
}

/// POST /api/auth/login
///
/// Exchange credentials for a bearer token.
pub async fn login(
    State(state): State<AppState>,
    Json(req): Json<LoginRequest>,
) -> ApiResult<LoginOutcome> {
    let outcome = state.auth_service.login(&req.email, &req.password).await?;
    ok_with("Login successful", outcome)
}

/// POST /api/auth/logout
pub async fn logout(
    State(state): State<AppState>,
    Extension(current): Extension<CurrentUser>,
) -> ApiResult<()> {
    state.auth_service.logout(&current).await?;
    done("Logged out")
}

/// GET /api/auth/me
pub async fn me(Extension(current): Extension<CurrentUser>) -> ApiResult<CurrentUser> {
    ok(current)
}
