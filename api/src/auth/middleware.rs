//! Authentication middleware

use axum::{body::Body, extract::State, http::Request, middleware::Next, response::Response};

use crate::domain::entities::{CurrentUser, Role};
use crate::error::AppError;
use crate::AppState;

/// Users and roles administration
pub const ADMIN_ONLY: &[&str] = &[];
/// Catalog writes, clients and quotations
pub const SALES: &[&str] = &[Role::COMMERCIAL];
/// Project writes
pub const FIELD_TEAM: &[&str] = &[Role::COMMERCIAL, Role::TECHNICAL];
/// Invoices, vendors, cost centers, reports and Siigo
pub const ACCOUNTING: &[&str] = &[Role::ACCOUNTING];

/// Extract the token from the Authorization header
fn extract_bearer(request: &Request<Body>) -> Option<&str> {
    request
        .headers()
        .get("Authorization")
        .and_then(|h| h.to_str().ok())
        .and_then(|h| h.strip_prefix("Bearer "))
        .map(str::trim)
        .filter(|t| !t.is_empty())
}

/// Authentication middleware
///
/// Resolves the bearer token and injects the `CurrentUser` into request
/// extensions. Missing, expired or revoked tokens get a 401.
pub async fn auth_middleware(
    State(state): State<AppState>,
    mut request: Request<Body>,
    next: Next,
) -> Result<Response, AppError> {
    let token = extract_bearer(&request).ok_or(AppError::Unauthorized)?;
    let current = state.auth_service.authenticate(token).await?;

    request.extensions_mut().insert(current);
    Ok(next.run(request).await)
}

/// Role gate; must run after `auth_middleware`
///
/// Admins pass every gate, so `ADMIN_ONLY` is the empty list.
pub async fn require_roles(
    roles: &'static [&'static str],
    request: Request<Body>,
    next: Next,
) -> Result<Response, AppError> {
    let current = request
        .extensions()
        .get::<CurrentUser>()
        .ok_or(AppError::Unauthorized)?;
    authorize(current, roles)?;

    Ok(next.run(request).await)
}

/// Check a role gate inside a handler, for groups where only writes are gated
pub fn authorize(current: &CurrentUser, roles: &[&str]) -> Result<(), AppError> {
    if current.has_any_role(roles) {
        return Ok(());
    }
    tracing::debug!(
        user_id = %current.user.id,
        role = %current.role.name,
        "Role gate rejected request"
    );
    Err(AppError::Forbidden)
}
