//! Cost center and payment method endpoints

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use uuid::Uuid;

use super::{created, done, ok, ApiResponse, ApiResult};
use crate::app::{CostCenterInput, PaymentMethodInput};
use crate::domain::entities::{CostCenter, CostCenterId, PaymentMethod, PaymentMethodId};
use crate::error::AppError;
use crate::AppState;

/// GET /api/cost-centers
pub async fn list_cost_centers(State(state): State<AppState>) -> ApiResult<Vec<CostCenter>> {
    ok(state.cost_center_service.list_cost_centers().await?)
}

/// GET /api/cost-centers/:id
pub async fn get_cost_center(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> ApiResult<CostCenter> {
    ok(state
        .cost_center_service
        .get_cost_center(&CostCenterId(id))
        .await?)
}

/// POST /api/cost-centers
pub async fn create_cost_center(
    State(state): State<AppState>,
    Json(input): Json<CostCenterInput>,
) -> Result<(StatusCode, Json<ApiResponse<CostCenter>>), AppError> {
    let center = state.cost_center_service.create_cost_center(input).await?;
    created("Cost center created", center)
}

/// PUT /api/cost-centers/:id
pub async fn update_cost_center(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(input): Json<CostCenterInput>,
) -> ApiResult<CostCenter> {
    ok(state
        .cost_center_service
        .update_cost_center(&CostCenterId(id), input)
        .await?)
}

/// DELETE /api/cost-centers/:id
pub async fn delete_cost_center(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> ApiResult<()> {
    state
        .cost_center_service
        .delete_cost_center(&CostCenterId(id))
        .await?;
    done("Cost center deleted")
}

/// GET /api/payment-methods
pub async fn list_payment_methods(
    State(state): State<AppState>,
) -> ApiResult<Vec<PaymentMethod>> {
    ok(state.cost_center_service.list_payment_methods().await?)
}

/// GET /api/payment-methods/:id
pub async fn get_payment_method(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> ApiResult<PaymentMethod> {
    ok(state
        .cost_center_service
        .get_payment_method(&PaymentMethodId(id))
        .await?)
}

/// POST /api/payment-methods
pub async fn create_payment_method(
    State(state): State<AppState>,
    Json(input): Json<PaymentMethodInput>,
) -> Result<(StatusCode, Json<ApiResponse<PaymentMethod>>), AppError> {
    let method = state
        .cost_center_service
        .create_payment_method(input)
        .await?;
    created("Payment method created", method)
}

/// PUT /api/payment-methods/:id
pub async fn update_payment_method(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(input): Json<PaymentMethodInput>,
) -> ApiResult<PaymentMethod> {
    ok(state
        .cost_center_service
        .update_payment_method(&PaymentMethodId(id), input)
        .await?)
}

/// DELETE /api/payment-methods/:id
pub async fn delete_payment_method(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> ApiResult<()> {
    state
        .cost_center_service
        .delete_payment_method(&PaymentMethodId(id))
        .await?;
    done("Payment method deleted")
}
