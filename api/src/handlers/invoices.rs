//! Vendor invoice endpoints

use axum::{
    extract::{Multipart, Path, Query, State},
    http::StatusCode,
    response::Response,
    Json,
};
use chrono::NaiveDate;
use serde::Deserialize;
use uuid::Uuid;

use super::{created, done, ok, pdf_download, read_file_field, ApiResponse, ApiResult};
use crate::app::{InvoiceDocument, InvoiceInput, PayInput};
use crate::domain::entities::{
    CostCenterId, Invoice, InvoiceFilter, InvoiceId, InvoiceStatus, Page, VendorId,
};
use crate::error::AppError;
use crate::AppState;

#[derive(Debug, Deserialize)]
pub struct ListInvoicesQuery {
    pub status: Option<InvoiceStatus>,
    pub vendor_id: Option<Uuid>,
    pub cost_center_id: Option<Uuid>,
    pub from: Option<NaiveDate>,
    pub to: Option<NaiveDate>,
    pub limit: Option<u64>,
    #[serde(default)]
    pub offset: u64,
}

impl ListInvoicesQuery {
    fn filter(&self) -> InvoiceFilter {
        InvoiceFilter {
            status: self.status,
            vendor_id: self.vendor_id.map(VendorId),
            cost_center_id: self.cost_center_id.map(CostCenterId),
            from: self.from,
            to: self.to,
            page: Some(Page::new(self.limit.unwrap_or(50), self.offset)),
        }
    }
}

/// GET /api/invoices
///
/// Filter by status, vendor, cost center and issue-date range.
pub async fn list_invoices(
    State(state): State<AppState>,
    Query(query): Query<ListInvoicesQuery>,
) -> ApiResult<Vec<Invoice>> {
    ok(state.invoice_service.list(&query.filter()).await?)
}

/// GET /api/invoices/:id
pub async fn get_invoice(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> ApiResult<Invoice> {
    ok(state.invoice_service.get(&InvoiceId(id)).await?)
}

/// POST /api/invoices
pub async fn create_invoice(
    State(state): State<AppState>,
    Json(input): Json<InvoiceInput>,
) -> Result<(StatusCode, Json<ApiResponse<Invoice>>), AppError> {
    let invoice = state.invoice_service.create(input).await?;
    created("Invoice created", invoice)
}

/// PUT /api/invoices/:id
pub async fn update_invoice(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(input): Json<InvoiceInput>,
) -> ApiResult<Invoice> {
    ok(state.invoice_service.update(&InvoiceId(id), input).await?)
}

/// DELETE /api/invoices/:id
///
/// Stored documents are removed too.
pub async fn delete_invoice(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> ApiResult<()> {
    state.invoice_service.delete(&InvoiceId(id)).await?;
    done("Invoice deleted")
}

/// POST /api/invoices/:id/pay
///
/// Body is optional: `{"payment_method_id": "..."}`.
pub async fn pay_invoice(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    input: Option<Json<PayInput>>,
) -> ApiResult<Invoice> {
    let input = input.map(|Json(i)| i).unwrap_or_default();
    ok(state.invoice_service.pay(&InvoiceId(id), input).await?)
}

/// POST /api/invoices/:id/cancel
pub async fn cancel_invoice(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> ApiResult<Invoice> {
    ok(state.invoice_service.cancel(&InvoiceId(id)).await?)
}

async fn upload(
    state: &AppState,
    id: Uuid,
    document: InvoiceDocument,
    multipart: Multipart,
) -> ApiResult<Invoice> {
    let file = read_file_field(multipart).await?;
    ok(state
        .invoice_service
        .upload_document(&InvoiceId(id), document, file)
        .await?)
}

async fn download(
    state: &AppState,
    id: Uuid,
    document: InvoiceDocument,
    prefix: &str,
) -> Result<Response, AppError> {
    let bytes = state
        .invoice_service
        .download_document(&InvoiceId(id), document)
        .await?;
    Ok(pdf_download(bytes, &format!("{}-{}.pdf", prefix, id)))
}

/// POST /api/invoices/:id/invoice-file
pub async fn upload_invoice_file(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    multipart: Multipart,
) -> ApiResult<Invoice> {
    upload(&state, id, InvoiceDocument::Invoice, multipart).await
}

/// GET /api/invoices/:id/invoice-file
pub async fn download_invoice_file(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Response, AppError> {
    download(&state, id, InvoiceDocument::Invoice, "invoice").await
}

/// POST /api/invoices/:id/payment-support
pub async fn upload_payment_support(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    multipart: Multipart,
) -> ApiResult<Invoice> {
    upload(&state, id, InvoiceDocument::PaymentSupport, multipart).await
}

/// GET /api/invoices/:id/payment-support
pub async fn download_payment_support(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Response, AppError> {
    download(&state, id, InvoiceDocument::PaymentSupport, "payment-support").await
}
