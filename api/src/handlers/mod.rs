//! HTTP handlers
//!
//! Axum request handlers for the API endpoints. Every JSON response uses the
//! `{success, message, data}` envelope; errors add `errors` (see `AppError`).

pub mod auth;
pub mod catalog;
pub mod clients;
pub mod invoices;
pub mod ledger;
pub mod projects;
pub mod quotations;
pub mod reports;
pub mod siigo;
pub mod users;
pub mod vendors;

use axum::{
    extract::Multipart,
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};

use crate::app::Upload;
use crate::domain::entities::Page;
use crate::error::AppError;

/// Response envelope
#[derive(Debug, Serialize)]
pub struct ApiResponse<T> {
    pub success: bool,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
}

pub type ApiResult<T> = Result<Json<ApiResponse<T>>, AppError>;

/// 200 with data
pub fn ok<T: Serialize>(data: T) -> ApiResult<T> {
    Ok(Json(ApiResponse {
        success: true,
        message: "OK".to_string(),
        data: Some(data),
    }))
}

/// 200 with data and a custom message
pub fn ok_with<T: Serialize>(message: impl Into<String>, data: T) -> ApiResult<T> {
    Ok(Json(ApiResponse {
        success: true,
        message: message.into(),
        data: Some(data),
    }))
}

/// 201 with the created resource
pub fn created<T: Serialize>(
    message: impl Into<String>,
    data: T,
) -> Result<(StatusCode, Json<ApiResponse<T>>), AppError> {
    Ok((
        StatusCode::CREATED,
        Json(ApiResponse {
            success: true,
            message: message.into(),
            data: Some(data),
        }),
    ))
}

/// 200 without data
pub fn done(message: impl Into<String>) -> ApiResult<()> {
    Ok(Json(ApiResponse {
        success: true,
        message: message.into(),
        data: None,
    }))
}

/// Common list query: `?search=&is_active=&page=&per_page=`
#[derive(Debug, Default, Deserialize)]
pub struct ListQuery {
    pub search: Option<String>,
    pub is_active: Option<bool>,
    #[serde(default = "default_page")]
    pub page: u64,
    #[serde(default = "default_per_page")]
    pub per_page: u64,
}

fn default_page() -> u64 {
    1
}

fn default_per_page() -> u64 {
    50
}

impl ListQuery {
    /// 1-based page number to limit/offset
    pub fn page(&self) -> Page {
        let per_page = self.per_page.clamp(1, Page::MAX_LIMIT);
        // Postgres OFFSET is a bigint
        let offset = self.page.saturating_sub(1).saturating_mul(per_page);
        Page::new(per_page, offset.min(i64::MAX as u64))
    }
}

/// Pull the `file` part out of a multipart form
pub async fn read_file_field(mut multipart: Multipart) -> Result<Upload, AppError> {
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::BadRequest(format!("Invalid multipart body: {}", e)))?
    {
        if field.name() != Some("file") {
            continue;
        }
        let content_type = field.content_type().map(str::to_string);
        let bytes = field
            .bytes()
            .await
            .map_err(|e| AppError::BadRequest(format!("Failed to read upload: {}", e)))?;
        return Ok(Upload {
            content_type,
            bytes: bytes.to_vec(),
        });
    }
    Err(AppError::invalid("file", "The file field is required."))
}

/// Stream a stored PDF back as a download
pub fn pdf_download(bytes: Vec<u8>, file_name: &str) -> Response {
    (
        [
            (header::CONTENT_TYPE, "application/pdf".to_string()),
            (
                header::CONTENT_DISPOSITION,
                format!("attachment; filename=\"{}\"", file_name),
            ),
        ],
        bytes,
    )
        .into_response()
}
