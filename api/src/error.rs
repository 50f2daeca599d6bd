//! Unified error types for the API
//!
//! This module defines error types for each layer:
//! - `DomainError`: Core business logic errors
//! - `SiigoError`: Siigo accounting API client errors
//! - `StorageError`: File storage errors
//! - `AppError`: Application layer errors (wraps the others for HTTP responses)

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use thiserror::Error;

use crate::domain::validation::FieldErrors;

/// Domain layer errors - pure business logic errors
#[derive(Debug, Error)]
pub enum DomainError {
    #[error("Entity not found: {0}")]
    NotFound(String),

    #[error("Entity already exists: {0}")]
    AlreadyExists(String),

    #[error("Validation error: {0}")]
    Validation(FieldErrors),

    /// Delete refused because other records still reference the entity
    #[error("Entity has dependents: {0}")]
    HasDependents(String),

    #[error("Database error: {0}")]
    Database(String),

    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    #[error("Forbidden: {0}")]
    Forbidden(String),

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl From<sea_orm::DbErr> for DomainError {
    fn from(e: sea_orm::DbErr) -> Self {
        DomainError::Database(e.to_string())
    }
}

/// Siigo API client errors
#[derive(Debug, Error)]
pub enum SiigoError {
    #[error("Request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("API error: {status} - {message}")]
    Api { status: u16, message: String },

    #[error("Authentication failed: {0}")]
    Auth(String),

    #[error("Siigo integration is not configured")]
    Disabled,

    #[error("Deserialization error: {0}")]
    Deserialization(String),
}

/// File storage errors
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("File not found: {0}")]
    NotFound(String),

    #[error("Invalid path: {0}")]
    InvalidPath(String),
}

/// Application layer errors - used by HTTP handlers
#[derive(Debug, Error)]
pub enum AppError {
    #[error("{0}")]
    Domain(#[from] DomainError),

    #[error("Siigo error: {0}")]
    Siigo(#[from] SiigoError),

    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),

    #[error("Invalid request: {0}")]
    BadRequest(String),

    #[error("Unauthorized")]
    Unauthorized,

    #[error("Forbidden")]
    Forbidden,

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Internal server error: {0}")]
    Internal(String),
}

impl AppError {
    /// Shorthand for a single-field validation failure
    pub fn invalid(field: &str, message: impl Into<String>) -> Self {
        AppError::Domain(DomainError::Validation(FieldErrors::single(field, message)))
    }

    /// HTTP status this error maps to
    pub fn status(&self) -> StatusCode {
        match self {
            AppError::Domain(e) => match e {
                DomainError::NotFound(_) => StatusCode::NOT_FOUND,
                DomainError::AlreadyExists(_) | DomainError::Validation(_) => {
                    StatusCode::UNPROCESSABLE_ENTITY
                }
                DomainError::HasDependents(_) | DomainError::Conflict(_) => {
                    StatusCode::BAD_REQUEST
                }
                DomainError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
                DomainError::Forbidden(_) => StatusCode::FORBIDDEN,
                DomainError::Database(_) | DomainError::Internal(_) => {
                    StatusCode::INTERNAL_SERVER_ERROR
                }
            },
            AppError::Siigo(e) => match e {
                SiigoError::Disabled => StatusCode::SERVICE_UNAVAILABLE,
                SiigoError::Api { status: 404, .. } => StatusCode::NOT_FOUND,
                _ => StatusCode::BAD_GATEWAY,
            },
            AppError::Storage(StorageError::NotFound(_)) => StatusCode::NOT_FOUND,
            AppError::Storage(StorageError::InvalidPath(_)) => StatusCode::BAD_REQUEST,
            AppError::Storage(StorageError::Io(_)) => StatusCode::INTERNAL_SERVER_ERROR,
            AppError::BadRequest(_) => StatusCode::BAD_REQUEST,
            AppError::Unauthorized => StatusCode::UNAUTHORIZED,
            AppError::Forbidden => StatusCode::FORBIDDEN,
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

/// Error envelope for JSON responses
#[derive(Serialize)]
struct ErrorResponse {
    success: bool,
    message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    errors: Option<FieldErrors>,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();

        let (message, errors) = match self {
            AppError::Domain(DomainError::Validation(fields)) => {
                ("The given data was invalid.".to_string(), Some(fields))
            }
            AppError::Domain(DomainError::AlreadyExists(msg)) => (msg, None),
            AppError::Domain(DomainError::NotFound(msg)) | AppError::NotFound(msg) => (msg, None),
            AppError::Domain(DomainError::HasDependents(msg))
            | AppError::Domain(DomainError::Conflict(msg))
            | AppError::BadRequest(msg) => (msg, None),
            AppError::Domain(DomainError::Unauthorized(msg))
            | AppError::Domain(DomainError::Forbidden(msg)) => (msg, None),
            AppError::Domain(DomainError::Database(msg)) => {
                tracing::error!("Database error: {}", msg);
                (format!("Database error: {}", msg), None)
            }
            AppError::Domain(DomainError::Internal(msg)) | AppError::Internal(msg) => {
                tracing::error!("Internal error: {}", msg);
                (msg, None)
            }
            AppError::Siigo(e) => {
                tracing::error!("Siigo error: {}", e);
                (e.to_string(), None)
            }
            AppError::Storage(e) => {
                if matches!(e, StorageError::Io(_)) {
                    tracing::error!("Storage error: {}", e);
                }
                (e.to_string(), None)
            }
            AppError::Unauthorized => ("Unauthenticated.".to_string(), None),
            AppError::Forbidden => (
                "You do not have permission to perform this action.".to_string(),
                None,
            ),
        };

        let body = Json(ErrorResponse {
            success: false,
            message,
            errors,
        });

        (status, body).into_response()
    }
}
