//! PostgreSQL adapters
//!
//! Implementations of repository traits using SeaORM and PostgreSQL.

pub mod auth_token_repo;
pub mod client_repo;
pub mod cost_center_repo;
pub mod invoice_repo;
pub mod payment_method_repo;
pub mod product_repo;
pub mod project_repo;
pub mod quotation_repo;
pub mod role_repo;
pub mod user_repo;
pub mod vendor_repo;


pub use auth_token_repo::PostgresAuthTokenRepository;
pub use client_repo::PostgresClientRepository;
pub use cost_center_repo::PostgresCostCenterRepository;
pub use invoice_repo::PostgresInvoiceRepository;
pub use payment_method_repo::PostgresPaymentMethodRepository;
pub use product_repo::PostgresProductRepository;
pub use project_repo::PostgresProjectRepository;
pub use quotation_repo::PostgresQuotationRepository;
pub use role_repo::PostgresRoleRepository;
pub use user_repo::PostgresUserRepository;
pub use vendor_repo::PostgresVendorRepository;

use sea_orm::{DbErr, SqlErr};

use crate::error::DomainError;

/// Map a SeaORM error, treating a no-op update as a missing record
pub(crate) fn db_err(e: DbErr) -> DomainError {
    if let Some(mapped) = e.sql_err().and_then(constraint_err) {
        return mapped;
    }
    match e {
        DbErr::RecordNotUpdated => DomainError::NotFound("Record not found".to_string()),
        DbErr::RecordNotFound(msg) => DomainError::NotFound(msg),
        e => DomainError::Database(e.to_string()),
    }
}

/// Constraint violations that slipped past the service-level checks
fn constraint_err(err: SqlErr) -> Option<DomainError> {
    match err {
        SqlErr::UniqueConstraintViolation(msg) => Some(DomainError::AlreadyExists(msg)),
        SqlErr::ForeignKeyConstraintViolation(msg) => Some(DomainError::HasDependents(msg)),
        _ => None,
    }
}

/// Turn a zero-row delete into `NotFound`
pub(crate) fn ensure_deleted(rows_affected: u64, what: String) -> Result<(), DomainError> {
    if rows_affected == 0 {
        Err(DomainError::NotFound(format!("{} not found", what)))
    } else {
        Ok(())
    }
}
