//! Adapters layer
//!
//! Implementations of port traits for external systems.

pub mod postgres;
pub mod siigo;
pub mod storage;

pub use postgres::{
    PostgresAuthTokenRepository, PostgresClientRepository, PostgresCostCenterRepository,
    PostgresInvoiceRepository, PostgresPaymentMethodRepository, PostgresProductRepository,
    PostgresProjectRepository, PostgresQuotationRepository, PostgresRoleRepository,
    PostgresUserRepository, PostgresVendorRepository,
};
pub use siigo::{spawn_token_refresher, DisabledAccountingClient, SiigoClient};
pub use storage::LocalDiskStorage;
