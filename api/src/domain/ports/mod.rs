//! Domain ports (traits)
//!
//! Port traits define interfaces that the domain layer requires.
//! Adapters provide concrete implementations of these traits.

pub mod accounting;
pub mod repositories;
pub mod storage;

pub use accounting::{AccountingClient, AccountingPage, AccountingResource};
pub use repositories::{
    AuthTokenRepository, ClientRepository, CostCenterRepository, InvoiceRepository,
    PaymentMethodRepository, ProductRepository, ProjectRepository, QuotationRepository,
    RoleRepository, UserRepository, VendorRepository,
};
pub use storage::FileStorage;
