//! Application layer
//!
//! Contains use cases and service orchestration.
//! Services coordinate between domain entities, ports, and external systems.

pub mod auth_service;
pub mod catalog_service;
pub mod client_service;
pub mod cost_center_service;
pub mod documents;
pub mod invoice_service;
pub mod project_service;
pub mod quotation_service;
pub mod report_service;
pub mod user_service;
pub mod vendor_service;

pub use auth_service::{hash_password, hash_token, verify_password, AuthService, LoginOutcome};
pub use catalog_service::{CatalogService, ProductInput};
pub use client_service::{ClientDetails, ClientInput, ClientService};
pub use cost_center_service::{CostCenterInput, CostCenterService, PaymentMethodInput};
pub use documents::{Upload, MAX_PDF_BYTES};
pub use invoice_service::{InvoiceDocument, InvoiceInput, InvoiceService, PayInput};
pub use project_service::{
    ChangeStateInput, CreateProjectInput, ProjectDetails, ProjectService, UpdateProjectInput,
};
pub use quotation_service::{
    QuotationInput, QuotationItemInput, QuotationPreview, QuotationService, QuotationView,
    UsedProductInput,
};
pub use report_service::{AccountsPayable, CostCenterExecution, Dashboard, ReportService};
pub use user_service::{RoleInput, UserInput, UserService};
pub use vendor_service::{VendorInput, VendorService};
