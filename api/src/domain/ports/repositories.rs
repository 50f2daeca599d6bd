//! Repository port traits
//!
//! These traits define the interface for data persistence.
//! Implementations are provided by adapters (e.g., PostgreSQL).

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::domain::entities::{
    AuthToken, Client, ClientFilter, ClientId, CostCenter, CostCenterId, Invoice, InvoiceFilter,
    InvoiceId, NewClient, NewCostCenter, NewInvoice, NewPaymentMethod, NewProduct, NewProject,
    NewQuotation, NewRole, NewUser, NewVendor, PaymentMethod, PaymentMethodId, Product,
    ProductFilter, ProductId, ProductKind, Project, ProjectFilter, ProjectId, ProjectStateChange,
    ProjectStateSummary,
    Quotation, QuotationDetails, QuotationFilter, QuotationId, QuotationStatus,
    QuotationStatusSummary, Role, RoleId, User, UserId, Vendor, VendorFilter, VendorId,
    VendorKind,
};
use crate::error::DomainError;

/// Repository for back-office users
#[async_trait]
pub trait UserRepository: Send + Sync {
    async fn find_by_id(&self, id: &UserId) -> Result<Option<User>, DomainError>;

    async fn find_by_email(&self, email: &str) -> Result<Option<User>, DomainError>;

    async fn list(&self) -> Result<Vec<User>, DomainError>;

    async fn create(&self, user: &NewUser) -> Result<User, DomainError>;

    /// Persist every mutable field of `user`
    async fn update(&self, user: &User) -> Result<User, DomainError>;

    async fn delete(&self, id: &UserId) -> Result<(), DomainError>;

    /// Number of users assigned to a role
    async fn count_by_role(&self, role_id: &RoleId) -> Result<u64, DomainError>;
}

/// Repository for roles
#[async_trait]
pub trait RoleRepository: Send + Sync {
    async fn find_by_id(&self, id: &RoleId) -> Result<Option<Role>, DomainError>;

    async fn find_by_name(&self, name: &str) -> Result<Option<Role>, DomainError>;

    async fn list(&self) -> Result<Vec<Role>, DomainError>;

    async fn create(&self, role: &NewRole) -> Result<Role, DomainError>;

    async fn update(&self, role: &Role) -> Result<Role, DomainError>;

    async fn delete(&self, id: &RoleId) -> Result<(), DomainError>;
}

/// Repository for issued bearer tokens
#[async_trait]
pub trait AuthTokenRepository: Send + Sync {
    async fn create(&self, token: &AuthToken) -> Result<(), DomainError>;

    /// Find a token by hash that has not expired at `now`
    async fn find_valid(
        &self,
        token_hash: &str,
        now: DateTime<Utc>,
    ) -> Result<Option<AuthToken>, DomainError>;

    async fn revoke(&self, token_hash: &str) -> Result<(), DomainError>;

    /// Revoke every token of a user (deactivation, password change)
    async fn revoke_all_for_user(&self, user_id: &UserId) -> Result<(), DomainError>;
}

/// Repository for clients
#[async_trait]
pub trait ClientRepository: Send + Sync {
    async fn find_by_id(&self, id: &ClientId) -> Result<Option<Client>, DomainError>;

    async fn find_by_nic(&self, nic: &str) -> Result<Option<Client>, DomainError>;

    async fn list(&self, filter: &ClientFilter) -> Result<Vec<Client>, DomainError>;

    async fn count(&self) -> Result<u64, DomainError>;

    async fn create(&self, client: &NewClient) -> Result<Client, DomainError>;

    async fn update(&self, client: &Client) -> Result<Client, DomainError>;

    /// Delete a client; its quotations cascade
    async fn delete(&self, id: &ClientId) -> Result<(), DomainError>;
}

/// Repository for catalog products
#[async_trait]
pub trait ProductRepository: Send + Sync {
    async fn find_by_id(&self, id: &ProductId) -> Result<Option<Product>, DomainError>;

    async fn find_by_brand_model(
        &self,
        kind: ProductKind,
        brand: &str,
        model: &str,
    ) -> Result<Option<Product>, DomainError>;

    async fn list(
        &self,
        kind: ProductKind,
        filter: &ProductFilter,
    ) -> Result<Vec<Product>, DomainError>;

    async fn create(&self, product: &NewProduct) -> Result<Product, DomainError>;

    async fn update(&self, product: &Product) -> Result<Product, DomainError>;

    async fn delete(&self, id: &ProductId) -> Result<(), DomainError>;
}

/// Repository for quotations and their lines
#[async_trait]
pub trait QuotationRepository: Send + Sync {
    async fn find_by_id(&self, id: &QuotationId) -> Result<Option<Quotation>, DomainError>;

    /// Header plus used products and items
    async fn find_details(&self, id: &QuotationId)
        -> Result<Option<QuotationDetails>, DomainError>;

    async fn list(&self, filter: &QuotationFilter) -> Result<Vec<Quotation>, DomainError>;

    async fn count_by_client(&self, client_id: &ClientId) -> Result<u64, DomainError>;

    /// Insert header and lines atomically
    async fn create(&self, quotation: &NewQuotation) -> Result<QuotationDetails, DomainError>;

    /// Overwrite header fields and replace all lines atomically
    async fn replace(
        &self,
        id: &QuotationId,
        quotation: &NewQuotation,
    ) -> Result<QuotationDetails, DomainError>;

    async fn update_status(
        &self,
        id: &QuotationId,
        status: QuotationStatus,
    ) -> Result<Quotation, DomainError>;

    async fn delete(&self, id: &QuotationId) -> Result<(), DomainError>;

    async fn status_summary(&self) -> Result<Vec<QuotationStatusSummary>, DomainError>;
}

/// Repository for projects and their state history
#[async_trait]
pub trait ProjectRepository: Send + Sync {
    async fn find_by_id(&self, id: &ProjectId) -> Result<Option<Project>, DomainError>;

    async fn find_by_quotation(
        &self,
        quotation_id: &QuotationId,
    ) -> Result<Option<Project>, DomainError>;

    async fn list(&self, filter: &ProjectFilter) -> Result<Vec<Project>, DomainError>;

    /// Insert a project together with its initial history entry
    async fn create(
        &self,
        project: &NewProject,
        initial: &ProjectStateChange,
    ) -> Result<Project, DomainError>;

    async fn update(&self, project: &Project) -> Result<Project, DomainError>;

    /// Persist `project` (with its new state) and append the history entry atomically
    async fn change_state(
        &self,
        project: &Project,
        change: &ProjectStateChange,
    ) -> Result<Project, DomainError>;

    async fn history(&self, id: &ProjectId) -> Result<Vec<ProjectStateChange>, DomainError>;

    async fn delete(&self, id: &ProjectId) -> Result<(), DomainError>;

    async fn state_summary(&self) -> Result<Vec<ProjectStateSummary>, DomainError>;
}

/// Repository for providers and suppliers
#[async_trait]
pub trait VendorRepository: Send + Sync {
    async fn find_by_id(&self, id: &VendorId) -> Result<Option<Vendor>, DomainError>;

    async fn find_by_nit(&self, kind: VendorKind, nit: &str)
        -> Result<Option<Vendor>, DomainError>;

    async fn list(&self, kind: VendorKind, filter: &VendorFilter)
        -> Result<Vec<Vendor>, DomainError>;

    async fn create(&self, vendor: &NewVendor) -> Result<Vendor, DomainError>;

    async fn update(&self, vendor: &Vendor) -> Result<Vendor, DomainError>;

    async fn delete(&self, id: &VendorId) -> Result<(), DomainError>;
}

/// Repository for cost centers
#[async_trait]
pub trait CostCenterRepository: Send + Sync {
    async fn find_by_id(&self, id: &CostCenterId) -> Result<Option<CostCenter>, DomainError>;

    async fn find_by_code(&self, code: &str) -> Result<Option<CostCenter>, DomainError>;

    async fn list(&self) -> Result<Vec<CostCenter>, DomainError>;

    async fn create(&self, cost_center: &NewCostCenter) -> Result<CostCenter, DomainError>;

    async fn update(&self, cost_center: &CostCenter) -> Result<CostCenter, DomainError>;

    async fn delete(&self, id: &CostCenterId) -> Result<(), DomainError>;
}

/// Repository for payment methods
#[async_trait]
pub trait PaymentMethodRepository: Send + Sync {
    async fn find_by_id(&self, id: &PaymentMethodId)
        -> Result<Option<PaymentMethod>, DomainError>;

    async fn find_by_name(&self, name: &str) -> Result<Option<PaymentMethod>, DomainError>;

    async fn list(&self) -> Result<Vec<PaymentMethod>, DomainError>;

    async fn create(&self, method: &NewPaymentMethod) -> Result<PaymentMethod, DomainError>;

    async fn update(&self, method: &PaymentMethod) -> Result<PaymentMethod, DomainError>;

    async fn delete(&self, id: &PaymentMethodId) -> Result<(), DomainError>;
}

/// Repository for vendor invoices
#[async_trait]
pub trait InvoiceRepository: Send + Sync {
    async fn find_by_id(&self, id: &InvoiceId) -> Result<Option<Invoice>, DomainError>;

    async fn find_by_number(
        &self,
        vendor_id: &VendorId,
        invoice_number: &str,
    ) -> Result<Option<Invoice>, DomainError>;

    async fn list(&self, filter: &InvoiceFilter) -> Result<Vec<Invoice>, DomainError>;

    async fn create(&self, invoice: &NewInvoice) -> Result<Invoice, DomainError>;

    async fn update(&self, invoice: &Invoice) -> Result<Invoice, DomainError>;

    async fn delete(&self, id: &InvoiceId) -> Result<(), DomainError>;

    async fn count_by_vendor(&self, vendor_id: &VendorId) -> Result<u64, DomainError>;

    async fn count_by_cost_center(&self, cost_center_id: &CostCenterId)
        -> Result<u64, DomainError>;

    async fn count_by_payment_method(
        &self,
        payment_method_id: &PaymentMethodId,
    ) -> Result<u64, DomainError>;
}
