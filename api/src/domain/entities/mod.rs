//! Domain entities
//!
//! Pure domain models representing core business concepts.
//! These are separate from the SeaORM entities in the `entity` module.

/// Declares a UUID-backed identifier newtype
macro_rules! uuid_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, serde::Serialize, serde::Deserialize)]
        #[serde(transparent)]
        pub struct $name(pub uuid::Uuid);

        impl $name {
            pub fn new() -> Self {
                Self(uuid::Uuid::new_v4())
            }
        }

        impl Default for $name {
            fn default() -> Self {
                Self::new()
            }
        }

        impl From<uuid::Uuid> for $name {
            fn from(id: uuid::Uuid) -> Self {
                Self(id)
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                write!(f, "{}", self.0)
            }
        }
    };
}

pub mod client;
pub mod cost_center;
pub mod invoice;
pub mod payment_method;
pub mod product;
pub mod project;
pub mod quotation;
pub mod user;
pub mod vendor;

pub use client::{Client, ClientFilter, ClientId, ClientType, NewClient};
pub use cost_center::{CostCenter, CostCenterId, NewCostCenter};
pub use invoice::{Invoice, InvoiceFilter, InvoiceId, InvoiceStatus, NewInvoice};
pub use payment_method::{NewPaymentMethod, PaymentMethod, PaymentMethodId};
pub use product::{NewProduct, Product, ProductFilter, ProductId, ProductKind, ProductSpecs};
pub use project::{
    NewProject, Project, ProjectFilter, ProjectId, ProjectState, ProjectStateChange,
    ProjectStateSummary,
};
pub use quotation::{
    NewQuotation, Quotation, QuotationDetails, QuotationFilter, QuotationId, QuotationItem,
    QuotationStatus, QuotationStatusSummary, SystemType, UsedProduct,
};
pub use user::{AuthToken, CurrentUser, NewRole, NewUser, Role, RoleId, User, UserId};
pub use vendor::{NewVendor, Vendor, VendorFilter, VendorId, VendorKind};

/// Paging window shared by list endpoints
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Page {
    pub limit: u64,
    pub offset: u64,
}

impl Page {
    pub const MAX_LIMIT: u64 = 200;

    pub fn new(limit: u64, offset: u64) -> Self {
        Self {
            limit: limit.clamp(1, Self::MAX_LIMIT),
            offset,
        }
    }
}

impl Default for Page {
    fn default() -> Self {
        Self::new(50, 0)
    }
}

/// Round a monetary amount to cents
pub fn round_money(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}
