//! Vendor domain entity
//!
//! Providers (services) and suppliers (materials) that issue invoices to the
//! company.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::Page;

uuid_id!(
    /// Unique identifier for a vendor
    VendorId
);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum VendorKind {
    Provider,
    Supplier,
}

impl VendorKind {
    /// Human label used in messages
    pub fn label(&self) -> &'static str {
        match self {
            VendorKind::Provider => "Provider",
            VendorKind::Supplier => "Supplier",
        }
    }
}

impl std::fmt::Display for VendorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            VendorKind::Provider => write!(f, "provider"),
            VendorKind::Supplier => write!(f, "supplier"),
        }
    }
}

impl std::str::FromStr for VendorKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "provider" => Ok(VendorKind::Provider),
            "supplier" => Ok(VendorKind::Supplier),
            _ => Err(format!("Unknown vendor kind: {}", s)),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct Vendor {
    pub id: VendorId,
    pub kind: VendorKind,
    pub name: String,
    /// Tax id, unique per kind
    pub nit: String,
    pub contact_name: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub address: Option<String>,
    pub bank_account: Option<String>,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct NewVendor {
    pub kind: VendorKind,
    pub name: String,
    pub nit: String,
    pub contact_name: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub address: Option<String>,
    pub bank_account: Option<String>,
}

#[derive(Debug, Clone, Default)]
pub struct VendorFilter {
    pub search: Option<String>,
    pub is_active: Option<bool>,
    pub page: Page,
}

impl VendorFilter {
    pub fn matches(&self, v: &Vendor) -> bool {
        if let Some(active) = self.is_active {
            if v.is_active != active {
                return false;
            }
        }
        match self.search.as_deref().map(str::to_lowercase) {
            Some(term) if !term.is_empty() => {
                v.name.to_lowercase().contains(&term) || v.nit.to_lowercase().contains(&term)
            }
            _ => true,
        }
    }
}
