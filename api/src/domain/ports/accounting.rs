//! Accounting platform port
//!
//! Read-only access to the external accounting system (Siigo). Responses are
//! passed through to API consumers unchanged.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::error::SiigoError;

/// Resource collections exposed by the accounting platform
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AccountingResource {
    Products,
    Invoices,
    Customers,
}

impl AccountingResource {
    /// Path segment under `/v1`
    pub fn path(&self) -> &'static str {
        match self {
            AccountingResource::Products => "products",
            AccountingResource::Invoices => "invoices",
            AccountingResource::Customers => "customers",
        }
    }
}

/// Paging for accounting queries
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AccountingPage {
    pub page: u32,
    pub page_size: u32,
}

impl AccountingPage {
    pub const MAX_PAGE_SIZE: u32 = 100;

    pub fn new(page: u32, page_size: u32) -> Self {
        Self {
            page: page.max(1),
            page_size: page_size.clamp(1, Self::MAX_PAGE_SIZE),
        }
    }
}

impl Default for AccountingPage {
    fn default() -> Self {
        Self::new(1, 25)
    }
}

#[async_trait]
pub trait AccountingClient: Send + Sync {
    /// Fetch one page of a resource collection as raw JSON
    async fn list(
        &self,
        resource: AccountingResource,
        page: AccountingPage,
    ) -> Result<serde_json::Value, SiigoError>;

    /// Force a token refresh; used by the scheduled refresher
    async fn refresh_token(&self) -> Result<(), SiigoError>;
}
