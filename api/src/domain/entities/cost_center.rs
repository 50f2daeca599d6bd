//! Cost center entity
//!
//! Accounting bucket that supplier invoices are attributed to.

use chrono::{DateTime, Utc};
use serde::Serialize;

uuid_id!(
    /// Unique identifier for a cost center
    CostCenterId
);

#[derive(Debug, Clone, Serialize)]
pub struct CostCenter {
    pub id: CostCenterId,
    pub code: String,
    pub name: String,
    pub description: Option<String>,
    /// Planned spend
    pub budget: f64,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct NewCostCenter {
    pub code: String,
    pub name: String,
    pub description: Option<String>,
    pub budget: f64,
}
