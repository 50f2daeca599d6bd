//! Quotation domain entity
//!
//! A priced proposal for a solar installation: catalog products plus ad-hoc
//! line items, with percentage markups applied by `domain::pricing`.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{ClientId, Page, ProductId, ProductKind, UserId};
use crate::domain::pricing::{Percentages, QuotationTotals};

uuid_id!(
    /// Unique identifier for a quotation
    QuotationId
);

/// Installation topology
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SystemType {
    OnGrid,
    OffGrid,
    Hybrid,
}

impl std::fmt::Display for SystemType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SystemType::OnGrid => write!(f, "on_grid"),
            SystemType::OffGrid => write!(f, "off_grid"),
            SystemType::Hybrid => write!(f, "hybrid"),
        }
    }
}

impl std::str::FromStr for SystemType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().replace('-', "_").as_str() {
            "on_grid" => Ok(SystemType::OnGrid),
            "off_grid" => Ok(SystemType::OffGrid),
            "hybrid" => Ok(SystemType::Hybrid),
            _ => Err(format!("Unknown system type: {}", s)),
        }
    }
}

/// Quotation status; plain value, any status may be assigned
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum QuotationStatus {
    Pending,
    Sent,
    Approved,
    Rejected,
    Expired,
}

impl QuotationStatus {
    pub const ALL: [QuotationStatus; 5] = [
        QuotationStatus::Pending,
        QuotationStatus::Sent,
        QuotationStatus::Approved,
        QuotationStatus::Rejected,
        QuotationStatus::Expired,
    ];
}

impl std::fmt::Display for QuotationStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            QuotationStatus::Pending => write!(f, "pending"),
            QuotationStatus::Sent => write!(f, "sent"),
            QuotationStatus::Approved => write!(f, "approved"),
            QuotationStatus::Rejected => write!(f, "rejected"),
            QuotationStatus::Expired => write!(f, "expired"),
        }
    }
}

impl std::str::FromStr for QuotationStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "pending" => Ok(QuotationStatus::Pending),
            "sent" => Ok(QuotationStatus::Sent),
            "approved" => Ok(QuotationStatus::Approved),
            "rejected" => Ok(QuotationStatus::Rejected),
            "expired" => Ok(QuotationStatus::Expired),
            _ => Err(format!("Unknown quotation status: {}", s)),
        }
    }
}

/// Quotation header with computed totals
#[derive(Debug, Clone, Serialize)]
pub struct Quotation {
    pub id: QuotationId,
    pub client_id: ClientId,
    pub user_id: UserId,
    pub project_name: String,
    pub system_type: SystemType,
    pub power_kwp: f64,
    pub panel_count: i32,
    pub requires_financing: bool,
    pub percentages: Percentages,
    pub totals: QuotationTotals,
    pub status: QuotationStatus,
    pub notes: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// A catalog product used in a quotation, priced at quotation time
#[derive(Debug, Clone, Serialize)]
pub struct UsedProduct {
    pub product_id: ProductId,
    pub kind: ProductKind,
    pub description: String,
    pub quantity: f64,
    pub unit_price: f64,
    pub profit_percentage: f64,
    pub partial_value: f64,
    pub profit: f64,
    pub total_value: f64,
}

/// An ad-hoc line (labour, structure, wiring, paperwork...)
#[derive(Debug, Clone, Serialize)]
pub struct QuotationItem {
    pub description: String,
    pub item_type: String,
    pub quantity: f64,
    pub unit: String,
    pub unit_price: f64,
    pub profit_percentage: f64,
    pub partial_value: f64,
    pub profit: f64,
    pub total_value: f64,
}

/// Quotation header together with its lines
#[derive(Debug, Clone, Serialize)]
pub struct QuotationDetails {
    #[serde(flatten)]
    pub quotation: Quotation,
    pub used_products: Vec<UsedProduct>,
    pub items: Vec<QuotationItem>,
}

/// Data needed to persist a new quotation; totals are already computed
#[derive(Debug, Clone)]
pub struct NewQuotation {
    pub client_id: ClientId,
    pub user_id: UserId,
    pub project_name: String,
    pub system_type: SystemType,
    pub power_kwp: f64,
    pub panel_count: i32,
    pub requires_financing: bool,
    pub percentages: Percentages,
    pub totals: QuotationTotals,
    pub notes: Option<String>,
    pub used_products: Vec<UsedProduct>,
    pub items: Vec<QuotationItem>,
}

/// Listing filter
#[derive(Debug, Clone, Default)]
pub struct QuotationFilter {
    pub status: Option<QuotationStatus>,
    pub client_id: Option<ClientId>,
    pub page: Page,
}

impl QuotationFilter {
    pub fn matches(&self, q: &Quotation) -> bool {
        self.status.map_or(true, |s| q.status == s)
            && self.client_id.map_or(true, |c| q.client_id == c)
    }
}

/// Aggregate per status for the dashboard
#[derive(Debug, Clone, Serialize)]
pub struct QuotationStatusSummary {
    pub status: QuotationStatus,
    pub count: i64,
    pub total_value: f64,
}
