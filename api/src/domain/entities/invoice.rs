//! Vendor invoice entity

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use super::{round_money, CostCenterId, Page, PaymentMethodId, ProjectId, VendorId};

uuid_id!(
    /// Unique identifier for an invoice
    InvoiceId
);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum InvoiceStatus {
    Pending,
    Paid,
    Cancelled,
}

impl std::fmt::Display for InvoiceStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            InvoiceStatus::Pending => write!(f, "pending"),
            InvoiceStatus::Paid => write!(f, "paid"),
            InvoiceStatus::Cancelled => write!(f, "cancelled"),
        }
    }
}

impl std::str::FromStr for InvoiceStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "pending" => Ok(InvoiceStatus::Pending),
            "paid" => Ok(InvoiceStatus::Paid),
            "cancelled" | "canceled" => Ok(InvoiceStatus::Cancelled),
            _ => Err(format!("Unknown invoice status: {}", s)),
        }
    }
}

/// An invoice received from a vendor
#[derive(Debug, Clone, Serialize)]
pub struct Invoice {
    pub id: InvoiceId,
    pub invoice_number: String,
    pub vendor_id: VendorId,
    pub cost_center_id: CostCenterId,
    pub payment_method_id: Option<PaymentMethodId>,
    pub project_id: Option<ProjectId>,
    pub issue_date: NaiveDate,
    pub due_date: Option<NaiveDate>,
    pub subtotal: f64,
    pub tax_amount: f64,
    pub withholding_amount: f64,
    pub total_amount: f64,
    pub status: InvoiceStatus,
    pub description: Option<String>,
    pub invoice_file_path: Option<String>,
    pub payment_support_path: Option<String>,
    pub paid_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Invoice {
    /// Amount payable: subtotal plus tax minus withholding
    pub fn compute_total(subtotal: f64, tax_amount: f64, withholding_amount: f64) -> f64 {
        round_money(subtotal + tax_amount - withholding_amount)
    }

    pub fn is_overdue(&self, today: NaiveDate) -> bool {
        self.status == InvoiceStatus::Pending && self.due_date.is_some_and(|d| d < today)
    }

    /// Counts towards cost-center execution
    pub fn is_executed(&self) -> bool {
        self.status != InvoiceStatus::Cancelled
    }
}

/// Data needed to create a new invoice
#[derive(Debug, Clone)]
pub struct NewInvoice {
    pub invoice_number: String,
    pub vendor_id: VendorId,
    pub cost_center_id: CostCenterId,
    pub payment_method_id: Option<PaymentMethodId>,
    pub project_id: Option<ProjectId>,
    pub issue_date: NaiveDate,
    pub due_date: Option<NaiveDate>,
    pub subtotal: f64,
    pub tax_amount: f64,
    pub withholding_amount: f64,
    pub description: Option<String>,
}

/// Listing filter
#[derive(Debug, Clone, Default)]
pub struct InvoiceFilter {
    pub status: Option<InvoiceStatus>,
    pub vendor_id: Option<VendorId>,
    pub cost_center_id: Option<CostCenterId>,
    /// Inclusive issue-date range
    pub from: Option<NaiveDate>,
    pub to: Option<NaiveDate>,
    pub page: Option<Page>,
}

impl InvoiceFilter {
    pub fn matches(&self, i: &Invoice) -> bool {
        self.status.map_or(true, |s| i.status == s)
            && self.vendor_id.map_or(true, |v| i.vendor_id == v)
            && self.cost_center_id.map_or(true, |c| i.cost_center_id == c)
            && self.from.map_or(true, |f| i.issue_date >= f)
            && self.to.map_or(true, |t| i.issue_date <= t)
    }
}
