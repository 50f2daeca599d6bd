use chrono::{DateTime, Utc};
use serde::Serialize;

uuid_id!(
    /// Unique identifier for a payment method
    PaymentMethodId
);

/// How an invoice is settled (transfer, cash, card...)
#[derive(Debug, Clone, Serialize)]
pub struct PaymentMethod {
    pub id: PaymentMethodId,
    pub name: String,
    pub description: Option<String>,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct NewPaymentMethod {
    pub name: String,
    pub description: Option<String>,
}
