//! Client domain entity
//!
//! A prospective or current customer of a solar installation.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::Page;

uuid_id!(
    /// Unique identifier for a client
    ClientId
);

/// Legal nature of a client
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ClientType {
    /// Individual (cédula)
    Natural,
    /// Company (NIT)
    Legal,
}

impl std::fmt::Display for ClientType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ClientType::Natural => write!(f, "natural"),
            ClientType::Legal => write!(f, "legal"),
        }
    }
}

impl std::str::FromStr for ClientType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "natural" => Ok(ClientType::Natural),
            "legal" => Ok(ClientType::Legal),
            _ => Err(format!("Unknown client type: {}", s)),
        }
    }
}

/// A client record
#[derive(Debug, Clone, Serialize)]
pub struct Client {
    pub id: ClientId,
    pub client_type: ClientType,
    pub name: String,
    /// National identification number, unique across clients
    pub nic: String,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub department: Option<String>,
    pub city: Option<String>,
    pub address: Option<String>,
    pub monthly_consumption_kwh: Option<f64>,
    /// Tariff in currency per kWh
    pub energy_rate: Option<f64>,
    pub network_type: Option<String>,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Client {
    /// Estimated monthly electricity bill, when consumption and tariff are known
    pub fn estimated_monthly_bill(&self) -> Option<f64> {
        match (self.monthly_consumption_kwh, self.energy_rate) {
            (Some(kwh), Some(rate)) => Some(super::round_money(kwh * rate)),
            _ => None,
        }
    }
}

/// Data needed to create a new client
#[derive(Debug, Clone)]
pub struct NewClient {
    pub client_type: ClientType,
    pub name: String,
    pub nic: String,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub department: Option<String>,
    pub city: Option<String>,
    pub address: Option<String>,
    pub monthly_consumption_kwh: Option<f64>,
    pub energy_rate: Option<f64>,
    pub network_type: Option<String>,
}

/// Listing filter
#[derive(Debug, Clone, Default)]
pub struct ClientFilter {
    /// Matches name or nic
    pub search: Option<String>,
    pub is_active: Option<bool>,
    pub page: Page,
}

impl ClientFilter {
    pub fn matches(&self, client: &Client) -> bool {
        if let Some(active) = self.is_active {
            if client.is_active != active {
                return false;
            }
        }
        match self.search.as_deref().map(str::to_lowercase) {
            Some(term) if !term.is_empty() => {
                client.name.to_lowercase().contains(&term) || client.nic.to_lowercase().contains(&term)
            }
            _ => true,
        }
    }
}
