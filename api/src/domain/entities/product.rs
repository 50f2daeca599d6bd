//! Catalog product entity
//!
//! Panels, inverters and batteries share one catalog shape; the
//! kind-specific technical data lives in `ProductSpecs`.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::Page;

uuid_id!(
    /// Unique identifier for a catalog product
    ProductId
);

/// Catalog family
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProductKind {
    Panel,
    Inverter,
    Battery,
}

impl ProductKind {
    /// Storage directory for technical sheets of this kind
    pub fn sheet_dir(&self) -> &'static str {
        match self {
            ProductKind::Panel => "technical-sheets/panels",
            ProductKind::Inverter => "technical-sheets/inverters",
            ProductKind::Battery => "technical-sheets/batteries",
        }
    }
}

impl std::fmt::Display for ProductKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ProductKind::Panel => write!(f, "panel"),
            ProductKind::Inverter => write!(f, "inverter"),
            ProductKind::Battery => write!(f, "battery"),
        }
    }
}

impl std::str::FromStr for ProductKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "panel" => Ok(ProductKind::Panel),
            "inverter" => Ok(ProductKind::Inverter),
            "battery" => Ok(ProductKind::Battery),
            _ => Err(format!("Unknown product kind: {}", s)),
        }
    }
}

/// Kind-specific technical data
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum ProductSpecs {
    Panel {
        /// Peak power in watts
        power_wp: f64,
        /// e.g. monocrystalline, polycrystalline, bifacial
        panel_type: String,
    },
    Inverter {
        power_kw: f64,
        /// e.g. monophasic, triphasic
        grid_type: String,
        /// on_grid, off_grid or hybrid
        system_type: String,
    },
    Battery {
        capacity_ah: f64,
        voltage: f64,
        /// e.g. lithium, gel, agm
        battery_type: String,
    },
}

impl ProductSpecs {
    pub fn kind(&self) -> ProductKind {
        match self {
            ProductSpecs::Panel { .. } => ProductKind::Panel,
            ProductSpecs::Inverter { .. } => ProductKind::Inverter,
            ProductSpecs::Battery { .. } => ProductKind::Battery,
        }
    }

    /// Stored energy in kWh for batteries
    pub fn battery_energy_kwh(&self) -> Option<f64> {
        match self {
            ProductSpecs::Battery {
                capacity_ah,
                voltage,
                ..
            } => Some(capacity_ah * voltage / 1000.0),
            _ => None,
        }
    }
}

/// A catalog product
#[derive(Debug, Clone, Serialize)]
pub struct Product {
    pub id: ProductId,
    pub kind: ProductKind,
    pub brand: String,
    pub model: String,
    pub price: f64,
    pub specs: ProductSpecs,
    pub technical_sheet_path: Option<String>,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Product {
    pub fn display_name(&self) -> String {
        format!("{} {}", self.brand, self.model)
    }
}

/// Data needed to create a new product
#[derive(Debug, Clone)]
pub struct NewProduct {
    pub brand: String,
    pub model: String,
    pub price: f64,
    pub specs: ProductSpecs,
}

impl NewProduct {
    pub fn kind(&self) -> ProductKind {
        self.specs.kind()
    }
}

/// Listing filter
#[derive(Debug, Clone, Default)]
pub struct ProductFilter {
    /// Matches brand or model
    pub search: Option<String>,
    pub is_active: Option<bool>,
    pub page: Page,
}

impl ProductFilter {
    pub fn matches(&self, product: &Product) -> bool {
        if let Some(active) = self.is_active {
            if product.is_active != active {
                return false;
            }
        }
        match self.search.as_deref().map(str::to_lowercase) {
            Some(term) if !term.is_empty() => {
                product.brand.to_lowercase().contains(&term)
                    || product.model.to_lowercase().contains(&term)
            }
            _ => true,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn specs_report_kind() {
        let panel = ProductSpecs::Panel {
            power_wp: 550.0,
            panel_type: "monocrystalline".into(),
        };
        assert_eq!(panel.kind(), ProductKind::Panel);

        let battery = ProductSpecs::Battery {
            capacity_ah: 100.0,
            voltage: 48.0,
            battery_type: "lithium".into(),
        };
        assert_eq!(battery.kind(), ProductKind::Battery);
        assert_eq!(battery.battery_energy_kwh(), Some(4.8));
        assert_eq!(panel.battery_energy_kwh(), None);
    }

    #[test]
    fn specs_serialize_tagged() {
        let inverter = ProductSpecs::Inverter {
            power_kw: 5.0,
            grid_type: "monophasic".into(),
            system_type: "on_grid".into(),
        };
        let json = serde_json::to_value(&inverter).unwrap();
        assert_eq!(json["kind"], "inverter");
        assert_eq!(json["power_kw"], 5.0);
    }

    #[test]
    fn kind_parse_and_dirs() {
        assert_eq!("Battery".parse::<ProductKind>().unwrap(), ProductKind::Battery);
        assert!("cable".parse::<ProductKind>().is_err());
        assert_eq!(ProductKind::Inverter.sheet_dir(), "technical-sheets/inverters");
    }
}
