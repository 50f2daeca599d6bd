//! Quotation pricing
//!
//! Lines are priced individually (quantity × unit price plus a per-line
//! profit), summed into a subtotal, and then the quotation percentages are
//! applied in a fixed order:
//!
//! 1. commercial management, administration, contingency and profit on the subtotal
//! 2. IVA on the profit amount
//! 3. withholding on the marked-up subtotal
//!
//! All percentages are percent numbers (`19.0` means 19 %). Every amount is
//! rounded to cents as soon as it is produced.

use serde::{Deserialize, Serialize};

use crate::domain::entities::round_money;
use crate::domain::validation::FieldErrors;

/// Markup percentages of a quotation
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Percentages {
    pub profit: f64,
    pub iva_profit: f64,
    pub commercial_management: f64,
    pub administration: f64,
    pub contingency: f64,
    pub withholding: f64,
}

impl Percentages {
    pub fn validate(&self, errors: &mut FieldErrors) {
        errors.percentage("profit_percentage", self.profit);
        errors.percentage("iva_profit_percentage", self.iva_profit);
        errors.percentage(
            "commercial_management_percentage",
            self.commercial_management,
        );
        errors.percentage("administration_percentage", self.administration);
        errors.percentage("contingency_percentage", self.contingency);
        errors.percentage("withholding_percentage", self.withholding);
    }
}

/// Computed amounts of a quotation
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct QuotationTotals {
    pub subtotal: f64,
    pub commercial_management: f64,
    pub administration: f64,
    pub contingency: f64,
    pub profit: f64,
    pub iva_profit: f64,
    pub subtotal_with_markups: f64,
    pub withholding: f64,
    pub total_value: f64,
}

/// A priced line
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LinePrice {
    pub partial_value: f64,
    pub profit: f64,
    pub total_value: f64,
}

fn percent_of(base: f64, percentage: f64) -> f64 {
    round_money(base * percentage / 100.0)
}

/// Price a single line
pub fn price_line(quantity: f64, unit_price: f64, profit_percentage: f64) -> LinePrice {
    let partial_value = round_money(quantity * unit_price);
    let profit = percent_of(partial_value, profit_percentage);
    LinePrice {
        partial_value,
        profit,
        total_value: round_money(partial_value + profit),
    }
}

/// Apply the markup cascade to the sum of line totals
pub fn compute_totals<I>(line_totals: I, pct: &Percentages) -> QuotationTotals
where
    I: IntoIterator<Item = f64>,
{
    let subtotal = round_money(line_totals.into_iter().sum());

    let commercial_management = percent_of(subtotal, pct.commercial_management);
    let administration = percent_of(subtotal, pct.administration);
    let contingency = percent_of(subtotal, pct.contingency);
    let profit = percent_of(subtotal, pct.profit);
    let iva_profit = percent_of(profit, pct.iva_profit);

    let subtotal_with_markups = round_money(
        subtotal + commercial_management + administration + contingency + profit + iva_profit,
    );
    let withholding = percent_of(subtotal_with_markups, pct.withholding);

    QuotationTotals {
        subtotal,
        commercial_management,
        administration,
        contingency,
        profit,
        iva_profit,
        subtotal_with_markups,
        withholding,
        total_value: round_money(subtotal_with_markups + withholding),
    }
}
