//! Quotation building and pricing
//!
//! Lines are priced from the request (catalog price when no unit price is
//! given) and the totals cascade is recomputed on every create and update.

use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::domain::entities::{
    Client, ClientId, NewQuotation, ProductId, Quotation, QuotationDetails, QuotationFilter,
    QuotationId, QuotationItem, QuotationStatus, SystemType, UsedProduct, UserId,
};
use crate::domain::ports::{ClientRepository, ProductRepository, QuotationRepository};
use crate::domain::pricing::{compute_totals, price_line, Percentages, QuotationTotals};
use crate::domain::validation::FieldErrors;
use crate::error::{AppError, DomainError};

#[derive(Debug, Clone, Deserialize)]
pub struct UsedProductInput {
    pub product_id: ProductId,
    pub quantity: f64,
    /// Defaults to the catalog price
    pub unit_price: Option<f64>,
    #[serde(default)]
    pub profit_percentage: f64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct QuotationItemInput {
    pub description: String,
    pub item_type: String,
    pub quantity: f64,
    #[serde(default = "default_unit")]
    pub unit: String,
    pub unit_price: f64,
    #[serde(default)]
    pub profit_percentage: f64,
}

fn default_unit() -> String {
    "unit".to_string()
}

#[derive(Debug, Clone, Deserialize)]
pub struct QuotationInput {
    pub client_id: ClientId,
    pub project_name: String,
    pub system_type: SystemType,
    pub power_kwp: f64,
    #[serde(default)]
    pub panel_count: i32,
    #[serde(default)]
    pub requires_financing: bool,
    #[serde(default)]
    pub profit_percentage: f64,
    #[serde(default)]
    pub iva_profit_percentage: f64,
    #[serde(default)]
    pub commercial_management_percentage: f64,
    #[serde(default)]
    pub administration_percentage: f64,
    #[serde(default)]
    pub contingency_percentage: f64,
    #[serde(default)]
    pub withholding_percentage: f64,
    pub notes: Option<String>,
    #[serde(default)]
    pub products: Vec<UsedProductInput>,
    #[serde(default)]
    pub items: Vec<QuotationItemInput>,
}

impl QuotationInput {
    pub fn percentages(&self) -> Percentages {
        Percentages {
            profit: self.profit_percentage,
            iva_profit: self.iva_profit_percentage,
            commercial_management: self.commercial_management_percentage,
            administration: self.administration_percentage,
            contingency: self.contingency_percentage,
            withholding: self.withholding_percentage,
        }
    }
}

/// Priced lines and totals, without persisting
#[derive(Debug, Clone, Serialize)]
pub struct QuotationPreview {
    pub totals: QuotationTotals,
    pub used_products: Vec<UsedProduct>,
    pub items: Vec<QuotationItem>,
}

/// Quotation detail view with its client
#[derive(Debug, Serialize)]
pub struct QuotationView {
    #[serde(flatten)]
    pub details: QuotationDetails,
    pub client: Option<Client>,
}

pub struct QuotationService<QR, CR, PR>
where
    QR: QuotationRepository,
    CR: ClientRepository,
    PR: ProductRepository,
{
    quotations: Arc<QR>,
    clients: Arc<CR>,
    products: Arc<PR>,
}

impl<QR, CR, PR> QuotationService<QR, CR, PR>
where
    QR: QuotationRepository,
    CR: ClientRepository,
    PR: ProductRepository,
{
    pub fn new(quotations: Arc<QR>, clients: Arc<CR>, products: Arc<PR>) -> Self {
        Self {
            quotations,
            clients,
            products,
        }
    }

    pub async fn list(&self, filter: &QuotationFilter) -> Result<Vec<Quotation>, AppError> {
        Ok(self.quotations.list(filter).await?)
    }

    pub async fn get(&self, id: &QuotationId) -> Result<QuotationDetails, AppError> {
        self.quotations
            .find_details(id)
            .await?
            .ok_or_else(|| DomainError::NotFound(format!("Quotation {} not found", id)).into())
    }

    pub async fn show(&self, id: &QuotationId) -> Result<QuotationView, AppError> {
        let details = self.get(id).await?;
        let client = self.clients.find_by_id(&details.quotation.client_id).await?;
        Ok(QuotationView { details, client })
    }

    /// Validate the request and price every line
    pub async fn preview(&self, input: &QuotationInput) -> Result<QuotationPreview, AppError> {
        let mut errors = FieldErrors::new();

        errors.required("project_name", &input.project_name);
        errors.max_len("project_name", &input.project_name, 255);
        errors.non_negative("power_kwp", input.power_kwp);
        if input.panel_count < 0 {
            errors.add("panel_count", "The panel_count must be at least 0.");
        }
        input.percentages().validate(&mut errors);

        if self.clients.find_by_id(&input.client_id).await?.is_none() {
            errors.add("client_id", "The selected client_id is invalid.");
        }

        let mut used_products = Vec::with_capacity(input.products.len());
        for (i, line) in input.products.iter().enumerate() {
            let field = |name: &str| format!("products.{}.{}", i, name);

            errors.positive(&field("quantity"), line.quantity);
            errors.percentage(&field("profit_percentage"), line.profit_percentage);
            if let Some(price) = line.unit_price {
                errors.non_negative(&field("unit_price"), price);
            }

            match self.products.find_by_id(&line.product_id).await? {
                Some(product) if product.is_active => {
                    let unit_price = line.unit_price.unwrap_or(product.price);
                    let priced = price_line(line.quantity, unit_price, line.profit_percentage);
                    used_products.push(UsedProduct {
                        product_id: product.id,
                        kind: product.kind,
                        description: product.display_name(),
                        quantity: line.quantity,
                        unit_price,
                        profit_percentage: line.profit_percentage,
                        partial_value: priced.partial_value,
                        profit: priced.profit,
                        total_value: priced.total_value,
                    });
                }
                Some(_) => errors.add(&field("product_id"), "The selected product is inactive."),
                None => errors.add(&field("product_id"), "The selected product_id is invalid."),
            }
        }

        let mut items = Vec::with_capacity(input.items.len());
        for (i, line) in input.items.iter().enumerate() {
            let field = |name: &str| format!("items.{}.{}", i, name);

            errors.required(&field("description"), &line.description);
            errors.required(&field("item_type"), &line.item_type);
            errors.positive(&field("quantity"), line.quantity);
            errors.non_negative(&field("unit_price"), line.unit_price);
            errors.percentage(&field("profit_percentage"), line.profit_percentage);

            let priced = price_line(line.quantity, line.unit_price, line.profit_percentage);
            items.push(QuotationItem {
                description: line.description.trim().to_string(),
                item_type: line.item_type.trim().to_string(),
                quantity: line.quantity,
                unit: line.unit.clone(),
                unit_price: line.unit_price,
                profit_percentage: line.profit_percentage,
                partial_value: priced.partial_value,
                profit: priced.profit,
                total_value: priced.total_value,
            });
        }

        errors.into_result()?;

        let totals = compute_totals(
            used_products
                .iter()
                .map(|p| p.total_value)
                .chain(items.iter().map(|i| i.total_value)),
            &input.percentages(),
        );

        Ok(QuotationPreview {
            totals,
            used_products,
            items,
        })
    }

    async fn build(&self, user_id: UserId, input: QuotationInput) -> Result<NewQuotation, AppError> {
        let preview = self.preview(&input).await?;
        Ok(NewQuotation {
            client_id: input.client_id,
            user_id,
            project_name: input.project_name.trim().to_string(),
            system_type: input.system_type,
            power_kwp: input.power_kwp,
            panel_count: input.panel_count,
            requires_financing: input.requires_financing,
            percentages: input.percentages(),
            totals: preview.totals,
            notes: input.notes,
            used_products: preview.used_products,
            items: preview.items,
        })
    }

    pub async fn create(
        &self,
        user_id: UserId,
        input: QuotationInput,
    ) -> Result<QuotationDetails, AppError> {
        let new = self.build(user_id, input).await?;
        let details = self.quotations.create(&new).await?;

        tracing::info!(
            quotation_id = %details.quotation.id,
            total_value = details.quotation.totals.total_value,
            "Quotation created"
        );
        Ok(details)
    }

    /// Replace header and lines, recomputing totals
    pub async fn update(
        &self,
        id: &QuotationId,
        input: QuotationInput,
    ) -> Result<QuotationDetails, AppError> {
        let existing = self.get(id).await?;
        let new = self.build(existing.quotation.user_id, input).await?;
        Ok(self.quotations.replace(id, &new).await?)
    }

    pub async fn set_status(
        &self,
        id: &QuotationId,
        status: QuotationStatus,
    ) -> Result<Quotation, AppError> {
        let quotation = self.quotations.update_status(id, status).await?;
        tracing::info!(quotation_id = %id, status = %status, "Quotation status changed");
        Ok(quotation)
    }

    /// Copy a quotation as a new pending one owned by `user_id`
    pub async fn duplicate(
        &self,
        id: &QuotationId,
        user_id: UserId,
    ) -> Result<QuotationDetails, AppError> {
        let source = self.get(id).await?;
        let q = source.quotation;

        let copy = NewQuotation {
            client_id: q.client_id,
            user_id,
            project_name: format!("{} (copy)", q.project_name),
            system_type: q.system_type,
            power_kwp: q.power_kwp,
            panel_count: q.panel_count,
            requires_financing: q.requires_financing,
            percentages: q.percentages,
            totals: q.totals,
            notes: q.notes,
            used_products: source.used_products,
            items: source.items,
        };

        Ok(self.quotations.create(&copy).await?)
    }

    pub async fn delete(&self, id: &QuotationId) -> Result<(), AppError> {
        self.quotations.delete(id).await?;
        Ok(())
    }
}
