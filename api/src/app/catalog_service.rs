//! Catalog of panels, inverters and batteries

use std::sync::Arc;

use serde::Deserialize;

use crate::app::documents::{pdf_file_name, validate_pdf, Upload};
use crate::domain::entities::{NewProduct, Product, ProductFilter, ProductId, ProductKind, ProductSpecs};
use crate::domain::ports::{FileStorage, ProductRepository};
use crate::domain::validation::FieldErrors;
use crate::error::{AppError, DomainError};

/// Product payload; only the spec fields of the route's kind are read
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ProductInput {
    pub brand: String,
    pub model: String,
    pub price: f64,
    pub power_wp: Option<f64>,
    pub panel_type: Option<String>,
    pub power_kw: Option<f64>,
    pub grid_type: Option<String>,
    pub system_type: Option<String>,
    pub capacity_ah: Option<f64>,
    pub voltage: Option<f64>,
    pub battery_type: Option<String>,
}

fn required_number(errors: &mut FieldErrors, field: &str, value: Option<f64>) -> f64 {
    match value {
        Some(v) => {
            errors.positive(field, v);
            v
        }
        None => {
            errors.required(field, "");
            0.0
        }
    }
}

fn required_text(errors: &mut FieldErrors, field: &str, value: &Option<String>) -> String {
    let v = value.clone().unwrap_or_default();
    errors.required(field, &v);
    v.trim().to_string()
}

impl ProductInput {
    /// Build the kind-specific specs, collecting field errors
    fn specs(&self, kind: ProductKind, errors: &mut FieldErrors) -> ProductSpecs {
        match kind {
            ProductKind::Panel => ProductSpecs::Panel {
                power_wp: required_number(errors, "power_wp", self.power_wp),
                panel_type: required_text(errors, "panel_type", &self.panel_type),
            },
            ProductKind::Inverter => ProductSpecs::Inverter {
                power_kw: required_number(errors, "power_kw", self.power_kw),
                grid_type: required_text(errors, "grid_type", &self.grid_type),
                system_type: required_text(errors, "system_type", &self.system_type),
            },
            ProductKind::Battery => ProductSpecs::Battery {
                capacity_ah: required_number(errors, "capacity_ah", self.capacity_ah),
                voltage: required_number(errors, "voltage", self.voltage),
                battery_type: required_text(errors, "battery_type", &self.battery_type),
            },
        }
    }
}

pub struct CatalogService<PR, FS>
where
    PR: ProductRepository,
    FS: FileStorage,
{
    products: Arc<PR>,
    storage: Arc<FS>,
}

impl<PR, FS> CatalogService<PR, FS>
where
    PR: ProductRepository,
    FS: FileStorage,
{
    pub fn new(products: Arc<PR>, storage: Arc<FS>) -> Self {
        Self { products, storage }
    }

    pub async fn list(&self, kind: ProductKind, filter: &ProductFilter) -> Result<Vec<Product>, AppError> {
        Ok(self.products.list(kind, filter).await?)
    }

    /// Find a product of the given kind; other kinds are reported as missing
    pub async fn get(&self, kind: ProductKind, id: &ProductId) -> Result<Product, AppError> {
        self.products
            .find_by_id(id)
            .await?
            .filter(|p| p.kind == kind)
            .ok_or_else(|| DomainError::NotFound(format!("{} {} not found", kind, id)).into())
    }

    async fn validate(
        &self,
        kind: ProductKind,
        input: &ProductInput,
        existing: Option<&ProductId>,
    ) -> Result<ProductSpecs, AppError> {
        let mut errors = FieldErrors::new();
        errors.required("brand", &input.brand);
        errors.max_len("brand", &input.brand, 255);
        errors.required("model", &input.model);
        errors.max_len("model", &input.model, 255);
        errors.non_negative("price", input.price);
        let specs = input.specs(kind, &mut errors);

        if let Some(other) = self
            .products
            .find_by_brand_model(kind, input.brand.trim(), input.model.trim())
            .await?
        {
            if existing != Some(&other.id) {
                errors.taken("model");
            }
        }

        errors.into_result()?;
        Ok(specs)
    }

    pub async fn create(&self, kind: ProductKind, input: ProductInput) -> Result<Product, AppError> {
        let specs = self.validate(kind, &input, None).await?;

        let product = self
            .products
            .create(&NewProduct {
                brand: input.brand.trim().to_string(),
                model: input.model.trim().to_string(),
                price: input.price,
                specs,
            })
            .await?;

        tracing::info!(product_id = %product.id, kind = %kind, "Product created");
        Ok(product)
    }

    pub async fn update(
        &self,
        kind: ProductKind,
        id: &ProductId,
        input: ProductInput,
    ) -> Result<Product, AppError> {
        let mut product = self.get(kind, id).await?;
        let specs = self.validate(kind, &input, Some(id)).await?;

        product.brand = input.brand.trim().to_string();
        product.model = input.model.trim().to_string();
        product.price = input.price;
        product.specs = specs;

        Ok(self.products.update(&product).await?)
    }

    pub async fn toggle_active(&self, kind: ProductKind, id: &ProductId) -> Result<Product, AppError> {
        let mut product = self.get(kind, id).await?;
        product.is_active = !product.is_active;
        Ok(self.products.update(&product).await?)
    }

    /// Delete a product together with its stored technical sheet
    pub async fn delete(&self, kind: ProductKind, id: &ProductId) -> Result<(), AppError> {
        let product = self.get(kind, id).await?;
        self.products.delete(id).await?;

        if let Some(path) = product.technical_sheet_path {
            if let Err(e) = self.storage.delete(&path).await {
                tracing::warn!(path = %path, "Failed to delete technical sheet: {}", e);
            }
        }
        Ok(())
    }

    /// Store a PDF technical sheet, replacing any previous one
    pub async fn upload_sheet(
        &self,
        kind: ProductKind,
        id: &ProductId,
        upload: Upload,
    ) -> Result<Product, AppError> {
        let mut product = self.get(kind, id).await?;
        validate_pdf("file", &upload)?;

        let path = self
            .storage
            .put(kind.sheet_dir(), &pdf_file_name(), &upload.bytes)
            .await?;

        let old = product.technical_sheet_path.replace(path.clone());
        let product = match self.products.update(&product).await {
            Ok(product) => product,
            Err(e) => {
                if let Err(cleanup) = self.storage.delete(&path).await {
                    tracing::warn!(path = %path, "Failed to remove unreferenced sheet: {}", cleanup);
                }
                return Err(e.into());
            }
        };

        if let Some(old) = old {
            if let Err(e) = self.storage.delete(&old).await {
                tracing::warn!(path = %old, "Failed to delete replaced technical sheet: {}", e);
            }
        }
        Ok(product)
    }

    pub async fn download_sheet(&self, kind: ProductKind, id: &ProductId) -> Result<Vec<u8>, AppError> {
        let product = self.get(kind, id).await?;
        let path = product.technical_sheet_path.ok_or_else(|| {
            AppError::NotFound(format!("{} {} has no technical sheet", kind, id))
        })?;
        Ok(self.storage.get(&path).await?)
    }
}
