//! PostgreSQL adapter for ProductRepository
//!
//! All catalog kinds share the `products` table; the kind-specific columns
//! are nullable and only the ones matching `kind` are populated.

use async_trait::async_trait;
use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, DatabaseConnection, EntityTrait, QueryFilter,
    QueryOrder, QuerySelect, Set,
};
use uuid::Uuid;

use super::{db_err, ensure_deleted};
use crate::domain::entities::{
    NewProduct, Product, ProductFilter, ProductId, ProductKind, ProductSpecs,
};
use crate::domain::ports::ProductRepository;
use crate::entity::products;
use crate::error::DomainError;

/// PostgreSQL implementation of ProductRepository
pub struct PostgresProductRepository {
    db: DatabaseConnection,
}

impl PostgresProductRepository {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

/// Write the spec columns for `specs` into an active model, clearing the others
fn set_specs(model: &mut products::ActiveModel, specs: &ProductSpecs) {
    model.power_wp = Set(None);
    model.panel_type = Set(None);
    model.power_kw = Set(None);
    model.grid_type = Set(None);
    model.system_type = Set(None);
    model.capacity_ah = Set(None);
    model.voltage = Set(None);
    model.battery_type = Set(None);

    match specs {
        ProductSpecs::Panel {
            power_wp,
            panel_type,
        } => {
            model.power_wp = Set(Some(*power_wp));
            model.panel_type = Set(Some(panel_type.clone()));
        }
        ProductSpecs::Inverter {
            power_kw,
            grid_type,
            system_type,
        } => {
            model.power_kw = Set(Some(*power_kw));
            model.grid_type = Set(Some(grid_type.clone()));
            model.system_type = Set(Some(system_type.clone()));
        }
        ProductSpecs::Battery {
            capacity_ah,
            voltage,
            battery_type,
        } => {
            model.capacity_ah = Set(Some(*capacity_ah));
            model.voltage = Set(Some(*voltage));
            model.battery_type = Set(Some(battery_type.clone()));
        }
    }
}

#[async_trait]
impl ProductRepository for PostgresProductRepository {
    async fn find_by_id(&self, id: &ProductId) -> Result<Option<Product>, DomainError> {
        let result = products::Entity::find_by_id(id.0)
            .one(&self.db)
            .await
            .map_err(db_err)?;

        Ok(result.map(|m| m.into()))
    }

    async fn find_by_brand_model(
        &self,
        kind: ProductKind,
        brand: &str,
        model: &str,
    ) -> Result<Option<Product>, DomainError> {
        let result = products::Entity::find()
            .filter(products::Column::Kind.eq(kind.to_string()))
            .filter(products::Column::Brand.eq(brand))
            .filter(products::Column::Model.eq(model))
            .one(&self.db)
            .await
            .map_err(db_err)?;

        Ok(result.map(|m| m.into()))
    }

    async fn list(
        &self,
        kind: ProductKind,
        filter: &ProductFilter,
    ) -> Result<Vec<Product>, DomainError> {
        let mut query = products::Entity::find().filter(products::Column::Kind.eq(kind.to_string()));

        if let Some(term) = filter.search.as_deref().filter(|t| !t.is_empty()) {
            query = query.filter(
                Condition::any()
                    .add(products::Column::Brand.contains(term))
                    .add(products::Column::Model.contains(term)),
            );
        }
        if let Some(active) = filter.is_active {
            query = query.filter(products::Column::IsActive.eq(active));
        }

        let results = query
            .order_by_asc(products::Column::Brand)
            .order_by_asc(products::Column::Model)
            .offset(filter.page.offset)
            .limit(filter.page.limit)
            .all(&self.db)
            .await
            .map_err(db_err)?;

        Ok(results.into_iter().map(|m| m.into()).collect())
    }

    async fn create(&self, product: &NewProduct) -> Result<Product, DomainError> {
        let now = Utc::now().fixed_offset();

        let mut model = products::ActiveModel {
            id: Set(Uuid::new_v4()),
            kind: Set(product.kind().to_string()),
            brand: Set(product.brand.clone()),
            model: Set(product.model.clone()),
            price: Set(product.price),
            technical_sheet_path: Set(None),
            is_active: Set(true),
            created_at: Set(now),
            updated_at: Set(now),
            ..Default::default()
        };
        set_specs(&mut model, &product.specs);

        let result = model.insert(&self.db).await.map_err(db_err)?;

        Ok(result.into())
    }

    async fn update(&self, product: &Product) -> Result<Product, DomainError> {
        let mut model = products::ActiveModel {
            id: Set(product.id.0),
            brand: Set(product.brand.clone()),
            model: Set(product.model.clone()),
            price: Set(product.price),
            technical_sheet_path: Set(product.technical_sheet_path.clone()),
            is_active: Set(product.is_active),
            updated_at: Set(Utc::now().fixed_offset()),
            ..Default::default()
        };
        set_specs(&mut model, &product.specs);

        let result = model.update(&self.db).await.map_err(db_err)?;

        Ok(result.into())
    }

    async fn delete(&self, id: &ProductId) -> Result<(), DomainError> {
        let result = products::Entity::delete_by_id(id.0)
            .exec(&self.db)
            .await
            .map_err(db_err)?;

        ensure_deleted(result.rows_affected, format!("Product {}", id))
    }
}

/// Convert SeaORM model to domain entity
impl From<products::Model> for Product {
    fn from(model: products::Model) -> Self {
        let kind: ProductKind = model.kind.parse().unwrap_or(ProductKind::Panel);
        let specs = match kind {
            ProductKind::Panel => ProductSpecs::Panel {
                power_wp: model.power_wp.unwrap_or(0.0),
                panel_type: model.panel_type.unwrap_or_default(),
            },
            ProductKind::Inverter => ProductSpecs::Inverter {
                power_kw: model.power_kw.unwrap_or(0.0),
                grid_type: model.grid_type.unwrap_or_default(),
                system_type: model.system_type.unwrap_or_default(),
            },
            ProductKind::Battery => ProductSpecs::Battery {
                capacity_ah: model.capacity_ah.unwrap_or(0.0),
                voltage: model.voltage.unwrap_or(0.0),
                battery_type: model.battery_type.unwrap_or_default(),
            },
        };

        Product {
            id: ProductId(model.id),
            kind,
            brand: model.brand,
            model: model.model,
            price: model.price,
            specs,
            technical_sheet_path: model.technical_sheet_path,
            is_active: model.is_active,
            created_at: model.created_at.with_timezone(&Utc),
            updated_at: model.updated_at.with_timezone(&Utc),
        }
    }
}
