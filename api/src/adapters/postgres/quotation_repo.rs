//! PostgreSQL adapter for QuotationRepository
//!
//! Header and lines are written in one transaction; lines keep their
//! submission order through the `position` column.

use async_trait::async_trait;
use chrono::Utc;
use sea_orm::sea_query::Expr;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, DatabaseConnection, EntityTrait,
    FromQueryResult, PaginatorTrait, QueryFilter, QueryOrder, QuerySelect, Set,
    TransactionTrait,
};
use uuid::Uuid;

use super::{db_err, ensure_deleted};
use crate::domain::entities::{
    ClientId, NewQuotation, ProductId, ProductKind, Quotation, QuotationDetails, QuotationFilter,
    QuotationId, QuotationItem, QuotationStatus, QuotationStatusSummary, SystemType, UsedProduct,
    UserId,
};
use crate::domain::pricing::{Percentages, QuotationTotals};
use crate::domain::ports::QuotationRepository;
use crate::entity::{quotation_items, quotations, used_products};
use crate::error::DomainError;

/// PostgreSQL implementation of QuotationRepository
pub struct PostgresQuotationRepository {
    db: DatabaseConnection,
}

impl PostgresQuotationRepository {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    async fn load_lines<C: ConnectionTrait>(
        conn: &C,
        id: Uuid,
    ) -> Result<(Vec<UsedProduct>, Vec<QuotationItem>), DomainError> {
        let products = used_products::Entity::find()
            .filter(used_products::Column::QuotationId.eq(id))
            .order_by_asc(used_products::Column::Position)
            .all(conn)
            .await
            .map_err(db_err)?;

        let items = quotation_items::Entity::find()
            .filter(quotation_items::Column::QuotationId.eq(id))
            .order_by_asc(quotation_items::Column::Position)
            .all(conn)
            .await
            .map_err(db_err)?;

        Ok((
            products.into_iter().map(|m| m.into()).collect(),
            items.into_iter().map(|m| m.into()).collect(),
        ))
    }

    async fn insert_lines<C: ConnectionTrait>(
        conn: &C,
        id: Uuid,
        quotation: &NewQuotation,
    ) -> Result<(), DomainError> {
        let products: Vec<used_products::ActiveModel> = quotation
            .used_products
            .iter()
            .enumerate()
            .map(|(position, p)| used_products::ActiveModel {
                id: Set(Uuid::new_v4()),
                quotation_id: Set(id),
                product_id: Set(p.product_id.0),
                kind: Set(p.kind.to_string()),
                description: Set(p.description.clone()),
                quantity: Set(p.quantity),
                unit_price: Set(p.unit_price),
                profit_percentage: Set(p.profit_percentage),
                partial_value: Set(p.partial_value),
                profit: Set(p.profit),
                total_value: Set(p.total_value),
                position: Set(position as i32),
            })
            .collect();

        if !products.is_empty() {
            used_products::Entity::insert_many(products)
                .exec(conn)
                .await
                .map_err(db_err)?;
        }

        let items: Vec<quotation_items::ActiveModel> = quotation
            .items
            .iter()
            .enumerate()
            .map(|(position, i)| quotation_items::ActiveModel {
                id: Set(Uuid::new_v4()),
                quotation_id: Set(id),
                description: Set(i.description.clone()),
                item_type: Set(i.item_type.clone()),
                quantity: Set(i.quantity),
                unit: Set(i.unit.clone()),
                unit_price: Set(i.unit_price),
                profit_percentage: Set(i.profit_percentage),
                partial_value: Set(i.partial_value),
                profit: Set(i.profit),
                total_value: Set(i.total_value),
                position: Set(position as i32),
            })
            .collect();

        if !items.is_empty() {
            quotation_items::Entity::insert_many(items)
                .exec(conn)
                .await
                .map_err(db_err)?;
        }

        Ok(())
    }
}

/// Copy header fields of a new quotation into an active model
fn header_model(model: &mut quotations::ActiveModel, q: &NewQuotation) {
    model.client_id = Set(q.client_id.0);
    model.user_id = Set(q.user_id.0);
    model.project_name = Set(q.project_name.clone());
    model.system_type = Set(q.system_type.to_string());
    model.power_kwp = Set(q.power_kwp);
    model.panel_count = Set(q.panel_count);
    model.requires_financing = Set(q.requires_financing);
    model.profit_percentage = Set(q.percentages.profit);
    model.iva_profit_percentage = Set(q.percentages.iva_profit);
    model.commercial_management_percentage = Set(q.percentages.commercial_management);
    model.administration_percentage = Set(q.percentages.administration);
    model.contingency_percentage = Set(q.percentages.contingency);
    model.withholding_percentage = Set(q.percentages.withholding);
    model.subtotal = Set(q.totals.subtotal);
    model.commercial_management_value = Set(q.totals.commercial_management);
    model.administration_value = Set(q.totals.administration);
    model.contingency_value = Set(q.totals.contingency);
    model.profit_value = Set(q.totals.profit);
    model.iva_profit_value = Set(q.totals.iva_profit);
    model.subtotal_with_markups = Set(q.totals.subtotal_with_markups);
    model.withholding_value = Set(q.totals.withholding);
    model.total_value = Set(q.totals.total_value);
    model.notes = Set(q.notes.clone());
    model.updated_at = Set(Utc::now().fixed_offset());
}

#[derive(Debug, FromQueryResult)]
struct StatusRow {
    status: String,
    count: i64,
    total_value: Option<f64>,
}

#[async_trait]
impl QuotationRepository for PostgresQuotationRepository {
    async fn find_by_id(&self, id: &QuotationId) -> Result<Option<Quotation>, DomainError> {
        let result = quotations::Entity::find_by_id(id.0)
            .one(&self.db)
            .await
            .map_err(db_err)?;

        Ok(result.map(|m| m.into()))
    }

    async fn find_details(
        &self,
        id: &QuotationId,
    ) -> Result<Option<QuotationDetails>, DomainError> {
        let Some(header) = quotations::Entity::find_by_id(id.0)
            .one(&self.db)
            .await
            .map_err(db_err)?
        else {
            return Ok(None);
        };

        let (used_products, items) = Self::load_lines(&self.db, id.0).await?;

        Ok(Some(QuotationDetails {
            quotation: header.into(),
            used_products,
            items,
        }))
    }

    async fn list(&self, filter: &QuotationFilter) -> Result<Vec<Quotation>, DomainError> {
        let mut query = quotations::Entity::find();

        if let Some(status) = filter.status {
            query = query.filter(quotations::Column::Status.eq(status.to_string()));
        }
        if let Some(client_id) = filter.client_id {
            query = query.filter(quotations::Column::ClientId.eq(client_id.0));
        }

        let results = query
            .order_by_desc(quotations::Column::CreatedAt)
            .offset(filter.page.offset)
            .limit(filter.page.limit)
            .all(&self.db)
            .await
            .map_err(db_err)?;

        Ok(results.into_iter().map(|m| m.into()).collect())
    }

    async fn count_by_client(&self, client_id: &ClientId) -> Result<u64, DomainError> {
        quotations::Entity::find()
            .filter(quotations::Column::ClientId.eq(client_id.0))
            .count(&self.db)
            .await
            .map_err(db_err)
    }

    async fn create(&self, quotation: &NewQuotation) -> Result<QuotationDetails, DomainError> {
        let txn = self.db.begin().await.map_err(db_err)?;

        let id = Uuid::new_v4();
        let mut model = quotations::ActiveModel {
            id: Set(id),
            status: Set(QuotationStatus::Pending.to_string()),
            created_at: Set(Utc::now().fixed_offset()),
            ..Default::default()
        };
        header_model(&mut model, quotation);

        let header = model.insert(&txn).await.map_err(db_err)?;
        Self::insert_lines(&txn, id, quotation).await?;
        let (used_products, items) = Self::load_lines(&txn, id).await?;

        txn.commit().await.map_err(db_err)?;

        Ok(QuotationDetails {
            quotation: header.into(),
            used_products,
            items,
        })
    }

    async fn replace(
        &self,
        id: &QuotationId,
        quotation: &NewQuotation,
    ) -> Result<QuotationDetails, DomainError> {
        let txn = self.db.begin().await.map_err(db_err)?;

        let mut model = quotations::ActiveModel {
            id: Set(id.0),
            ..Default::default()
        };
        header_model(&mut model, quotation);
        let header = model.update(&txn).await.map_err(db_err)?;

        used_products::Entity::delete_many()
            .filter(used_products::Column::QuotationId.eq(id.0))
            .exec(&txn)
            .await
            .map_err(db_err)?;
        quotation_items::Entity::delete_many()
            .filter(quotation_items::Column::QuotationId.eq(id.0))
            .exec(&txn)
            .await
            .map_err(db_err)?;

        Self::insert_lines(&txn, id.0, quotation).await?;
        let (used_products, items) = Self::load_lines(&txn, id.0).await?;

        txn.commit().await.map_err(db_err)?;

        Ok(QuotationDetails {
            quotation: header.into(),
            used_products,
            items,
        })
    }

    async fn update_status(
        &self,
        id: &QuotationId,
        status: QuotationStatus,
    ) -> Result<Quotation, DomainError> {
        let result = quotations::ActiveModel {
            id: Set(id.0),
            status: Set(status.to_string()),
            updated_at: Set(Utc::now().fixed_offset()),
            ..Default::default()
        }
        .update(&self.db)
        .await
        .map_err(db_err)?;

        Ok(result.into())
    }

    async fn delete(&self, id: &QuotationId) -> Result<(), DomainError> {
        let result = quotations::Entity::delete_by_id(id.0)
            .exec(&self.db)
            .await
            .map_err(db_err)?;

        ensure_deleted(result.rows_affected, format!("Quotation {}", id))
    }

    async fn status_summary(&self) -> Result<Vec<QuotationStatusSummary>, DomainError> {
        let rows = quotations::Entity::find()
            .select_only()
            .column(quotations::Column::Status)
            .column_as(Expr::col(quotations::Column::Id).count(), "count")
            .column_as(Expr::col(quotations::Column::TotalValue).sum(), "total_value")
            .group_by(quotations::Column::Status)
            .into_model::<StatusRow>()
            .all(&self.db)
            .await
            .map_err(db_err)?;

        Ok(rows
            .into_iter()
            .filter_map(|row| {
                let status = row.status.parse().ok()?;
                Some(QuotationStatusSummary {
                    status,
                    count: row.count,
                    total_value: row.total_value.unwrap_or(0.0),
                })
            })
            .collect())
    }
}

/// Convert SeaORM model to domain entity
impl From<quotations::Model> for Quotation {
    fn from(model: quotations::Model) -> Self {
        Quotation {
            id: QuotationId(model.id),
            client_id: ClientId(model.client_id),
            user_id: UserId(model.user_id),
            project_name: model.project_name,
            system_type: model.system_type.parse().unwrap_or(SystemType::OnGrid),
            power_kwp: model.power_kwp,
            panel_count: model.panel_count,
            requires_financing: model.requires_financing,
            percentages: Percentages {
                profit: model.profit_percentage,
                iva_profit: model.iva_profit_percentage,
                commercial_management: model.commercial_management_percentage,
                administration: model.administration_percentage,
                contingency: model.contingency_percentage,
                withholding: model.withholding_percentage,
            },
            totals: QuotationTotals {
                subtotal: model.subtotal,
                commercial_management: model.commercial_management_value,
                administration: model.administration_value,
                contingency: model.contingency_value,
                profit: model.profit_value,
                iva_profit: model.iva_profit_value,
                subtotal_with_markups: model.subtotal_with_markups,
                withholding: model.withholding_value,
                total_value: model.total_value,
            },
            status: model.status.parse().unwrap_or(QuotationStatus::Pending),
            notes: model.notes,
            created_at: model.created_at.with_timezone(&Utc),
            updated_at: model.updated_at.with_timezone(&Utc),
        }
    }
}

impl From<used_products::Model> for UsedProduct {
    fn from(model: used_products::Model) -> Self {
        UsedProduct {
            product_id: ProductId(model.product_id),
            kind: model.kind.parse().unwrap_or(ProductKind::Panel),
            description: model.description,
            quantity: model.quantity,
            unit_price: model.unit_price,
            profit_percentage: model.profit_percentage,
            partial_value: model.partial_value,
            profit: model.profit,
            total_value: model.total_value,
        }
    }
}

impl From<quotation_items::Model> for QuotationItem {
    fn from(model: quotation_items::Model) -> Self {
        QuotationItem {
            description: model.description,
            item_type: model.item_type,
            quantity: model.quantity,
            unit: model.unit,
            unit_price: model.unit_price,
            profit_percentage: model.profit_percentage,
            partial_value: model.partial_value,
            profit: model.profit,
            total_value: model.total_value,
        }
    }
}
