//! PostgreSQL adapter for CostCenterRepository

use async_trait::async_trait;
use chrono::Utc;
use sea_orm::{ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder, Set};
use uuid::Uuid;

use super::{db_err, ensure_deleted};
use crate::domain::entities::{CostCenter, CostCenterId, NewCostCenter};
use crate::domain::ports::CostCenterRepository;
use crate::entity::cost_centers;
use crate::error::DomainError;

/// PostgreSQL implementation of CostCenterRepository
pub struct PostgresCostCenterRepository {
    db: DatabaseConnection,
}

impl PostgresCostCenterRepository {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

#[async_trait]
impl CostCenterRepository for PostgresCostCenterRepository {
    async fn find_by_id(&self, id: &CostCenterId) -> Result<Option<CostCenter>, DomainError> {
        let result = cost_centers::Entity::find_by_id(id.0)
            .one(&self.db)
            .await
            .map_err(db_err)?;

        Ok(result.map(|m| m.into()))
    }

    async fn find_by_code(&self, code: &str) -> Result<Option<CostCenter>, DomainError> {
        let result = cost_centers::Entity::find()
            .filter(cost_centers::Column::Code.eq(code))
            .one(&self.db)
            .await
            .map_err(db_err)?;

        Ok(result.map(|m| m.into()))
    }

    async fn list(&self) -> Result<Vec<CostCenter>, DomainError> {
        let results = cost_centers::Entity::find()
            .order_by_asc(cost_centers::Column::Code)
            .all(&self.db)
            .await
            .map_err(db_err)?;

        Ok(results.into_iter().map(|m| m.into()).collect())
    }

    async fn create(&self, cost_center: &NewCostCenter) -> Result<CostCenter, DomainError> {
        let now = Utc::now().fixed_offset();

        let result = cost_centers::ActiveModel {
            id: Set(Uuid::new_v4()),
            code: Set(cost_center.code.clone()),
            name: Set(cost_center.name.clone()),
            description: Set(cost_center.description.clone()),
            budget: Set(cost_center.budget),
            is_active: Set(true),
            created_at: Set(now),
            updated_at: Set(now),
        }
        .insert(&self.db)
        .await
        .map_err(db_err)?;

        Ok(result.into())
    }

    async fn update(&self, cost_center: &CostCenter) -> Result<CostCenter, DomainError> {
        let result = cost_centers::ActiveModel {
            id: Set(cost_center.id.0),
            code: Set(cost_center.code.clone()),
            name: Set(cost_center.name.clone()),
            description: Set(cost_center.description.clone()),
            budget: Set(cost_center.budget),
            is_active: Set(cost_center.is_active),
            updated_at: Set(Utc::now().fixed_offset()),
            ..Default::default()
        }
        .update(&self.db)
        .await
        .map_err(db_err)?;

        Ok(result.into())
    }

    async fn delete(&self, id: &CostCenterId) -> Result<(), DomainError> {
        let result = cost_centers::Entity::delete_by_id(id.0)
            .exec(&self.db)
            .await
            .map_err(db_err)?;

        ensure_deleted(result.rows_affected, format!("Cost center {}", id))
    }
}

impl From<cost_centers::Model> for CostCenter {
    fn from(model: cost_centers::Model) -> Self {
        CostCenter {
            id: CostCenterId(model.id),
            code: model.code,
            name: model.name,
            description: model.description,
            budget: model.budget,
            is_active: model.is_active,
            created_at: model.created_at.with_timezone(&Utc),
            updated_at: model.updated_at.with_timezone(&Utc),
        }
    }
}
