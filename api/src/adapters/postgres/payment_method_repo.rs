//! PostgreSQL adapter for PaymentMethodRepository

use async_trait::async_trait;
use chrono::Utc;
use sea_orm::{ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder, Set};
use uuid::Uuid;

use super::{db_err, ensure_deleted};
use crate::domain::entities::{NewPaymentMethod, PaymentMethod, PaymentMethodId};
use crate::domain::ports::PaymentMethodRepository;
use crate::entity::payment_methods;
use crate::error::DomainError;

/// PostgreSQL implementation of PaymentMethodRepository
pub struct PostgresPaymentMethodRepository {
    db: DatabaseConnection,
}

impl PostgresPaymentMethodRepository {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

#[async_trait]
impl PaymentMethodRepository for PostgresPaymentMethodRepository {
    async fn find_by_id(&self, id: &PaymentMethodId) -> Result<Option<PaymentMethod>, DomainError> {
        let result = payment_methods::Entity::find_by_id(id.0)
            .one(&self.db)
            .await
            .map_err(db_err)?;

        Ok(result.map(|m| m.into()))
    }

    async fn find_by_name(&self, name: &str) -> Result<Option<PaymentMethod>, DomainError> {
        let result = payment_methods::Entity::find()
            .filter(payment_methods::Column::Name.eq(name))
            .one(&self.db)
            .await
            .map_err(db_err)?;

        Ok(result.map(|m| m.into()))
    }

    async fn list(&self) -> Result<Vec<PaymentMethod>, DomainError> {
        let results = payment_methods::Entity::find()
            .order_by_asc(payment_methods::Column::Name)
            .all(&self.db)
            .await
            .map_err(db_err)?;

        Ok(results.into_iter().map(|m| m.into()).collect())
    }

    async fn create(&self, method: &NewPaymentMethod) -> Result<PaymentMethod, DomainError> {
        let result = payment_methods::ActiveModel {
            id: Set(Uuid::new_v4()),
            name: Set(method.name.clone()),
            description: Set(method.description.clone()),
            is_active: Set(true),
            created_at: Set(Utc::now().fixed_offset()),
        }
        .insert(&self.db)
        .await
        .map_err(db_err)?;

        Ok(result.into())
    }

    async fn update(&self, method: &PaymentMethod) -> Result<PaymentMethod, DomainError> {
        let result = payment_methods::ActiveModel {
            id: Set(method.id.0),
            name: Set(method.name.clone()),
            description: Set(method.description.clone()),
            is_active: Set(method.is_active),
            ..Default::default()
        }
        .update(&self.db)
        .await
        .map_err(db_err)?;

        Ok(result.into())
    }

    async fn delete(&self, id: &PaymentMethodId) -> Result<(), DomainError> {
        let result = payment_methods::Entity::delete_by_id(id.0)
            .exec(&self.db)
            .await
            .map_err(db_err)?;

        ensure_deleted(result.rows_affected, format!("Payment method {}", id))
    }
}

impl From<payment_methods::Model> for PaymentMethod {
    fn from(model: payment_methods::Model) -> Self {
        PaymentMethod {
            id: PaymentMethodId(model.id),
            name: model.name,
            description: model.description,
            is_active: model.is_active,
            created_at: model.created_at.with_timezone(&Utc),
        }
    }
}
