//! PostgreSQL adapter for RoleRepository

use async_trait::async_trait;
use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder, Set,
};
use uuid::Uuid;

use super::{db_err, ensure_deleted};
use crate::domain::entities::{NewRole, Role, RoleId};
use crate::domain::ports::RoleRepository;
use crate::entity::roles;
use crate::error::DomainError;

/// PostgreSQL implementation of RoleRepository
pub struct PostgresRoleRepository {
    db: DatabaseConnection,
}

impl PostgresRoleRepository {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

#[async_trait]
impl RoleRepository for PostgresRoleRepository {
    async fn find_by_id(&self, id: &RoleId) -> Result<Option<Role>, DomainError> {
        let result = roles::Entity::find_by_id(id.0)
            .one(&self.db)
            .await
            .map_err(db_err)?;

        Ok(result.map(|m| m.into()))
    }

    async fn find_by_name(&self, name: &str) -> Result<Option<Role>, DomainError> {
        let result = roles::Entity::find()
            .filter(roles::Column::Name.eq(name.to_lowercase()))
            .one(&self.db)
            .await
            .map_err(db_err)?;

        Ok(result.map(|m| m.into()))
    }

    async fn list(&self) -> Result<Vec<Role>, DomainError> {
        let results = roles::Entity::find()
            .order_by_asc(roles::Column::Name)
            .all(&self.db)
            .await
            .map_err(db_err)?;

        Ok(results.into_iter().map(|m| m.into()).collect())
    }

    async fn create(&self, role: &NewRole) -> Result<Role, DomainError> {
        let model = roles::ActiveModel {
            id: Set(Uuid::new_v4()),
            name: Set(role.name.to_lowercase()),
            description: Set(role.description.clone()),
            created_at: Set(Utc::now().fixed_offset()),
        };

        let result = model.insert(&self.db).await.map_err(db_err)?;

        Ok(result.into())
    }

    async fn update(&self, role: &Role) -> Result<Role, DomainError> {
        let result = roles::ActiveModel {
            id: Set(role.id.0),
            name: Set(role.name.to_lowercase()),
            description: Set(role.description.clone()),
            ..Default::default()
        }
        .update(&self.db)
        .await
        .map_err(db_err)?;

        Ok(result.into())
    }

    async fn delete(&self, id: &RoleId) -> Result<(), DomainError> {
        let result = roles::Entity::delete_by_id(id.0)
            .exec(&self.db)
            .await
            .map_err(db_err)?;

        ensure_deleted(result.rows_affected, format!("Role {}", id))
    }
}

/// Convert SeaORM model to domain entity
impl From<roles::Model> for Role {
    fn from(model: roles::Model) -> Self {
        Role {
            id: RoleId(model.id),
            name: model.name,
            description: model.description,
            created_at: model.created_at.with_timezone(&Utc),
        }
    }
}
