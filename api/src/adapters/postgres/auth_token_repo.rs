//! PostgreSQL adapter for AuthTokenRepository

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sea_orm::{ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, Set};

use super::db_err;
use crate::domain::entities::{AuthToken, UserId};
use crate::domain::ports::AuthTokenRepository;
use crate::entity::auth_tokens;
use crate::error::DomainError;

/// PostgreSQL implementation of AuthTokenRepository
pub struct PostgresAuthTokenRepository {
    db: DatabaseConnection,
}

impl PostgresAuthTokenRepository {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

#[async_trait]
impl AuthTokenRepository for PostgresAuthTokenRepository {
    async fn create(&self, token: &AuthToken) -> Result<(), DomainError> {
        auth_tokens::ActiveModel {
            token_hash: Set(token.token_hash.clone()),
            user_id: Set(token.user_id.0),
            expires_at: Set(token.expires_at.fixed_offset()),
            created_at: Set(token.created_at.fixed_offset()),
        }
        .insert(&self.db)
        .await
        .map_err(db_err)?;

        Ok(())
    }

    async fn find_valid(
        &self,
        token_hash: &str,
        now: DateTime<Utc>,
    ) -> Result<Option<AuthToken>, DomainError> {
        let result = auth_tokens::Entity::find_by_id(token_hash.to_string())
            .filter(auth_tokens::Column::ExpiresAt.gt(now.fixed_offset()))
            .one(&self.db)
            .await
            .map_err(db_err)?;

        Ok(result.map(|m| AuthToken {
            token_hash: m.token_hash,
            user_id: UserId(m.user_id),
            expires_at: m.expires_at.with_timezone(&Utc),
            created_at: m.created_at.with_timezone(&Utc),
        }))
    }

    async fn revoke(&self, token_hash: &str) -> Result<(), DomainError> {
        auth_tokens::Entity::delete_by_id(token_hash.to_string())
            .exec(&self.db)
            .await
            .map_err(db_err)?;

        Ok(())
    }

    async fn revoke_all_for_user(&self, user_id: &UserId) -> Result<(), DomainError> {
        auth_tokens::Entity::delete_many()
            .filter(auth_tokens::Column::UserId.eq(user_id.0))
            .exec(&self.db)
            .await
            .map_err(db_err)?;

        Ok(())
    }
}
