//! PostgreSQL adapter for ClientRepository

use async_trait::async_trait;
use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, DatabaseConnection, EntityTrait, PaginatorTrait,
    QueryFilter, QueryOrder, QuerySelect, Set,
};
use uuid::Uuid;

use super::{db_err, ensure_deleted};
use crate::domain::entities::{Client, ClientFilter, ClientId, ClientType, NewClient};
use crate::domain::ports::ClientRepository;
use crate::entity::clients;
use crate::error::DomainError;

/// PostgreSQL implementation of ClientRepository
pub struct PostgresClientRepository {
    db: DatabaseConnection,
}

impl PostgresClientRepository {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

#[async_trait]
impl ClientRepository for PostgresClientRepository {
    async fn find_by_id(&self, id: &ClientId) -> Result<Option<Client>, DomainError> {
        let result = clients::Entity::find_by_id(id.0)
            .one(&self.db)
            .await
            .map_err(db_err)?;

        Ok(result.map(|m| m.into()))
    }

    async fn find_by_nic(&self, nic: &str) -> Result<Option<Client>, DomainError> {
        let result = clients::Entity::find()
            .filter(clients::Column::Nic.eq(nic))
            .one(&self.db)
            .await
            .map_err(db_err)?;

        Ok(result.map(|m| m.into()))
    }

    async fn list(&self, filter: &ClientFilter) -> Result<Vec<Client>, DomainError> {
        let mut query = clients::Entity::find();

        if let Some(term) = filter.search.as_deref().filter(|t| !t.is_empty()) {
            query = query.filter(
                Condition::any()
                    .add(clients::Column::Name.contains(term))
                    .add(clients::Column::Nic.contains(term)),
            );
        }
        if let Some(active) = filter.is_active {
            query = query.filter(clients::Column::IsActive.eq(active));
        }

        let results = query
            .order_by_desc(clients::Column::CreatedAt)
            .offset(filter.page.offset)
            .limit(filter.page.limit)
            .all(&self.db)
            .await
            .map_err(db_err)?;

        Ok(results.into_iter().map(|m| m.into()).collect())
    }

    async fn count(&self) -> Result<u64, DomainError> {
        clients::Entity::find().count(&self.db).await.map_err(db_err)
    }

    async fn create(&self, client: &NewClient) -> Result<Client, DomainError> {
        let now = Utc::now().fixed_offset();

        let model = clients::ActiveModel {
            id: Set(Uuid::new_v4()),
            client_type: Set(client.client_type.to_string()),
            name: Set(client.name.clone()),
            nic: Set(client.nic.clone()),
            email: Set(client.email.clone()),
            phone: Set(client.phone.clone()),
            department: Set(client.department.clone()),
            city: Set(client.city.clone()),
            address: Set(client.address.clone()),
            monthly_consumption_kwh: Set(client.monthly_consumption_kwh),
            energy_rate: Set(client.energy_rate),
            network_type: Set(client.network_type.clone()),
            is_active: Set(true),
            created_at: Set(now),
            updated_at: Set(now),
        };

        let result = model.insert(&self.db).await.map_err(db_err)?;

        Ok(result.into())
    }

    async fn update(&self, client: &Client) -> Result<Client, DomainError> {
        let result = clients::ActiveModel {
            id: Set(client.id.0),
            client_type: Set(client.client_type.to_string()),
            name: Set(client.name.clone()),
            nic: Set(client.nic.clone()),
            email: Set(client.email.clone()),
            phone: Set(client.phone.clone()),
            department: Set(client.department.clone()),
            city: Set(client.city.clone()),
            address: Set(client.address.clone()),
            monthly_consumption_kwh: Set(client.monthly_consumption_kwh),
            energy_rate: Set(client.energy_rate),
            network_type: Set(client.network_type.clone()),
            is_active: Set(client.is_active),
            updated_at: Set(Utc::now().fixed_offset()),
            ..Default::default()
        }
        .update(&self.db)
        .await
        .map_err(db_err)?;

        Ok(result.into())
    }

    async fn delete(&self, id: &ClientId) -> Result<(), DomainError> {
        let result = clients::Entity::delete_by_id(id.0)
            .exec(&self.db)
            .await
            .map_err(db_err)?;

        ensure_deleted(result.rows_affected, format!("Client {}", id))
    }
}

/// Convert SeaORM model to domain entity
impl From<clients::Model> for Client {
    fn from(model: clients::Model) -> Self {
        Client {
            id: ClientId(model.id),
            client_type: model.client_type.parse().unwrap_or(ClientType::Natural),
            name: model.name,
            nic: model.nic,
            email: model.email,
            phone: model.phone,
            department: model.department,
            city: model.city,
            address: model.address,
            monthly_consumption_kwh: model.monthly_consumption_kwh,
            energy_rate: model.energy_rate,
            network_type: model.network_type,
            is_active: model.is_active,
            created_at: model.created_at.with_timezone(&Utc),
            updated_at: model.updated_at.with_timezone(&Utc),
        }
    }
}
