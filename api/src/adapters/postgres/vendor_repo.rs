//! PostgreSQL adapter for VendorRepository
//!
//! Providers and suppliers share the `vendors` table, split by `kind`.

use async_trait::async_trait;
use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, DatabaseConnection, EntityTrait, QueryFilter,
    QueryOrder, QuerySelect, Set,
};
use uuid::Uuid;

use super::{db_err, ensure_deleted};
use crate::domain::entities::{NewVendor, Vendor, VendorFilter, VendorId, VendorKind};
use crate::domain::ports::VendorRepository;
use crate::entity::vendors;
use crate::error::DomainError;

/// PostgreSQL implementation of VendorRepository
pub struct PostgresVendorRepository {
    db: DatabaseConnection,
}

impl PostgresVendorRepository {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

#[async_trait]
impl VendorRepository for PostgresVendorRepository {
    async fn find_by_id(&self, id: &VendorId) -> Result<Option<Vendor>, DomainError> {
        let result = vendors::Entity::find_by_id(id.0)
            .one(&self.db)
            .await
            .map_err(db_err)?;

        Ok(result.map(|m| m.into()))
    }

    async fn find_by_nit(
        &self,
        kind: VendorKind,
        nit: &str,
    ) -> Result<Option<Vendor>, DomainError> {
        let result = vendors::Entity::find()
            .filter(vendors::Column::Kind.eq(kind.to_string()))
            .filter(vendors::Column::Nit.eq(nit))
            .one(&self.db)
            .await
            .map_err(db_err)?;

        Ok(result.map(|m| m.into()))
    }

    async fn list(
        &self,
        kind: VendorKind,
        filter: &VendorFilter,
    ) -> Result<Vec<Vendor>, DomainError> {
        let mut query = vendors::Entity::find().filter(vendors::Column::Kind.eq(kind.to_string()));

        if let Some(term) = filter.search.as_deref().filter(|t| !t.is_empty()) {
            query = query.filter(
                Condition::any()
                    .add(vendors::Column::Name.contains(term))
                    .add(vendors::Column::Nit.contains(term)),
            );
        }
        if let Some(active) = filter.is_active {
            query = query.filter(vendors::Column::IsActive.eq(active));
        }

        let results = query
            .order_by_asc(vendors::Column::Name)
            .offset(filter.page.offset)
            .limit(filter.page.limit)
            .all(&self.db)
            .await
            .map_err(db_err)?;

        Ok(results.into_iter().map(|m| m.into()).collect())
    }

    async fn create(&self, vendor: &NewVendor) -> Result<Vendor, DomainError> {
        let now = Utc::now().fixed_offset();

        let result = vendors::ActiveModel {
            id: Set(Uuid::new_v4()),
            kind: Set(vendor.kind.to_string()),
            name: Set(vendor.name.clone()),
            nit: Set(vendor.nit.clone()),
            contact_name: Set(vendor.contact_name.clone()),
            email: Set(vendor.email.clone()),
            phone: Set(vendor.phone.clone()),
            address: Set(vendor.address.clone()),
            bank_account: Set(vendor.bank_account.clone()),
            is_active: Set(true),
            created_at: Set(now),
            updated_at: Set(now),
        }
        .insert(&self.db)
        .await
        .map_err(db_err)?;

        Ok(result.into())
    }

    async fn update(&self, vendor: &Vendor) -> Result<Vendor, DomainError> {
        let result = vendors::ActiveModel {
            id: Set(vendor.id.0),
            name: Set(vendor.name.clone()),
            nit: Set(vendor.nit.clone()),
            contact_name: Set(vendor.contact_name.clone()),
            email: Set(vendor.email.clone()),
            phone: Set(vendor.phone.clone()),
            address: Set(vendor.address.clone()),
            bank_account: Set(vendor.bank_account.clone()),
            is_active: Set(vendor.is_active),
            updated_at: Set(Utc::now().fixed_offset()),
            ..Default::default()
        }
        .update(&self.db)
        .await
        .map_err(db_err)?;

        Ok(result.into())
    }

    async fn delete(&self, id: &VendorId) -> Result<(), DomainError> {
        let result = vendors::Entity::delete_by_id(id.0)
            .exec(&self.db)
            .await
            .map_err(db_err)?;

        ensure_deleted(result.rows_affected, format!("Vendor {}", id))
    }
}

/// Convert SeaORM model to domain entity
impl From<vendors::Model> for Vendor {
    fn from(model: vendors::Model) -> Self {
        Vendor {
            id: VendorId(model.id),
            kind: model.kind.parse().unwrap_or(VendorKind::Provider),
            name: model.name,
            nit: model.nit,
            contact_name: model.contact_name,
            email: model.email,
            phone: model.phone,
            address: model.address,
            bank_account: model.bank_account,
            is_active: model.is_active,
            created_at: model.created_at.with_timezone(&Utc),
            updated_at: model.updated_at.with_timezone(&Utc),
        }
    }
}
