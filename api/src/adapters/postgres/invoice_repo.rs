//! PostgreSQL adapter for InvoiceRepository

use async_trait::async_trait;
use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, PaginatorTrait, QueryFilter,
    QueryOrder, QuerySelect, Set,
};
use uuid::Uuid;

use super::{db_err, ensure_deleted};
use crate::domain::entities::{
    CostCenterId, Invoice, InvoiceFilter, InvoiceId, InvoiceStatus, NewInvoice, PaymentMethodId,
    ProjectId, VendorId,
};
use crate::domain::ports::InvoiceRepository;
use crate::entity::invoices;
use crate::error::DomainError;

/// PostgreSQL implementation of InvoiceRepository
pub struct PostgresInvoiceRepository {
    db: DatabaseConnection,
}

impl PostgresInvoiceRepository {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    async fn count_where(&self, column: invoices::Column, id: Uuid) -> Result<u64, DomainError> {
        invoices::Entity::find()
            .filter(column.eq(id))
            .count(&self.db)
            .await
            .map_err(db_err)
    }
}

#[async_trait]
impl InvoiceRepository for PostgresInvoiceRepository {
    async fn find_by_id(&self, id: &InvoiceId) -> Result<Option<Invoice>, DomainError> {
        let result = invoices::Entity::find_by_id(id.0)
            .one(&self.db)
            .await
            .map_err(db_err)?;

        Ok(result.map(|m| m.into()))
    }

    async fn find_by_number(
        &self,
        vendor_id: &VendorId,
        invoice_number: &str,
    ) -> Result<Option<Invoice>, DomainError> {
        let result = invoices::Entity::find()
            .filter(invoices::Column::VendorId.eq(vendor_id.0))
            .filter(invoices::Column::InvoiceNumber.eq(invoice_number))
            .one(&self.db)
            .await
            .map_err(db_err)?;

        Ok(result.map(|m| m.into()))
    }

    async fn list(&self, filter: &InvoiceFilter) -> Result<Vec<Invoice>, DomainError> {
        let mut query = invoices::Entity::find();

        if let Some(status) = filter.status {
            query = query.filter(invoices::Column::Status.eq(status.to_string()));
        }
        if let Some(vendor_id) = filter.vendor_id {
            query = query.filter(invoices::Column::VendorId.eq(vendor_id.0));
        }
        if let Some(cost_center_id) = filter.cost_center_id {
            query = query.filter(invoices::Column::CostCenterId.eq(cost_center_id.0));
        }
        if let Some(from) = filter.from {
            query = query.filter(invoices::Column::IssueDate.gte(from));
        }
        if let Some(to) = filter.to {
            query = query.filter(invoices::Column::IssueDate.lte(to));
        }

        query = query.order_by_desc(invoices::Column::IssueDate);
        if let Some(page) = filter.page {
            query = query.offset(page.offset).limit(page.limit);
        }

        let results = query.all(&self.db).await.map_err(db_err)?;

        Ok(results.into_iter().map(|m| m.into()).collect())
    }

    async fn create(&self, invoice: &NewInvoice) -> Result<Invoice, DomainError> {
        let now = Utc::now().fixed_offset();

        let result = invoices::ActiveModel {
            id: Set(Uuid::new_v4()),
            invoice_number: Set(invoice.invoice_number.clone()),
            vendor_id: Set(invoice.vendor_id.0),
            cost_center_id: Set(invoice.cost_center_id.0),
            payment_method_id: Set(invoice.payment_method_id.map(|p| p.0)),
            project_id: Set(invoice.project_id.map(|p| p.0)),
            issue_date: Set(invoice.issue_date),
            due_date: Set(invoice.due_date),
            subtotal: Set(invoice.subtotal),
            tax_amount: Set(invoice.tax_amount),
            withholding_amount: Set(invoice.withholding_amount),
            total_amount: Set(Invoice::compute_total(
                invoice.subtotal,
                invoice.tax_amount,
                invoice.withholding_amount,
            )),
            status: Set(InvoiceStatus::Pending.to_string()),
            description: Set(invoice.description.clone()),
            invoice_file_path: Set(None),
            payment_support_path: Set(None),
            paid_at: Set(None),
            created_at: Set(now),
            updated_at: Set(now),
        }
        .insert(&self.db)
        .await
        .map_err(db_err)?;

        Ok(result.into())
    }

    async fn update(&self, invoice: &Invoice) -> Result<Invoice, DomainError> {
        let result = invoices::ActiveModel {
            id: Set(invoice.id.0),
            invoice_number: Set(invoice.invoice_number.clone()),
            vendor_id: Set(invoice.vendor_id.0),
            cost_center_id: Set(invoice.cost_center_id.0),
            payment_method_id: Set(invoice.payment_method_id.map(|p| p.0)),
            project_id: Set(invoice.project_id.map(|p| p.0)),
            issue_date: Set(invoice.issue_date),
            due_date: Set(invoice.due_date),
            subtotal: Set(invoice.subtotal),
            tax_amount: Set(invoice.tax_amount),
            withholding_amount: Set(invoice.withholding_amount),
            total_amount: Set(invoice.total_amount),
            status: Set(invoice.status.to_string()),
            description: Set(invoice.description.clone()),
            invoice_file_path: Set(invoice.invoice_file_path.clone()),
            payment_support_path: Set(invoice.payment_support_path.clone()),
            paid_at: Set(invoice.paid_at.map(|t| t.fixed_offset())),
            updated_at: Set(Utc::now().fixed_offset()),
            ..Default::default()
        }
        .update(&self.db)
        .await
        .map_err(db_err)?;

        Ok(result.into())
    }

    async fn delete(&self, id: &InvoiceId) -> Result<(), DomainError> {
        let result = invoices::Entity::delete_by_id(id.0)
            .exec(&self.db)
            .await
            .map_err(db_err)?;

        ensure_deleted(result.rows_affected, format!("Invoice {}", id))
    }

    async fn count_by_vendor(&self, vendor_id: &VendorId) -> Result<u64, DomainError> {
        self.count_where(invoices::Column::VendorId, vendor_id.0).await
    }

    async fn count_by_cost_center(
        &self,
        cost_center_id: &CostCenterId,
    ) -> Result<u64, DomainError> {
        self.count_where(invoices::Column::CostCenterId, cost_center_id.0)
            .await
    }

    async fn count_by_payment_method(
        &self,
        payment_method_id: &PaymentMethodId,
    ) -> Result<u64, DomainError> {
        self.count_where(invoices::Column::PaymentMethodId, payment_method_id.0)
            .await
    }
}

/// Convert SeaORM model to domain entity
impl From<invoices::Model> for Invoice {
    fn from(model: invoices::Model) -> Self {
        Invoice {
            id: InvoiceId(model.id),
            invoice_number: model.invoice_number,
            vendor_id: VendorId(model.vendor_id),
            cost_center_id: CostCenterId(model.cost_center_id),
            payment_method_id: model.payment_method_id.map(PaymentMethodId),
            project_id: model.project_id.map(ProjectId),
            issue_date: model.issue_date,
            due_date: model.due_date,
            subtotal: model.subtotal,
            tax_amount: model.tax_amount,
            withholding_amount: model.withholding_amount,
            total_amount: model.total_amount,
            status: model.status.parse().unwrap_or(InvoiceStatus::Pending),
            description: model.description,
            invoice_file_path: model.invoice_file_path,
            payment_support_path: model.payment_support_path,
            paid_at: model.paid_at.map(|t| t.with_timezone(&Utc)),
            created_at: model.created_at.with_timezone(&Utc),
            updated_at: model.updated_at.with_timezone(&Utc),
        }
    }
}
