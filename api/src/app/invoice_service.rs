//! Vendor invoices: registration, settlement and attached documents

use std::sync::Arc;

use chrono::{NaiveDate, Utc};
use serde::Deserialize;

use crate::app::documents::{pdf_file_name, validate_pdf, Upload};
use crate::domain::entities::{
    CostCenterId, Invoice, InvoiceFilter, InvoiceId, InvoiceStatus, NewInvoice, PaymentMethodId,
    ProjectId, VendorId,
};
use crate::domain::ports::{
    CostCenterRepository, FileStorage, InvoiceRepository, PaymentMethodRepository,
    ProjectRepository, VendorRepository,
};
use crate::domain::validation::FieldErrors;
use crate::error::{AppError, DomainError};

const INVOICE_FILE_DIR: &str = "invoices/files";
const PAYMENT_SUPPORT_DIR: &str = "invoices/payment-supports";

#[derive(Debug, Clone, Deserialize)]
pub struct InvoiceInput {
    pub invoice_number: String,
    pub vendor_id: VendorId,
    pub cost_center_id: CostCenterId,
    pub payment_method_id: Option<PaymentMethodId>,
    pub project_id: Option<ProjectId>,
    pub issue_date: NaiveDate,
    pub due_date: Option<NaiveDate>,
    pub subtotal: f64,
    #[serde(default)]
    pub tax_amount: f64,
    #[serde(default)]
    pub withholding_amount: f64,
    pub description: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct PayInput {
    pub payment_method_id: Option<PaymentMethodId>,
}

/// Which of the two attachments an upload targets
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InvoiceDocument {
    Invoice,
    PaymentSupport,
}

impl InvoiceDocument {
    fn dir(&self) -> &'static str {
        match self {
            InvoiceDocument::Invoice => INVOICE_FILE_DIR,
            InvoiceDocument::PaymentSupport => PAYMENT_SUPPORT_DIR,
        }
    }

    fn slot<'a>(&self, invoice: &'a mut Invoice) -> &'a mut Option<String> {
        match self {
            InvoiceDocument::Invoice => &mut invoice.invoice_file_path,
            InvoiceDocument::PaymentSupport => &mut invoice.payment_support_path,
        }
    }

    fn label(&self) -> &'static str {
        match self {
            InvoiceDocument::Invoice => "invoice file",
            InvoiceDocument::PaymentSupport => "payment support",
        }
    }
}

pub struct InvoiceService<IR, VR, CC, PM, PJ, FS>
where
    IR: InvoiceRepository,
    VR: VendorRepository,
    CC: CostCenterRepository,
    PM: PaymentMethodRepository,
    PJ: ProjectRepository,
    FS: FileStorage,
{
    invoices: Arc<IR>,
    vendors: Arc<VR>,
    cost_centers: Arc<CC>,
    payment_methods: Arc<PM>,
    projects: Arc<PJ>,
    storage: Arc<FS>,
}

impl<IR, VR, CC, PM, PJ, FS> InvoiceService<IR, VR, CC, PM, PJ, FS>
where
    IR: InvoiceRepository,
    VR: VendorRepository,
    CC: CostCenterRepository,
    PM: PaymentMethodRepository,
    PJ: ProjectRepository,
    FS: FileStorage,
{
    pub fn new(
        invoices: Arc<IR>,
        vendors: Arc<VR>,
        cost_centers: Arc<CC>,
        payment_methods: Arc<PM>,
        projects: Arc<PJ>,
        storage: Arc<FS>,
    ) -> Self {
        Self {
            invoices,
            vendors,
            cost_centers,
            payment_methods,
            projects,
            storage,
        }
    }

    pub async fn list(&self, filter: &InvoiceFilter) -> Result<Vec<Invoice>, AppError> {
        Ok(self.invoices.list(filter).await?)
    }

    pub async fn get(&self, id: &InvoiceId) -> Result<Invoice, AppError> {
        self.invoices
            .find_by_id(id)
            .await?
            .ok_or_else(|| DomainError::NotFound(format!("Invoice {} not found", id)).into())
    }

    async fn validate(
        &self,
        input: &InvoiceInput,
        existing: Option<&InvoiceId>,
    ) -> Result<(), AppError> {
        let mut errors = FieldErrors::new();
        errors.required("invoice_number", &input.invoice_number);
        errors.max_len("invoice_number", &input.invoice_number, 50);
        errors.non_negative("subtotal", input.subtotal);
        errors.non_negative("tax_amount", input.tax_amount);
        errors.non_negative("withholding_amount", input.withholding_amount);

        if let Some(due) = input.due_date {
            if due < input.issue_date {
                errors.add("due_date", "The due date must be on or after the issue date.");
            }
        }

        if self.vendors.find_by_id(&input.vendor_id).await?.is_none() {
            errors.add("vendor_id", "The selected vendor is invalid.");
        }
        if self.cost_centers.find_by_id(&input.cost_center_id).await?.is_none() {
            errors.add("cost_center_id", "The selected cost center is invalid.");
        }
        if let Some(pm) = &input.payment_method_id {
            if self.payment_methods.find_by_id(pm).await?.is_none() {
                errors.add("payment_method_id", "The selected payment method is invalid.");
            }
        }
        if let Some(project) = &input.project_id {
            if self.projects.find_by_id(project).await?.is_none() {
                errors.add("project_id", "The selected project is invalid.");
            }
        }

        let number = input.invoice_number.trim();
        if !number.is_empty() {
            if let Some(other) = self.invoices.find_by_number(&input.vendor_id, number).await? {
                if existing != Some(&other.id) {
                    errors.taken("invoice_number");
                }
            }
        }

        Ok(errors.into_result()?)
    }

    pub async fn create(&self, input: InvoiceInput) -> Result<Invoice, AppError> {
        self.validate(&input, None).await?;

        let invoice = self
            .invoices
            .create(&NewInvoice {
                invoice_number: input.invoice_number.trim().to_string(),
                vendor_id: input.vendor_id,
                cost_center_id: input.cost_center_id,
                payment_method_id: input.payment_method_id,
                project_id: input.project_id,
                issue_date: input.issue_date,
                due_date: input.due_date,
                subtotal: input.subtotal,
                tax_amount: input.tax_amount,
                withholding_amount: input.withholding_amount,
                description: input.description,
            })
            .await?;

        tracing::info!(
            invoice_id = %invoice.id,
            vendor_id = %invoice.vendor_id,
            total = invoice.total_amount,
            "Invoice registered"
        );
        Ok(invoice)
    }

    pub async fn update(&self, id: &InvoiceId, input: InvoiceInput) -> Result<Invoice, AppError> {
        let mut invoice = self.get(id).await?;
        self.validate(&input, Some(id)).await?;

        invoice.invoice_number = input.invoice_number.trim().to_string();
        invoice.vendor_id = input.vendor_id;
        invoice.cost_center_id = input.cost_center_id;
        invoice.payment_method_id = input.payment_method_id;
        invoice.project_id = input.project_id;
        invoice.issue_date = input.issue_date;
        invoice.due_date = input.due_date;
        invoice.subtotal = input.subtotal;
        invoice.tax_amount = input.tax_amount;
        invoice.withholding_amount = input.withholding_amount;
        invoice.total_amount =
            Invoice::compute_total(input.subtotal, input.tax_amount, input.withholding_amount);
        invoice.description = input.description;

        Ok(self.invoices.update(&invoice).await?)
    }

    /// Delete the invoice and both of its stored documents
    pub async fn delete(&self, id: &InvoiceId) -> Result<(), AppError> {
        let invoice = self.get(id).await?;
        self.invoices.delete(id).await?;

        for path in [&invoice.invoice_file_path, &invoice.payment_support_path]
            .into_iter()
            .flatten()
        {
            if let Err(e) = self.storage.delete(path).await {
                tracing::warn!(invoice_id = %id, path = %path, error = %e, "Failed to remove invoice document");
            }
        }

        tracing::info!(invoice_id = %id, "Invoice deleted");
        Ok(())
    }

    /// Mark as paid now; cancelled invoices cannot be paid
    pub async fn pay(&self, id: &InvoiceId, input: PayInput) -> Result<Invoice, AppError> {
        let mut invoice = self.get(id).await?;

        match invoice.status {
            InvoiceStatus::Cancelled => {
                return Err(DomainError::Conflict(format!(
                    "Invoice {} is cancelled and cannot be paid.",
                    invoice.invoice_number
                ))
                .into())
            }
            InvoiceStatus::Paid => {
                return Err(DomainError::Conflict(format!(
                    "Invoice {} is already paid.",
                    invoice.invoice_number
                ))
                .into())
            }
            InvoiceStatus::Pending => {}
        }

        if let Some(pm) = input.payment_method_id {
            if self.payment_methods.find_by_id(&pm).await?.is_none() {
                return Err(AppError::invalid(
                    "payment_method_id",
                    "The selected payment method is invalid.",
                ));
            }
            invoice.payment_method_id = Some(pm);
        }

        invoice.status = InvoiceStatus::Paid;
        invoice.paid_at = Some(Utc::now());

        let invoice = self.invoices.update(&invoice).await?;
        tracing::info!(invoice_id = %invoice.id, "Invoice paid");
        Ok(invoice)
    }

    /// Cancel a pending invoice; paid invoices cannot be cancelled
    pub async fn cancel(&self, id: &InvoiceId) -> Result<Invoice, AppError> {
        let mut invoice = self.get(id).await?;

        if invoice.status == InvoiceStatus::Paid {
            return Err(DomainError::Conflict(format!(
                "Invoice {} is already paid and cannot be cancelled.",
                invoice.invoice_number
            ))
            .into());
        }

        invoice.status = InvoiceStatus::Cancelled;
        let invoice = self.invoices.update(&invoice).await?;
        tracing::info!(invoice_id = %invoice.id, "Invoice cancelled");
        Ok(invoice)
    }

    pub async fn upload_document(
        &self,
        id: &InvoiceId,
        document: InvoiceDocument,
        upload: Upload,
    ) -> Result<Invoice, AppError> {
        let mut invoice = self.get(id).await?;
        validate_pdf("file", &upload)?;

        let path = self
            .storage
            .put(document.dir(), &pdf_file_name(), &upload.bytes)
            .await?;

        let old = document.slot(&mut invoice).replace(path.clone());
        let invoice = match self.invoices.update(&invoice).await {
            Ok(invoice) => invoice,
            Err(e) => {
                if let Err(cleanup) = self.storage.delete(&path).await {
                    tracing::warn!(path = %path, error = %cleanup, "Failed to remove unreferenced invoice document");
                }
                return Err(e.into());
            }
        };

        if let Some(old) = old {
            if let Err(e) = self.storage.delete(&old).await {
                tracing::warn!(invoice_id = %id, path = %old, error = %e, "Failed to remove replaced invoice document");
            }
        }
        Ok(invoice)
    }

    pub async fn download_document(
        &self,
        id: &InvoiceId,
        document: InvoiceDocument,
    ) -> Result<Vec<u8>, AppError> {
        let mut invoice = self.get(id).await?;
        let path = document.slot(&mut invoice).take().ok_or_else(|| {
            AppError::NotFound(format!("Invoice {} has no {}", id, document.label()))
        })?;
        Ok(self.storage.get(&path).await?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::*;
    use axum::http::StatusCode;

    type Service = InvoiceService<
        InMemoryInvoiceRepository,
        InMemoryVendorRepository,
        InMemoryCostCenterRepository,
        InMemoryPaymentMethodRepository,
        InMemoryProjectRepository,
        InMemoryStorage,
    >;

    struct Fixture {
        svc: Service,
        storage: Arc<InMemoryStorage>,
        vendor: VendorId,
        cost_center: CostCenterId,
    }

    fn fixture(invoices: InMemoryInvoiceRepository) -> Fixture {
        let vendor = test_vendor(crate::domain::entities::VendorKind::Supplier);
        let center = test_cost_center();
        let storage = Arc::new(InMemoryStorage::new());
        Fixture {
            vendor: vendor.id,
            cost_center: center.id,
            svc: InvoiceService::new(
                Arc::new(invoices),
                Arc::new(InMemoryVendorRepository::new().with_vendor(vendor)),
                Arc::new(InMemoryCostCenterRepository::new().with_cost_center(center)),
                Arc::new(InMemoryPaymentMethodRepository::new()),
                Arc::new(InMemoryProjectRepository::new()),
                storage.clone(),
            ),
            storage,
        }
    }

    fn input(f: &Fixture, number: &str) -> InvoiceInput {
        InvoiceInput {
            invoice_number: number.into(),
            vendor_id: f.vendor,
            cost_center_id: f.cost_center,
            payment_method_id: None,
            project_id: None,
            issue_date: NaiveDate::from_ymd_opt(2026, 3, 1).unwrap(),
            due_date: NaiveDate::from_ymd_opt(2026, 3, 31),
            subtotal: 1_000_000.0,
            tax_amount: 190_000.0,
            withholding_amount: 25_000.0,
            description: None,
        }
    }

    fn pdf() -> Upload {
        Upload {
            content_type: Some("application/pdf".into()),
            bytes: test_pdf_bytes(),
        }
    }

    #[tokio::test]
    async fn create_computes_total() {
        let f = fixture(InMemoryInvoiceRepository::new());
        let invoice = f.svc.create(input(&f, "FE-1")).await.unwrap();
        assert_eq!(invoice.total_amount, 1_165_000.0);
        assert_eq!(invoice.status, InvoiceStatus::Pending);
    }

    #[tokio::test]
    async fn number_unique_per_vendor() {
        let f = fixture(InMemoryInvoiceRepository::new());
        f.svc.create(input(&f, "FE-1")).await.unwrap();
        let err = f.svc.create(input(&f, "FE-1")).await.unwrap_err();
        assert_eq!(err.status(), StatusCode::UNPROCESSABLE_ENTITY);
    }

    #[tokio::test]
    async fn rejects_unknown_references_and_bad_dates() {
        let f = fixture(InMemoryInvoiceRepository::new());
        let mut bad = input(&f, "FE-2");
        bad.vendor_id = VendorId::new();
        bad.due_date = NaiveDate::from_ymd_opt(2026, 2, 1);
        match f.svc.create(bad).await.unwrap_err() {
            AppError::Domain(DomainError::Validation(errors)) => {
                assert!(errors.has("vendor_id"));
                assert!(errors.has("due_date"));
            }
            other => panic!("unexpected error: {:?}", other),
        }
    }

    #[tokio::test]
    async fn update_recomputes_total() {
        let f = fixture(InMemoryInvoiceRepository::new());
        let invoice = f.svc.create(input(&f, "FE-3")).await.unwrap();
        let mut changed = input(&f, "FE-3");
        changed.tax_amount = 0.0;
        let updated = f.svc.update(&invoice.id, changed).await.unwrap();
        assert_eq!(updated.total_amount, 975_000.0);
    }

    #[tokio::test]
    async fn pay_and_cancel_rules() {
        let f = fixture(InMemoryInvoiceRepository::new());
        let a = f.svc.create(input(&f, "FE-4")).await.unwrap();
        let paid = f.svc.pay(&a.id, PayInput::default()).await.unwrap();
        assert_eq!(paid.status, InvoiceStatus::Paid);
        assert!(paid.paid_at.is_some());
        let err = f.svc.cancel(&a.id).await.unwrap_err();
        assert_eq!(err.status(), StatusCode::BAD_REQUEST);

        let b = f.svc.create(input(&f, "FE-5")).await.unwrap();
        f.svc.cancel(&b.id).await.unwrap();
        let err = f.svc.pay(&b.id, PayInput::default()).await.unwrap_err();
        assert_eq!(err.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn documents_are_stored_and_removed_with_invoice() {
        let f = fixture(InMemoryInvoiceRepository::new());
        let invoice = f.svc.create(input(&f, "FE-6")).await.unwrap();

        let with_file = f
            .svc
            .upload_document(&invoice.id, InvoiceDocument::Invoice, pdf())
            .await
            .unwrap();
        assert!(with_file
            .invoice_file_path
            .as_deref()
            .unwrap()
            .starts_with("invoices/files/"));
        f.svc
            .upload_document(&invoice.id, InvoiceDocument::PaymentSupport, pdf())
            .await
            .unwrap();
        assert_eq!(f.storage.len(), 2);

        let bytes = f
            .svc
            .download_document(&invoice.id, InvoiceDocument::PaymentSupport)
            .await
            .unwrap();
        assert_eq!(bytes, test_pdf_bytes());

        f.svc.delete(&invoice.id).await.unwrap();
        assert_eq!(f.storage.len(), 0);
    }

    #[tokio::test]
    async fn replacing_document_survives_failed_old_file_delete() {
        let f = fixture(InMemoryInvoiceRepository::new());
        let invoice = f.svc.create(input(&f, "FE-8")).await.unwrap();

        let first = f
            .svc
            .upload_document(&invoice.id, InvoiceDocument::Invoice, pdf())
            .await
            .unwrap();
        let old_path = first.invoice_file_path.unwrap();

        f.storage.fail_deletes();
        let second = f
            .svc
            .upload_document(&invoice.id, InvoiceDocument::Invoice, pdf())
            .await
            .unwrap();
        let new_path = second.invoice_file_path.unwrap();
        assert_ne!(new_path, old_path);

        let stored = f.svc.get(&invoice.id).await.unwrap();
        assert_eq!(stored.invoice_file_path.as_deref(), Some(new_path.as_str()));
        assert!(f.storage.contains(&new_path));
        assert!(f.storage.contains(&old_path));
        assert_eq!(f.storage.len(), 2);
    }

    #[tokio::test]
    async fn non_pdf_upload_is_rejected() {
        let f = fixture(InMemoryInvoiceRepository::new());
        let invoice = f.svc.create(input(&f, "FE-7")).await.unwrap();
        let upload = Upload {
            content_type: Some("text/plain".into()),
            bytes: b"hello".to_vec(),
        };
        let err = f
            .svc
            .upload_document(&invoice.id, InvoiceDocument::Invoice, upload)
            .await
            .unwrap_err();
        assert_eq!(err.status(), StatusCode::UNPROCESSABLE_ENTITY);

        let err = f
            .svc
            .download_document(&invoice.id, InvoiceDocument::Invoice)
            .await
            .unwrap_err();
        assert_eq!(err.status(), StatusCode::NOT_FOUND);
    }
}
