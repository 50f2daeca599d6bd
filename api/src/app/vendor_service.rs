//! Providers and suppliers

use std::sync::Arc;

use serde::Deserialize;

use crate::domain::entities::{NewVendor, Vendor, VendorFilter, VendorId, VendorKind};
use crate::domain::ports::{InvoiceRepository, VendorRepository};
use crate::domain::validation::FieldErrors;
use crate::error::{AppError, DomainError};

#[derive(Debug, Clone, Deserialize)]
pub struct VendorInput {
    pub name: String,
    pub nit: String,
    pub contact_name: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub address: Option<String>,
    pub bank_account: Option<String>,
}

pub struct VendorService<VR, IR>
where
    VR: VendorRepository,
    IR: InvoiceRepository,
{
    vendors: Arc<VR>,
    invoices: Arc<IR>,
}

impl<VR, IR> VendorService<VR, IR>
where
    VR: VendorRepository,
    IR: InvoiceRepository,
{
    pub fn new(vendors: Arc<VR>, invoices: Arc<IR>) -> Self {
        Self { vendors, invoices }
    }

    pub async fn list(&self, kind: VendorKind, filter: &VendorFilter) -> Result<Vec<Vendor>, AppError> {
        Ok(self.vendors.list(kind, filter).await?)
    }

    /// Find a vendor of the given kind; other kinds are reported as missing
    pub async fn get(&self, kind: VendorKind, id: &VendorId) -> Result<Vendor, AppError> {
        self.vendors
            .find_by_id(id)
            .await?
            .filter(|v| v.kind == kind)
            .ok_or_else(|| DomainError::NotFound(format!("{} {} not found", kind.label(), id)).into())
    }

    async fn validate(
        &self,
        kind: VendorKind,
        input: &VendorInput,
        existing: Option<&VendorId>,
    ) -> Result<(), AppError> {
        let mut errors = FieldErrors::new();
        errors.required("name", &input.name);
        errors.max_len("name", &input.name, 255);
        errors.required("nit", &input.nit);
        errors.max_len("nit", &input.nit, 50);
        errors.optional_email("email", input.email.as_deref());

        if !input.nit.trim().is_empty() {
            if let Some(other) = self.vendors.find_by_nit(kind, input.nit.trim()).await? {
                if existing != Some(&other.id) {
                    errors.taken("nit");
                }
            }
        }

        Ok(errors.into_result()?)
    }

    pub async fn create(&self, kind: VendorKind, input: VendorInput) -> Result<Vendor, AppError> {
        self.validate(kind, &input, None).await?;

        let vendor = self
            .vendors
            .create(&NewVendor {
                kind,
                name: input.name.trim().to_string(),
                nit: input.nit.trim().to_string(),
                contact_name: input.contact_name,
                email: input.email,
                phone: input.phone,
                address: input.address,
                bank_account: input.bank_account,
            })
            .await?;

        tracing::info!(vendor_id = %vendor.id, kind = %kind, "Vendor created");
        Ok(vendor)
    }

    pub async fn update(
        &self,
        kind: VendorKind,
        id: &VendorId,
        input: VendorInput,
    ) -> Result<Vendor, AppError> {
        let mut vendor = self.get(kind, id).await?;
        self.validate(kind, &input, Some(id)).await?;

        vendor.name = input.name.trim().to_string();
        vendor.nit = input.nit.trim().to_string();
        vendor.contact_name = input.contact_name;
        vendor.email = input.email;
        vendor.phone = input.phone;
        vendor.address = input.address;
        vendor.bank_account = input.bank_account;

        Ok(self.vendors.update(&vendor).await?)
    }

    pub async fn toggle_active(&self, kind: VendorKind, id: &VendorId) -> Result<Vendor, AppError> {
        let mut vendor = self.get(kind, id).await?;
        vendor.is_active = !vendor.is_active;
        Ok(self.vendors.update(&vendor).await?)
    }

    /// Vendors with invoices cannot be deleted
    pub async fn delete(&self, kind: VendorKind, id: &VendorId) -> Result<(), AppError> {
        let vendor = self.get(kind, id).await?;

        let invoices = self.invoices.count_by_vendor(id).await?;
        if invoices > 0 {
            return Err(DomainError::HasDependents(format!(
                "{} '{}' has {} invoice(s) and cannot be deleted.",
                kind.label(),
                vendor.name,
                invoices
            ))
            .into());
        }

        self.vendors.delete(id).await?;
        tracing::info!(vendor_id = %id, "Vendor deleted");
        Ok(())
    }
}
