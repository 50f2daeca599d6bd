//! Cost centers and payment methods

use std::sync::Arc;

use serde::Deserialize;

use crate::domain::entities::{
    CostCenter, CostCenterId, NewCostCenter, NewPaymentMethod, PaymentMethod, PaymentMethodId,
};
use crate::domain::ports::{CostCenterRepository, InvoiceRepository, PaymentMethodRepository};
use crate::domain::validation::FieldErrors;
use crate::error::{AppError, DomainError};

#[derive(Debug, Clone, Deserialize)]
pub struct CostCenterInput {
    pub code: String,
    pub name: String,
    pub description: Option<String>,
    #[serde(default)]
    pub budget: f64,
    pub is_active: Option<bool>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct PaymentMethodInput {
    pub name: String,
    pub description: Option<String>,
    pub is_active: Option<bool>,
}

pub struct CostCenterService<CC, PM, IR>
where
    CC: CostCenterRepository,
    PM: PaymentMethodRepository,
    IR: InvoiceRepository,
{
    cost_centers: Arc<CC>,
    payment_methods: Arc<PM>,
    invoices: Arc<IR>,
}

impl<CC, PM, IR> CostCenterService<CC, PM, IR>
where
    CC: CostCenterRepository,
    PM: PaymentMethodRepository,
    IR: InvoiceRepository,
{
    pub fn new(cost_centers: Arc<CC>, payment_methods: Arc<PM>, invoices: Arc<IR>) -> Self {
        Self {
            cost_centers,
            payment_methods,
            invoices,
        }
    }

    pub async fn list_cost_centers(&self) -> Result<Vec<CostCenter>, AppError> {
        Ok(self.cost_centers.list().await?)
    }

    pub async fn get_cost_center(&self, id: &CostCenterId) -> Result<CostCenter, AppError> {
        self.cost_centers
            .find_by_id(id)
            .await?
            .ok_or_else(|| DomainError::NotFound(format!("Cost center {} not found", id)).into())
    }

    async fn validate_cost_center(
        &self,
        input: &CostCenterInput,
        existing: Option<&CostCenterId>,
    ) -> Result<(), AppError> {
        let mut errors = FieldErrors::new();
        errors.required("code", &input.code);
        errors.max_len("code", &input.code, 20);
        errors.required("name", &input.name);
        errors.max_len("name", &input.name, 255);
        errors.non_negative("budget", input.budget);

        if let Some(other) = self.cost_centers.find_by_code(input.code.trim()).await? {
            if existing != Some(&other.id) {
                errors.taken("code");
            }
        }

        Ok(errors.into_result()?)
    }

    pub async fn create_cost_center(&self, input: CostCenterInput) -> Result<CostCenter, AppError> {
        self.validate_cost_center(&input, None).await?;

        let created = self
            .cost_centers
            .create(&NewCostCenter {
                code: input.code.trim().to_string(),
                name: input.name.trim().to_string(),
                description: input.description,
                budget: input.budget,
            })
            .await?;

        if input.is_active == Some(false) {
            let mut inactive = created;
            inactive.is_active = false;
            return Ok(self.cost_centers.update(&inactive).await?);
        }
        Ok(created)
    }

    pub async fn update_cost_center(
        &self,
        id: &CostCenterId,
        input: CostCenterInput,
    ) -> Result<CostCenter, AppError> {
        let mut center = self.get_cost_center(id).await?;
        self.validate_cost_center(&input, Some(id)).await?;

        center.code = input.code.trim().to_string();
        center.name = input.name.trim().to_string();
        center.description = input.description;
        center.budget = input.budget;
        if let Some(active) = input.is_active {
            center.is_active = active;
        }

        Ok(self.cost_centers.update(&center).await?)
    }

    pub async fn delete_cost_center(&self, id: &CostCenterId) -> Result<(), AppError> {
        let center = self.get_cost_center(id).await?;

        let invoices = self.invoices.count_by_cost_center(id).await?;
        if invoices > 0 {
            return Err(DomainError::HasDependents(format!(
                "Cost center '{}' has {} invoice(s) and cannot be deleted.",
                center.code, invoices
            ))
            .into());
        }

        self.cost_centers.delete(id).await?;
        Ok(())
    }

    pub async fn list_payment_methods(&self) -> Result<Vec<PaymentMethod>, AppError> {
        Ok(self.payment_methods.list().await?)
    }

    pub async fn get_payment_method(&self, id: &PaymentMethodId) -> Result<PaymentMethod, AppError> {
        self.payment_methods
            .find_by_id(id)
            .await?
            .ok_or_else(|| DomainError::NotFound(format!("Payment method {} not found", id)).into())
    }

    async fn validate_payment_method(
        &self,
        input: &PaymentMethodInput,
        existing: Option<&PaymentMethodId>,
    ) -> Result<(), AppError> {
        let mut errors = FieldErrors::new();
        errors.required("name", &input.name);
        errors.max_len("name", &input.name, 100);

        if let Some(other) = self.payment_methods.find_by_name(input.name.trim()).await? {
            if existing != Some(&other.id) {
                errors.taken("name");
            }
        }

        Ok(errors.into_result()?)
    }

    pub async fn create_payment_method(
        &self,
        input: PaymentMethodInput,
    ) -> Result<PaymentMethod, AppError> {
        self.validate_payment_method(&input, None).await?;

        let created = self
            .payment_methods
            .create(&NewPaymentMethod {
                name: input.name.trim().to_string(),
                description: input.description,
            })
            .await?;

        if input.is_active == Some(false) {
            let mut inactive = created;
            inactive.is_active = false;
            return Ok(self.payment_methods.update(&inactive).await?);
        }
        Ok(created)
    }

    pub async fn update_payment_method(
        &self,
        id: &PaymentMethodId,
        input: PaymentMethodInput,
    ) -> Result<PaymentMethod, AppError> {
        let mut method = self.get_payment_method(id).await?;
        self.validate_payment_method(&input, Some(id)).await?;

        method.name = input.name.trim().to_string();
        method.description = input.description;
        if let Some(active) = input.is_active {
            method.is_active = active;
        }

        Ok(self.payment_methods.update(&method).await?)
    }

    pub async fn delete_payment_method(&self, id: &PaymentMethodId) -> Result<(), AppError> {
        let method = self.get_payment_method(id).await?;

        let invoices = self.invoices.count_by_payment_method(id).await?;
        if invoices > 0 {
            return Err(DomainError::HasDependents(format!(
                "Payment method '{}' is used by {} invoice(s).",
                method.name, invoices
            ))
            .into());
        }

        self.payment_methods.delete(id).await?;
        Ok(())
    }
}
