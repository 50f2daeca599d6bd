//! Client management

use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::domain::entities::{Client, ClientFilter, ClientId, ClientType, NewClient};
use crate::domain::ports::{ClientRepository, QuotationRepository};
use crate::domain::validation::FieldErrors;
use crate::error::{AppError, DomainError};

#[derive(Debug, Clone, Deserialize)]
pub struct ClientInput {
    pub client_type: ClientType,
    pub name: String,
    pub nic: String,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub department: Option<String>,
    pub city: Option<String>,
    pub address: Option<String>,
    pub monthly_consumption_kwh: Option<f64>,
    pub energy_rate: Option<f64>,
    pub network_type: Option<String>,
}

/// Client with derived figures for the detail view
#[derive(Debug, Serialize)]
pub struct ClientDetails {
    #[serde(flatten)]
    pub client: Client,
    pub quotations_count: u64,
    pub estimated_monthly_bill: Option<f64>,
}

pub struct ClientService<CR, QR>
where
    CR: ClientRepository,
    QR: QuotationRepository,
{
    clients: Arc<CR>,
    quotations: Arc<QR>,
}

impl<CR, QR> ClientService<CR, QR>
where
    CR: ClientRepository,
    QR: QuotationRepository,
{
    pub fn new(clients: Arc<CR>, quotations: Arc<QR>) -> Self {
        Self {
            clients,
            quotations,
        }
    }

    pub async fn list(&self, filter: &ClientFilter) -> Result<Vec<Client>, AppError> {
        Ok(self.clients.list(filter).await?)
    }

    pub async fn get(&self, id: &ClientId) -> Result<Client, AppError> {
        self.clients
            .find_by_id(id)
            .await?
            .ok_or_else(|| DomainError::NotFound(format!("Client {} not found", id)).into())
    }

    pub async fn show(&self, id: &ClientId) -> Result<ClientDetails, AppError> {
        let client = self.get(id).await?;
        let quotations_count = self.quotations.count_by_client(id).await?;

        Ok(ClientDetails {
            estimated_monthly_bill: client.estimated_monthly_bill(),
            client,
            quotations_count,
        })
    }

    /// Field checks plus the `nic` uniqueness rule
    async fn validate(&self, input: &ClientInput, existing: Option<&ClientId>) -> Result<(), AppError> {
        let mut errors = FieldErrors::new();

        errors.required("name", &input.name);
        errors.max_len("name", &input.name, 255);
        errors.required("nic", &input.nic);
        errors.max_len("nic", &input.nic, 50);
        errors.optional_email("email", input.email.as_deref());
        if let Some(kwh) = input.monthly_consumption_kwh {
            errors.non_negative("monthly_consumption_kwh", kwh);
        }
        if let Some(rate) = input.energy_rate {
            errors.non_negative("energy_rate", rate);
        }

        if !input.nic.trim().is_empty() {
            if let Some(other) = self.clients.find_by_nic(input.nic.trim()).await? {
                if existing != Some(&other.id) {
                    errors.taken("nic");
                }
            }
        }

        Ok(errors.into_result()?)
    }

    pub async fn create(&self, input: ClientInput) -> Result<Client, AppError> {
        self.validate(&input, None).await?;

        let client = self
            .clients
            .create(&NewClient {
                client_type: input.client_type,
                name: input.name.trim().to_string(),
                nic: input.nic.trim().to_string(),
                email: input.email,
                phone: input.phone,
                department: input.department,
                city: input.city,
                address: input.address,
                monthly_consumption_kwh: input.monthly_consumption_kwh,
                energy_rate: input.energy_rate,
                network_type: input.network_type,
            })
            .await?;

        tracing::info!(client_id = %client.id, "Client created");
        Ok(client)
    }

    pub async fn update(&self, id: &ClientId, input: ClientInput) -> Result<Client, AppError> {
        let mut client = self.get(id).await?;
        self.validate(&input, Some(id)).await?;

        client.client_type = input.client_type;
        client.name = input.name.trim().to_string();
        client.nic = input.nic.trim().to_string();
        client.email = input.email;
        client.phone = input.phone;
        client.department = input.department;
        client.city = input.city;
        client.address = input.address;
        client.monthly_consumption_kwh = input.monthly_consumption_kwh;
        client.energy_rate = input.energy_rate;
        client.network_type = input.network_type;

        Ok(self.clients.update(&client).await?)
    }

    pub async fn toggle_active(&self, id: &ClientId) -> Result<Client, AppError> {
        let mut client = self.get(id).await?;
        client.is_active = !client.is_active;
        Ok(self.clients.update(&client).await?)
    }

    /// Delete a client; the schema cascades to its quotations
    pub async fn delete(&self, id: &ClientId) -> Result<(), AppError> {
        self.clients.delete(id).await?;
        tracing::info!(client_id = %id, "Client deleted");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::*;
    use axum::http::StatusCode;

    fn service(clients: InMemoryClientRepository) -> ClientService<InMemoryClientRepository, InMemoryQuotationRepository> {
        ClientService::new(Arc::new(clients), Arc::new(InMemoryQuotationRepository::new()))
    }

    fn input(nic: &str) -> ClientInput {
        ClientInput {
            client_type: ClientType::Legal,
            name: "Finca La Esperanza".into(),
            nic: nic.into(),
            email: Some("contacto@esperanza.co".into()),
            phone: None,
            department: Some("Cundinamarca".into()),
            city: Some("Fusagasugá".into()),
            address: None,
            monthly_consumption_kwh: Some(1_200.0),
            energy_rate: Some(780.0),
            network_type: Some("triphasic".into()),
        }
    }

    #[tokio::test]
    async fn create_and_show() {
        let svc = service(InMemoryClientRepository::new());
        let client = svc.create(input("900123456")).await.unwrap();

        let details = svc.show(&client.id).await.unwrap();
        assert_eq!(details.client.nic, "900123456");
        assert_eq!(details.quotations_count, 0);
        assert_eq!(details.estimated_monthly_bill, Some(936_000.0));
    }

    #[tokio::test]
    async fn duplicate_nic_is_422_not_500() {
        let svc = service(InMemoryClientRepository::new().with_client(test_client("900123456")));

        let err = svc.create(input("900123456")).await.unwrap_err();
        assert_eq!(err.status(), StatusCode::UNPROCESSABLE_ENTITY);
        match err {
            AppError::Domain(DomainError::Validation(fields)) => assert!(fields.has("nic")),
            other => panic!("unexpected error: {:?}", other),
        }
    }

    #[tokio::test]
    async fn update_may_keep_own_nic() {
        let existing = test_client("900123456");
        let svc = service(InMemoryClientRepository::new().with_client(existing.clone()));

        let mut change = input("900123456");
        change.name = "Renamed".into();
        let updated = svc.update(&existing.id, change).await.unwrap();
        assert_eq!(updated.name, "Renamed");
    }

    #[tokio::test]
    async fn invalid_fields_are_reported() {
        let svc = service(InMemoryClientRepository::new());
        let mut bad = input("");
        bad.email = Some("nope".into());
        bad.energy_rate = Some(-1.0);

        match svc.create(bad).await.unwrap_err() {
            AppError::Domain(DomainError::Validation(fields)) => {
                assert!(fields.has("nic"));
                assert!(fields.has("email"));
                assert!(fields.has("energy_rate"));
            }
            other => panic!("unexpected error: {:?}", other),
        }
    }

    #[tokio::test]
    async fn toggle_and_delete() {
        let existing = test_client("1010");
        let svc = service(InMemoryClientRepository::new().with_client(existing.clone()));

        assert!(!svc.toggle_active(&existing.id).await.unwrap().is_active);
        svc.delete(&existing.id).await.unwrap();
        assert_eq!(svc.get(&existing.id).await.unwrap_err().status(), StatusCode::NOT_FOUND);
    }
}
