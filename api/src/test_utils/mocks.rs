//! Mock implementations of port traits
//!
//! These are in-memory implementations that can be configured for testing.
//! They store data in memory and allow tests to verify behavior.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, RwLock};

use super::fixtures::builtin_role_id;
use crate::domain::entities::{
    AuthToken, Client, ClientFilter, ClientId, CostCenter, CostCenterId, Invoice, InvoiceFilter,
    InvoiceId, InvoiceStatus, NewClient, NewCostCenter, NewInvoice, NewPaymentMethod, NewProduct,
    NewProject, NewQuotation, NewRole, NewUser, NewVendor, PaymentMethod, PaymentMethodId, Product,
    ProductFilter, ProductId, ProductKind, Project, ProjectFilter, ProjectId, ProjectStateChange,
    ProjectStateSummary, Quotation, QuotationDetails, QuotationFilter, QuotationId,
    QuotationStatus, QuotationStatusSummary, Role, RoleId, User, UserId, Vendor, VendorFilter,
    VendorId, VendorKind,
};
use crate::domain::ports::{
    AccountingClient, AccountingPage, AccountingResource, AuthTokenRepository, ClientRepository,
    CostCenterRepository, FileStorage, InvoiceRepository, PaymentMethodRepository,
    ProductRepository, ProjectRepository, QuotationRepository, RoleRepository, UserRepository,
    VendorRepository,
};
use crate::error::{DomainError, SiigoError, StorageError};

fn not_found(what: impl std::fmt::Display) -> DomainError {
    DomainError::NotFound(what.to_string())
}

/// Newest first, like the Postgres listings
fn newest_first<T>(items: &mut [T], created_at: impl Fn(&T) -> DateTime<Utc>) {
    items.sort_by_key(|i| std::cmp::Reverse(created_at(i)));
}

// ============================================================================
// In-Memory User Repository
// ============================================================================

#[derive(Default)]
pub struct InMemoryUserRepository {
    users: Arc<RwLock<HashMap<UserId, User>>>,
}

impl InMemoryUserRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Pre-populate with a user for testing
    pub fn with_user(self, user: User) -> Self {
        self.users.write().unwrap().insert(user.id, user);
        self
    }
}

#[async_trait]
impl UserRepository for InMemoryUserRepository {
    async fn find_by_id(&self, id: &UserId) -> Result<Option<User>, DomainError> {
        Ok(self.users.read().unwrap().get(id).cloned())
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<User>, DomainError> {
        let users = self.users.read().unwrap();
        Ok(users
            .values()
            .find(|u| u.email.eq_ignore_ascii_case(email))
            .cloned())
    }

    async fn list(&self) -> Result<Vec<User>, DomainError> {
        let mut users: Vec<User> = self.users.read().unwrap().values().cloned().collect();
        users.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(users)
    }

    async fn create(&self, user: &NewUser) -> Result<User, DomainError> {
        let now = Utc::now();
        let created = User {
            id: UserId::new(),
            name: user.name.clone(),
            email: user.email.to_lowercase(),
            password_hash: user.password_hash.clone(),
            role_id: user.role_id,
            is_active: user.is_active,
            created_at: now,
            updated_at: now,
        };
        self.users.write().unwrap().insert(created.id, created.clone());
        Ok(created)
    }

    async fn update(&self, user: &User) -> Result<User, DomainError> {
        let mut users = self.users.write().unwrap();
        if !users.contains_key(&user.id) {
            return Err(not_found(format!("User {}", user.id)));
        }
        let mut updated = user.clone();
        updated.email = updated.email.to_lowercase();
        updated.updated_at = Utc::now();
        users.insert(updated.id, updated.clone());
        Ok(updated)
    }

    async fn delete(&self, id: &UserId) -> Result<(), DomainError> {
        self.users
            .write()
            .unwrap()
            .remove(id)
            .map(|_| ())
            .ok_or_else(|| not_found(format!("User {}", id)))
    }

    async fn count_by_role(&self, role_id: &RoleId) -> Result<u64, DomainError> {
        let users = self.users.read().unwrap();
        Ok(users.values().filter(|u| u.role_id == *role_id).count() as u64)
    }
}

// ============================================================================
// In-Memory Role Repository
// ============================================================================

#[derive(Default)]
pub struct InMemoryRoleRepository {
    roles: Arc<RwLock<HashMap<RoleId, Role>>>,
}

impl InMemoryRoleRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// The four roles seeded by the schema, with the same ids
    pub fn with_builtin_roles() -> Self {
        let repo = Self::new();
        {
            let mut roles = repo.roles.write().unwrap();
            for name in [Role::ADMIN, Role::COMMERCIAL, Role::TECHNICAL, Role::ACCOUNTING] {
                let id = builtin_role_id(name);
                roles.insert(
                    id,
                    Role {
                        id,
                        name: name.to_string(),
                        description: None,
                        created_at: Utc::now(),
                    },
                );
            }
        }
        repo
    }
}

#[async_trait]
impl RoleRepository for InMemoryRoleRepository {
    async fn find_by_id(&self, id: &RoleId) -> Result<Option<Role>, DomainError> {
        Ok(self.roles.read().unwrap().get(id).cloned())
    }

    async fn find_by_name(&self, name: &str) -> Result<Option<Role>, DomainError> {
        let roles = self.roles.read().unwrap();
        Ok(roles
            .values()
            .find(|r| r.name.eq_ignore_ascii_case(name))
            .cloned())
    }

    async fn list(&self) -> Result<Vec<Role>, DomainError> {
        let mut roles: Vec<Role> = self.roles.read().unwrap().values().cloned().collect();
        roles.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(roles)
    }

    async fn create(&self, role: &NewRole) -> Result<Role, DomainError> {
        let created = Role {
            id: RoleId::new(),
            name: role.name.clone(),
            description: role.description.clone(),
            created_at: Utc::now(),
        };
        self.roles.write().unwrap().insert(created.id, created.clone());
        Ok(created)
    }

    async fn update(&self, role: &Role) -> Result<Role, DomainError> {
        let mut roles = self.roles.write().unwrap();
        if !roles.contains_key(&role.id) {
            return Err(not_found(format!("Role {}", role.id)));
        }
        roles.insert(role.id, role.clone());
        Ok(role.clone())
    }

    async fn delete(&self, id: &RoleId) -> Result<(), DomainError> {
        self.roles
            .write()
            .unwrap()
            .remove(id)
            .map(|_| ())
            .ok_or_else(|| not_found(format!("Role {}", id)))
    }
}

// ============================================================================
// In-Memory Auth Token Repository
// ============================================================================

#[derive(Default)]
pub struct InMemoryAuthTokenRepository {
    tokens: Arc<RwLock<HashMap<String, AuthToken>>>,
}

impl InMemoryAuthTokenRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored (unrevoked) tokens
    pub fn len(&self) -> usize {
        self.tokens.read().unwrap().len()
    }
}

#[async_trait]
impl AuthTokenRepository for InMemoryAuthTokenRepository {
    async fn create(&self, token: &AuthToken) -> Result<(), DomainError> {
        self.tokens
            .write()
            .unwrap()
            .insert(token.token_hash.clone(), token.clone());
        Ok(())
    }

    async fn find_valid(
        &self,
        token_hash: &str,
        now: DateTime<Utc>,
    ) -> Result<Option<AuthToken>, DomainError> {
        let tokens = self.tokens.read().unwrap();
        Ok(tokens
            .get(token_hash)
            .filter(|t| !t.is_expired(now))
            .cloned())
    }

    async fn revoke(&self, token_hash: &str) -> Result<(), DomainError> {
        self.tokens.write().unwrap().remove(token_hash);
        Ok(())
    }

    async fn revoke_all_for_user(&self, user_id: &UserId) -> Result<(), DomainError> {
        self.tokens
            .write()
            .unwrap()
            .retain(|_, t| t.user_id != *user_id);
        Ok(())
    }
}

// ============================================================================
// In-Memory Client Repository
// ============================================================================

#[derive(Default)]
pub struct InMemoryClientRepository {
    clients: Arc<RwLock<HashMap<ClientId, Client>>>,
}

impl InMemoryClientRepository {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_client(self, client: Client) -> Self {
        self.clients.write().unwrap().insert(client.id, client);
        self
    }
}

#[async_trait]
impl ClientRepository for InMemoryClientRepository {
    async fn find_by_id(&self, id: &ClientId) -> Result<Option<Client>, DomainError> {
        Ok(self.clients.read().unwrap().get(id).cloned())
    }

    async fn find_by_nic(&self, nic: &str) -> Result<Option<Client>, DomainError> {
        let clients = self.clients.read().unwrap();
        Ok(clients.values().find(|c| c.nic == nic).cloned())
    }

    async fn list(&self, filter: &ClientFilter) -> Result<Vec<Client>, DomainError> {
        let mut clients: Vec<Client> = self
            .clients
            .read()
            .unwrap()
            .values()
            .filter(|c| filter.matches(c))
            .cloned()
            .collect();
        newest_first(&mut clients, |c| c.created_at);
        Ok(clients
            .into_iter()
            .skip(filter.page.offset as usize)
            .take(filter.page.limit as usize)
            .collect())
    }

    async fn count(&self) -> Result<u64, DomainError> {
        Ok(self.clients.read().unwrap().len() as u64)
    }

    async fn create(&self, client: &NewClient) -> Result<Client, DomainError> {
        let now = Utc::now();
        let created = Client {
            id: ClientId::new(),
            client_type: client.client_type,
            name: client.name.clone(),
            nic: client.nic.clone(),
            email: client.email.clone(),
            phone: client.phone.clone(),
            department: client.department.clone(),
            city: client.city.clone(),
            address: client.address.clone(),
            monthly_consumption_kwh: client.monthly_consumption_kwh,
            energy_rate: client.energy_rate,
            network_type: client.network_type.clone(),
            is_active: true,
            created_at: now,
            updated_at: now,
        };
        self.clients
            .write()
            .unwrap()
            .insert(created.id, created.clone());
        Ok(created)
    }

    async fn update(&self, client: &Client) -> Result<Client, DomainError> {
        let mut clients = self.clients.write().unwrap();
        if !clients.contains_key(&client.id) {
            return Err(not_found(format!("Client {}", client.id)));
        }
        let mut updated = client.clone();
        updated.updated_at = Utc::now();
        clients.insert(updated.id, updated.clone());
        Ok(updated)
    }

    async fn delete(&self, id: &ClientId) -> Result<(), DomainError> {
        self.clients
            .write()
            .unwrap()
            .remove(id)
            .map(|_| ())
            .ok_or_else(|| not_found(format!("Client {}", id)))
    }
}

// ============================================================================
// In-Memory Product Repository
// ============================================================================

#[derive(Default)]
pub struct InMemoryProductRepository {
    products: Arc<RwLock<HashMap<ProductId, Product>>>,
}

impl InMemoryProductRepository {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_product(self, product: Product) -> Self {
        self.products.write().unwrap().insert(product.id, product);
        self
    }
}

#[async_trait]
impl ProductRepository for InMemoryProductRepository {
    async fn find_by_id(&self, id: &ProductId) -> Result<Option<Product>, DomainError> {
        Ok(self.products.read().unwrap().get(id).cloned())
    }

    async fn find_by_brand_model(
        &self,
        kind: ProductKind,
        brand: &str,
        model: &str,
    ) -> Result<Option<Product>, DomainError> {
        let products = self.products.read().unwrap();
        Ok(products
            .values()
            .find(|p| p.kind == kind && p.brand == brand && p.model == model)
            .cloned())
    }

    async fn list(
        &self,
        kind: ProductKind,
        filter: &ProductFilter,
    ) -> Result<Vec<Product>, DomainError> {
        let mut products: Vec<Product> = self
            .products
            .read()
            .unwrap()
            .values()
            .filter(|p| p.kind == kind && filter.matches(p))
            .cloned()
            .collect();
        products.sort_by(|a, b| (&a.brand, &a.model).cmp(&(&b.brand, &b.model)));
        Ok(products
            .into_iter()
            .skip(filter.page.offset as usize)
            .take(filter.page.limit as usize)
            .collect())
    }

    async fn create(&self, product: &NewProduct) -> Result<Product, DomainError> {
        let now = Utc::now();
        let created = Product {
            id: ProductId::new(),
            kind: product.kind(),
            brand: product.brand.clone(),
            model: product.model.clone(),
            price: product.price,
            specs: product.specs.clone(),
            technical_sheet_path: None,
            is_active: true,
            created_at: now,
            updated_at: now,
        };
        self.products
            .write()
            .unwrap()
            .insert(created.id, created.clone());
        Ok(created)
    }

    async fn update(&self, product: &Product) -> Result<Product, DomainError> {
        let mut products = self.products.write().unwrap();
        if !products.contains_key(&product.id) {
            return Err(not_found(format!("Product {}", product.id)));
        }
        let mut updated = product.clone();
        updated.updated_at = Utc::now();
        products.insert(updated.id, updated.clone());
        Ok(updated)
    }

    async fn delete(&self, id: &ProductId) -> Result<(), DomainError> {
        self.products
            .write()
            .unwrap()
            .remove(id)
            .map(|_| ())
            .ok_or_else(|| not_found(format!("Product {}", id)))
    }
}

// ============================================================================
// In-Memory Quotation Repository
// ============================================================================

#[derive(Default)]
pub struct InMemoryQuotationRepository {
    quotations: Arc<RwLock<HashMap<QuotationId, QuotationDetails>>>,
}

impl InMemoryQuotationRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Pre-populate with a quotation header (no lines)
    pub fn with_quotation(self, quotation: Quotation) -> Self {
        self.quotations.write().unwrap().insert(
            quotation.id,
            QuotationDetails {
                quotation,
                used_products: Vec::new(),
                items: Vec::new(),
            },
        );
        self
    }
}

fn quotation_header(
    id: QuotationId,
    q: &NewQuotation,
    status: QuotationStatus,
    created_at: DateTime<Utc>,
) -> Quotation {
    Quotation {
        id,
        client_id: q.client_id,
        user_id: q.user_id,
        project_name: q.project_name.clone(),
        system_type: q.system_type,
        power_kwp: q.power_kwp,
        panel_count: q.panel_count,
        requires_financing: q.requires_financing,
        percentages: q.percentages,
        totals: q.totals,
        status,
        notes: q.notes.clone(),
        created_at,
        updated_at: Utc::now(),
    }
}

#[async_trait]
impl QuotationRepository for InMemoryQuotationRepository {
    async fn find_by_id(&self, id: &QuotationId) -> Result<Option<Quotation>, DomainError> {
        let quotations = self.quotations.read().unwrap();
        Ok(quotations.get(id).map(|d| d.quotation.clone()))
    }

    async fn find_details(
        &self,
        id: &QuotationId,
    ) -> Result<Option<QuotationDetails>, DomainError> {
        Ok(self.quotations.read().unwrap().get(id).cloned())
    }

    async fn list(&self, filter: &QuotationFilter) -> Result<Vec<Quotation>, DomainError> {
        let mut quotations: Vec<Quotation> = self
            .quotations
            .read()
            .unwrap()
            .values()
            .map(|d| d.quotation.clone())
            .filter(|q| filter.matches(q))
            .collect();
        newest_first(&mut quotations, |q| q.created_at);
        Ok(quotations
            .into_iter()
            .skip(filter.page.offset as usize)
            .take(filter.page.limit as usize)
            .collect())
    }

    async fn count_by_client(&self, client_id: &ClientId) -> Result<u64, DomainError> {
        let quotations = self.quotations.read().unwrap();
        Ok(quotations
            .values()
            .filter(|d| d.quotation.client_id == *client_id)
            .count() as u64)
    }

    async fn create(&self, quotation: &NewQuotation) -> Result<QuotationDetails, DomainError> {
        let details = QuotationDetails {
            quotation: quotation_header(
                QuotationId::new(),
                quotation,
                QuotationStatus::Pending,
                Utc::now(),
            ),
            used_products: quotation.used_products.clone(),
            items: quotation.items.clone(),
        };
        self.quotations
            .write()
            .unwrap()
            .insert(details.quotation.id, details.clone());
        Ok(details)
    }

    async fn replace(
        &self,
        id: &QuotationId,
        quotation: &NewQuotation,
    ) -> Result<QuotationDetails, DomainError> {
        let mut quotations = self.quotations.write().unwrap();
        let existing = quotations
            .get(id)
            .ok_or_else(|| not_found(format!("Quotation {}", id)))?;
        let details = QuotationDetails {
            quotation: quotation_header(
                *id,
                quotation,
                existing.quotation.status,
                existing.quotation.created_at,
            ),
            used_products: quotation.used_products.clone(),
            items: quotation.items.clone(),
        };
        quotations.insert(*id, details.clone());
        Ok(details)
    }

    async fn update_status(
        &self,
        id: &QuotationId,
        status: QuotationStatus,
    ) -> Result<Quotation, DomainError> {
        let mut quotations = self.quotations.write().unwrap();
        let details = quotations
            .get_mut(id)
            .ok_or_else(|| not_found(format!("Quotation {}", id)))?;
        details.quotation.status = status;
        details.quotation.updated_at = Utc::now();
        Ok(details.quotation.clone())
    }

    async fn delete(&self, id: &QuotationId) -> Result<(), DomainError> {
        self.quotations
            .write()
            .unwrap()
            .remove(id)
            .map(|_| ())
            .ok_or_else(|| not_found(format!("Quotation {}", id)))
    }

    async fn status_summary(&self) -> Result<Vec<QuotationStatusSummary>, DomainError> {
        let quotations = self.quotations.read().unwrap();
        Ok(QuotationStatus::ALL
            .iter()
            .filter_map(|status| {
                let matching: Vec<&Quotation> = quotations
                    .values()
                    .map(|d| &d.quotation)
                    .filter(|q| q.status == *status)
                    .collect();
                if matching.is_empty() {
                    return None;
                }
                Some(QuotationStatusSummary {
                    status: *status,
                    count: matching.len() as i64,
                    total_value: matching.iter().map(|q| q.totals.total_value).sum(),
                })
            })
            .collect())
    }
}

// ============================================================================
// In-Memory Project Repository
// ============================================================================

#[derive(Default)]
pub struct InMemoryProjectRepository {
    projects: Arc<RwLock<HashMap<ProjectId, Project>>>,
    history: Arc<RwLock<Vec<ProjectStateChange>>>,
}

impl InMemoryProjectRepository {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_project(self, project: Project) -> Self {
        self.projects.write().unwrap().insert(project.id, project);
        self
    }
}

#[async_trait]
impl ProjectRepository for InMemoryProjectRepository {
    async fn find_by_id(&self, id: &ProjectId) -> Result<Option<Project>, DomainError> {
        Ok(self.projects.read().unwrap().get(id).cloned())
    }

    async fn find_by_quotation(
        &self,
        quotation_id: &QuotationId,
    ) -> Result<Option<Project>, DomainError> {
        let projects = self.projects.read().unwrap();
        Ok(projects
            .values()
            .find(|p| p.quotation_id == *quotation_id)
            .cloned())
    }

    async fn list(&self, filter: &ProjectFilter) -> Result<Vec<Project>, DomainError> {
        let mut projects: Vec<Project> = self
            .projects
            .read()
            .unwrap()
            .values()
            .filter(|p| filter.matches(p))
            .cloned()
            .collect();
        newest_first(&mut projects, |p| p.created_at);
        Ok(projects
            .into_iter()
            .skip(filter.page.offset as usize)
            .take(filter.page.limit as usize)
            .collect())
    }

    async fn create(
        &self,
        project: &NewProject,
        initial: &ProjectStateChange,
    ) -> Result<Project, DomainError> {
        let now = Utc::now();
        let created = Project {
            id: initial.project_id,
            quotation_id: project.quotation_id,
            client_id: project.client_id,
            name: project.name.clone(),
            state: initial.to_state,
            department: project.department.clone(),
            city: project.city.clone(),
            address: project.address.clone(),
            installed_power_kwp: project.installed_power_kwp,
            budget: project.budget,
            start_date: project.start_date,
            estimated_end_date: project.estimated_end_date,
            actual_end_date: None,
            upme_filing_number: None,
            upme_filing_date: None,
            upme_response_date: None,
            upme_status: None,
            notes: project.notes.clone(),
            created_at: now,
            updated_at: now,
        };
        self.projects
            .write()
            .unwrap()
            .insert(created.id, created.clone());
        self.history.write().unwrap().push(initial.clone());
        Ok(created)
    }

    async fn update(&self, project: &Project) -> Result<Project, DomainError> {
        let mut projects = self.projects.write().unwrap();
        if !projects.contains_key(&project.id) {
            return Err(not_found(format!("Project {}", project.id)));
        }
        let mut updated = project.clone();
        updated.updated_at = Utc::now();
        projects.insert(updated.id, updated.clone());
        Ok(updated)
    }

    async fn change_state(
        &self,
        project: &Project,
        change: &ProjectStateChange,
    ) -> Result<Project, DomainError> {
        let updated = self.update(project).await?;
        self.history.write().unwrap().push(change.clone());
        Ok(updated)
    }

    async fn history(&self, id: &ProjectId) -> Result<Vec<ProjectStateChange>, DomainError> {
        let history = self.history.read().unwrap();
        Ok(history
            .iter()
            .filter(|c| c.project_id == *id)
            .cloned()
            .collect())
    }

    async fn delete(&self, id: &ProjectId) -> Result<(), DomainError> {
        self.projects
            .write()
            .unwrap()
            .remove(id)
            .ok_or_else(|| not_found(format!("Project {}", id)))?;
        self.history.write().unwrap().retain(|c| c.project_id != *id);
        Ok(())
    }

    async fn state_summary(&self) -> Result<Vec<ProjectStateSummary>, DomainError> {
        let projects = self.projects.read().unwrap();
        let mut summary: Vec<ProjectStateSummary> = Vec::new();
        for project in projects.values() {
            match summary.iter_mut().find(|s| s.state == project.state) {
                Some(s) => {
                    s.count += 1;
                    s.installed_power_kwp += project.installed_power_kwp;
                }
                None => summary.push(ProjectStateSummary {
                    state: project.state,
                    count: 1,
                    installed_power_kwp: project.installed_power_kwp,
                }),
            }
        }
        Ok(summary)
    }
}

// ============================================================================
// In-Memory Vendor Repository
// ============================================================================

#[derive(Default)]
pub struct InMemoryVendorRepository {
    vendors: Arc<RwLock<HashMap<VendorId, Vendor>>>,
}

impl InMemoryVendorRepository {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_vendor(self, vendor: Vendor) -> Self {
        self.vendors.write().unwrap().insert(vendor.id, vendor);
        self
    }
}

#[async_trait]
impl VendorRepository for InMemoryVendorRepository {
    async fn find_by_id(&self, id: &VendorId) -> Result<Option<Vendor>, DomainError> {
        Ok(self.vendors.read().unwrap().get(id).cloned())
    }

    async fn find_by_nit(
        &self,
        kind: VendorKind,
        nit: &str,
    ) -> Result<Option<Vendor>, DomainError> {
        let vendors = self.vendors.read().unwrap();
        Ok(vendors
            .values()
            .find(|v| v.kind == kind && v.nit == nit)
            .cloned())
    }

    async fn list(
        &self,
        kind: VendorKind,
        filter: &VendorFilter,
    ) -> Result<Vec<Vendor>, DomainError> {
        let mut vendors: Vec<Vendor> = self
            .vendors
            .read()
            .unwrap()
            .values()
            .filter(|v| v.kind == kind && filter.matches(v))
            .cloned()
            .collect();
        vendors.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(vendors
            .into_iter()
            .skip(filter.page.offset as usize)
            .take(filter.page.limit as usize)
            .collect())
    }

    async fn create(&self, vendor: &NewVendor) -> Result<Vendor, DomainError> {
        let now = Utc::now();
        let created = Vendor {
            id: VendorId::new(),
            kind: vendor.kind,
            name: vendor.name.clone(),
            nit: vendor.nit.clone(),
            contact_name: vendor.contact_name.clone(),
            email: vendor.email.clone(),
            phone: vendor.phone.clone(),
            address: vendor.address.clone(),
            bank_account: vendor.bank_account.clone(),
            is_active: true,
            created_at: now,
            updated_at: now,
        };
        self.vendors
            .write()
            .unwrap()
            .insert(created.id, created.clone());
        Ok(created)
    }

    async fn update(&self, vendor: &Vendor) -> Result<Vendor, DomainError> {
        let mut vendors = self.vendors.write().unwrap();
        if !vendors.contains_key(&vendor.id) {
            return Err(not_found(format!("Vendor {}", vendor.id)));
        }
        let mut updated = vendor.clone();
        updated.updated_at = Utc::now();
        vendors.insert(updated.id, updated.clone());
        Ok(updated)
    }

    async fn delete(&self, id: &VendorId) -> Result<(), DomainError> {
        self.vendors
            .write()
            .unwrap()
            .remove(id)
            .map(|_| ())
            .ok_or_else(|| not_found(format!("Vendor {}", id)))
    }
}

// ============================================================================
// In-Memory Cost Center Repository
// ============================================================================

#[derive(Default)]
pub struct InMemoryCostCenterRepository {
    cost_centers: Arc<RwLock<HashMap<CostCenterId, CostCenter>>>,
}

impl InMemoryCostCenterRepository {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_cost_center(self, cost_center: CostCenter) -> Self {
        self.cost_centers
            .write()
            .unwrap()
            .insert(cost_center.id, cost_center);
        self
    }
}

#[async_trait]
impl CostCenterRepository for InMemoryCostCenterRepository {
    async fn find_by_id(&self, id: &CostCenterId) -> Result<Option<CostCenter>, DomainError> {
        Ok(self.cost_centers.read().unwrap().get(id).cloned())
    }

    async fn find_by_code(&self, code: &str) -> Result<Option<CostCenter>, DomainError> {
        let centers = self.cost_centers.read().unwrap();
        Ok(centers.values().find(|c| c.code == code).cloned())
    }

    async fn list(&self) -> Result<Vec<CostCenter>, DomainError> {
        let mut centers: Vec<CostCenter> =
            self.cost_centers.read().unwrap().values().cloned().collect();
        centers.sort_by(|a, b| a.code.cmp(&b.code));
        Ok(centers)
    }

    async fn create(&self, cost_center: &NewCostCenter) -> Result<CostCenter, DomainError> {
        let now = Utc::now();
        let created = CostCenter {
            id: CostCenterId::new(),
            code: cost_center.code.clone(),
            name: cost_center.name.clone(),
            description: cost_center.description.clone(),
            budget: cost_center.budget,
            is_active: true,
            created_at: now,
            updated_at: now,
        };
        self.cost_centers
            .write()
            .unwrap()
            .insert(created.id, created.clone());
        Ok(created)
    }

    async fn update(&self, cost_center: &CostCenter) -> Result<CostCenter, DomainError> {
        let mut centers = self.cost_centers.write().unwrap();
        if !centers.contains_key(&cost_center.id) {
            return Err(not_found(format!("Cost center {}", cost_center.id)));
        }
        let mut updated = cost_center.clone();
        updated.updated_at = Utc::now();
        centers.insert(updated.id, updated.clone());
        Ok(updated)
    }

    async fn delete(&self, id: &CostCenterId) -> Result<(), DomainError> {
        self.cost_centers
            .write()
            .unwrap()
            .remove(id)
            .map(|_| ())
            .ok_or_else(|| not_found(format!("Cost center {}", id)))
    }
}

// ============================================================================
// In-Memory Payment Method Repository
// ============================================================================

#[derive(Default)]
pub struct InMemoryPaymentMethodRepository {
    methods: Arc<RwLock<HashMap<PaymentMethodId, PaymentMethod>>>,
}

impl InMemoryPaymentMethodRepository {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_payment_method(self, method: PaymentMethod) -> Self {
        self.methods.write().unwrap().insert(method.id, method);
        self
    }
}

#[async_trait]
impl PaymentMethodRepository for InMemoryPaymentMethodRepository {
    async fn find_by_id(
        &self,
        id: &PaymentMethodId,
    ) -> Result<Option<PaymentMethod>, DomainError> {
        Ok(self.methods.read().unwrap().get(id).cloned())
    }

    async fn find_by_name(&self, name: &str) -> Result<Option<PaymentMethod>, DomainError> {
        let methods = self.methods.read().unwrap();
        Ok(methods
            .values()
            .find(|m| m.name.eq_ignore_ascii_case(name))
            .cloned())
    }

    async fn list(&self) -> Result<Vec<PaymentMethod>, DomainError> {
        let mut methods: Vec<PaymentMethod> =
            self.methods.read().unwrap().values().cloned().collect();
        methods.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(methods)
    }

    async fn create(&self, method: &NewPaymentMethod) -> Result<PaymentMethod, DomainError> {
        let created = PaymentMethod {
            id: PaymentMethodId::new(),
            name: method.name.clone(),
            description: method.description.clone(),
            is_active: true,
            created_at: Utc::now(),
        };
        self.methods
            .write()
            .unwrap()
            .insert(created.id, created.clone());
        Ok(created)
    }

    async fn update(&self, method: &PaymentMethod) -> Result<PaymentMethod, DomainError> {
        let mut methods = self.methods.write().unwrap();
        if !methods.contains_key(&method.id) {
            return Err(not_found(format!("Payment method {}", method.id)));
        }
        methods.insert(method.id, method.clone());
        Ok(method.clone())
    }

    async fn delete(&self, id: &PaymentMethodId) -> Result<(), DomainError> {
        self.methods
            .write()
            .unwrap()
            .remove(id)
            .map(|_| ())
            .ok_or_else(|| not_found(format!("Payment method {}", id)))
    }
}

// ============================================================================
// In-Memory Invoice Repository
// ============================================================================

#[derive(Default)]
pub struct InMemoryInvoiceRepository {
    invoices: Arc<RwLock<HashMap<InvoiceId, Invoice>>>,
}

impl InMemoryInvoiceRepository {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_invoice(self, invoice: Invoice) -> Self {
        self.invoices.write().unwrap().insert(invoice.id, invoice);
        self
    }

    fn count_matching(&self, pred: impl Fn(&Invoice) -> bool) -> u64 {
        self.invoices
            .read()
            .unwrap()
            .values()
            .filter(|i| pred(i))
            .count() as u64
    }
}

#[async_trait]
impl InvoiceRepository for InMemoryInvoiceRepository {
    async fn find_by_id(&self, id: &InvoiceId) -> Result<Option<Invoice>, DomainError> {
        Ok(self.invoices.read().unwrap().get(id).cloned())
    }

    async fn find_by_number(
        &self,
        vendor_id: &VendorId,
        invoice_number: &str,
    ) -> Result<Option<Invoice>, DomainError> {
        let invoices = self.invoices.read().unwrap();
        Ok(invoices
            .values()
            .find(|i| i.vendor_id == *vendor_id && i.invoice_number == invoice_number)
            .cloned())
    }

    async fn list(&self, filter: &InvoiceFilter) -> Result<Vec<Invoice>, DomainError> {
        let mut invoices: Vec<Invoice> = self
            .invoices
            .read()
            .unwrap()
            .values()
            .filter(|i| filter.matches(i))
            .cloned()
            .collect();
        invoices.sort_by(|a, b| b.issue_date.cmp(&a.issue_date));
        Ok(match filter.page {
            Some(page) => invoices
                .into_iter()
                .skip(page.offset as usize)
                .take(page.limit as usize)
                .collect(),
            None => invoices,
        })
    }

    async fn create(&self, invoice: &NewInvoice) -> Result<Invoice, DomainError> {
        let now = Utc::now();
        let created = Invoice {
            id: InvoiceId::new(),
            invoice_number: invoice.invoice_number.clone(),
            vendor_id: invoice.vendor_id,
            cost_center_id: invoice.cost_center_id,
            payment_method_id: invoice.payment_method_id,
            project_id: invoice.project_id,
            issue_date: invoice.issue_date,
            due_date: invoice.due_date,
            subtotal: invoice.subtotal,
            tax_amount: invoice.tax_amount,
            withholding_amount: invoice.withholding_amount,
            total_amount: Invoice::compute_total(
                invoice.subtotal,
                invoice.tax_amount,
                invoice.withholding_amount,
            ),
            status: InvoiceStatus::Pending,
            description: invoice.description.clone(),
            invoice_file_path: None,
            payment_support_path: None,
            paid_at: None,
            created_at: now,
            updated_at: now,
        };
        self.invoices
            .write()
            .unwrap()
            .insert(created.id, created.clone());
        Ok(created)
    }

    async fn update(&self, invoice: &Invoice) -> Result<Invoice, DomainError> {
        let mut invoices = self.invoices.write().unwrap();
        if !invoices.contains_key(&invoice.id) {
            return Err(not_found(format!("Invoice {}", invoice.id)));
        }
        let mut updated = invoice.clone();
        updated.updated_at = Utc::now();
        invoices.insert(updated.id, updated.clone());
        Ok(updated)
    }

    async fn delete(&self, id: &InvoiceId) -> Result<(), DomainError> {
        self.invoices
            .write()
            .unwrap()
            .remove(id)
            .map(|_| ())
            .ok_or_else(|| not_found(format!("Invoice {}", id)))
    }

    async fn count_by_vendor(&self, vendor_id: &VendorId) -> Result<u64, DomainError> {
        Ok(self.count_matching(|i| i.vendor_id == *vendor_id))
    }

    async fn count_by_cost_center(
        &self,
        cost_center_id: &CostCenterId,
    ) -> Result<u64, DomainError> {
        Ok(self.count_matching(|i| i.cost_center_id == *cost_center_id))
    }

    async fn count_by_payment_method(
        &self,
        payment_method_id: &PaymentMethodId,
    ) -> Result<u64, DomainError> {
        Ok(self.count_matching(|i| i.payment_method_id == Some(*payment_method_id)))
    }
}

// ============================================================================
// In-Memory File Storage
// ============================================================================

#[derive(Default)]
pub struct InMemoryStorage {
    files: Arc<RwLock<HashMap<String, Vec<u8>>>>,
    fail_deletes: AtomicBool,
}

impl InMemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make every later `delete` fail with an IO error
    pub fn fail_deletes(&self) {
        self.fail_deletes.store(true, Ordering::SeqCst);
    }

    pub fn contains(&self, path: &str) -> bool {
        self.files.read().unwrap().contains_key(path)
    }

    /// Number of stored files
    pub fn len(&self) -> usize {
        self.files.read().unwrap().len()
    }
}

#[async_trait]
impl FileStorage for InMemoryStorage {
    async fn put(&self, dir: &str, name: &str, bytes: &[u8]) -> Result<String, StorageError> {
        let path = format!("{}/{}", dir.trim_end_matches('/'), name);
        self.files
            .write()
            .unwrap()
            .insert(path.clone(), bytes.to_vec());
        Ok(path)
    }

    async fn get(&self, path: &str) -> Result<Vec<u8>, StorageError> {
        self.files
            .read()
            .unwrap()
            .get(path)
            .cloned()
            .ok_or_else(|| StorageError::NotFound(path.to_string()))
    }

    async fn delete(&self, path: &str) -> Result<(), StorageError> {
        if self.fail_deletes.load(Ordering::SeqCst) {
            return Err(StorageError::Io(std::io::Error::new(
                std::io::ErrorKind::Other,
                "disk busy",
            )));
        }
        self.files.write().unwrap().remove(path);
        Ok(())
    }
}

// ============================================================================
// Stub Accounting Client
// ============================================================================

/// Answers every listing with a fixed payload and counts calls
pub struct StubAccountingClient {
    response: serde_json::Value,
    calls: AtomicUsize,
}

impl StubAccountingClient {
    pub fn new(response: serde_json::Value) -> Self {
        Self {
            response,
            calls: AtomicUsize::new(0),
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl AccountingClient for StubAccountingClient {
    async fn list(
        &self,
        resource: AccountingResource,
        page: AccountingPage,
    ) -> Result<serde_json::Value, SiigoError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(serde_json::json!({
            "resource": resource.path(),
            "page": page.page,
            "page_size": page.page_size,
            "results": self.response.clone(),
        }))
    }

    async fn refresh_token(&self) -> Result<(), SiigoError> {
        Ok(())
    }
}
