//! End-to-end service flows over the in-memory adapters
//!
//! Each test wires several services to the same repositories, the way
//! `main` does with the Postgres adapters, and walks a business flow:
//!
//! 1. Bootstrap admin logs in and the token authenticates
//! 2. Client -> quotation -> approval -> project -> completion
//! 3. Vendor invoices booked against a cost center, paid, reported
//!
//! Run with: cargo test integration_tests

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use axum::http::StatusCode;
    use chrono::NaiveDate;

    use crate::app::{
        hash_password, AuthService, ChangeStateInput, ClientInput, ClientService,
        CostCenterInput, CostCenterService, CreateProjectInput, InvoiceDocument, InvoiceInput,
        InvoiceService, PayInput, ProjectService, QuotationInput, QuotationItemInput,
        QuotationService, ReportService, Upload, UsedProductInput, VendorInput, VendorService,
    };
    use crate::config::SolarWindow;
    use crate::domain::entities::{
        ClientType, InvoiceStatus, Product, ProjectState, QuotationStatus, Role, SystemType, VendorKind,
    };
    use crate::test_utils::*;

    const PEPPER: &str = "integration-pepper";

    /// Every repository shared by the services under test
    struct World {
        panel: Product,
        users: Arc<InMemoryUserRepository>,
        roles: Arc<InMemoryRoleRepository>,
        tokens: Arc<InMemoryAuthTokenRepository>,
        clients: Arc<InMemoryClientRepository>,
        products: Arc<InMemoryProductRepository>,
        quotations: Arc<InMemoryQuotationRepository>,
        projects: Arc<InMemoryProjectRepository>,
        vendors: Arc<InMemoryVendorRepository>,
        cost_centers: Arc<InMemoryCostCenterRepository>,
        payment_methods: Arc<InMemoryPaymentMethodRepository>,
        invoices: Arc<InMemoryInvoiceRepository>,
        storage: Arc<InMemoryStorage>,
    }

    impl World {
        fn new() -> Self {
            let panel = test_panel();
            Self {
                panel: panel.clone(),
                users: Arc::new(InMemoryUserRepository::new()),
                roles: Arc::new(InMemoryRoleRepository::with_builtin_roles()),
                tokens: Arc::new(InMemoryAuthTokenRepository::new()),
                clients: Arc::new(InMemoryClientRepository::new()),
                products: Arc::new(
                    InMemoryProductRepository::new()
                        .with_product(panel)
                        .with_product(test_inverter()),
                ),
                quotations: Arc::new(InMemoryQuotationRepository::new()),
                projects: Arc::new(InMemoryProjectRepository::new()),
                vendors: Arc::new(InMemoryVendorRepository::new()),
                cost_centers: Arc::new(InMemoryCostCenterRepository::new()),
                payment_methods: Arc::new(InMemoryPaymentMethodRepository::new()),
                invoices: Arc::new(InMemoryInvoiceRepository::new()),
                storage: Arc::new(InMemoryStorage::new()),
            }
        }

        fn auth(
            &self,
        ) -> AuthService<InMemoryUserRepository, InMemoryRoleRepository, InMemoryAuthTokenRepository>
        {
            AuthService::new(
                self.users.clone(),
                self.roles.clone(),
                self.tokens.clone(),
                PEPPER.to_string(),
                24,
            )
        }

        fn clients(&self) -> ClientService<InMemoryClientRepository, InMemoryQuotationRepository> {
            ClientService::new(self.clients.clone(), self.quotations.clone())
        }

        fn quotations(
            &self,
        ) -> QuotationService<
            InMemoryQuotationRepository,
            InMemoryClientRepository,
            InMemoryProductRepository,
        > {
            QuotationService::new(
                self.quotations.clone(),
                self.clients.clone(),
                self.products.clone(),
            )
        }

        fn projects(
            &self,
        ) -> ProjectService<
            InMemoryProjectRepository,
            InMemoryQuotationRepository,
            InMemoryClientRepository,
        > {
            ProjectService::new(
                self.projects.clone(),
                self.quotations.clone(),
                self.clients.clone(),
            )
        }

        fn vendors(&self) -> VendorService<InMemoryVendorRepository, InMemoryInvoiceRepository> {
            VendorService::new(self.vendors.clone(), self.invoices.clone())
        }

        fn ledger(
            &self,
        ) -> CostCenterService<
            InMemoryCostCenterRepository,
            InMemoryPaymentMethodRepository,
            InMemoryInvoiceRepository,
        > {
            CostCenterService::new(
                self.cost_centers.clone(),
                self.payment_methods.clone(),
                self.invoices.clone(),
            )
        }

        fn invoices(
            &self,
        ) -> InvoiceService<
            InMemoryInvoiceRepository,
            InMemoryVendorRepository,
            InMemoryCostCenterRepository,
            InMemoryPaymentMethodRepository,
            InMemoryProjectRepository,
            InMemoryStorage,
        > {
            InvoiceService::new(
                self.invoices.clone(),
                self.vendors.clone(),
                self.cost_centers.clone(),
                self.payment_methods.clone(),
                self.projects.clone(),
                self.storage.clone(),
            )
        }

        fn reports(
            &self,
        ) -> ReportService<
            InMemoryCostCenterRepository,
            InMemoryInvoiceRepository,
            InMemoryVendorRepository,
            InMemoryClientRepository,
            InMemoryQuotationRepository,
            InMemoryProjectRepository,
        > {
            ReportService::new(
                self.cost_centers.clone(),
                self.invoices.clone(),
                self.vendors.clone(),
                self.clients.clone(),
                self.quotations.clone(),
                self.projects.clone(),
                SolarWindow::default(),
            )
        }
    }

    fn client_input(nic: &str) -> ClientInput {
        ClientInput {
            client_type: ClientType::Natural,
            name: "Hacienda El Sol".into(),
            nic: nic.into(),
            email: Some("compras@elsol.co".into()),
            phone: None,
            department: Some("Risaralda".into()),
            city: Some("Pereira".into()),
            address: Some("Vereda La Florida km 4".into()),
            monthly_consumption_kwh: Some(900.0),
            energy_rate: Some(810.0),
            network_type: Some("monofasica".into()),
        }
    }

    fn vendor_input(nit: &str) -> VendorInput {
        VendorInput {
            name: "Distribuidora Solar Andina".into(),
            nit: nit.into(),
            contact_name: Some("Laura Gómez".into()),
            email: None,
            phone: None,
            address: None,
            bank_account: None,
        }
    }

    #[tokio::test]
    async fn bootstrap_admin_logs_in_and_authenticates() {
        let world = World::new();
        let auth = world.auth();

        let admin = auth
            .ensure_bootstrap_admin("Admin@Solar.co", "s3cret-pass")
            .await
            .unwrap()
            .expect("admin created on empty users table");
        assert_eq!(admin.email, "admin@solar.co");

        // A second call is a no-op once users exist
        assert!(auth
            .ensure_bootstrap_admin("other@solar.co", "whatever")
            .await
            .unwrap()
            .is_none());

        let outcome = auth.login("admin@solar.co", "s3cret-pass").await.unwrap();
        assert_eq!(outcome.role.name, Role::ADMIN);

        let current = auth.authenticate(&outcome.token).await.unwrap();
        assert_eq!(current.user.id, admin.id);

        auth.logout(&current).await.unwrap();
        let err = auth.authenticate(&outcome.token).await.unwrap_err();
        assert_eq!(err.status(), StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn inactive_user_is_refused_at_login() {
        let mut user = test_user("tecnico@solar.co", builtin_role_id(Role::TECHNICAL));
        user.password_hash = hash_password(PEPPER, "password123").unwrap();
        user.is_active = false;
        let world = World {
            users: Arc::new(InMemoryUserRepository::new().with_user(user)),
            ..World::new()
        };

        let err = world
            .auth()
            .login("tecnico@solar.co", "password123")
            .await
            .unwrap_err();
        assert_eq!(err.status(), StatusCode::FORBIDDEN);
        assert_eq!(world.tokens.len(), 0);
    }

    #[tokio::test]
    async fn duplicate_client_nic_is_unprocessable() {
        let world = World::new();
        let clients = world.clients();

        clients.create(client_input("1088123456")).await.unwrap();
        let err = clients.create(client_input("1088123456")).await.unwrap_err();
        assert_eq!(err.status(), StatusCode::UNPROCESSABLE_ENTITY);
    }

    #[tokio::test]
    async fn vendor_with_invoices_cannot_be_deleted() {
        let world = World::new();
        let vendors = world.vendors();
        let ledger = world.ledger();

        let busy = vendors
            .create(VendorKind::Provider, vendor_input("900111222-3"))
            .await
            .unwrap();
        let idle = vendors
            .create(VendorKind::Provider, vendor_input("900333444-5"))
            .await
            .unwrap();
        let center = ledger
            .create_cost_center(CostCenterInput {
                code: "CC-OPS".into(),
                name: "Operations".into(),
                description: None,
                budget: 10_000_000.0,
                is_active: None,
            })
            .await
            .unwrap();

        world
            .invoices()
            .create(InvoiceInput {
                invoice_number: "FE-501".into(),
                vendor_id: busy.id,
                cost_center_id: center.id,
                payment_method_id: None,
                project_id: None,
                issue_date: NaiveDate::from_ymd_opt(2026, 5, 4).unwrap(),
                due_date: None,
                subtotal: 300_000.0,
                tax_amount: 0.0,
                withholding_amount: 0.0,
                description: None,
            })
            .await
            .unwrap();

        let err = vendors
            .delete(VendorKind::Provider, &busy.id)
            .await
            .unwrap_err();
        assert_eq!(err.status(), StatusCode::BAD_REQUEST);

        let err = ledger.delete_cost_center(&center.id).await.unwrap_err();
        assert_eq!(err.status(), StatusCode::BAD_REQUEST);

        vendors.delete(VendorKind::Provider, &idle.id).await.unwrap();
    }

    #[tokio::test]
    async fn quotation_to_project_to_reports() {
        let world = World::new();
        let sales = test_current_user(Role::COMMERCIAL);

        // Sales: client and quotation
        let client = world.clients().create(client_input("1088999000")).await.unwrap();
        let panel = world.panel.clone();

        let quotation = world
            .quotations()
            .create(
                sales.user.id,
                QuotationInput {
                    client_id: client.id,
                    project_name: "Hacienda El Sol 6.5 kWp".into(),
                    system_type: SystemType::OnGrid,
                    power_kwp: 6.5,
                    panel_count: 12,
                    requires_financing: false,
                    profit_percentage: 0.0,
                    iva_profit_percentage: 0.0,
                    commercial_management_percentage: 0.0,
                    administration_percentage: 0.0,
                    contingency_percentage: 0.0,
                    withholding_percentage: 0.0,
                    notes: None,
                    products: vec![UsedProductInput {
                        product_id: panel.id,
                        quantity: 12.0,
                        unit_price: None,
                        profit_percentage: 0.0,
                    }],
                    items: vec![QuotationItemInput {
                        description: "Mounting structure".into(),
                        item_type: "material".into(),
                        quantity: 1.0,
                        unit: "global".into(),
                        unit_price: 1_200_000.0,
                        profit_percentage: 0.0,
                    }],
                },
            )
            .await
            .unwrap();
        let quotation_id = quotation.quotation.id;
        let total_value = quotation.quotation.totals.total_value;
        assert!(total_value > 0.0);

        // A pending quotation cannot back a project
        let pending = world
            .projects()
            .create(
                &sales,
                CreateProjectInput {
                    quotation_id,
                    name: None,
                    department: None,
                    city: None,
                    address: None,
                    start_date: None,
                    estimated_end_date: None,
                    notes: None,
                },
            )
            .await
            .unwrap_err();
        assert_eq!(pending.status(), StatusCode::BAD_REQUEST);

        world
            .quotations()
            .set_status(&quotation_id, QuotationStatus::Approved)
            .await
            .unwrap();

        // Field team: project lifecycle
        let field = test_current_user(Role::TECHNICAL);
        let project = world
            .projects()
            .create(
                &field,
                CreateProjectInput {
                    quotation_id,
                    name: None,
                    department: None,
                    city: None,
                    address: None,
                    start_date: NaiveDate::from_ymd_opt(2026, 6, 1),
                    estimated_end_date: NaiveDate::from_ymd_opt(2026, 7, 15),
                    notes: None,
                },
            )
            .await
            .unwrap();
        assert_eq!(project.state, ProjectState::Planning);
        assert_eq!(project.city.as_deref(), Some("Pereira"));
        assert_eq!(project.installed_power_kwp, 6.5);

        let completed = world
            .projects()
            .change_state(
                &field,
                &project.id,
                ChangeStateInput {
                    state: ProjectState::Completed,
                    notes: Some("Commissioned".into()),
                },
            )
            .await
            .unwrap();
        assert!(completed.actual_end_date.is_some());
        assert_eq!(world.projects().history(&project.id).await.unwrap().len(), 2);

        // Accounting: invoice against the project
        let vendor = world
            .vendors()
            .create(VendorKind::Supplier, vendor_input("830555666-7"))
            .await
            .unwrap();
        let center = world
            .ledger()
            .create_cost_center(CostCenterInput {
                code: "CC-PRJ".into(),
                name: "Projects".into(),
                description: None,
                budget: 4_660_000.0,
                is_active: None,
            })
            .await
            .unwrap();

        let invoices = world.invoices();
        let invoice = invoices
            .create(InvoiceInput {
                invoice_number: "FV-2201".into(),
                vendor_id: vendor.id,
                cost_center_id: center.id,
                payment_method_id: None,
                project_id: Some(project.id),
                issue_date: NaiveDate::from_ymd_opt(2026, 6, 10).unwrap(),
                due_date: NaiveDate::from_ymd_opt(2026, 6, 30),
                subtotal: 1_000_000.0,
                tax_amount: 190_000.0,
                withholding_amount: 25_000.0,
                description: Some("Structure aluminium".into()),
            })
            .await
            .unwrap();
        assert_eq!(invoice.total_amount, 1_165_000.0);

        let not_pdf = invoices
            .upload_document(
                &invoice.id,
                InvoiceDocument::Invoice,
                Upload {
                    content_type: Some("text/plain".into()),
                    bytes: b"not a pdf".to_vec(),
                },
            )
            .await
            .unwrap_err();
        assert_eq!(not_pdf.status(), StatusCode::UNPROCESSABLE_ENTITY);

        invoices
            .upload_document(
                &invoice.id,
                InvoiceDocument::Invoice,
                Upload {
                    content_type: Some("application/pdf".into()),
                    bytes: test_pdf_bytes(),
                },
            )
            .await
            .unwrap();
        assert_eq!(
            invoices
                .download_document(&invoice.id, InvoiceDocument::Invoice)
                .await
                .unwrap(),
            test_pdf_bytes()
        );

        // Overdue while pending
        let payable = world
            .reports()
            .accounts_payable(NaiveDate::from_ymd_opt(2026, 7, 2).unwrap())
            .await
            .unwrap();
        assert_eq!(payable.total, 1_165_000.0);
        assert_eq!(payable.overdue, 1_165_000.0);

        let paid = invoices.pay(&invoice.id, PayInput::default()).await.unwrap();
        assert_eq!(paid.status, InvoiceStatus::Paid);
        assert!(paid.paid_at.is_some());

        // Reports
        let reports = world.reports();
        let execution = reports.cost_center_report(None, None).await.unwrap();
        let row = execution
            .iter()
            .find(|r| r.cost_center_id == center.id)
            .unwrap();
        assert_eq!(row.executed, 1_165_000.0);
        assert_eq!(row.remaining, 3_495_000.0);
        assert!((row.execution_percentage - 25.0).abs() < 1e-9);

        let payable = reports
            .accounts_payable(NaiveDate::from_ymd_opt(2026, 7, 2).unwrap())
            .await
            .unwrap();
        assert!(payable.vendors.is_empty());

        let dashboard = reports.dashboard().await.unwrap();
        assert_eq!(dashboard.clients, 1);
        assert_eq!(dashboard.active_projects, 0);
        assert_eq!(dashboard.installed_kwp, 6.5);
        assert_eq!(dashboard.approved_quotation_value, total_value);
        assert_eq!(dashboard.generation_curve.len(), 25);
        assert!((dashboard.generation_curve[12].power_kw - 6.5).abs() < 1e-9);
    }
}
