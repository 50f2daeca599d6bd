//! Solar ERP API Server
//!
//! Back office for a solar installation company: clients, product catalog,
//! quotations, projects, vendor invoices and reporting.
//! Uses hexagonal (ports & adapters) architecture for clean separation of concerns.

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use axum::{
    body::Body,
    extract::{DefaultBodyLimit, Request},
    middleware::{self, Next},
    routing::{get, patch, post},
    Json, Router,
};
use sea_orm::Database;
use serde::Serialize;
use tower_governor::governor::GovernorConfigBuilder;
use tower_governor::key_extractor::PeerIpKeyExtractor;
use tower_governor::GovernorLayer;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod adapters;
mod app;
mod auth;
mod config;
mod domain;
mod entity;
mod error;
mod handlers;

#[cfg(test)]
mod test_utils;

#[cfg(test)]
mod integration_tests;

use adapters::{
    spawn_token_refresher, DisabledAccountingClient, LocalDiskStorage,
    PostgresAuthTokenRepository, PostgresClientRepository, PostgresCostCenterRepository,
    PostgresInvoiceRepository, PostgresPaymentMethodRepository, PostgresProductRepository,
    PostgresProjectRepository, PostgresQuotationRepository, PostgresRoleRepository,
    PostgresUserRepository, PostgresVendorRepository, SiigoClient,
};
use app::{
    AuthService, CatalogService, ClientService, CostCenterService, InvoiceService,
    ProjectService, QuotationService, ReportService, UserService, VendorService, MAX_PDF_BYTES,
};
use auth::{auth_middleware, require_roles, ACCOUNTING, ADMIN_ONLY};
use config::Config;
use domain::entities::{ProductKind, VendorKind};
use domain::ports::AccountingClient;

/// Application state shared across all handlers
#[derive(Clone)]
pub struct AppState {
    pub auth_service: Arc<
        AuthService<PostgresUserRepository, PostgresRoleRepository, PostgresAuthTokenRepository>,
    >,
    pub user_service: Arc<
        UserService<PostgresUserRepository, PostgresRoleRepository, PostgresAuthTokenRepository>,
    >,
    pub client_service: Arc<ClientService<PostgresClientRepository, PostgresQuotationRepository>>,
    pub catalog_service: Arc<CatalogService<PostgresProductRepository, LocalDiskStorage>>,
    pub quotation_service: Arc<
        QuotationService<
            PostgresQuotationRepository,
            PostgresClientRepository,
            PostgresProductRepository,
        >,
    >,
    pub project_service: Arc<
        ProjectService<
            PostgresProjectRepository,
            PostgresQuotationRepository,
            PostgresClientRepository,
        >,
    >,
    pub vendor_service: Arc<VendorService<PostgresVendorRepository, PostgresInvoiceRepository>>,
    pub cost_center_service: Arc<
        CostCenterService<
            PostgresCostCenterRepository,
            PostgresPaymentMethodRepository,
            PostgresInvoiceRepository,
        >,
    >,
    pub invoice_service: Arc<
        InvoiceService<
            PostgresInvoiceRepository,
            PostgresVendorRepository,
            PostgresCostCenterRepository,
            PostgresPaymentMethodRepository,
            PostgresProjectRepository,
            LocalDiskStorage,
        >,
    >,
    pub report_service: Arc<
        ReportService<
            PostgresCostCenterRepository,
            PostgresInvoiceRepository,
            PostgresVendorRepository,
            PostgresClientRepository,
            PostgresQuotationRepository,
            PostgresProjectRepository,
        >,
    >,
    pub accounting: Arc<dyn AccountingClient>,
}

#[derive(Serialize)]
struct HealthResponse {
    status: &'static str,
    version: &'static str,
}

async fn health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok",
        version: env!("CARGO_PKG_VERSION"),
    })
}

/// Gate every route of `router` on one of `roles` (admin always passes)
fn restrict(router: Router<AppState>, roles: &'static [&'static str]) -> Router<AppState> {
    router.route_layer(middleware::from_fn(
        move |request: Request<Body>, next: Next| require_roles(roles, request, next),
    ))
}

fn build_router(state: AppState) -> anyhow::Result<Router> {
    // Login throttling: 2 req/sec sustained, burst of 5 per peer IP
    let governor_config = Arc::new(
        GovernorConfigBuilder::default()
            .key_extractor(PeerIpKeyExtractor)
            .per_second(2)
            .burst_size(5)
            .finish()
            .ok_or_else(|| anyhow::anyhow!("invalid rate limit configuration"))?,
    );

    let login = Router::new()
        .route("/auth/login", post(handlers::auth::login))
        .layer(GovernorLayer {
            config: governor_config,
        });

    let admin = restrict(
        Router::new()
            .route(
                "/users",
                get(handlers::users::list_users).post(handlers::users::create_user),
            )
            .route(
                "/users/:id",
                get(handlers::users::get_user)
                    .put(handlers::users::update_user)
                    .delete(handlers::users::delete_user),
            )
            .route(
                "/users/:id/toggle-active",
                patch(handlers::users::toggle_user_active),
            )
            .route(
                "/roles",
                get(handlers::users::list_roles).post(handlers::users::create_role),
            )
            .route(
                "/roles/:id",
                get(handlers::users::get_role)
                    .put(handlers::users::update_role)
                    .delete(handlers::users::delete_role),
            ),
        ADMIN_ONLY,
    );

    // Reads are open to any signed-in user; writes check roles in the handler
    let sales_and_field = Router::new()
        .route(
            "/clients",
            get(handlers::clients::list_clients).post(handlers::clients::create_client),
        )
        .route(
            "/clients/:id",
            get(handlers::clients::get_client)
                .put(handlers::clients::update_client)
                .delete(handlers::clients::delete_client),
        )
        .route(
            "/clients/:id/toggle-active",
            patch(handlers::clients::toggle_client_active),
        )
        .nest("/panels", handlers::catalog::routes(ProductKind::Panel))
        .nest("/inverters", handlers::catalog::routes(ProductKind::Inverter))
        .nest("/batteries", handlers::catalog::routes(ProductKind::Battery))
        .route(
            "/quotations",
            get(handlers::quotations::list_quotations)
                .post(handlers::quotations::create_quotation),
        )
        .route(
            "/quotations/preview",
            post(handlers::quotations::preview_quotation),
        )
        .route(
            "/quotations/:id",
            get(handlers::quotations::get_quotation)
                .put(handlers::quotations::update_quotation)
                .delete(handlers::quotations::delete_quotation),
        )
        .route(
            "/quotations/:id/status",
            patch(handlers::quotations::update_quotation_status),
        )
        .route(
            "/quotations/:id/duplicate",
            post(handlers::quotations::duplicate_quotation),
        )
        .route(
            "/projects",
            get(handlers::projects::list_projects).post(handlers::projects::create_project),
        )
        .route(
            "/projects/:id",
            get(handlers::projects::get_project)
                .put(handlers::projects::update_project)
                .delete(handlers::projects::delete_project),
        )
        .route(
            "/projects/:id/state",
            patch(handlers::projects::change_project_state),
        )
        .route(
            "/projects/:id/history",
            get(handlers::projects::project_history),
        );

    let accounting = restrict(
        Router::new()
            .nest("/providers", handlers::vendors::routes(VendorKind::Provider))
            .nest("/suppliers", handlers::vendors::routes(VendorKind::Supplier))
            .route(
                "/cost-centers",
                get(handlers::ledger::list_cost_centers)
                    .post(handlers::ledger::create_cost_center),
            )
            .route(
                "/cost-centers/:id",
                get(handlers::ledger::get_cost_center)
                    .put(handlers::ledger::update_cost_center)
                    .delete(handlers::ledger::delete_cost_center),
            )
            .route(
                "/payment-methods",
                get(handlers::ledger::list_payment_methods)
                    .post(handlers::ledger::create_payment_method),
            )
            .route(
                "/payment-methods/:id",
                get(handlers::ledger::get_payment_method)
                    .put(handlers::ledger::update_payment_method)
                    .delete(handlers::ledger::delete_payment_method),
            )
            .route(
                "/invoices",
                get(handlers::invoices::list_invoices).post(handlers::invoices::create_invoice),
            )
            .route(
                "/invoices/:id",
                get(handlers::invoices::get_invoice)
                    .put(handlers::invoices::update_invoice)
                    .delete(handlers::invoices::delete_invoice),
            )
            .route("/invoices/:id/pay", post(handlers::invoices::pay_invoice))
            .route(
                "/invoices/:id/cancel",
                post(handlers::invoices::cancel_invoice),
            )
            .route(
                "/invoices/:id/invoice-file",
                get(handlers::invoices::download_invoice_file)
                    .post(handlers::invoices::upload_invoice_file),
            )
            .route(
                "/invoices/:id/payment-support",
                get(handlers::invoices::download_payment_support)
                    .post(handlers::invoices::upload_payment_support),
            )
            .route("/dashboard", get(handlers::reports::dashboard))
            .route(
                "/reports/cost-centers",
                get(handlers::reports::cost_center_report),
            )
            .route(
                "/reports/accounts-payable",
                get(handlers::reports::accounts_payable),
            )
            .route("/siigo/products", get(handlers::siigo::products))
            .route("/siigo/invoices", get(handlers::siigo::invoices))
            .route("/siigo/customers", get(handlers::siigo::customers)),
        ACCOUNTING,
    );

    let protected = Router::new()
        .route("/auth/logout", post(handlers::auth::logout))
        .route("/auth/me", get(handlers::auth::me))
        .merge(admin)
        .merge(sales_and_field)
        .merge(accounting)
        // PDF uploads plus multipart framing
        .layer(DefaultBodyLimit::max(MAX_PDF_BYTES + 64 * 1024))
        .layer(middleware::from_fn_with_state(
            state.clone(),
            auth_middleware,
        ));

    Ok(Router::new()
        // Health check (no auth)
        .route("/health", get(health))
        .nest("/api", login.merge(protected))
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .layer(TraceLayer::new_for_http())
        .with_state(state))
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,solar_erp_api=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!("Starting Solar ERP API...");

    let config = Config::from_env()?;

    // Connect to PostgreSQL
    tracing::info!("Connecting to database...");
    let db = Database::connect(&config.database_url).await?;
    tracing::info!("Database connected");

    // Create adapters
    let user_repo = Arc::new(PostgresUserRepository::new(db.clone()));
    let role_repo = Arc::new(PostgresRoleRepository::new(db.clone()));
    let token_repo = Arc::new(PostgresAuthTokenRepository::new(db.clone()));
    let client_repo = Arc::new(PostgresClientRepository::new(db.clone()));
    let product_repo = Arc::new(PostgresProductRepository::new(db.clone()));
    let quotation_repo = Arc::new(PostgresQuotationRepository::new(db.clone()));
    let project_repo = Arc::new(PostgresProjectRepository::new(db.clone()));
    let vendor_repo = Arc::new(PostgresVendorRepository::new(db.clone()));
    let cost_center_repo = Arc::new(PostgresCostCenterRepository::new(db.clone()));
    let payment_method_repo = Arc::new(PostgresPaymentMethodRepository::new(db.clone()));
    let invoice_repo = Arc::new(PostgresInvoiceRepository::new(db.clone()));
    let storage = Arc::new(LocalDiskStorage::new(config.storage_root.clone()));

    let accounting: Arc<dyn AccountingClient> = match SiigoClient::from_config(&config.siigo) {
        Some(client) => {
            let client: Arc<dyn AccountingClient> = Arc::new(client);
            spawn_token_refresher(
                client.clone(),
                Duration::from_secs(config.siigo.token_refresh_minutes.max(1) * 60),
            );
            client
        }
        None => {
            tracing::warn!("Siigo credentials not configured, accounting passthrough disabled");
            Arc::new(DisabledAccountingClient)
        }
    };

    // Create application services
    let auth_service = Arc::new(AuthService::new(
        user_repo.clone(),
        role_repo.clone(),
        token_repo.clone(),
        config.password_pepper.clone(),
        config.token_ttl_hours,
    ));

    if let Some(admin) = &config.bootstrap_admin {
        auth_service
            .ensure_bootstrap_admin(&admin.email, &admin.password)
            .await?;
    }

    let user_service = Arc::new(UserService::new(
        user_repo.clone(),
        role_repo.clone(),
        token_repo.clone(),
        config.password_pepper.clone(),
    ));

    let client_service = Arc::new(ClientService::new(
        client_repo.clone(),
        quotation_repo.clone(),
    ));

    let catalog_service = Arc::new(CatalogService::new(product_repo.clone(), storage.clone()));

    let quotation_service = Arc::new(QuotationService::new(
        quotation_repo.clone(),
        client_repo.clone(),
        product_repo.clone(),
    ));

    let project_service = Arc::new(ProjectService::new(
        project_repo.clone(),
        quotation_repo.clone(),
        client_repo.clone(),
    ));

    let vendor_service = Arc::new(VendorService::new(
        vendor_repo.clone(),
        invoice_repo.clone(),
    ));

    let cost_center_service = Arc::new(CostCenterService::new(
        cost_center_repo.clone(),
        payment_method_repo.clone(),
        invoice_repo.clone(),
    ));

    let invoice_service = Arc::new(InvoiceService::new(
        invoice_repo.clone(),
        vendor_repo.clone(),
        cost_center_repo.clone(),
        payment_method_repo.clone(),
        project_repo.clone(),
        storage.clone(),
    ));

    let report_service = Arc::new(ReportService::new(
        cost_center_repo,
        invoice_repo,
        vendor_repo,
        client_repo,
        quotation_repo,
        project_repo,
        config.solar,
    ));

    let state = AppState {
        auth_service,
        user_service,
        client_service,
        catalog_service,
        quotation_service,
        project_service,
        vendor_service,
        cost_center_service,
        invoice_service,
        report_service,
        accounting,
    };

    let app = build_router(state)?;

    // Start server
    let addr = SocketAddr::from(([0, 0, 0, 0], config.port));
    tracing::info!("Listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .await?;

    Ok(())
}
