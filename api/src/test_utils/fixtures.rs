//! Test fixtures
//!
//! Factory functions for creating test data with sensible defaults.
//! Each fixture function creates a valid entity that can be customized.

use chrono::{NaiveDate, Utc};
use uuid::Uuid;

use crate::domain::entities::{
    Client, ClientId, ClientType, CostCenter, CostCenterId, CurrentUser, Invoice, InvoiceId,
    InvoiceStatus, Product, ProductId, ProductSpecs, Quotation, QuotationId,
    QuotationStatus, Role, RoleId, SystemType, User, UserId, Vendor, VendorId, VendorKind,
};
use crate::domain::pricing::{Percentages, QuotationTotals};

/// Ids of the roles seeded by `migrations/001_initial.sql`
pub fn builtin_role_id(name: &str) -> RoleId {
    let n = match name {
        Role::ADMIN => 1,
        Role::COMMERCIAL => 2,
        Role::TECHNICAL => 3,
        Role::ACCOUNTING => 4,
        other => panic!("not a built-in role: {}", other),
    };
    RoleId(Uuid::from_u128(n))
}

/// Create an active user; the password hash does not match any password
pub fn test_user(email: &str, role_id: RoleId) -> User {
    User {
        id: UserId::new(),
        name: "Test User".to_string(),
        email: email.to_lowercase(),
        password_hash: "0011aabb$00".to_string(),
        role_id,
        is_active: true,
        created_at: Utc::now(),
        updated_at: Utc::now(),
    }
}

/// Authenticated user holding a built-in role
pub fn test_current_user(role_name: &str) -> CurrentUser {
    let role = Role {
        id: builtin_role_id(role_name),
        name: role_name.to_string(),
        description: None,
        created_at: Utc::now(),
    };
    CurrentUser {
        user: test_user(&format!("{}@solar.co", role_name), role.id),
        role,
        token_hash: "test-token-hash".to_string(),
    }
}

pub fn test_client(nic: &str) -> Client {
    Client {
        id: ClientId::new(),
        client_type: ClientType::Legal,
        name: format!("Client {}", nic),
        nic: nic.to_string(),
        email: Some("contacto@cliente.co".to_string()),
        phone: None,
        department: Some("Risaralda".to_string()),
        city: Some("Pereira".to_string()),
        address: None,
        monthly_consumption_kwh: Some(1_200.0),
        energy_rate: Some(780.0),
        network_type: None,
        is_active: true,
        created_at: Utc::now(),
        updated_at: Utc::now(),
    }
}

fn test_product(brand: &str, model: &str, price: f64, specs: ProductSpecs) -> Product {
    Product {
        id: ProductId::new(),
        kind: specs.kind(),
        brand: brand.to_string(),
        model: model.to_string(),
        price,
        specs,
        technical_sheet_path: None,
        is_active: true,
        created_at: Utc::now(),
        updated_at: Utc::now(),
    }
}

pub fn test_panel() -> Product {
    test_product(
        "Jinko",
        &format!("Tiger Neo {}", &Uuid::new_v4().simple().to_string()[..6]),
        650_000.0,
        ProductSpecs::Panel {
            power_wp: 575.0,
            panel_type: "monocrystalline".to_string(),
        },
    )
}

pub fn test_inverter() -> Product {
    test_product(
        "Growatt",
        &format!("MIN {}", &Uuid::new_v4().simple().to_string()[..6]),
        3_900_000.0,
        ProductSpecs::Inverter {
            power_kw: 6.0,
            grid_type: "monophasic".to_string(),
            system_type: "on_grid".to_string(),
        },
    )
}

/// Quotation header for a fresh client, 10 kWp on-grid
pub fn test_quotation(status: QuotationStatus) -> Quotation {
    Quotation {
        id: QuotationId::new(),
        client_id: ClientId::new(),
        user_id: UserId::new(),
        project_name: "Bodega Dosquebradas".to_string(),
        system_type: SystemType::OnGrid,
        power_kwp: 10.35,
        panel_count: 18,
        requires_financing: false,
        percentages: Percentages::default(),
        totals: QuotationTotals {
            subtotal: 40_000_000.0,
            subtotal_with_markups: 40_000_000.0,
            total_value: 40_000_000.0,
            ..Default::default()
        },
        status,
        notes: None,
        created_at: Utc::now(),
        updated_at: Utc::now(),
    }
}

pub fn test_vendor(kind: VendorKind) -> Vendor {
    Vendor {
        id: VendorId::new(),
        kind,
        name: format!("{} {}", kind.label(), &Uuid::new_v4().simple().to_string()[..6]),
        nit: Uuid::new_v4().simple().to_string()[..9].to_string(),
        contact_name: None,
        email: None,
        phone: None,
        address: None,
        bank_account: None,
        is_active: true,
        created_at: Utc::now(),
        updated_at: Utc::now(),
    }
}

pub fn test_cost_center() -> CostCenter {
    CostCenter {
        id: CostCenterId::new(),
        code: format!("CC-{}", &Uuid::new_v4().simple().to_string()[..4]),
        name: "Installations".to_string(),
        description: None,
        budget: 100_000_000.0,
        is_active: true,
        created_at: Utc::now(),
        updated_at: Utc::now(),
    }
}

/// Pending invoice of 1,165,000 issued on 2026-03-01
pub fn test_invoice(vendor_id: VendorId, cost_center_id: CostCenterId) -> Invoice {
    Invoice {
        id: InvoiceId::new(),
        invoice_number: format!("FE-{}", &Uuid::new_v4().simple().to_string()[..6]),
        vendor_id,
        cost_center_id,
        payment_method_id: None,
        project_id: None,
        issue_date: NaiveDate::from_ymd_opt(2026, 3, 1).unwrap(),
        due_date: NaiveDate::from_ymd_opt(2026, 3, 31),
        subtotal: 1_000_000.0,
        tax_amount: 190_000.0,
        withholding_amount: 25_000.0,
        total_amount: 1_165_000.0,
        status: InvoiceStatus::Pending,
        description: None,
        invoice_file_path: None,
        payment_support_path: None,
        paid_at: None,
        created_at: Utc::now(),
        updated_at: Utc::now(),
    }
}

/// Minimal bytes accepted as a PDF upload
pub fn test_pdf_bytes() -> Vec<u8> {
    b"%PDF-1.4\n1 0 obj << /Type /Catalog >> endobj\n%%EOF\n".to_vec()
}

