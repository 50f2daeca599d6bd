//! SeaORM entities
//!
//! Table mappings for the PostgreSQL schema in `migrations/`. Conversions to
//! domain types live in the postgres adapters.

pub mod auth_tokens;
pub mod clients;
pub mod cost_centers;
pub mod invoices;
pub mod payment_methods;
pub mod products;
pub mod project_state_changes;
pub mod projects;
pub mod quotation_items;
pub mod quotations;
pub mod roles;
pub mod used_products;
pub mod users;
pub mod vendors;
