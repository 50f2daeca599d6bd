//! Domain layer
//!
//! Contains pure business logic with no external dependencies.
//! - `entities`: Domain models representing core business concepts
//! - `ports`: Trait definitions for external dependencies
//! - `pricing`: Quotation markup cascade
//! - `solar`: Daylight generation estimate
//! - `validation`: Field-level validation errors

pub mod entities;
pub mod ports;
pub mod pricing;
pub mod solar;
pub mod validation;
