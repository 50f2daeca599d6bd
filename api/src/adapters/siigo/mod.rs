//! Siigo adapter
//!
//! Read-only client for the Siigo accounting API.

pub mod client;

pub use client::{spawn_token_refresher, DisabledAccountingClient, SiigoClient};
