//! Bearer-token authentication and role gating

pub mod middleware;

pub use middleware::{
    auth_middleware, authorize, require_roles, ACCOUNTING, ADMIN_ONLY, FIELD_TEAM, SALES,
};
