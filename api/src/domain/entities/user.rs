//! User and role domain entities
//!
//! Back-office users authenticate with email/password and receive an opaque
//! bearer token. Access to route groups is gated by role name.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

uuid_id!(
    /// Unique identifier for a user
    UserId
);
uuid_id!(
    /// Unique identifier for a role
    RoleId
);

/// A named role
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Role {
    pub id: RoleId,
    pub name: String,
    pub description: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl Role {
    pub const ADMIN: &'static str = "admin";
    pub const COMMERCIAL: &'static str = "commercial";
    pub const TECHNICAL: &'static str = "technical";
    pub const ACCOUNTING: &'static str = "accounting";

    pub fn is_admin(&self) -> bool {
        self.name.eq_ignore_ascii_case(Self::ADMIN)
    }
}

/// Data needed to create a new role
#[derive(Debug, Clone)]
pub struct NewRole {
    pub name: String,
    pub description: Option<String>,
}

/// A back-office user
#[derive(Debug, Clone, Serialize)]
pub struct User {
    pub id: UserId,
    pub name: String,
    pub email: String,
    #[serde(skip_serializing)]
    pub password_hash: String,
    pub role_id: RoleId,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Data needed to create a new user
#[derive(Debug, Clone)]
pub struct NewUser {
    pub name: String,
    pub email: String,
    pub password_hash: String,
    pub role_id: RoleId,
    pub is_active: bool,
}

/// Stored bearer token; only the SHA-256 of the token is persisted
#[derive(Debug, Clone)]
pub struct AuthToken {
    pub token_hash: String,
    pub user_id: UserId,
    pub expires_at: DateTime<Utc>,
    pub created_at: DateTime<Utc>,
}

impl AuthToken {
    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        self.expires_at <= now
    }
}

/// The authenticated principal injected into request extensions
#[derive(Debug, Clone, Serialize)]
pub struct CurrentUser {
    pub user: User,
    pub role: Role,
    #[serde(skip_serializing)]
    pub token_hash: String,
}

impl CurrentUser {
    /// Admins pass every role gate
    pub fn has_any_role(&self, roles: &[&str]) -> bool {
        self.role.is_admin() || roles.iter().any(|r| self.role.name.eq_ignore_ascii_case(r))
    }
}
