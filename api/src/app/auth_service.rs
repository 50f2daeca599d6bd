//! Authentication service
//!
//! Email/password login issuing opaque bearer tokens. Only the SHA-256 of a
//! token is stored; passwords are HMAC-SHA256 keyed with the server pepper.

use std::sync::Arc;

use chrono::{DateTime, Duration, Utc};
use hmac::{Hmac, Mac};
use rand::Rng;
use serde::Serialize;
use sha2::{Digest, Sha256};

use crate::domain::entities::{AuthToken, CurrentUser, NewUser, Role, User};
use crate::domain::ports::{AuthTokenRepository, RoleRepository, UserRepository};
use crate::domain::validation::FieldErrors;
use crate::error::{AppError, DomainError};

type HmacSha256 = Hmac<Sha256>;

const INVALID_CREDENTIALS: &str = "These credentials do not match our records.";

/// Result of a successful login; the token is only shown here
#[derive(Debug, Serialize)]
pub struct LoginOutcome {
    pub token: String,
    pub token_type: &'static str,
    pub expires_at: DateTime<Utc>,
    pub user: User,
    pub role: Role,
}

/// Service for login, logout and token resolution
pub struct AuthService<UR, RR, TR>
where
    UR: UserRepository,
    RR: RoleRepository,
    TR: AuthTokenRepository,
{
    users: Arc<UR>,
    roles: Arc<RR>,
    tokens: Arc<TR>,
    pepper: String,
    token_ttl: Duration,
}

impl<UR, RR, TR> AuthService<UR, RR, TR>
where
    UR: UserRepository,
    RR: RoleRepository,
    TR: AuthTokenRepository,
{
    pub fn new(
        users: Arc<UR>,
        roles: Arc<RR>,
        tokens: Arc<TR>,
        pepper: String,
        token_ttl_hours: i64,
    ) -> Self {
        Self {
            users,
            roles,
            tokens,
            pepper,
            token_ttl: Duration::hours(token_ttl_hours.max(1)),
        }
    }

    /// Exchange credentials for a bearer token
    ///
    /// Unknown email and wrong password are indistinguishable (401); valid
    /// credentials on a deactivated account are refused with 403.
    pub async fn login(&self, email: &str, password: &str) -> Result<LoginOutcome, AppError> {
        let mut errors = FieldErrors::new();
        errors.required("email", email);
        errors.required("password", password);
        errors.into_result()?;

        let user = self
            .users
            .find_by_email(&email.trim().to_lowercase())
            .await?
            .filter(|u| verify_password(&self.pepper, password, &u.password_hash))
            .ok_or_else(|| DomainError::Unauthorized(INVALID_CREDENTIALS.to_string()))?;

        if !user.is_active {
            tracing::info!(user_id = %user.id, "Login refused for inactive user");
            return Err(DomainError::Forbidden("This account is inactive.".to_string()).into());
        }

        let role = self.role_of(&user).await?;

        let token = generate_token();
        let now = Utc::now();
        let expires_at = now + self.token_ttl;
        self.tokens
            .create(&AuthToken {
                token_hash: hash_token(&token),
                user_id: user.id,
                expires_at,
                created_at: now,
            })
            .await?;

        tracing::info!(user_id = %user.id, role = %role.name, "User logged in");

        Ok(LoginOutcome {
            token,
            token_type: "Bearer",
            expires_at,
            user,
            role,
        })
    }

    /// Revoke the token the request was authenticated with
    pub async fn logout(&self, current: &CurrentUser) -> Result<(), AppError> {
        self.tokens.revoke(&current.token_hash).await?;
        Ok(())
    }

    /// Resolve a raw bearer token to the authenticated user
    pub async fn authenticate(&self, raw_token: &str) -> Result<CurrentUser, AppError> {
        let token_hash = hash_token(raw_token);

        let token = self
            .tokens
            .find_valid(&token_hash, Utc::now())
            .await?
            .ok_or(AppError::Unauthorized)?;

        let user = self
            .users
            .find_by_id(&token.user_id)
            .await?
            .ok_or(AppError::Unauthorized)?;

        if !user.is_active {
            return Err(AppError::Unauthorized);
        }

        let role = self.role_of(&user).await?;

        Ok(CurrentUser {
            user,
            role,
            token_hash,
        })
    }

    /// Create the first administrator when no users exist yet
    pub async fn ensure_bootstrap_admin(
        &self,
        email: &str,
        password: &str,
    ) -> Result<Option<User>, AppError> {
        if !self.users.list().await?.is_empty() {
            return Ok(None);
        }

        let role = self
            .roles
            .find_by_name(Role::ADMIN)
            .await?
            .ok_or_else(|| DomainError::Internal("admin role is not seeded".to_string()))?;

        let user = self
            .users
            .create(&NewUser {
                name: "Administrator".to_string(),
                email: email.trim().to_lowercase(),
                password_hash: hash_password(&self.pepper, password)?,
                role_id: role.id,
                is_active: true,
            })
            .await?;

        tracing::info!(email = %user.email, "Bootstrap administrator created");
        Ok(Some(user))
    }

    async fn role_of(&self, user: &User) -> Result<Role, AppError> {
        self.roles
            .find_by_id(&user.role_id)
            .await?
            .ok_or_else(|| {
                AppError::Internal(format!("Role {} of user {} is missing", user.role_id, user.id))
            })
    }
}

fn password_mac(pepper: &str, salt: &str, password: &str) -> Result<HmacSha256, AppError> {
    let mut mac = HmacSha256::new_from_slice(pepper.as_bytes())
        .map_err(|e| AppError::Internal(format!("Invalid pepper: {}", e)))?;
    mac.update(salt.as_bytes());
    mac.update(b":");
    mac.update(password.as_bytes());
    Ok(mac)
}

/// Hash a password as `salt$hex(hmac)`
pub fn hash_password(pepper: &str, password: &str) -> Result<String, AppError> {
    let salt: [u8; 16] = rand::thread_rng().gen();
    let salt = hex::encode(salt);
    let digest = password_mac(pepper, &salt, password)?.finalize().into_bytes();
    Ok(format!("{}${}", salt, hex::encode(digest)))
}

/// Constant-time check of a password against a stored hash
pub fn verify_password(pepper: &str, password: &str, stored: &str) -> bool {
    let Some((salt, expected)) = stored.split_once('$') else {
        return false;
    };
    let Ok(expected) = hex::decode(expected) else {
        return false;
    };
    match password_mac(pepper, salt, password) {
        Ok(mac) => mac.verify_slice(&expected).is_ok(),
        Err(_) => false,
    }
}

/// Hash a bearer token for storage and lookup
pub fn hash_token(token: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(token.as_bytes());
    hex::encode(hasher.finalize())
}

fn generate_token() -> String {
    let bytes: [u8; 32] = rand::thread_rng().gen();
    hex::encode(bytes)
}
