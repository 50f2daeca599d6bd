//! User and role administration

use std::sync::Arc;

use serde::Deserialize;

use crate::app::auth_service::hash_password;
use crate::domain::entities::{CurrentUser, NewRole, NewUser, Role, RoleId, User, UserId};
use crate::domain::ports::{AuthTokenRepository, RoleRepository, UserRepository};
use crate::domain::validation::FieldErrors;
use crate::error::{AppError, DomainError};

const MIN_PASSWORD_LEN: usize = 8;

/// Payload for creating or updating a user; `password` is optional on update
#[derive(Debug, Clone, Deserialize)]
pub struct UserInput {
    pub name: String,
    pub email: String,
    pub password: Option<String>,
    pub role_id: RoleId,
    pub is_active: Option<bool>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RoleInput {
    pub name: String,
    pub description: Option<String>,
}

/// Service for managing back-office users and their roles
pub struct UserService<UR, RR, TR>
where
    UR: UserRepository,
    RR: RoleRepository,
    TR: AuthTokenRepository,
{
    users: Arc<UR>,
    roles: Arc<RR>,
    tokens: Arc<TR>,
    pepper: String,
}

impl<UR, RR, TR> UserService<UR, RR, TR>
where
    UR: UserRepository,
    RR: RoleRepository,
    TR: AuthTokenRepository,
{
    pub fn new(users: Arc<UR>, roles: Arc<RR>, tokens: Arc<TR>, pepper: String) -> Self {
        Self {
            users,
            roles,
            tokens,
            pepper,
        }
    }

    pub async fn list_users(&self) -> Result<Vec<User>, AppError> {
        Ok(self.users.list().await?)
    }

    pub async fn get_user(&self, id: &UserId) -> Result<User, AppError> {
        self.users
            .find_by_id(id)
            .await?
            .ok_or_else(|| DomainError::NotFound(format!("User {} not found", id)).into())
    }

    async fn validate_user(
        &self,
        input: &UserInput,
        existing: Option<&User>,
    ) -> Result<String, AppError> {
        let email = input.email.trim().to_lowercase();
        let mut errors = FieldErrors::new();

        errors.required("name", &input.name);
        errors.max_len("name", &input.name, 255);
        errors.required("email", &email);
        if !email.is_empty() {
            errors.email("email", &email);
        }

        match (&input.password, existing) {
            (Some(password), _) => errors.min_len("password", password, MIN_PASSWORD_LEN),
            (None, None) => errors.required("password", ""),
            (None, Some(_)) => {}
        }

        if self.roles.find_by_id(&input.role_id).await?.is_none() {
            errors.add("role_id", "The selected role_id is invalid.");
        }

        if let Some(other) = self.users.find_by_email(&email).await? {
            if existing.map_or(true, |u| u.id != other.id) {
                errors.taken("email");
            }
        }

        errors.into_result()?;
        Ok(email)
    }

    pub async fn create_user(&self, input: UserInput) -> Result<User, AppError> {
        let email = self.validate_user(&input, None).await?;
        let password = input.password.as_deref().unwrap_or_default();

        let user = self
            .users
            .create(&NewUser {
                name: input.name.trim().to_string(),
                email,
                password_hash: hash_password(&self.pepper, password)?,
                role_id: input.role_id,
                is_active: input.is_active.unwrap_or(true),
            })
            .await?;

        tracing::info!(user_id = %user.id, "User created");
        Ok(user)
    }

    pub async fn update_user(&self, id: &UserId, input: UserInput) -> Result<User, AppError> {
        let mut user = self.get_user(id).await?;
        let email = self.validate_user(&input, Some(&user)).await?;

        user.name = input.name.trim().to_string();
        user.email = email;
        user.role_id = input.role_id;
        if let Some(active) = input.is_active {
            user.is_active = active;
        }
        let password_changed = input.password.is_some();
        if let Some(password) = input.password.as_deref() {
            user.password_hash = hash_password(&self.pepper, password)?;
        }

        let user = self.users.update(&user).await?;
        if password_changed || !user.is_active {
            self.tokens.revoke_all_for_user(&user.id).await?;
        }
        Ok(user)
    }

    /// Flip `is_active`; deactivation revokes every issued token
    pub async fn toggle_user_active(
        &self,
        current: &CurrentUser,
        id: &UserId,
    ) -> Result<User, AppError> {
        if current.user.id == *id {
            return Err(AppError::BadRequest(
                "You cannot deactivate your own account.".to_string(),
            ));
        }

        let mut user = self.get_user(id).await?;
        user.is_active = !user.is_active;
        let user = self.users.update(&user).await?;

        if !user.is_active {
            self.tokens.revoke_all_for_user(&user.id).await?;
        }
        Ok(user)
    }

    pub async fn delete_user(&self, current: &CurrentUser, id: &UserId) -> Result<(), AppError> {
        if current.user.id == *id {
            return Err(AppError::BadRequest(
                "You cannot delete your own account.".to_string(),
            ));
        }

        self.tokens.revoke_all_for_user(id).await?;
        self.users.delete(id).await?;
        tracing::info!(user_id = %id, "User deleted");
        Ok(())
    }

    pub async fn list_roles(&self) -> Result<Vec<Role>, AppError> {
        Ok(self.roles.list().await?)
    }

    pub async fn get_role(&self, id: &RoleId) -> Result<Role, AppError> {
        self.roles
            .find_by_id(id)
            .await?
            .ok_or_else(|| DomainError::NotFound(format!("Role {} not found", id)).into())
    }

    async fn validate_role(&self, input: &RoleInput, existing: Option<&Role>) -> Result<String, AppError> {
        let name = input.name.trim().to_lowercase();
        let mut errors = FieldErrors::new();
        errors.required("name", &name);
        errors.max_len("name", &name, 50);

        if let Some(other) = self.roles.find_by_name(&name).await? {
            if existing.map_or(true, |r| r.id != other.id) {
                errors.taken("name");
            }
        }

        errors.into_result()?;
        Ok(name)
    }

    pub async fn create_role(&self, input: RoleInput) -> Result<Role, AppError> {
        let name = self.validate_role(&input, None).await?;
        Ok(self
            .roles
            .create(&NewRole {
                name,
                description: input.description,
            })
            .await?)
    }

    pub async fn update_role(&self, id: &RoleId, input: RoleInput) -> Result<Role, AppError> {
        let mut role = self.get_role(id).await?;
        let name = self.validate_role(&input, Some(&role)).await?;

        role.name = name;
        role.description = input.description;
        Ok(self.roles.update(&role).await?)
    }

    /// Roles still assigned to users cannot be removed
    pub async fn delete_role(&self, id: &RoleId) -> Result<(), AppError> {
        let role = self.get_role(id).await?;

        let assigned = self.users.count_by_role(&role.id).await?;
        if assigned > 0 {
            return Err(DomainError::HasDependents(format!(
                "Role '{}' is assigned to {} user(s).",
                role.name, assigned
            ))
            .into());
        }

        self.roles.delete(id).await?;
        Ok(())
    }
}
