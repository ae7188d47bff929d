//! User Accounts Use Case
//!
//! Account administration behind the auth guard: listing, lookup,
//! admin-only creation and deletion, self-or-admin editing.

use std::sync::Arc;

use kernel::clock::Clock;

use crate::application::authenticate::CurrentUser;
use crate::application::config::AuthConfig;
use crate::domain::entity::user::{NewUser, User, UserProfile};
use crate::domain::repository::{SessionRegistry, UserRepository};
use crate::domain::value_object::{
    email::Email,
    user_id::UserId,
    user_name::UserName,
    user_password::{RawPassword, UserPassword},
    user_role::UserRole,
};
use crate::error::{AuthError, AuthResult};

/// Admin-created account
pub struct CreateUserInput {
    pub user_name: String,
    pub email: String,
    pub password: String,
    pub role: String,
    pub lastname: Option<String>,
    pub celphone: Option<String>,
    pub secondary_role: Option<String>,
    pub profile_picture_url: Option<String>,
}

/// Partial update; blank or missing fields are left unchanged
#[derive(Default)]
pub struct UpdateUserInput {
    pub user_name: Option<String>,
    pub email: Option<String>,
    pub password: Option<String>,
    pub role: Option<String>,
    pub lastname: Option<String>,
    pub celphone: Option<String>,
    pub secondary_role: Option<String>,
    pub profile_picture_url: Option<String>,
}

pub struct UserAccountsUseCase<U, S>
where
    U: UserRepository,
    S: SessionRegistry,
{
    user_repo: Arc<U>,
    sessions: Arc<S>,
    clock: Arc<dyn Clock>,
    config: Arc<AuthConfig>,
}

/// `Some(trimmed)` when the field carries a value
fn filled(field: Option<String>) -> Option<String> {
    field
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

fn parse_role(code: &str) -> AuthResult<UserRole> {
    UserRole::from_code(code).ok_or_else(|| AuthError::Validation(format!("Unknown role: {code}")))
}

fn parse_user_name(input: &str) -> AuthResult<UserName> {
    UserName::new(input).map_err(|e| AuthError::Validation(e.to_string()))
}

impl<U, S> UserAccountsUseCase<U, S>
where
    U: UserRepository,
    S: SessionRegistry,
{
    pub fn new(
        user_repo: Arc<U>,
        sessions: Arc<S>,
        clock: Arc<dyn Clock>,
        config: Arc<AuthConfig>,
    ) -> Self {
        Self {
            user_repo,
            sessions,
            clock,
            config,
        }
    }

    pub async fn list(&self) -> AuthResult<Vec<User>> {
        self.user_repo.list().await
    }

    pub async fn get(&self, user_id: UserId) -> AuthResult<User> {
        self.user_repo
            .find_by_id(user_id)
            .await?
            .ok_or(AuthError::UserNotFound)
    }

    pub async fn create(&self, actor: &CurrentUser, input: CreateUserInput) -> AuthResult<User> {
        actor.require_admin()?;

        if input.user_name.trim().is_empty()
            || input.email.trim().is_empty()
            || input.password.is_empty()
            || input.role.trim().is_empty()
        {
            return Err(AuthError::Validation(
                "username, email, password and role are required".to_string(),
            ));
        }

        let user_role = parse_role(&input.role)?;
        let email = Email::new(&input.email).map_err(|_| AuthError::InvalidEmailFormat)?;
        let user_name = parse_user_name(&input.user_name)?;
        let raw_password = RawPassword::new(input.password)?;

        if self.user_repo.exists_by_email(&email).await? {
            return Err(AuthError::EmailConflict);
        }
        if self.user_repo.exists_by_user_name(&user_name).await? {
            return Err(AuthError::UserNameConflict);
        }

        let password = UserPassword::hash(raw_password, self.config.pepper()).await?;

        let user = self
            .user_repo
            .create(&NewUser {
                user_name,
                email,
                password,
                user_role,
                profile: UserProfile {
                    lastname: filled(input.lastname),
                    celphone: filled(input.celphone),
                    secondary_role: filled(input.secondary_role),
                    profile_picture_url: filled(input.profile_picture_url),
                },
            })
            .await?;

        tracing::info!(
            actor = %actor.user_id,
            user_id = %user.user_id,
            role = %user.user_role,
            "User created"
        );
        Ok(user)
    }

    pub async fn update(
        &self,
        actor: &CurrentUser,
        user_id: UserId,
        input: UpdateUserInput,
    ) -> AuthResult<User> {
        actor.require_self_or_admin(user_id)?;

        let role = filled(input.role);
        let secondary_role = filled(input.secondary_role);
        if (role.is_some() || secondary_role.is_some()) && !actor.is_admin() {
            return Err(AuthError::Forbidden);
        }

        let mut user = self.get(user_id).await?;

        if let Some(name) = filled(input.user_name) {
            let name = parse_user_name(&name)?;
            if name != user.user_name && self.user_repo.exists_by_user_name(&name).await? {
                return Err(AuthError::UserNameConflict);
            }
            user.user_name = name;
        }
        if let Some(email) = filled(input.email) {
            let email = Email::new(&email).map_err(|_| AuthError::InvalidEmailFormat)?;
            if email != user.email && self.user_repo.exists_by_email(&email).await? {
                return Err(AuthError::EmailConflict);
            }
            user.email = email;
        }
        if let Some(code) = role {
            user.user_role = parse_role(&code)?;
        }
        if secondary_role.is_some() {
            user.profile.secondary_role = secondary_role;
        }
        if let Some(lastname) = filled(input.lastname) {
            user.profile.lastname = Some(lastname);
        }
        if let Some(celphone) = filled(input.celphone) {
            user.profile.celphone = Some(celphone);
        }
        if let Some(url) = filled(input.profile_picture_url) {
            user.profile.profile_picture_url = Some(url);
        }
        if let Some(password) = input.password.filter(|p| !p.trim().is_empty()) {
            let raw = RawPassword::new(password)?;
            user.password = UserPassword::hash(raw, self.config.pepper()).await?;
        }

        user.updated_at = self.clock.now();
        let user = self.user_repo.update(&user).await?;

        tracing::info!(actor = %actor.user_id, user_id = %user.user_id, "User updated");
        Ok(user)
    }

    pub async fn delete(&self, actor: &CurrentUser, user_id: UserId) -> AuthResult<()> {
        actor.require_admin()?;

        if !self.user_repo.delete(user_id).await? {
            return Err(AuthError::UserNotFound);
        }
        let revoked = self.sessions.delete_for_user(user_id).await?;

        tracing::info!(
            actor = %actor.user_id,
            user_id = %user_id,
            sessions_revoked = revoked,
            "User deleted"
        );
        Ok(())
    }
}
