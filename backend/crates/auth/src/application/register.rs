//! Register Use Case
//!
//! Creates a new user account and logs it in.

use std::sync::Arc;

use crate::application::config::AuthConfig;
use crate::application::session::SessionIssuer;
use crate::domain::entity::user::{NewUser, UserProfile};
use crate::domain::repository::{SessionRegistry, UserRepository};
use crate::domain::value_object::{
    email::Email,
    user_id::UserId,
    user_name::{UserName, UserNameError},
    user_password::{RawPassword, UserPassword},
    user_role::UserRole,
};
use crate::error::{AuthError, AuthResult};

/// Register input
pub struct RegisterInput {
    pub user_name: String,
    pub email: String,
    pub password: String,
}

/// Register output
pub struct RegisterOutput {
    pub user_id: UserId,
    pub token: String,
}

/// Register use case
pub struct RegisterUseCase<U, S>
where
    U: UserRepository,
    S: SessionRegistry,
{
    user_repo: Arc<U>,
    issuer: SessionIssuer<S>,
    config: Arc<AuthConfig>,
}

impl<U, S> RegisterUseCase<U, S>
where
    U: UserRepository,
    S: SessionRegistry,
{
    pub fn new(user_repo: Arc<U>, issuer: SessionIssuer<S>, config: Arc<AuthConfig>) -> Self {
        Self {
            user_repo,
            issuer,
            config,
        }
    }

    pub async fn execute(&self, input: RegisterInput) -> AuthResult<RegisterOutput> {
        if input.user_name.trim().is_empty()
            || input.email.trim().is_empty()
            || input.password.is_empty()
        {
            return Err(AuthError::IncompleteFields);
        }

        let email = Email::new(&input.email).map_err(|_| AuthError::InvalidEmailFormat)?;
        let user_name = UserName::new(&input.user_name).map_err(|e| match e {
            UserNameError::Empty => AuthError::IncompleteFields,
            other => AuthError::Validation(other.to_string()),
        })?;
        let raw_password = RawPassword::new(input.password)?;

        if self.user_repo.exists_by_email(&email).await? {
            return Err(AuthError::EmailConflict);
        }
        if self.user_repo.exists_by_user_name(&user_name).await? {
            return Err(AuthError::UserNameConflict);
        }

        let password = UserPassword::hash(raw_password, self.config.pepper()).await?;

        // The store re-checks uniqueness; a concurrent duplicate loses here.
        let user = self
            .user_repo
            .create(&NewUser {
                user_name,
                email,
                password,
                user_role: UserRole::User,
                profile: UserProfile::default(),
            })
            .await?;

        let issued = self.issuer.start(user.user_id).await?;

        tracing::info!(
            user_id = %user.user_id,
            session_id = %issued.session.session_id,
            "User registered"
        );

        Ok(RegisterOutput {
            user_id: user.user_id,
            token: issued.token,
        })
    }
}
