//! Login Use Case
//!
//! Authenticates a user by email and password and creates a session.

use std::sync::Arc;

use crate::application::config::AuthConfig;
use crate::application::session::SessionIssuer;
use crate::domain::repository::{SessionRegistry, UserRepository};
use crate::domain::value_object::{
    email::Email, user_id::UserId, user_password::RawPassword,
};
use crate::error::{AuthError, AuthResult};

/// Login input
pub struct LoginInput {
    pub email: String,
    pub password: String,
}

/// Login output
pub struct LoginOutput {
    pub user_id: UserId,
    pub token: String,
}

/// Login use case
pub struct LoginUseCase<U, S>
where
    U: UserRepository,
    S: SessionRegistry,
{
    user_repo: Arc<U>,
    issuer: SessionIssuer<S>,
    config: Arc<AuthConfig>,
}

impl<U, S> LoginUseCase<U, S>
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

    pub async fn execute(&self, input: LoginInput) -> AuthResult<LoginOutput> {
        if input.email.trim().is_empty() || input.password.is_empty() {
            return Err(AuthError::IncompleteFields);
        }

        let email = Email::new(&input.email).map_err(|_| AuthError::InvalidEmailFormat)?;

        let raw_password = match RawPassword::new(input.password) {
            Ok(raw) => raw,
            Err(AuthError::IncompleteFields) => return Err(AuthError::IncompleteFields),
            // A password the policy rejects can never match a stored hash.
            Err(_) => return Err(AuthError::InvalidCredentials),
        };

        let user = self
            .user_repo
            .find_by_email(&email)
            .await?
            .ok_or(AuthError::InvalidCredentials)?;

        if !user
            .password
            .verify(raw_password, self.config.pepper())
            .await?
        {
            return Err(AuthError::InvalidCredentials);
        }

        let issued = self.issuer.start(user.user_id).await?;

        tracing::info!(
            user_id = %user.user_id,
            session_id = %issued.session.session_id,
            "User logged in"
        );

        Ok(LoginOutput {
            user_id: user.user_id,
            token: issued.token,
        })
    }
}
