//! Logout Use Case
//!
//! Invalidates the session a bearer token is bound to.

use std::sync::Arc;

use crate::application::token::TokenCodec;
use crate::domain::repository::SessionRegistry;
use crate::error::{AuthError, AuthResult};

/// Logout use case
pub struct LogoutUseCase<S>
where
    S: SessionRegistry,
{
    sessions: Arc<S>,
    tokens: Arc<TokenCodec>,
}

impl<S> LogoutUseCase<S>
where
    S: SessionRegistry,
{
    pub fn new(sessions: Arc<S>, tokens: Arc<TokenCodec>) -> Self {
        Self { sessions, tokens }
    }

    /// Expired tokens are accepted so a client can always end its session.
    pub async fn execute(&self, token: &str) -> AuthResult<()> {
        let claims = self.tokens.verify(token)?;

        if !self.sessions.delete(claims.session).await? {
            return Err(AuthError::Unauthorized);
        }

        tracing::info!(
            user_id = %claims.user_id,
            session_id = %claims.session,
            "User logged out"
        );
        Ok(())
    }
}
