//! Authenticate Use Case
//!
//! Resolves a bearer token to the current user. This is the single
//! request guard behind every protected route.

use std::sync::Arc;

use kernel::clock::Clock;
use kernel::id::SessionId;

use crate::application::token::TokenCodec;
use crate::domain::repository::{SessionRegistry, UserRepository};
use crate::domain::value_object::{user_id::UserId, user_role::UserRole};
use crate::error::{AuthError, AuthResult};

/// Authenticated caller, stored in request extensions by the middleware
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CurrentUser {
    pub user_id: UserId,
    pub user_role: UserRole,
    pub session_id: SessionId,
}

impl CurrentUser {
    #[inline]
    pub fn is_admin(&self) -> bool {
        self.user_role.is_admin()
    }

    /// `Forbidden` unless the caller is an admin
    pub fn require_admin(&self) -> AuthResult<()> {
        if self.is_admin() {
            Ok(())
        } else {
            Err(AuthError::Forbidden)
        }
    }

    /// `Forbidden` unless the caller is `user_id` or an admin
    pub fn require_self_or_admin(&self, user_id: UserId) -> AuthResult<()> {
        if self.user_id == user_id || self.is_admin() {
            Ok(())
        } else {
            Err(AuthError::Forbidden)
        }
    }
}

/// Authenticate use case
pub struct AuthenticateUseCase<U, S>
where
    U: UserRepository,
    S: SessionRegistry,
{
    user_repo: Arc<U>,
    sessions: Arc<S>,
    tokens: Arc<TokenCodec>,
    clock: Arc<dyn Clock>,
}

impl<U, S> AuthenticateUseCase<U, S>
where
    U: UserRepository,
    S: SessionRegistry,
{
    pub fn new(
        user_repo: Arc<U>,
        sessions: Arc<S>,
        tokens: Arc<TokenCodec>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            user_repo,
            sessions,
            tokens,
            clock,
        }
    }

    /// Both the token's `eat` and the session's own expiry are enforced.
    pub async fn execute(&self, token: &str) -> AuthResult<CurrentUser> {
        let claims = self.tokens.verify(token)?;
        let now = self.clock.now();

        if claims.is_expired(now) {
            return Err(AuthError::TokenExpired);
        }

        let session = self
            .sessions
            .find(claims.session)
            .await?
            .ok_or(AuthError::Unauthorized)?;

        if session.is_expired(now) {
            self.sessions.delete(session.session_id).await?;
            return Err(AuthError::TokenExpired);
        }

        if session.user_id != claims.user_id {
            tracing::warn!(
                session_id = %session.session_id,
                "Token user does not match session owner"
            );
            return Err(AuthError::InvalidToken);
        }

        // Deleted accounts lose access immediately.
        let user = self
            .user_repo
            .find_by_id(session.user_id)
            .await?
            .ok_or(AuthError::Unauthorized)?;

        Ok(CurrentUser {
            user_id: user.user_id,
            user_role: user.user_role,
            session_id: session.session_id,
        })
    }
}
