//! Session issuance shared by register and login.

use std::sync::Arc;

use kernel::clock::Clock;

use crate::application::config::AuthConfig;
use crate::application::token::TokenCodec;
use crate::domain::entity::session::Session;
use crate::domain::repository::SessionRegistry;
use crate::domain::value_object::user_id::UserId;
use crate::error::AuthResult;

/// A freshly created session and the bearer token bound to it
#[derive(Debug, Clone)]
pub struct IssuedSession {
    pub session: Session,
    pub token: String,
}

pub struct SessionIssuer<S>
where
    S: SessionRegistry,
{
    sessions: Arc<S>,
    tokens: Arc<TokenCodec>,
    clock: Arc<dyn Clock>,
    config: Arc<AuthConfig>,
}

impl<S> SessionIssuer<S>
where
    S: SessionRegistry,
{
    pub fn new(
        sessions: Arc<S>,
        tokens: Arc<TokenCodec>,
        clock: Arc<dyn Clock>,
        config: Arc<AuthConfig>,
    ) -> Self {
        Self {
            sessions,
            tokens,
            clock,
            config,
        }
    }

    pub async fn start(&self, user_id: UserId) -> AuthResult<IssuedSession> {
        let now = self.clock.now();
        let session = self
            .sessions
            .create(user_id, now, now + self.config.session_ttl())
            .await?;
        let token = self.tokens.issue(&session)?;

        tracing::debug!(
            user_id = %user_id,
            session_id = %session.session_id,
            expires_at = %session.expires_at,
            "Session started"
        );

        Ok(IssuedSession { session, token })
    }
}
