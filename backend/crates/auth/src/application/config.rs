//! Application Configuration
//!
//! Configuration for the Auth application layer.

use platform::crypto::random_bytes;
use std::fmt;
use std::time::Duration;

/// Session lifetime: tokens and registry entries both expire after this.
pub const SESSION_TTL: Duration = Duration::from_secs(10 * 60);

/// Auth application configuration
#[derive(Clone)]
pub struct AuthConfig {
    /// HMAC-SHA256 key for bearer tokens (`JWT_SECRET_KEY`)
    pub token_secret: Vec<u8>,
    /// Session and token lifetime
    pub session_ttl: Duration,
    /// Password pepper (optional, application-wide secret)
    pub password_pepper: Option<Vec<u8>>,
}

impl AuthConfig {
    pub fn new(token_secret: impl Into<Vec<u8>>) -> Self {
        Self {
            token_secret: token_secret.into(),
            session_ttl: SESSION_TTL,
            password_pepper: None,
        }
    }

    /// Create config with a random token secret (for development)
    ///
    /// Tokens do not survive a restart with this secret.
    pub fn with_random_secret() -> Self {
        Self::new(random_bytes(32))
    }

    pub fn with_pepper(mut self, pepper: impl Into<Vec<u8>>) -> Self {
        self.password_pepper = Some(pepper.into());
        self
    }

    /// Session TTL as a chrono duration
    pub fn session_ttl(&self) -> chrono::Duration {
        chrono::Duration::from_std(self.session_ttl).unwrap_or(chrono::Duration::minutes(10))
    }

    /// Owned copy of the pepper for the blocking hashing pool
    pub fn pepper(&self) -> Option<Vec<u8>> {
        self.password_pepper.clone()
    }
}

impl fmt::Debug for AuthConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AuthConfig")
            .field("token_secret", &"[REDACTED]")
            .field("session_ttl", &self.session_ttl)
            .field(
                "password_pepper",
                &self.password_pepper.as_ref().map(|_| "[REDACTED]"),
            )
            .finish()
    }
}
