//! User Password Value Object
//!
//! Domain wrappers over `platform::password`.
//!
//! Hashing is always an explicit step performed by a use case before a
//! user record is created or updated: repositories only ever receive a
//! [`UserPassword`], never plaintext.
//!
//! ## Usage
//! ```rust,ignore
//! let raw = RawPassword::new(input.password)?;
//! let hashed = UserPassword::hash(raw, config.pepper()).await?;
//! ```

use platform::password::{
    ClearTextPassword, HashedPassword, PasswordHashError, PasswordPolicyError,
};
use std::fmt;

use crate::error::{AuthError, AuthResult};

// ============================================================================
// Raw Password (User Input)
// ============================================================================

/// Raw password from user input, zeroized when dropped
pub struct RawPassword(ClearTextPassword);

impl RawPassword {
    /// Validate user input
    ///
    /// Blank input maps to [`AuthError::IncompleteFields`]; other policy
    /// failures map to [`AuthError::Validation`].
    pub fn new(raw: String) -> AuthResult<Self> {
        ClearTextPassword::new(raw).map(Self).map_err(|e| match e {
            PasswordPolicyError::EmptyOrWhitespace => AuthError::IncompleteFields,
            other => AuthError::Validation(other.to_string()),
        })
    }
}

impl fmt::Debug for RawPassword {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("RawPassword").field(&"[REDACTED]").finish()
    }
}

// ============================================================================
// User Password (Hashed, for storage)
// ============================================================================

/// Argon2id PHC string as stored in the credential store
#[derive(Clone, PartialEq, Eq)]
pub struct UserPassword(HashedPassword);

impl UserPassword {
    /// Hash a raw password on the blocking pool
    pub async fn hash(raw: RawPassword, pepper: Option<Vec<u8>>) -> AuthResult<Self> {
        raw.0
            .hash_blocking(pepper)
            .await
            .map(Self)
            .map_err(|e| AuthError::Hashing(e.to_string()))
    }

    /// Verify a raw password against this hash on the blocking pool
    ///
    /// Constant time with respect to the password contents.
    pub async fn verify(&self, raw: RawPassword, pepper: Option<Vec<u8>>) -> AuthResult<bool> {
        self.0
            .clone()
            .verify_blocking(raw.0, pepper)
            .await
            .map_err(|e| AuthError::Hashing(e.to_string()))
    }

    /// Create from PHC string (from database)
    pub fn from_phc_string(phc_string: impl Into<String>) -> AuthResult<Self> {
        HashedPassword::from_phc_string(phc_string)
            .map(Self)
            .map_err(|e: PasswordHashError| AuthError::Internal(format!("stored hash: {e}")))
    }

    pub fn as_phc_string(&self) -> &str {
        self.0.as_phc_string()
    }
}

impl fmt::Debug for UserPassword {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("UserPassword")
            .field("hash", &"[HASH]")
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn raw(s: &str) -> RawPassword {
        RawPassword::new(s.to_string()).unwrap()
    }

    #[test]
    fn test_raw_password_validation() {
        assert!(RawPassword::new("x".to_string()).is_ok());
        assert!(matches!(
            RawPassword::new("  ".to_string()),
            Err(AuthError::IncompleteFields)
        ));
        assert!(matches!(
            RawPassword::new("a".repeat(200)),
            Err(AuthError::Validation(_))
        ));
    }

    #[tokio::test]
    async fn test_hash_and_verify() {
        let hashed = UserPassword::hash(raw("Secret123!"), None).await.unwrap();
        assert!(hashed.as_phc_string().starts_with("$argon2id$"));
        assert!(hashed.verify(raw("Secret123!"), None).await.unwrap());
        assert!(!hashed.verify(raw("secret123!"), None).await.unwrap());
    }

    #[tokio::test]
    async fn test_pepper_must_match() {
        let pepper = Some(b"pepper".to_vec());
        let hashed = UserPassword::hash(raw("pw"), pepper.clone()).await.unwrap();
        assert!(hashed.verify(raw("pw"), pepper).await.unwrap());
        assert!(!hashed.verify(raw("pw"), None).await.unwrap());
    }

    #[tokio::test]
    async fn test_phc_string_roundtrip() {
        let hashed = UserPassword::hash(raw("roundtrip"), None).await.unwrap();
        let restored = UserPassword::from_phc_string(hashed.as_phc_string()).unwrap();
        assert!(restored.verify(raw("roundtrip"), None).await.unwrap());
        assert!(UserPassword::from_phc_string("plaintext").is_err());
    }

    #[test]
    fn test_debug_redaction() {
        let debug = format!("{:?}", raw("SecretPassword"));
        assert!(debug.contains("REDACTED"));
        assert!(!debug.contains("Secret"));
    }
}
