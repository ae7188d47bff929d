//! Token Codec
//!
//! Compact HS256 JWS tokens:
//! `base64url(header).base64url(claims).base64url(hmac_sha256(header.claims))`
//!
//! The header must declare `"alg": "HS256"`; anything else (including
//! `"none"`) is rejected before the signature is even looked at.

use chrono::{DateTime, Utc};
use kernel::id::SessionId;
use platform::crypto::{from_base64url, hmac_sha256, to_base64url, verify_hmac_sha256};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::application::config::AuthConfig;
use crate::domain::entity::session::Session;
use crate::domain::value_object::user_id::UserId;
use crate::error::{AuthError, AuthResult};

const ALGORITHM: &str = "HS256";

#[derive(Debug, Serialize, Deserialize)]
struct TokenHeader {
    alg: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    typ: Option<String>,
}

/// Signed token payload
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenClaims {
    /// Issued at (seconds since epoch)
    pub iat: i64,
    /// Expires at (seconds since epoch)
    pub eat: i64,
    pub user_id: UserId,
    pub session: SessionId,
}

impl TokenClaims {
    /// A token is still valid during the second `eat` itself.
    #[inline]
    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        now.timestamp() > self.eat
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TokenError {
    #[error("malformed token")]
    Malformed,
    #[error("unsupported token algorithm: {0}")]
    UnsupportedAlgorithm(String),
    #[error("token signature mismatch")]
    BadSignature,
}

impl From<TokenError> for AuthError {
    fn from(err: TokenError) -> Self {
        tracing::debug!(error = %err, "Token verification failed");
        AuthError::InvalidToken
    }
}

/// Issues and verifies bearer tokens
#[derive(Clone)]
pub struct TokenCodec {
    secret: Vec<u8>,
}

impl TokenCodec {
    pub fn new(secret: impl Into<Vec<u8>>) -> Self {
        Self {
            secret: secret.into(),
        }
    }

    pub fn from_config(config: &AuthConfig) -> Self {
        Self::new(config.token_secret.clone())
    }

    /// Sign a token bound to `session`
    ///
    /// `iat`/`eat` are the session's creation and expiry instants.
    pub fn issue(&self, session: &Session) -> AuthResult<String> {
        let claims = TokenClaims {
            iat: session.created_at.timestamp(),
            eat: session.expires_at.timestamp(),
            user_id: session.user_id,
            session: session.session_id,
        };
        self.encode(&claims)
    }

    fn encode(&self, claims: &TokenClaims) -> AuthResult<String> {
        let header = TokenHeader {
            alg: ALGORITHM.to_string(),
            typ: Some("JWT".to_string()),
        };
        let header = serde_json::to_vec(&header)
            .map_err(|e| AuthError::Internal(format!("token header: {e}")))?;
        let payload = serde_json::to_vec(claims)
            .map_err(|e| AuthError::Internal(format!("token claims: {e}")))?;

        let signing_input = format!("{}.{}", to_base64url(&header), to_base64url(&payload));
        let signature = hmac_sha256(&self.secret, signing_input.as_bytes());

        Ok(format!("{}.{}", signing_input, to_base64url(&signature)))
    }

    /// Check structure, algorithm, and signature; return the claims
    ///
    /// Expiry is NOT checked here; see [`TokenClaims::is_expired`].
    pub fn verify(&self, token: &str) -> Result<TokenClaims, TokenError> {
        let mut parts = token.split('.');
        let (Some(header_b64), Some(payload_b64), Some(signature_b64), None) =
            (parts.next(), parts.next(), parts.next(), parts.next())
        else {
            return Err(TokenError::Malformed);
        };

        let header_bytes = from_base64url(header_b64).map_err(|_| TokenError::Malformed)?;
        let header: TokenHeader =
            serde_json::from_slice(&header_bytes).map_err(|_| TokenError::Malformed)?;
        if header.alg != ALGORITHM {
            return Err(TokenError::UnsupportedAlgorithm(header.alg));
        }

        let signature = from_base64url(signature_b64).map_err(|_| TokenError::Malformed)?;
        let signing_input = &token[..header_b64.len() + 1 + payload_b64.len()];
        if !verify_hmac_sha256(&self.secret, signing_input.as_bytes(), &signature) {
            return Err(TokenError::BadSignature);
        }

        let payload = from_base64url(payload_b64).map_err(|_| TokenError::Malformed)?;
        serde_json::from_slice(&payload).map_err(|_| TokenError::Malformed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone};

    fn session_at(created_at: DateTime<Utc>) -> Session {
        Session {
            session_id: SessionId::new(),
            user_id: UserId::new(7),
            created_at,
            expires_at: created_at + Duration::minutes(10),
        }
    }

    fn forge(header: &str, payload: &str, secret: &[u8]) -> String {
        let input = format!(
            "{}.{}",
            to_base64url(header.as_bytes()),
            to_base64url(payload.as_bytes())
        );
        let sig = hmac_sha256(secret, input.as_bytes());
        format!("{}.{}", input, to_base64url(&sig))
    }

    #[test]
    fn test_issue_verify_roundtrip() {
        let codec = TokenCodec::new("secret");
        let now = Utc.with_ymd_and_hms(2025, 1, 1, 12, 0, 0).unwrap();
        let session = session_at(now);

        let token = codec.issue(&session).unwrap();
        assert_eq!(token.split('.').count(), 3);

        let claims = codec.verify(&token).unwrap();
        assert_eq!(claims.user_id, UserId::new(7));
        assert_eq!(claims.session, session.session_id);
        assert_eq!(claims.iat, now.timestamp());
        assert_eq!(claims.eat, now.timestamp() + 600);
    }

    #[test]
    fn test_claims_wire_names() {
        let codec = TokenCodec::new("secret");
        let token = codec.issue(&session_at(Utc::now())).unwrap();
        let payload_b64 = token.split('.').nth(1).unwrap();
        let payload: serde_json::Value =
            serde_json::from_slice(&from_base64url(payload_b64).unwrap()).unwrap();
        for key in ["iat", "eat", "user_id", "session"] {
            assert!(payload.get(key).is_some(), "missing claim {key}");
        }
        assert!(payload["user_id"].is_i64());
        assert!(payload["session"].is_string());
    }

    #[test]
    fn test_flipped_signature_byte_fails() {
        let codec = TokenCodec::new("secret");
        let token = codec.issue(&session_at(Utc::now())).unwrap();

        let (input, sig_b64) = token.rsplit_once('.').unwrap();
        let mut sig = from_base64url(sig_b64).unwrap();
        sig[0] ^= 0x01;
        let tampered = format!("{}.{}", input, to_base64url(&sig));

        assert_eq!(codec.verify(&tampered), Err(TokenError::BadSignature));
    }

    #[test]
    fn test_other_secret_fails() {
        let token = TokenCodec::new("secret")
            .issue(&session_at(Utc::now()))
            .unwrap();
        assert_eq!(
            TokenCodec::new("other").verify(&token),
            Err(TokenError::BadSignature)
        );
    }

    #[test]
    fn test_non_hs256_algorithms_rejected() {
        let payload = format!(
            r#"{{"iat":1,"eat":2,"user_id":1,"session":"{}"}}"#,
            SessionId::new()
        );
        let codec = TokenCodec::new("secret");

        let none = forge(r#"{"alg":"none","typ":"JWT"}"#, &payload, b"secret");
        assert_eq!(
            codec.verify(&none),
            Err(TokenError::UnsupportedAlgorithm("none".to_string()))
        );

        let rs = forge(r#"{"alg":"RS256"}"#, &payload, b"secret");
        assert!(matches!(
            codec.verify(&rs),
            Err(TokenError::UnsupportedAlgorithm(_))
        ));

        // Unsigned form with empty signature segment
        let input = format!(
            "{}.{}.",
            to_base64url(br#"{"alg":"none"}"#),
            to_base64url(payload.as_bytes())
        );
        assert!(codec.verify(&input).is_err());
    }

    #[test]
    fn test_malformed_tokens() {
        let codec = TokenCodec::new("secret");
        for bad in ["", "abc", "a.b", "a.b.c.d", "!!.??.**"] {
            assert_eq!(codec.verify(bad), Err(TokenError::Malformed), "{bad}");
        }
    }

    #[test]
    fn test_expiry_boundary() {
        let now = Utc.with_ymd_and_hms(2025, 1, 1, 12, 0, 0).unwrap();
        let claims = TokenClaims {
            iat: now.timestamp(),
            eat: (now + Duration::minutes(10)).timestamp(),
            user_id: UserId::new(1),
            session: SessionId::new(),
        };
        assert!(!claims.is_expired(now));
        assert!(!claims.is_expired(now + Duration::minutes(10)));
        assert!(claims.is_expired(now + Duration::minutes(10) + Duration::seconds(1)));
    }

    #[test]
    fn test_invalid_token_maps_to_auth_error() {
        let err: AuthError = TokenError::BadSignature.into();
        assert!(matches!(err, AuthError::InvalidToken));
    }
}
