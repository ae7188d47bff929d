//! Auth (Authentication) Backend Module
//!
//! Clean Architecture structure:
//! - `domain/` - Entities, value objects, repository traits
//! - `application/` - Use cases (register, login, logout, authenticate, accounts)
//! - `infra/` - PostgreSQL credential store, in-memory session registry
//! - `presentation/` - HTTP handlers, DTOs, router, auth middleware
//!
//! ## Features
//! - Registration and login with email + password
//! - Bearer tokens (HS256) bound to a server-side session
//! - Sessions expire 10 minutes after creation; both the token's `eat`
//!   claim and the session's own expiry are enforced
//! - Role-based access (`user`, `admin`) for account administration
//!
//! ## Security Model
//! - Passwords hashed with Argon2id as an explicit use-case step
//! - Session ids are random UUID v4 values
//! - Tokens declaring any algorithm other than HS256 are rejected
//! - Login failures do not reveal whether the email exists

pub mod application;
pub mod domain;
pub mod error;
pub mod infra;
pub mod presentation;

#[cfg(test)]
mod tests;

// Re-exports for convenience
pub use application::config::AuthConfig;
pub use application::{CurrentUser, TokenCodec};
pub use error::{AuthError, AuthResult};
pub use infra::{InMemorySessionRegistry, InMemoryUserRepository, PgUserRepository};
pub use presentation::{AuthAppState, auth_router, require_auth, users_router};

// Re-export kernel error types for unified error handling
pub use kernel::error::{
    app_error::{AppError, AppResult},
    kind::ErrorKind,
};
