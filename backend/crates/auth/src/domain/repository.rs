//! Repository Traits
//!
//! Interfaces for the credential store and the session registry.
//! Implementations are in the infrastructure layer.

use chrono::{DateTime, Utc};
use kernel::id::SessionId;

use crate::domain::entity::{
    session::Session,
    user::{NewUser, User},
};
use crate::domain::value_object::{email::Email, user_id::UserId, user_name::UserName};
use crate::error::AuthResult;

/// Credential store
#[trait_variant::make(UserRepository: Send)]
pub trait LocalUserRepository {
    /// Insert a user and return it with its assigned id.
    ///
    /// Unique violations surface as `EmailConflict` / `UserNameConflict`.
    async fn create(&self, user: &NewUser) -> AuthResult<User>;

    async fn find_by_id(&self, user_id: UserId) -> AuthResult<Option<User>>;

    /// Users matching any of `user_ids`; unknown ids are skipped
    async fn find_by_ids(&self, user_ids: &[UserId]) -> AuthResult<Vec<User>>;

    async fn find_by_email(&self, email: &Email) -> AuthResult<Option<User>>;

    async fn exists_by_email(&self, email: &Email) -> AuthResult<bool>;

    async fn exists_by_user_name(&self, user_name: &UserName) -> AuthResult<bool>;

    /// All users ordered by id
    async fn list(&self) -> AuthResult<Vec<User>>;

    /// Overwrite a user record; `UserNotFound` if it no longer exists
    async fn update(&self, user: &User) -> AuthResult<User>;

    /// Returns whether a record was removed
    async fn delete(&self, user_id: UserId) -> AuthResult<bool>;
}

/// Session registry
///
/// Lookups return expired sessions as-is; callers decide with
/// [`Session::is_expired`]. Expired entries are removed by
/// [`LocalSessionRegistry::purge_expired`].
#[trait_variant::make(SessionRegistry: Send)]
pub trait LocalSessionRegistry {
    /// Create a session with a fresh random id, unique among live sessions
    async fn create(
        &self,
        user_id: UserId,
        created_at: DateTime<Utc>,
        expires_at: DateTime<Utc>,
    ) -> AuthResult<Session>;

    async fn find(&self, session_id: SessionId) -> AuthResult<Option<Session>>;

    /// Returns whether a session was removed
    async fn delete(&self, session_id: SessionId) -> AuthResult<bool>;

    /// Remove every session for a user (account deletion)
    async fn delete_for_user(&self, user_id: UserId) -> AuthResult<usize>;

    /// Remove sessions with `expires_at < now`
    async fn purge_expired(&self, now: DateTime<Utc>) -> AuthResult<usize>;
}
