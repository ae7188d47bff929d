//! In-Memory Implementations
//!
//! `InMemorySessionRegistry` is the production session store (one instance
//! per process, shared through `Arc`). `InMemoryUserRepository` backs
//! tests and database-less development runs.

use chrono::{DateTime, Utc};
use kernel::id::SessionId;
use std::collections::{BTreeMap, HashMap};
use tokio::sync::RwLock;

use crate::domain::entity::{
    session::Session,
    user::{NewUser, User},
};
use crate::domain::repository::{SessionRegistry, UserRepository};
use crate::domain::value_object::{email::Email, user_id::UserId, user_name::UserName};
use crate::error::{AuthError, AuthResult};

// ============================================================================
// Session Registry
// ============================================================================

#[derive(Default)]
pub struct InMemorySessionRegistry {
    sessions: RwLock<HashMap<SessionId, Session>>,
}

impl InMemorySessionRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored sessions, expired ones included
    pub async fn len(&self) -> usize {
        self.sessions.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.sessions.read().await.is_empty()
    }
}

impl SessionRegistry for InMemorySessionRegistry {
    async fn create(
        &self,
        user_id: UserId,
        created_at: DateTime<Utc>,
        expires_at: DateTime<Utc>,
    ) -> AuthResult<Session> {
        let mut sessions = self.sessions.write().await;

        let session_id = loop {
            let candidate = SessionId::new();
            if !sessions.contains_key(&candidate) {
                break candidate;
            }
            tracing::warn!("Session id collision, regenerating");
        };

        let session = Session {
            session_id,
            user_id,
            created_at,
            expires_at,
        };
        sessions.insert(session_id, session.clone());
        Ok(session)
    }

    async fn find(&self, session_id: SessionId) -> AuthResult<Option<Session>> {
        Ok(self.sessions.read().await.get(&session_id).cloned())
    }

    async fn delete(&self, session_id: SessionId) -> AuthResult<bool> {
        Ok(self.sessions.write().await.remove(&session_id).is_some())
    }

    async fn delete_for_user(&self, user_id: UserId) -> AuthResult<usize> {
        let mut sessions = self.sessions.write().await;
        let before = sessions.len();
        sessions.retain(|_, s| s.user_id != user_id);
        Ok(before - sessions.len())
    }

    async fn purge_expired(&self, now: DateTime<Utc>) -> AuthResult<usize> {
        let mut sessions = self.sessions.write().await;
        let before = sessions.len();
        sessions.retain(|_, s| !s.is_expired(now));
        Ok(before - sessions.len())
    }
}

// ============================================================================
// User Repository
// ============================================================================

#[derive(Default)]
struct UserTable {
    last_id: i64,
    rows: BTreeMap<UserId, User>,
}

impl UserTable {
    fn conflict_with(&self, except: Option<UserId>, email: &Email, name: &UserName) -> Option<AuthError> {
        let others = self.rows.values().filter(|u| Some(u.user_id) != except);
        for user in others {
            if &user.email == email {
                return Some(AuthError::EmailConflict);
            }
            if &user.user_name == name {
                return Some(AuthError::UserNameConflict);
            }
        }
        None
    }
}

#[derive(Default)]
pub struct InMemoryUserRepository {
    table: RwLock<UserTable>,
}

impl InMemoryUserRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

impl UserRepository for InMemoryUserRepository {
    async fn create(&self, user: &NewUser) -> AuthResult<User> {
        let mut table = self.table.write().await;

        if let Some(conflict) = table.conflict_with(None, &user.email, &user.user_name) {
            return Err(conflict);
        }

        table.last_id += 1;
        let now = Utc::now();
        let created = User {
            user_id: UserId::new(table.last_id),
            user_name: user.user_name.clone(),
            email: user.email.clone(),
            password: user.password.clone(),
            user_role: user.user_role,
            profile: user.profile.clone(),
            created_at: now,
            updated_at: now,
        };
        table.rows.insert(created.user_id, created.clone());
        Ok(created)
    }

    async fn find_by_id(&self, user_id: UserId) -> AuthResult<Option<User>> {
        Ok(self.table.read().await.rows.get(&user_id).cloned())
    }

    async fn find_by_ids(&self, user_ids: &[UserId]) -> AuthResult<Vec<User>> {
        let table = self.table.read().await;
        Ok(table
            .rows
            .values()
            .filter(|u| user_ids.contains(&u.user_id))
            .cloned()
            .collect())
    }

    async fn find_by_email(&self, email: &Email) -> AuthResult<Option<User>> {
        let table = self.table.read().await;
        Ok(table.rows.values().find(|u| &u.email == email).cloned())
    }

    async fn exists_by_email(&self, email: &Email) -> AuthResult<bool> {
        let table = self.table.read().await;
        Ok(table.rows.values().any(|u| &u.email == email))
    }

    async fn exists_by_user_name(&self, user_name: &UserName) -> AuthResult<bool> {
        let table = self.table.read().await;
        Ok(table.rows.values().any(|u| &u.user_name == user_name))
    }

    async fn list(&self) -> AuthResult<Vec<User>> {
        Ok(self.table.read().await.rows.values().cloned().collect())
    }

    async fn update(&self, user: &User) -> AuthResult<User> {
        let mut table = self.table.write().await;

        if !table.rows.contains_key(&user.user_id) {
            return Err(AuthError::UserNotFound);
        }
        if let Some(conflict) = table.conflict_with(Some(user.user_id), &user.email, &user.user_name)
        {
            return Err(conflict);
        }

        table.rows.insert(user.user_id, user.clone());
        Ok(user.clone())
    }

    async fn delete(&self, user_id: UserId) -> AuthResult<bool> {
        Ok(self.table.write().await.rows.remove(&user_id).is_some())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::entity::user::UserProfile;
    use crate::domain::value_object::{user_password::UserPassword, user_role::UserRole};
    use chrono::Duration;
    use std::collections::HashSet;
    use std::sync::Arc;

    // Any syntactically valid PHC string works for storage tests.
    const PHC: &str = "$argon2id$v=19$m=19456,t=2,p=1$c29tZXNhbHQ$iWh06vD8Fy27wf9npn6FXWiCX4K6pW6Ue1Bnzz07Z8A";

    fn new_user(name: &str, email: &str) -> NewUser {
        NewUser {
            user_name: UserName::new(name).unwrap(),
            email: Email::new(email).unwrap(),
            password: UserPassword::from_phc_string(PHC).unwrap(),
            user_role: UserRole::User,
            profile: UserProfile::default(),
        }
    }

    #[tokio::test]
    async fn test_session_create_find_delete() {
        let registry = InMemorySessionRegistry::new();
        let now = Utc::now();

        let session = registry
            .create(UserId::new(1), now, now + Duration::minutes(10))
            .await
            .unwrap();

        assert_eq!(
            registry.find(session.session_id).await.unwrap(),
            Some(session.clone())
        );
        assert!(registry.delete(session.session_id).await.unwrap());
        assert!(!registry.delete(session.session_id).await.unwrap());
        assert_eq!(registry.find(session.session_id).await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_session_ids_differ_for_same_user() {
        let registry = InMemorySessionRegistry::new();
        let now = Utc::now();
        let a = registry.create(UserId::new(1), now, now).await.unwrap();
        let b = registry.create(UserId::new(1), now, now).await.unwrap();
        assert_ne!(a.session_id, b.session_id);
        assert_eq!(registry.len().await, 2);
    }

    #[tokio::test]
    async fn test_purge_expired() {
        let registry = InMemorySessionRegistry::new();
        let now = Utc::now();
        let live = registry
            .create(UserId::new(1), now, now + Duration::minutes(10))
            .await
            .unwrap();
        registry
            .create(UserId::new(2), now - Duration::minutes(20), now - Duration::minutes(10))
            .await
            .unwrap();

        assert_eq!(registry.purge_expired(now).await.unwrap(), 1);
        assert_eq!(registry.len().await, 1);
        assert!(registry.find(live.session_id).await.unwrap().is_some());
    }

    #[tokio::test]
    async fn test_delete_for_user() {
        let registry = InMemorySessionRegistry::new();
        let now = Utc::now();
        for _ in 0..3 {
            registry.create(UserId::new(9), now, now).await.unwrap();
        }
        registry.create(UserId::new(1), now, now).await.unwrap();

        assert_eq!(registry.delete_for_user(UserId::new(9)).await.unwrap(), 3);
        assert_eq!(registry.len().await, 1);
    }

    #[tokio::test]
    async fn test_concurrent_session_creation() {
        let registry = Arc::new(InMemorySessionRegistry::new());
        let now = Utc::now();

        let handles: Vec<_> = (0..64)
            .map(|i| {
                let registry = registry.clone();
                tokio::spawn(async move {
                    registry
                        .create(UserId::new(i), now, now + Duration::minutes(10))
                        .await
                        .unwrap()
                })
            })
            .collect();

        let mut ids = HashSet::new();
        for handle in handles {
            ids.insert(handle.await.unwrap().session_id);
        }

        assert_eq!(ids.len(), 64);
        assert_eq!(registry.len().await, 64);
    }

    #[tokio::test]
    async fn test_user_create_assigns_ids_and_enforces_uniqueness() {
        let repo = InMemoryUserRepository::new();

        let a = repo.create(&new_user("ana", "ana@example.com")).await.unwrap();
        let b = repo.create(&new_user("ben", "ben@example.com")).await.unwrap();
        assert_eq!(a.user_id, UserId::new(1));
        assert_eq!(b.user_id, UserId::new(2));

        assert!(matches!(
            repo.create(&new_user("other", "ana@example.com")).await,
            Err(AuthError::EmailConflict)
        ));
        assert!(matches!(
            repo.create(&new_user("ana", "new@example.com")).await,
            Err(AuthError::UserNameConflict)
        ));
    }

    #[tokio::test]
    async fn test_user_lookup_update_delete() {
        let repo = InMemoryUserRepository::new();
        let a = repo.create(&new_user("ana", "ana@example.com")).await.unwrap();
        repo.create(&new_user("ben", "ben@example.com")).await.unwrap();

        let email = Email::new("ANA@example.com").unwrap();
        assert_eq!(
            repo.find_by_email(&email).await.unwrap().map(|u| u.user_id),
            Some(a.user_id)
        );
        assert_eq!(
            repo.find_by_ids(&[a.user_id, UserId::new(99)]).await.unwrap().len(),
            1
        );

        let mut renamed = a.clone();
        renamed.user_name = UserName::new("ben").unwrap();
        assert!(matches!(
            repo.update(&renamed).await,
            Err(AuthError::UserNameConflict)
        ));

        renamed.user_name = UserName::new("anita").unwrap();
        assert_eq!(repo.update(&renamed).await.unwrap().user_name.as_str(), "anita");

        assert!(repo.delete(a.user_id).await.unwrap());
        assert!(!repo.delete(a.user_id).await.unwrap());
        assert!(matches!(
            repo.update(&renamed).await,
            Err(AuthError::UserNotFound)
        ));
        assert_eq!(repo.list().await.unwrap().len(), 1);
    }
}
