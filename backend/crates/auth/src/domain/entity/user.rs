//! User Entity
//!
//! A registered account. The password field always holds an Argon2id hash.

use chrono::{DateTime, Utc};

use crate::domain::value_object::{
    email::Email, user_id::UserId, user_name::UserName, user_password::UserPassword,
    user_role::UserRole,
};

/// Optional profile attributes
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UserProfile {
    pub lastname: Option<String>,
    pub celphone: Option<String>,
    /// Free-form secondary role (instrument, section, ...)
    pub secondary_role: Option<String>,
    pub profile_picture_url: Option<String>,
}

/// Persisted user
#[derive(Debug, Clone)]
pub struct User {
    pub user_id: UserId,
    pub user_name: UserName,
    pub email: Email,
    pub password: UserPassword,
    pub user_role: UserRole,
    pub profile: UserProfile,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// User about to be inserted; the store assigns the id and timestamps
#[derive(Debug, Clone)]
pub struct NewUser {
    pub user_name: UserName,
    pub email: Email,
    pub password: UserPassword,
    pub user_role: UserRole,
    pub profile: UserProfile,
}

impl User {
    #[inline]
    pub fn is_admin(&self) -> bool {
        self.user_role.is_admin()
    }
}
