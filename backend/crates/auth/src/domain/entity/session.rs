//! Session Entity
//!
//! An in-memory login session. Created on register/login, never mutated,
//! removed on logout or by the expiry sweep.

use chrono::{DateTime, Utc};
use kernel::id::SessionId;

use crate::domain::value_object::user_id::UserId;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Session {
    pub session_id: SessionId,
    pub user_id: UserId,
    pub created_at: DateTime<Utc>,
    pub expires_at: DateTime<Utc>,
}

impl Session {
    /// A session is still usable at exactly `expires_at`.
    #[inline]
    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        now > self.expires_at
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    #[test]
    fn test_expiry_boundary_is_inclusive() {
        let created_at = Utc::now();
        let session = Session {
            session_id: SessionId::new(),
            user_id: UserId::new(1),
            created_at,
            expires_at: created_at + Duration::minutes(10),
        };

        assert!(!session.is_expired(created_at));
        assert!(!session.is_expired(session.expires_at));
        assert!(session.is_expired(session.expires_at + Duration::seconds(1)));
    }
}
