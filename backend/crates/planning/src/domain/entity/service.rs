//! Service Entity
//!
//! A scheduled event the team plays at.

use auth::domain::value_object::user_id::UserId;
use chrono::{DateTime, Utc};

use crate::domain::value_object::ids::ServiceId;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Service {
    pub service_id: ServiceId,
    pub name: String,
    /// Free-form, as entered by the organiser
    pub start_time: String,
    pub end_time: String,
    pub created_by: UserId,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Editable part of a service
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ServiceDraft {
    pub name: String,
    pub start_time: String,
    pub end_time: String,
}
