//! API DTOs (Data Transfer Objects)

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::application::{CreateUserInput, UpdateUserInput};
use crate::domain::entity::user::User;
use crate::domain::value_object::{user_id::UserId, user_role::UserRole};

// ============================================================================
// Register / Login / Logout
// ============================================================================

/// Register request
///
/// Missing fields deserialize as empty and are reported as incomplete.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct RegisterRequest {
    pub username: String,
    pub email: String,
    pub password: String,
}

/// Login request
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

/// Register / login response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TokenResponse {
    pub token: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MessageResponse {
    pub message: String,
}

impl MessageResponse {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

// ============================================================================
// Users
// ============================================================================

/// Public user representation; never carries the password hash
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserResponse {
    pub id: UserId,
    pub username: String,
    pub email: String,
    pub role: UserRole,
    pub lastname: Option<String>,
    pub celphone: Option<String>,
    pub secondary_role: Option<String>,
    pub profile_picture_url: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<&User> for UserResponse {
    fn from(user: &User) -> Self {
        Self {
            id: user.user_id,
            username: user.user_name.as_str().to_string(),
            email: user.email.as_str().to_string(),
            role: user.user_role,
            lastname: user.profile.lastname.clone(),
            celphone: user.profile.celphone.clone(),
            secondary_role: user.profile.secondary_role.clone(),
            profile_picture_url: user.profile.profile_picture_url.clone(),
            created_at: user.created_at,
            updated_at: user.updated_at,
        }
    }
}

impl From<User> for UserResponse {
    fn from(user: User) -> Self {
        Self::from(&user)
    }
}

/// POST /users request
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct CreateUserRequest {
    pub username: String,
    pub email: String,
    pub password: String,
    pub role: String,
    pub lastname: Option<String>,
    pub celphone: Option<String>,
    pub secondary_role: Option<String>,
    pub profile_picture_url: Option<String>,
}

impl From<CreateUserRequest> for CreateUserInput {
    fn from(req: CreateUserRequest) -> Self {
        Self {
            user_name: req.username,
            email: req.email,
            password: req.password,
            role: req.role,
            lastname: req.lastname,
            celphone: req.celphone,
            secondary_role: req.secondary_role,
            profile_picture_url: req.profile_picture_url,
        }
    }
}

/// PUT /users/{id} request
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct UpdateUserRequest {
    pub username: Option<String>,
    pub email: Option<String>,
    pub password: Option<String>,
    pub role: Option<String>,
    pub lastname: Option<String>,
    pub celphone: Option<String>,
    pub secondary_role: Option<String>,
    pub profile_picture_url: Option<String>,
}

impl From<UpdateUserRequest> for UpdateUserInput {
    fn from(req: UpdateUserRequest) -> Self {
        Self {
            user_name: req.username,
            email: req.email,
            password: req.password,
            role: req.role,
            lastname: req.lastname,
            celphone: req.celphone,
            secondary_role: req.secondary_role,
            profile_picture_url: req.profile_picture_url,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserUpdatedResponse {
    pub message: String,
    pub user: UserResponse,
}
