//! Planning Error Types
//!
//! Planning-specific error variants that integrate with the unified
//! `kernel::error::AppError` system.

use auth::AuthError;
use axum::extract::rejection::{JsonRejection, PathRejection};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use kernel::error::{app_error::AppError, conversions::kind_for_sqlx_error, kind::ErrorKind};
use thiserror::Error;

pub type PlanningResult<T> = Result<T, PlanningError>;

#[derive(Debug, Error)]
pub enum PlanningError {
    #[error("Service not found")]
    ServiceNotFound,

    #[error("Song not found")]
    SongNotFound,

    /// The user has no assignment on the service
    #[error("Assignment not found")]
    AssignmentNotFound,

    /// Malformed body, empty id list, empty name
    #[error("Invalid data")]
    InvalidData,

    #[error("{0}")]
    Validation(String),

    /// Authorization failures and user lookups
    #[error(transparent)]
    Auth(#[from] AuthError),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl PlanningError {
    pub fn status_code(&self) -> StatusCode {
        StatusCode::from_u16(self.kind().status_code())
            .unwrap_or(StatusCode::INTERNAL_SERVER_ERROR)
    }

    pub fn kind(&self) -> ErrorKind {
        match self {
            PlanningError::ServiceNotFound
            | PlanningError::SongNotFound
            | PlanningError::AssignmentNotFound => ErrorKind::NotFound,
            PlanningError::InvalidData | PlanningError::Validation(_) => ErrorKind::BadRequest,
            PlanningError::Auth(e) => e.kind(),
            PlanningError::Database(e) => kind_for_sqlx_error(e),
            PlanningError::Internal(_) => ErrorKind::InternalServerError,
        }
    }

    /// Database errors keep their SQLSTATE classification.
    pub fn into_app_error(self) -> AppError {
        match self {
            PlanningError::Auth(e) => e.into_app_error(),
            PlanningError::Database(e) => AppError::from(e),
            other => AppError::new(other.kind(), other.to_string()),
        }
    }

    fn log(&self) {
        match self {
            PlanningError::Database(e) => {
                tracing::error!(error = %e, "Planning database error");
            }
            PlanningError::Internal(msg) => {
                tracing::error!(message = %msg, "Planning internal error");
            }
            _ => {
                tracing::debug!(error = %self, "Planning error");
            }
        }
    }
}

impl IntoResponse for PlanningError {
    fn into_response(self) -> Response {
        match self {
            PlanningError::Auth(e) => e.into_response(),
            other => {
                other.log();
                other.into_app_error().into_response()
            }
        }
    }
}

impl From<JsonRejection> for PlanningError {
    fn from(rejection: JsonRejection) -> Self {
        tracing::debug!(reason = %rejection.body_text(), "Rejected request body");
        PlanningError::InvalidData
    }
}

impl From<PathRejection> for PlanningError {
    fn from(rejection: PathRejection) -> Self {
        tracing::debug!(reason = %rejection.body_text(), "Rejected path parameter");
        PlanningError::Validation("Invalid id".to_string())
    }
}
