//! Error conversions
//!
//! Database errors to [`AppError`] and the HTTP rendering of [`AppError`].

#[cfg(feature = "sqlx")]
use super::app_error::AppError;
#[cfg(feature = "sqlx")]
use super::kind::ErrorKind;

// ============================================================================
// SQLx conversions (feature-gated)
// ============================================================================

/// PostgreSQL の SQLSTATE から [`ErrorKind`] を決定する
///
/// https://www.postgresql.org/docs/current/errcodes-appendix.html
#[cfg(feature = "sqlx")]
pub fn kind_for_sqlstate(code: &str) -> ErrorKind {
    match code {
        // Class 23: integrity constraint violation
        "23505" | "23503" | "23000" | "23001" => ErrorKind::Conflict,
        "23502" | "23514" => ErrorKind::BadRequest,
        // Class 53 / 57: resources, operator intervention
        "53000" | "53100" | "53200" | "53300" | "57000" | "57014" | "57P01" | "57P02"
        | "57P03" => ErrorKind::ServiceUnavailable,
        _ => ErrorKind::InternalServerError,
    }
}

/// sqlx のエラーを [`ErrorKind`] に分類する
///
/// ドメインエラーの `kind()` もこの分類を使う。
#[cfg(feature = "sqlx")]
pub fn kind_for_sqlx_error(err: &sqlx::Error) -> ErrorKind {
    match err {
        sqlx::Error::RowNotFound => ErrorKind::NotFound,
        sqlx::Error::PoolTimedOut | sqlx::Error::PoolClosed | sqlx::Error::Io(_) => {
            ErrorKind::ServiceUnavailable
        }
        sqlx::Error::Database(db_err) => db_err
            .code()
            .map(|code| kind_for_sqlstate(code.as_ref()))
            .unwrap_or(ErrorKind::InternalServerError),
        _ => ErrorKind::InternalServerError,
    }
}

/// 一意制約違反 (23505) の場合、違反した制約名を返す
#[cfg(feature = "sqlx")]
pub fn unique_violation_constraint(err: &sqlx::Error) -> Option<String> {
    match err {
        sqlx::Error::Database(db_err) if db_err.code().as_deref() == Some("23505") => {
            Some(db_err.constraint().unwrap_or_default().to_string())
        }
        _ => None,
    }
}

#[cfg(feature = "sqlx")]
impl From<sqlx::Error> for AppError {
    fn from(err: sqlx::Error) -> Self {
        let kind = kind_for_sqlx_error(&err);
        let message = match kind {
            ErrorKind::NotFound => "Record not found",
            ErrorKind::Conflict => "Duplicate or conflicting record",
            ErrorKind::BadRequest => "Constraint violation",
            ErrorKind::ServiceUnavailable => "Database unavailable",
            _ => "Database error",
        };
        AppError::new(kind, message).with_source(err)
    }
}

// ============================================================================
// Axum conversions (feature-gated)
// ============================================================================

/// `{"error": "<message>"}` 形式でレスポンスを返す
#[cfg(feature = "axum")]
impl axum::response::IntoResponse for super::app_error::AppError {
    fn into_response(self) -> axum::response::Response {
        use axum::Json;
        use axum::http::StatusCode;

        let status =
            StatusCode::from_u16(self.status_code()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);

        (status, Json(serde_json::json!({ "error": self.public_message() }))).into_response()
    }
}

#[cfg(test)]
mod tests {
    #[cfg(feature = "sqlx")]
    use super::*;

    #[cfg(feature = "sqlx")]
    #[test]
    fn test_sqlstate_mapping() {
        assert_eq!(kind_for_sqlstate("23505"), ErrorKind::Conflict);
        assert_eq!(kind_for_sqlstate("23502"), ErrorKind::BadRequest);
        assert_eq!(kind_for_sqlstate("57P01"), ErrorKind::ServiceUnavailable);
        assert_eq!(kind_for_sqlstate("42P01"), ErrorKind::InternalServerError);
    }

    #[cfg(feature = "sqlx")]
    #[test]
    fn test_sqlx_error_classification() {
        assert_eq!(kind_for_sqlx_error(&sqlx::Error::RowNotFound), ErrorKind::NotFound);
        assert_eq!(
            kind_for_sqlx_error(&sqlx::Error::PoolTimedOut),
            ErrorKind::ServiceUnavailable
        );
        assert_eq!(
            kind_for_sqlx_error(&sqlx::Error::Protocol("bad frame".into())),
            ErrorKind::InternalServerError
        );
        assert!(unique_violation_constraint(&sqlx::Error::RowNotFound).is_none());
    }

    #[cfg(feature = "sqlx")]
    #[test]
    fn test_pool_exhaustion_is_503_without_details() {
        let app_err: AppError = sqlx::Error::PoolTimedOut.into();
        assert_eq!(app_err.status_code(), 503);
        assert_eq!(app_err.public_message(), "Service Unavailable");
    }

    #[cfg(feature = "axum")]
    #[test]
    fn test_into_response_status() {
        use crate::error::{app_error::AppError, kind::ErrorKind};
        use axum::response::IntoResponse;

        let resp = AppError::new(ErrorKind::Conflict, "Email already exists").into_response();
        assert_eq!(resp.status().as_u16(), 409);

        let resp = AppError::new(ErrorKind::InternalServerError, "db exploded").into_response();
        assert_eq!(resp.status().as_u16(), 500);
    }
}
