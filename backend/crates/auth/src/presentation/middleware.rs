//! Auth Middleware
//!
//! `require_auth` is the one guard every protected route composes. It
//! resolves the bearer token to a [`CurrentUser`] and stores it in the
//! request extensions; handlers take `CurrentUser` as an extractor.

use axum::extract::{FromRequestParts, Request, State};
use axum::http::request::Parts;
use axum::middleware::Next;
use axum::response::Response;
use platform::bearer::extract_bearer_token;

use crate::application::CurrentUser;
use crate::domain::repository::{SessionRegistry, UserRepository};
use crate::error::AuthError;
use crate::presentation::handlers::AuthAppState;

/// Middleware that requires a valid bearer token and a live session
///
/// ```rust,ignore
/// router.route_layer(axum::middleware::from_fn_with_state(state, require_auth::<U, S>))
/// ```
pub async fn require_auth<U, S>(
    State(state): State<AuthAppState<U, S>>,
    mut req: Request,
    next: Next,
) -> Result<Response, AuthError>
where
    U: UserRepository + Sync + 'static,
    S: SessionRegistry + Sync + 'static,
{
    let token = extract_bearer_token(req.headers()).ok_or(AuthError::InvalidToken)?;
    let current = state.authenticator().execute(&token).await?;

    tracing::trace!(user_id = %current.user_id, "Request authenticated");
    req.extensions_mut().insert(current);

    Ok(next.run(req).await)
}

impl<St> FromRequestParts<St> for CurrentUser
where
    St: Send + Sync,
{
    type Rejection = AuthError;

    async fn from_request_parts(parts: &mut Parts, _state: &St) -> Result<Self, Self::Rejection> {
        // Absent only when a route was mounted without `require_auth`.
        parts
            .extensions
            .get::<CurrentUser>()
            .copied()
            .ok_or(AuthError::InvalidToken)
    }
}
