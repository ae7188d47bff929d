//! Auth Router

use axum::{
    Router,
    middleware::from_fn_with_state,
    routing::{delete, get, post},
};

use crate::domain::repository::{SessionRegistry, UserRepository};
use crate::presentation::handlers::{self, AuthAppState};
use crate::presentation::middleware::require_auth;

/// `/register`, `/login`, `/logout`; mount under `/auth`
pub fn auth_router<U, S>(state: AuthAppState<U, S>) -> Router
where
    U: UserRepository + Sync + 'static,
    S: SessionRegistry + Sync + 'static,
{
    Router::new()
        .route("/register", post(handlers::register::<U, S>))
        .route("/login", post(handlers::login::<U, S>))
        .route("/logout", delete(handlers::logout::<U, S>))
        .with_state(state)
}

/// User account routes, all behind `require_auth`; mount under `/users`
pub fn users_router<U, S>(state: AuthAppState<U, S>) -> Router
where
    U: UserRepository + Sync + 'static,
    S: SessionRegistry + Sync + 'static,
{
    Router::new()
        .route(
            "/",
            get(handlers::list_users::<U, S>).post(handlers::create_user::<U, S>),
        )
        .route("/me", get(handlers::current_user::<U, S>))
        .route(
            "/{id}",
            get(handlers::get_user::<U, S>)
                .put(handlers::update_user::<U, S>)
                .delete(handlers::delete_user::<U, S>),
        )
        .route_layer(from_fn_with_state(state.clone(), require_auth::<U, S>))
        .with_state(state)
}
