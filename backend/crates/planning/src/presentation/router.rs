//! Planning Router

use axum::{
    Router,
    middleware::from_fn_with_state,
    routing::{delete, get, patch},
};

use auth::domain::repository::{SessionRegistry, UserRepository};
use auth::require_auth;

use crate::domain::repository::{AssignmentRepository, ServiceRepository, SongRepository};
use crate::presentation::handlers::{self, PlanningAppState};

/// `/services/...` and `/songs/...`, all behind `require_auth`; merge at the root
pub fn planning_router<R, U, S>(state: PlanningAppState<R, U, S>) -> Router
where
    R: ServiceRepository + SongRepository + AssignmentRepository + Sync + 'static,
    U: UserRepository + Sync + 'static,
    S: SessionRegistry + Sync + 'static,
{
    Router::new()
        .route(
            "/services",
            get(handlers::list_services::<R, U, S>).post(handlers::create_service::<R, U, S>),
        )
        .route(
            "/services/{id}",
            get(handlers::get_service::<R, U, S>)
                .put(handlers::update_service::<R, U, S>)
                .delete(handlers::delete_service::<R, U, S>),
        )
        .route(
            "/services/{id}/users",
            get(handlers::list_service_users::<R, U, S>).post(handlers::assign_users::<R, U, S>),
        )
        .route(
            "/services/{id}/users/{user_id}/status",
            patch(handlers::change_user_status::<R, U, S>),
        )
        .route(
            "/services/{id}/songs",
            get(handlers::list_service_songs::<R, U, S>).post(handlers::assign_songs::<R, U, S>),
        )
        .route(
            "/services/{id}/songs/{song_id}",
            delete(handlers::remove_service_song::<R, U, S>),
        )
        .route(
            "/services/{id}/outfits",
            get(handlers::list_service_outfits::<R, U, S>).post(handlers::add_outfits::<R, U, S>),
        )
        .route(
            "/services/{id}/outfits/{outfit_id}",
            delete(handlers::remove_service_outfit::<R, U, S>),
        )
        .route(
            "/songs",
            get(handlers::list_songs::<R, U, S>).post(handlers::create_song::<R, U, S>),
        )
        .route(
            "/songs/{id}",
            get(handlers::get_song::<R, U, S>)
                .put(handlers::update_song::<R, U, S>)
                .delete(handlers::delete_song::<R, U, S>),
        )
        .route_layer(from_fn_with_state(state.auth.clone(), require_auth::<U, S>))
        .with_state(state)
}
