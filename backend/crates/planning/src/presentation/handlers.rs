//! HTTP Handlers
//!
//! Every route is mounted behind `auth::require_auth`, so each handler
//! receives the authenticated [`CurrentUser`].

use axum::Json;
use axum::extract::rejection::{JsonRejection, PathRejection};
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use std::sync::Arc;

use auth::domain::repository::{SessionRegistry, UserRepository};
use auth::domain::value_object::user_id::UserId;
use auth::{AuthAppState, CurrentUser};

use crate::application::{AssignmentsUseCase, ServiceCatalogUseCase, SongCatalogUseCase};
use crate::domain::entity::assignment::{ServiceOutfit, ServiceSong, ServiceUser};
use crate::domain::repository::{AssignmentRepository, ServiceRepository, SongRepository};
use crate::domain::value_object::ids::{OutfitId, ServiceId, SongId};
use crate::error::PlanningResult;
use crate::presentation::dto::{
    AssignOutfitsRequest, AssignSongsRequest, AssignUsersRequest, AssignedOutfitsResponse,
    AssignedSongsResponse, AssignedUsersResponse, ServiceDetailResponse, ServiceRequest,
    ServiceResponse, ServiceSummaryResponse, SongRequest, SongResponse, StatusRequest,
};

/// Shared state for planning handlers
pub struct PlanningAppState<R, U, S>
where
    R: ServiceRepository + SongRepository + AssignmentRepository + Sync + 'static,
    U: UserRepository + Sync + 'static,
    S: SessionRegistry + Sync + 'static,
{
    pub repo: Arc<R>,
    pub auth: AuthAppState<U, S>,
}

impl<R, U, S> Clone for PlanningAppState<R, U, S>
where
    R: ServiceRepository + SongRepository + AssignmentRepository + Sync + 'static,
    U: UserRepository + Sync + 'static,
    S: SessionRegistry + Sync + 'static,
{
    fn clone(&self) -> Self {
        Self {
            repo: self.repo.clone(),
            auth: self.auth.clone(),
        }
    }
}

impl<R, U, S> PlanningAppState<R, U, S>
where
    R: ServiceRepository + SongRepository + AssignmentRepository + Sync + 'static,
    U: UserRepository + Sync + 'static,
    S: SessionRegistry + Sync + 'static,
{
    pub fn new(repo: Arc<R>, auth: AuthAppState<U, S>) -> Self {
        Self { repo, auth }
    }

    fn services(&self) -> ServiceCatalogUseCase<R, R, R, U> {
        ServiceCatalogUseCase::new(
            self.repo.clone(),
            self.repo.clone(),
            self.repo.clone(),
            self.auth.users.clone(),
            self.auth.clock.clone(),
        )
    }

    fn songs(&self) -> SongCatalogUseCase<R> {
        SongCatalogUseCase::new(self.repo.clone(), self.auth.clock.clone())
    }

    fn assignments(&self) -> AssignmentsUseCase<R, R, R, U> {
        AssignmentsUseCase::new(
            self.repo.clone(),
            self.repo.clone(),
            self.repo.clone(),
            self.auth.users.clone(),
        )
    }
}

// ============================================================================
// Services
// ============================================================================

/// GET /services
pub async fn list_services<R, U, S>(
    State(state): State<PlanningAppState<R, U, S>>,
    _current: CurrentUser,
) -> PlanningResult<Json<Vec<ServiceSummaryResponse>>>
where
    R: ServiceRepository + SongRepository + AssignmentRepository + Sync + 'static,
    U: UserRepository + Sync + 'static,
    S: SessionRegistry + Sync + 'static,
{
    let services = state.services().list_detailed().await?;
    Ok(Json(services.into_iter().map(Into::into).collect()))
}

/// GET /services/{id}
pub async fn get_service<R, U, S>(
    State(state): State<PlanningAppState<R, U, S>>,
    _current: CurrentUser,
    path: Result<Path<i64>, PathRejection>,
) -> PlanningResult<Json<ServiceDetailResponse>>
where
    R: ServiceRepository + SongRepository + AssignmentRepository + Sync + 'static,
    U: UserRepository + Sync + 'static,
    S: SessionRegistry + Sync + 'static,
{
    let Path(id) = path?;
    let details = state.services().get_detailed(ServiceId::new(id)).await?;
    Ok(Json(details.into()))
}

/// POST /services
pub async fn create_service<R, U, S>(
    State(state): State<PlanningAppState<R, U, S>>,
    current: CurrentUser,
    body: Result<Json<ServiceRequest>, JsonRejection>,
) -> PlanningResult<impl IntoResponse>
where
    R: ServiceRepository + SongRepository + AssignmentRepository + Sync + 'static,
    U: UserRepository + Sync + 'static,
    S: SessionRegistry + Sync + 'static,
{
    let Json(req) = body?;
    let service = state.services().create(&current, req.into()).await?;
    Ok((StatusCode::CREATED, Json(ServiceResponse::from(service))))
}

/// PUT /services/{id}
pub async fn update_service<R, U, S>(
    State(state): State<PlanningAppState<R, U, S>>,
    current: CurrentUser,
    path: Result<Path<i64>, PathRejection>,
    body: Result<Json<ServiceRequest>, JsonRejection>,
) -> PlanningResult<Json<ServiceResponse>>
where
    R: ServiceRepository + SongRepository + AssignmentRepository + Sync + 'static,
    U: UserRepository + Sync + 'static,
    S: SessionRegistry + Sync + 'static,
{
    let Path(id) = path?;
    let Json(req) = body?;
    let service = state
        .services()
        .update(&current, ServiceId::new(id), req.into())
        .await?;
    Ok(Json(service.into()))
}

/// DELETE /services/{id}
pub async fn delete_service<R, U, S>(
    State(state): State<PlanningAppState<R, U, S>>,
    current: CurrentUser,
    path: Result<Path<i64>, PathRejection>,
) -> PlanningResult<StatusCode>
where
    R: ServiceRepository + SongRepository + AssignmentRepository + Sync + 'static,
    U: UserRepository + Sync + 'static,
    S: SessionRegistry + Sync + 'static,
{
    let Path(id) = path?;
    state.services().delete(&current, ServiceId::new(id)).await?;
    Ok(StatusCode::NO_CONTENT)
}

// ============================================================================
// Songs
// ============================================================================

/// GET /songs
pub async fn list_songs<R, U, S>(
    State(state): State<PlanningAppState<R, U, S>>,
    _current: CurrentUser,
) -> PlanningResult<Json<Vec<SongResponse>>>
where
    R: ServiceRepository + SongRepository + AssignmentRepository + Sync + 'static,
    U: UserRepository + Sync + 'static,
    S: SessionRegistry + Sync + 'static,
{
    let songs = state.songs().list().await?;
    Ok(Json(songs.into_iter().map(Into::into).collect()))
}

/// GET /songs/{id}
pub async fn get_song<R, U, S>(
    State(state): State<PlanningAppState<R, U, S>>,
    _current: CurrentUser,
    path: Result<Path<i64>, PathRejection>,
) -> PlanningResult<Json<SongResponse>>
where
    R: ServiceRepository + SongRepository + AssignmentRepository + Sync + 'static,
    U: UserRepository + Sync + 'static,
    S: SessionRegistry + Sync + 'static,
{
    let Path(id) = path?;
    let song = state.songs().get(SongId::new(id)).await?;
    Ok(Json(song.into()))
}

/// POST /songs
pub async fn create_song<R, U, S>(
    State(state): State<PlanningAppState<R, U, S>>,
    current: CurrentUser,
    body: Result<Json<SongRequest>, JsonRejection>,
) -> PlanningResult<impl IntoResponse>
where
    R: ServiceRepository + SongRepository + AssignmentRepository + Sync + 'static,
    U: UserRepository + Sync + 'static,
    S: SessionRegistry + Sync + 'static,
{
    let Json(req) = body?;
    let song = state.songs().create(&current, req.into()).await?;
    Ok((StatusCode::CREATED, Json(SongResponse::from(song))))
}

/// PUT /songs/{id}
pub async fn update_song<R, U, S>(
    State(state): State<PlanningAppState<R, U, S>>,
    current: CurrentUser,
    path: Result<Path<i64>, PathRejection>,
    body: Result<Json<SongRequest>, JsonRejection>,
) -> PlanningResult<Json<SongResponse>>
where
    R: ServiceRepository + SongRepository + AssignmentRepository + Sync + 'static,
    U: UserRepository + Sync + 'static,
    S: SessionRegistry + Sync + 'static,
{
    let Path(id) = path?;
    let Json(req) = body?;
    let song = state
        .songs()
        .update(&current, SongId::new(id), req.into())
        .await?;
    Ok(Json(song.into()))
}

/// DELETE /songs/{id}
pub async fn delete_song<R, U, S>(
    State(state): State<PlanningAppState<R, U, S>>,
    current: CurrentUser,
    path: Result<Path<i64>, PathRejection>,
) -> PlanningResult<StatusCode>
where
    R: ServiceRepository + SongRepository + AssignmentRepository + Sync + 'static,
    U: UserRepository + Sync + 'static,
    S: SessionRegistry + Sync + 'static,
{
    let Path(id) = path?;
    state.songs().delete(&current, SongId::new(id)).await?;
    Ok(StatusCode::NO_CONTENT)
}

// ============================================================================
// Team
// ============================================================================

/// POST /services/{id}/users
pub async fn assign_users<R, U, S>(
    State(state): State<PlanningAppState<R, U, S>>,
    current: CurrentUser,
    path: Result<Path<i64>, PathRejection>,
    body: Result<Json<AssignUsersRequest>, JsonRejection>,
) -> PlanningResult<impl IntoResponse>
where
    R: ServiceRepository + SongRepository + AssignmentRepository + Sync + 'static,
    U: UserRepository + Sync + 'static,
    S: SessionRegistry + Sync + 'static,
{
    let Path(id) = path?;
    let Json(req) = body?;
    let service_id = ServiceId::new(id);
    let team = state
        .assignments()
        .assign_users(&current, service_id, &req.user_ids)
        .await?;

    Ok((
        StatusCode::CREATED,
        Json(AssignedUsersResponse {
            service_id,
            user_ids: team.iter().map(|m| m.user_id).collect(),
        }),
    ))
}

/// GET /services/{id}/users
pub async fn list_service_users<R, U, S>(
    State(state): State<PlanningAppState<R, U, S>>,
    _current: CurrentUser,
    path: Result<Path<i64>, PathRejection>,
) -> PlanningResult<Json<Vec<ServiceUser>>>
where
    R: ServiceRepository + SongRepository + AssignmentRepository + Sync + 'static,
    U: UserRepository + Sync + 'static,
    S: SessionRegistry + Sync + 'static,
{
    let Path(id) = path?;
    let team = state.assignments().list_users(ServiceId::new(id)).await?;
    Ok(Json(team))
}

/// PATCH /services/{id}/users/{user_id}/status
pub async fn change_user_status<R, U, S>(
    State(state): State<PlanningAppState<R, U, S>>,
    current: CurrentUser,
    path: Result<Path<(i64, i64)>, PathRejection>,
    body: Result<Json<StatusRequest>, JsonRejection>,
) -> PlanningResult<Json<ServiceUser>>
where
    R: ServiceRepository + SongRepository + AssignmentRepository + Sync + 'static,
    U: UserRepository + Sync + 'static,
    S: SessionRegistry + Sync + 'static,
{
    let Path((service_id, user_id)) = path?;
    let Json(req) = body?;
    let assignment = state
        .assignments()
        .set_user_status(
            &current,
            ServiceId::new(service_id),
            UserId::new(user_id),
            &req.status,
        )
        .await?;
    Ok(Json(assignment))
}

// ============================================================================
// Repertoire
// ============================================================================

/// POST /services/{id}/songs
pub async fn assign_songs<R, U, S>(
    State(state): State<PlanningAppState<R, U, S>>,
    current: CurrentUser,
    path: Result<Path<i64>, PathRejection>,
    body: Result<Json<AssignSongsRequest>, JsonRejection>,
) -> PlanningResult<impl IntoResponse>
where
    R: ServiceRepository + SongRepository + AssignmentRepository + Sync + 'static,
    U: UserRepository + Sync + 'static,
    S: SessionRegistry + Sync + 'static,
{
    let Path(id) = path?;
    let Json(req) = body?;
    let service_id = ServiceId::new(id);
    let repertoire = state
        .assignments()
        .assign_songs(&current, service_id, &req.song_ids)
        .await?;

    Ok((
        StatusCode::CREATED,
        Json(AssignedSongsResponse {
            service_id,
            song_ids: repertoire.iter().map(|s| s.song_id).collect(),
        }),
    ))
}

/// GET /services/{id}/songs
pub async fn list_service_songs<R, U, S>(
    State(state): State<PlanningAppState<R, U, S>>,
    _current: CurrentUser,
    path: Result<Path<i64>, PathRejection>,
) -> PlanningResult<Json<Vec<ServiceSong>>>
where
    R: ServiceRepository + SongRepository + AssignmentRepository + Sync + 'static,
    U: UserRepository + Sync + 'static,
    S: SessionRegistry + Sync + 'static,
{
    let Path(id) = path?;
    let repertoire = state.assignments().list_songs(ServiceId::new(id)).await?;
    Ok(Json(repertoire))
}

/// DELETE /services/{id}/songs/{song_id}
pub async fn remove_service_song<R, U, S>(
    State(state): State<PlanningAppState<R, U, S>>,
    current: CurrentUser,
    path: Result<Path<(i64, i64)>, PathRejection>,
) -> PlanningResult<StatusCode>
where
    R: ServiceRepository + SongRepository + AssignmentRepository + Sync + 'static,
    U: UserRepository + Sync + 'static,
    S: SessionRegistry + Sync + 'static,
{
    let Path((service_id, song_id)) = path?;
    state
        .assignments()
        .remove_song(&current, ServiceId::new(service_id), SongId::new(song_id))
        .await?;
    Ok(StatusCode::NO_CONTENT)
}

// ============================================================================
// Outfits
// ============================================================================

/// POST /services/{id}/outfits
pub async fn add_outfits<R, U, S>(
    State(state): State<PlanningAppState<R, U, S>>,
    current: CurrentUser,
    path: Result<Path<i64>, PathRejection>,
    body: Result<Json<AssignOutfitsRequest>, JsonRejection>,
) -> PlanningResult<impl IntoResponse>
where
    R: ServiceRepository + SongRepository + AssignmentRepository + Sync + 'static,
    U: UserRepository + Sync + 'static,
    S: SessionRegistry + Sync + 'static,
{
    let Path(id) = path?;
    let Json(req) = body?;
    let service_id = ServiceId::new(id);
    let outfits = state
        .assignments()
        .add_outfits(&current, service_id, &req.outfit_ids)
        .await?;

    Ok((
        StatusCode::CREATED,
        Json(AssignedOutfitsResponse {
            service_id,
            outfit_ids: outfits.iter().map(|o| o.outfit_id).collect(),
        }),
    ))
}

/// GET /services/{id}/outfits
pub async fn list_service_outfits<R, U, S>(
    State(state): State<PlanningAppState<R, U, S>>,
    _current: CurrentUser,
    path: Result<Path<i64>, PathRejection>,
) -> PlanningResult<Json<Vec<ServiceOutfit>>>
where
    R: ServiceRepository + SongRepository + AssignmentRepository + Sync + 'static,
    U: UserRepository + Sync + 'static,
    S: SessionRegistry + Sync + 'static,
{
    let Path(id) = path?;
    let outfits = state.assignments().list_outfits(ServiceId::new(id)).await?;
    Ok(Json(outfits))
}

/// DELETE /services/{id}/outfits/{outfit_id}
pub async fn remove_service_outfit<R, U, S>(
    State(state): State<PlanningAppState<R, U, S>>,
    current: CurrentUser,
    path: Result<Path<(i64, i64)>, PathRejection>,
) -> PlanningResult<StatusCode>
where
    R: ServiceRepository + SongRepository + AssignmentRepository + Sync + 'static,
    U: UserRepository + Sync + 'static,
    S: SessionRegistry + Sync + 'static,
{
    let Path((service_id, outfit_id)) = path?;
    state
        .assignments()
        .remove_outfit(&current, ServiceId::new(service_id), OutfitId::new(outfit_id))
        .await?;
    Ok(StatusCode::NO_CONTENT)
}
