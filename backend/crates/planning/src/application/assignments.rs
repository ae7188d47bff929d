//! Assignments Use Case
//!
//! Team, repertoire and outfit links of a service. Every operation
//! answers `ServiceNotFound` when the service does not exist.

use std::sync::Arc;

use auth::domain::repository::UserRepository;
use auth::domain::value_object::user_id::UserId;
use auth::{AuthError, CurrentUser};

use crate::application::distinct_ids;
use crate::domain::entity::assignment::{ServiceOutfit, ServiceSong, ServiceUser};
use crate::domain::repository::{AssignmentRepository, ServiceRepository, SongRepository};
use crate::domain::value_object::{
    assignment_status::AssignmentStatus,
    ids::{OutfitId, ServiceId, SongId},
};
use crate::error::{PlanningError, PlanningResult};

pub struct AssignmentsUseCase<Sv, So, A, U>
where
    Sv: ServiceRepository,
    So: SongRepository,
    A: AssignmentRepository,
    U: UserRepository,
{
    services: Arc<Sv>,
    songs: Arc<So>,
    assignments: Arc<A>,
    users: Arc<U>,
}

impl<Sv, So, A, U> AssignmentsUseCase<Sv, So, A, U>
where
    Sv: ServiceRepository,
    So: SongRepository,
    A: AssignmentRepository,
    U: UserRepository,
{
    pub fn new(services: Arc<Sv>, songs: Arc<So>, assignments: Arc<A>, users: Arc<U>) -> Self {
        Self {
            services,
            songs,
            assignments,
            users,
        }
    }

    async fn ensure_service(&self, service_id: ServiceId) -> PlanningResult<()> {
        match self.services.find_by_id(service_id).await? {
            Some(_) => Ok(()),
            None => Err(PlanningError::ServiceNotFound),
        }
    }

    // ------------------------------------------------------------------------
    // Team
    // ------------------------------------------------------------------------

    pub async fn assign_users(
        &self,
        actor: &CurrentUser,
        service_id: ServiceId,
        user_ids: &[UserId],
    ) -> PlanningResult<Vec<ServiceUser>> {
        actor.require_admin()?;
        let user_ids = distinct_ids(user_ids)?;
        self.ensure_service(service_id).await?;

        let known = self.users.find_by_ids(&user_ids).await?;
        if known.len() != user_ids.len() {
            return Err(PlanningError::Validation("Unknown user id".to_string()));
        }

        let team = self.assignments.replace_users(service_id, &user_ids).await?;
        tracing::info!(
            actor = %actor.user_id,
            service_id = %service_id,
            members = team.len(),
            "Service team replaced"
        );
        Ok(team)
    }

    pub async fn list_users(&self, service_id: ServiceId) -> PlanningResult<Vec<ServiceUser>> {
        self.ensure_service(service_id).await?;
        self.assignments.list_users(service_id).await
    }

    /// Only the assigned user may answer for themself
    pub async fn set_user_status(
        &self,
        actor: &CurrentUser,
        service_id: ServiceId,
        user_id: UserId,
        status: &str,
    ) -> PlanningResult<ServiceUser> {
        if actor.user_id != user_id {
            return Err(AuthError::Forbidden.into());
        }
        if status.trim().is_empty() {
            return Err(PlanningError::InvalidData);
        }
        let status = status
            .parse::<AssignmentStatus>()
            .map_err(|e| PlanningError::Validation(e.to_string()))?;
        self.ensure_service(service_id).await?;

        self.assignments
            .set_user_status(service_id, user_id, status)
            .await?
            .ok_or(PlanningError::AssignmentNotFound)
    }

    // ------------------------------------------------------------------------
    // Repertoire
    // ------------------------------------------------------------------------

    pub async fn assign_songs(
        &self,
        actor: &CurrentUser,
        service_id: ServiceId,
        song_ids: &[SongId],
    ) -> PlanningResult<Vec<ServiceSong>> {
        actor.require_admin()?;
        let song_ids = distinct_ids(song_ids)?;
        self.ensure_service(service_id).await?;

        let known = self.songs.find_by_ids(&song_ids).await?;
        if known.len() != song_ids.len() {
            return Err(PlanningError::Validation("Unknown song id".to_string()));
        }

        self.assignments.replace_songs(service_id, &song_ids).await
    }

    pub async fn list_songs(&self, service_id: ServiceId) -> PlanningResult<Vec<ServiceSong>> {
        self.ensure_service(service_id).await?;
        self.assignments.list_songs(service_id).await
    }

    /// Idempotent: removing a song that is not linked succeeds
    pub async fn remove_song(
        &self,
        actor: &CurrentUser,
        service_id: ServiceId,
        song_id: SongId,
    ) -> PlanningResult<()> {
        actor.require_admin()?;
        self.ensure_service(service_id).await?;
        self.assignments.remove_song(service_id, song_id).await?;
        Ok(())
    }

    // ------------------------------------------------------------------------
    // Outfits
    // ------------------------------------------------------------------------

    pub async fn add_outfits(
        &self,
        actor: &CurrentUser,
        service_id: ServiceId,
        outfit_ids: &[OutfitId],
    ) -> PlanningResult<Vec<ServiceOutfit>> {
        actor.require_admin()?;
        let outfit_ids = distinct_ids(outfit_ids)?;
        self.ensure_service(service_id).await?;
        self.assignments.add_outfits(service_id, &outfit_ids).await
    }

    pub async fn list_outfits(&self, service_id: ServiceId) -> PlanningResult<Vec<ServiceOutfit>> {
        self.ensure_service(service_id).await?;
        self.assignments.list_outfits(service_id).await
    }

    pub async fn remove_outfit(
        &self,
        actor: &CurrentUser,
        service_id: ServiceId,
        outfit_id: OutfitId,
    ) -> PlanningResult<()> {
        actor.require_admin()?;
        self.ensure_service(service_id).await?;
        self.assignments.remove_outfit(service_id, outfit_id).await?;
        Ok(())
    }
}
