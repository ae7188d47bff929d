//! Repository Traits
//!
//! Interfaces for services, songs and their assignments.
//! Implementations are in the infrastructure layer.

use auth::domain::value_object::user_id::UserId;
use chrono::{DateTime, Utc};

use crate::domain::entity::{
    assignment::{ServiceOutfit, ServiceSong, ServiceUser},
    service::{Service, ServiceDraft},
    song::{Song, SongFields},
};
use crate::domain::value_object::{
    assignment_status::AssignmentStatus,
    ids::{OutfitId, ServiceId, SongId},
};
use crate::error::PlanningResult;

#[trait_variant::make(ServiceRepository: Send)]
pub trait LocalServiceRepository {
    async fn create(&self, draft: &ServiceDraft, created_by: UserId) -> PlanningResult<Service>;

    async fn find_by_id(&self, service_id: ServiceId) -> PlanningResult<Option<Service>>;

    /// All services ordered by id
    async fn list(&self) -> PlanningResult<Vec<Service>>;

    /// `None` if the service does not exist
    async fn update(
        &self,
        service_id: ServiceId,
        draft: &ServiceDraft,
        updated_at: DateTime<Utc>,
    ) -> PlanningResult<Option<Service>>;

    /// Removes the service together with all of its assignments
    async fn delete(&self, service_id: ServiceId) -> PlanningResult<bool>;
}

#[trait_variant::make(SongRepository: Send)]
pub trait LocalSongRepository {
    async fn create(&self, fields: &SongFields) -> PlanningResult<Song>;

    async fn find_by_id(&self, song_id: SongId) -> PlanningResult<Option<Song>>;

    /// Songs matching any of `song_ids`; unknown ids are skipped
    async fn find_by_ids(&self, song_ids: &[SongId]) -> PlanningResult<Vec<Song>>;

    async fn list(&self) -> PlanningResult<Vec<Song>>;

    async fn update(
        &self,
        song_id: SongId,
        fields: &SongFields,
        updated_at: DateTime<Utc>,
    ) -> PlanningResult<Option<Song>>;

    /// Removes the song and unlinks it from every service
    async fn delete(&self, song_id: SongId) -> PlanningResult<bool>;
}

/// Service assignments
///
/// Replacing operations are atomic: readers see either the old set or
/// the new one.
#[trait_variant::make(AssignmentRepository: Send)]
pub trait LocalAssignmentRepository {
    /// Replace the team; every member starts as `pending`
    async fn replace_users(
        &self,
        service_id: ServiceId,
        user_ids: &[UserId],
    ) -> PlanningResult<Vec<ServiceUser>>;

    async fn list_users(&self, service_id: ServiceId) -> PlanningResult<Vec<ServiceUser>>;

    /// `None` if the user is not assigned to the service
    async fn set_user_status(
        &self,
        service_id: ServiceId,
        user_id: UserId,
        status: AssignmentStatus,
    ) -> PlanningResult<Option<ServiceUser>>;

    /// Replace the repertoire
    async fn replace_songs(
        &self,
        service_id: ServiceId,
        song_ids: &[SongId],
    ) -> PlanningResult<Vec<ServiceSong>>;

    async fn list_songs(&self, service_id: ServiceId) -> PlanningResult<Vec<ServiceSong>>;

    async fn remove_song(&self, service_id: ServiceId, song_id: SongId) -> PlanningResult<bool>;

    /// Add outfits, ignoring ones already linked; returns the full list
    async fn add_outfits(
        &self,
        service_id: ServiceId,
        outfit_ids: &[OutfitId],
    ) -> PlanningResult<Vec<ServiceOutfit>>;

    async fn list_outfits(&self, service_id: ServiceId) -> PlanningResult<Vec<ServiceOutfit>>;

    async fn remove_outfit(
        &self,
        service_id: ServiceId,
        outfit_id: OutfitId,
    ) -> PlanningResult<bool>;
}
