//! Assignment Entities
//!
//! Links between a service and its team, repertoire and outfits.

use auth::domain::value_object::user_id::UserId;
use serde::Serialize;

use crate::domain::value_object::{
    assignment_status::AssignmentStatus,
    ids::{OutfitId, ServiceId, SongId},
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ServiceUser {
    pub service_id: ServiceId,
    pub user_id: UserId,
    pub status: AssignmentStatus,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ServiceSong {
    pub service_id: ServiceId,
    pub song_id: SongId,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ServiceOutfit {
    pub service_id: ServiceId,
    pub outfit_id: OutfitId,
}
