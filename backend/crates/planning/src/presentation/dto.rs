//! API DTOs (Data Transfer Objects)

use auth::domain::value_object::{user_id::UserId, user_role::UserRole};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::application::{ServiceDetails, ServiceMember};
use crate::domain::entity::{
    assignment::ServiceOutfit,
    service::{Service, ServiceDraft},
    song::{Song, SongFields},
};
use crate::domain::value_object::{
    assignment_status::AssignmentStatus,
    ids::{OutfitId, ServiceId, SongId},
};

// ============================================================================
// Services
// ============================================================================

/// POST/PUT /services request
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct ServiceRequest {
    pub name: String,
    pub start_time: String,
    pub end_time: String,
}

impl From<ServiceRequest> for ServiceDraft {
    fn from(req: ServiceRequest) -> Self {
        Self {
            name: req.name,
            start_time: req.start_time,
            end_time: req.end_time,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServiceResponse {
    pub id: ServiceId,
    pub name: String,
    pub start_time: String,
    pub end_time: String,
    pub created_by: UserId,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<Service> for ServiceResponse {
    fn from(service: Service) -> Self {
        Self {
            id: service.service_id,
            name: service.name,
            start_time: service.start_time,
            end_time: service.end_time,
            created_by: service.created_by,
            created_at: service.created_at,
            updated_at: service.updated_at,
        }
    }
}

/// Team member as shown on a service
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServiceUserDetail {
    pub id: UserId,
    pub username: String,
    pub email: String,
    pub role: UserRole,
    pub secondary_role: Option<String>,
    pub status: AssignmentStatus,
}

impl From<ServiceMember> for ServiceUserDetail {
    fn from(member: ServiceMember) -> Self {
        let user = member.user;
        Self {
            id: user.user_id,
            username: user.user_name.as_str().to_string(),
            email: user.email.as_str().to_string(),
            role: user.user_role,
            secondary_role: user.profile.secondary_role,
            status: member.status,
        }
    }
}

/// GET /services item: the service with its songs, team and outfits
#[derive(Debug, Clone, Serialize)]
pub struct ServiceSummaryResponse {
    #[serde(flatten)]
    pub service: ServiceResponse,
    pub songs: Vec<SongResponse>,
    pub users: Vec<ServiceUserDetail>,
    pub outfits: Vec<ServiceOutfit>,
}

/// GET /services/{id}
#[derive(Debug, Clone, Serialize)]
pub struct ServiceDetailResponse {
    pub service: ServiceResponse,
    pub songs: Vec<SongResponse>,
    pub users: Vec<ServiceUserDetail>,
    pub outfits: Vec<ServiceOutfit>,
}

fn split(
    details: ServiceDetails,
) -> (
    ServiceResponse,
    Vec<SongResponse>,
    Vec<ServiceUserDetail>,
    Vec<ServiceOutfit>,
) {
    (
        details.service.into(),
        details.songs.into_iter().map(SongResponse::from).collect(),
        details.users.into_iter().map(ServiceUserDetail::from).collect(),
        details.outfits,
    )
}

impl From<ServiceDetails> for ServiceSummaryResponse {
    fn from(details: ServiceDetails) -> Self {
        let (service, songs, users, outfits) = split(details);
        Self {
            service,
            songs,
            users,
            outfits,
        }
    }
}

impl From<ServiceDetails> for ServiceDetailResponse {
    fn from(details: ServiceDetails) -> Self {
        let (service, songs, users, outfits) = split(details);
        Self {
            service,
            songs,
            users,
            outfits,
        }
    }
}

// ============================================================================
// Songs
// ============================================================================

/// POST/PUT /songs request
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct SongRequest {
    pub name: String,
    pub author: String,
    pub song_key: String,
    pub bpm: i32,
    pub time_signature: String,
    pub duration: String,
    pub structure: String,
    pub has_sequence: String,
    pub has_chart: String,
    pub has_score: String,
    pub youtube_url: String,
    pub voice_url: String,
    pub guitar_url: String,
    pub piano_url: String,
    pub drums_url: String,
    pub bass_url: String,
    pub wind_url: String,
}

impl From<SongRequest> for SongFields {
    fn from(req: SongRequest) -> Self {
        Self {
            name: req.name,
            author: req.author,
            song_key: req.song_key,
            bpm: req.bpm,
            time_signature: req.time_signature,
            duration: req.duration,
            structure: req.structure,
            has_sequence: req.has_sequence,
            has_chart: req.has_chart,
            has_score: req.has_score,
            youtube_url: req.youtube_url,
            voice_url: req.voice_url,
            guitar_url: req.guitar_url,
            piano_url: req.piano_url,
            drums_url: req.drums_url,
            bass_url: req.bass_url,
            wind_url: req.wind_url,
        }
    }
}

impl From<SongFields> for SongRequest {
    fn from(fields: SongFields) -> Self {
        Self {
            name: fields.name,
            author: fields.author,
            song_key: fields.song_key,
            bpm: fields.bpm,
            time_signature: fields.time_signature,
            duration: fields.duration,
            structure: fields.structure,
            has_sequence: fields.has_sequence,
            has_chart: fields.has_chart,
            has_score: fields.has_score,
            youtube_url: fields.youtube_url,
            voice_url: fields.voice_url,
            guitar_url: fields.guitar_url,
            piano_url: fields.piano_url,
            drums_url: fields.drums_url,
            bass_url: fields.bass_url,
            wind_url: fields.wind_url,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SongResponse {
    pub id: SongId,
    #[serde(flatten)]
    pub fields: SongRequest,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<Song> for SongResponse {
    fn from(song: Song) -> Self {
        Self {
            id: song.song_id,
            fields: song.fields.into(),
            created_at: song.created_at,
            updated_at: song.updated_at,
        }
    }
}

// ============================================================================
// Assignments
// ============================================================================

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct AssignUsersRequest {
    pub user_ids: Vec<UserId>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct AssignSongsRequest {
    pub song_ids: Vec<SongId>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct AssignOutfitsRequest {
    pub outfit_ids: Vec<OutfitId>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct StatusRequest {
    pub status: String,
}

/// 201 body of POST /services/{id}/users
#[derive(Debug, Clone, Serialize)]
pub struct AssignedUsersResponse {
    pub service_id: ServiceId,
    pub user_ids: Vec<UserId>,
}

#[derive(Debug, Clone, Serialize)]
pub struct AssignedSongsResponse {
    pub service_id: ServiceId,
    pub song_ids: Vec<SongId>,
}

/// Carries every outfit now linked, not just the ones added
#[derive(Debug, Clone, Serialize)]
pub struct AssignedOutfitsResponse {
    pub service_id: ServiceId,
    pub outfit_ids: Vec<OutfitId>,
}
