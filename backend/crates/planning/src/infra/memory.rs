//! In-Memory Planning Store
//!
//! All tables sit behind one lock so cascades and set replacements are
//! atomic. Used by tests and database-less development runs.

use auth::domain::value_object::user_id::UserId;
use chrono::{DateTime, Utc};
use std::collections::BTreeMap;
use tokio::sync::RwLock;

use crate::domain::entity::{
    assignment::{ServiceOutfit, ServiceSong, ServiceUser},
    service::{Service, ServiceDraft},
    song::{Song, SongFields},
};
use crate::domain::repository::{AssignmentRepository, ServiceRepository, SongRepository};
use crate::domain::value_object::{
    assignment_status::AssignmentStatus,
    ids::{OutfitId, ServiceId, SongId},
};
use crate::error::PlanningResult;

#[derive(Default)]
struct Tables {
    last_service_id: i64,
    last_song_id: i64,
    services: BTreeMap<ServiceId, Service>,
    songs: BTreeMap<SongId, Song>,
    service_users: Vec<ServiceUser>,
    service_songs: Vec<ServiceSong>,
    service_outfits: Vec<ServiceOutfit>,
}

#[derive(Default)]
pub struct InMemoryPlanningRepository {
    tables: RwLock<Tables>,
}

impl InMemoryPlanningRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

impl ServiceRepository for InMemoryPlanningRepository {
    async fn create(&self, draft: &ServiceDraft, created_by: UserId) -> PlanningResult<Service> {
        let mut tables = self.tables.write().await;
        tables.last_service_id += 1;

        let now = Utc::now();
        let service = Service {
            service_id: ServiceId::new(tables.last_service_id),
            name: draft.name.clone(),
            start_time: draft.start_time.clone(),
            end_time: draft.end_time.clone(),
            created_by,
            created_at: now,
            updated_at: now,
        };
        tables.services.insert(service.service_id, service.clone());
        Ok(service)
    }

    async fn find_by_id(&self, service_id: ServiceId) -> PlanningResult<Option<Service>> {
        Ok(self.tables.read().await.services.get(&service_id).cloned())
    }

    async fn list(&self) -> PlanningResult<Vec<Service>> {
        Ok(self.tables.read().await.services.values().cloned().collect())
    }

    async fn update(
        &self,
        service_id: ServiceId,
        draft: &ServiceDraft,
        updated_at: DateTime<Utc>,
    ) -> PlanningResult<Option<Service>> {
        let mut tables = self.tables.write().await;
        Ok(tables.services.get_mut(&service_id).map(|service| {
            service.name = draft.name.clone();
            service.start_time = draft.start_time.clone();
            service.end_time = draft.end_time.clone();
            service.updated_at = updated_at;
            service.clone()
        }))
    }

    async fn delete(&self, service_id: ServiceId) -> PlanningResult<bool> {
        let mut tables = self.tables.write().await;
        if tables.services.remove(&service_id).is_none() {
            return Ok(false);
        }
        tables.service_users.retain(|a| a.service_id != service_id);
        tables.service_songs.retain(|a| a.service_id != service_id);
        tables.service_outfits.retain(|a| a.service_id != service_id);
        Ok(true)
    }
}

impl SongRepository for InMemoryPlanningRepository {
    async fn create(&self, fields: &SongFields) -> PlanningResult<Song> {
        let mut tables = self.tables.write().await;
        tables.last_song_id += 1;

        let now = Utc::now();
        let song = Song {
            song_id: SongId::new(tables.last_song_id),
            fields: fields.clone(),
            created_at: now,
            updated_at: now,
        };
        tables.songs.insert(song.song_id, song.clone());
        Ok(song)
    }

    async fn find_by_id(&self, song_id: SongId) -> PlanningResult<Option<Song>> {
        Ok(self.tables.read().await.songs.get(&song_id).cloned())
    }

    async fn find_by_ids(&self, song_ids: &[SongId]) -> PlanningResult<Vec<Song>> {
        let tables = self.tables.read().await;
        Ok(tables
            .songs
            .values()
            .filter(|s| song_ids.contains(&s.song_id))
            .cloned()
            .collect())
    }

    async fn list(&self) -> PlanningResult<Vec<Song>> {
        Ok(self.tables.read().await.songs.values().cloned().collect())
    }

    async fn update(
        &self,
        song_id: SongId,
        fields: &SongFields,
        updated_at: DateTime<Utc>,
    ) -> PlanningResult<Option<Song>> {
        let mut tables = self.tables.write().await;
        Ok(tables.songs.get_mut(&song_id).map(|song| {
            song.fields = fields.clone();
            song.updated_at = updated_at;
            song.clone()
        }))
    }

    async fn delete(&self, song_id: SongId) -> PlanningResult<bool> {
        let mut tables = self.tables.write().await;
        if tables.songs.remove(&song_id).is_none() {
            return Ok(false);
        }
        tables.service_songs.retain(|a| a.song_id != song_id);
        Ok(true)
    }
}

impl AssignmentRepository for InMemoryPlanningRepository {
    async fn replace_users(
        &self,
        service_id: ServiceId,
        user_ids: &[UserId],
    ) -> PlanningResult<Vec<ServiceUser>> {
        let mut tables = self.tables.write().await;
        tables.service_users.retain(|a| a.service_id != service_id);

        let team: Vec<_> = user_ids
            .iter()
            .map(|&user_id| ServiceUser {
                service_id,
                user_id,
                status: AssignmentStatus::Pending,
            })
            .collect();
        tables.service_users.extend(team.iter().copied());
        Ok(team)
    }

    async fn list_users(&self, service_id: ServiceId) -> PlanningResult<Vec<ServiceUser>> {
        let tables = self.tables.read().await;
        Ok(tables
            .service_users
            .iter()
            .filter(|a| a.service_id == service_id)
            .copied()
            .collect())
    }

    async fn set_user_status(
        &self,
        service_id: ServiceId,
        user_id: UserId,
        status: AssignmentStatus,
    ) -> PlanningResult<Option<ServiceUser>> {
        let mut tables = self.tables.write().await;
        Ok(tables
            .service_users
            .iter_mut()
            .find(|a| a.service_id == service_id && a.user_id == user_id)
            .map(|a| {
                a.status = status;
                *a
            }))
    }

    async fn replace_songs(
        &self,
        service_id: ServiceId,
        song_ids: &[SongId],
    ) -> PlanningResult<Vec<ServiceSong>> {
        let mut tables = self.tables.write().await;
        tables.service_songs.retain(|a| a.service_id != service_id);

        let repertoire: Vec<_> = song_ids
            .iter()
            .map(|&song_id| ServiceSong {
                service_id,
                song_id,
            })
            .collect();
        tables.service_songs.extend(repertoire.iter().copied());
        Ok(repertoire)
    }

    async fn list_songs(&self, service_id: ServiceId) -> PlanningResult<Vec<ServiceSong>> {
        let tables = self.tables.read().await;
        Ok(tables
            .service_songs
            .iter()
            .filter(|a| a.service_id == service_id)
            .copied()
            .collect())
    }

    async fn remove_song(&self, service_id: ServiceId, song_id: SongId) -> PlanningResult<bool> {
        let mut tables = self.tables.write().await;
        let before = tables.service_songs.len();
        tables
            .service_songs
            .retain(|a| !(a.service_id == service_id && a.song_id == song_id));
        Ok(tables.service_songs.len() < before)
    }

    async fn add_outfits(
        &self,
        service_id: ServiceId,
        outfit_ids: &[OutfitId],
    ) -> PlanningResult<Vec<ServiceOutfit>> {
        let mut tables = self.tables.write().await;
        for &outfit_id in outfit_ids {
            let link = ServiceOutfit {
                service_id,
                outfit_id,
            };
            if !tables.service_outfits.contains(&link) {
                tables.service_outfits.push(link);
            }
        }
        Ok(tables
            .service_outfits
            .iter()
            .filter(|a| a.service_id == service_id)
            .copied()
            .collect())
    }

    async fn list_outfits(&self, service_id: ServiceId) -> PlanningResult<Vec<ServiceOutfit>> {
        let tables = self.tables.read().await;
        Ok(tables
            .service_outfits
            .iter()
            .filter(|a| a.service_id == service_id)
            .copied()
            .collect())
    }

    async fn remove_outfit(
        &self,
        service_id: ServiceId,
        outfit_id: OutfitId,
    ) -> PlanningResult<bool> {
        let mut tables = self.tables.write().await;
        let before = tables.service_outfits.len();
        tables
            .service_outfits
            .retain(|a| !(a.service_id == service_id && a.outfit_id == outfit_id));
        Ok(tables.service_outfits.len() < before)
    }
}
