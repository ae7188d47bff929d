//! Song Catalog Use Case

use std::sync::Arc;

use auth::CurrentUser;
use kernel::clock::Clock;

use crate::application::required_name;
use crate::domain::entity::song::{Song, SongFields};
use crate::domain::repository::SongRepository;
use crate::domain::value_object::ids::SongId;
use crate::error::{PlanningError, PlanningResult};

pub struct SongCatalogUseCase<So>
where
    So: SongRepository,
{
    songs: Arc<So>,
    clock: Arc<dyn Clock>,
}

fn validated(fields: SongFields) -> PlanningResult<SongFields> {
    if fields.bpm < 0 {
        return Err(PlanningError::Validation("bpm must not be negative".to_string()));
    }
    Ok(SongFields {
        name: required_name(&fields.name)?,
        ..fields
    })
}

impl<So> SongCatalogUseCase<So>
where
    So: SongRepository,
{
    pub fn new(songs: Arc<So>, clock: Arc<dyn Clock>) -> Self {
        Self { songs, clock }
    }

    pub async fn list(&self) -> PlanningResult<Vec<Song>> {
        self.songs.list().await
    }

    pub async fn get(&self, song_id: SongId) -> PlanningResult<Song> {
        self.songs
            .find_by_id(song_id)
            .await?
            .ok_or(PlanningError::SongNotFound)
    }

    pub async fn create(&self, actor: &CurrentUser, fields: SongFields) -> PlanningResult<Song> {
        actor.require_admin()?;
        let song = self.songs.create(&validated(fields)?).await?;
        tracing::info!(actor = %actor.user_id, song_id = %song.song_id, "Song created");
        Ok(song)
    }

    pub async fn update(
        &self,
        actor: &CurrentUser,
        song_id: SongId,
        fields: SongFields,
    ) -> PlanningResult<Song> {
        actor.require_admin()?;
        self.songs
            .update(song_id, &validated(fields)?, self.clock.now())
            .await?
            .ok_or(PlanningError::SongNotFound)
    }

    pub async fn delete(&self, actor: &CurrentUser, song_id: SongId) -> PlanningResult<()> {
        actor.require_admin()?;
        if !self.songs.delete(song_id).await? {
            return Err(PlanningError::SongNotFound);
        }
        tracing::info!(actor = %actor.user_id, song_id = %song_id, "Song deleted");
        Ok(())
    }
}
