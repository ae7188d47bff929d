//! PostgreSQL Repository Implementations
//!
//! Assignment rows cascade from `services`, `songs` and `users` through
//! foreign keys, so deleting either side never leaves dangling links.

use auth::domain::value_object::user_id::UserId;
use chrono::{DateTime, Utc};
use sqlx::PgPool;

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
use crate::error::{PlanningError, PlanningResult};

const SERVICE_COLUMNS: &str =
    "id, name, start_time, end_time, created_by, created_at, updated_at";

const SONG_COLUMNS: &str = r#"
    id, name, author, song_key, bpm, time_signature, duration, structure,
    has_sequence, has_chart, has_score, youtube_url, voice_url, guitar_url,
    piano_url, drums_url, bass_url, wind_url, created_at, updated_at
"#;

/// PostgreSQL-backed planning store
#[derive(Clone)]
pub struct PgPlanningRepository {
    pool: PgPool,
}

impl PgPlanningRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

// ============================================================================
// Service Repository Implementation
// ============================================================================

impl ServiceRepository for PgPlanningRepository {
    async fn create(&self, draft: &ServiceDraft, created_by: UserId) -> PlanningResult<Service> {
        let row = sqlx::query_as::<_, ServiceRow>(&format!(
            r#"
            INSERT INTO services (name, start_time, end_time, created_by)
            VALUES ($1, $2, $3, $4)
            RETURNING {SERVICE_COLUMNS}
            "#
        ))
        .bind(&draft.name)
        .bind(&draft.start_time)
        .bind(&draft.end_time)
        .bind(created_by.as_i64())
        .fetch_one(&self.pool)
        .await?;

        Ok(row.into_service())
    }

    async fn find_by_id(&self, service_id: ServiceId) -> PlanningResult<Option<Service>> {
        let row = sqlx::query_as::<_, ServiceRow>(&format!(
            "SELECT {SERVICE_COLUMNS} FROM services WHERE id = $1"
        ))
        .bind(service_id.as_i64())
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(ServiceRow::into_service))
    }

    async fn list(&self) -> PlanningResult<Vec<Service>> {
        let rows = sqlx::query_as::<_, ServiceRow>(&format!(
            "SELECT {SERVICE_COLUMNS} FROM services ORDER BY id"
        ))
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.into_iter().map(ServiceRow::into_service).collect())
    }

    async fn update(
        &self,
        service_id: ServiceId,
        draft: &ServiceDraft,
        updated_at: DateTime<Utc>,
    ) -> PlanningResult<Option<Service>> {
        let row = sqlx::query_as::<_, ServiceRow>(&format!(
            r#"
            UPDATE services SET
                name = $2,
                start_time = $3,
                end_time = $4,
                updated_at = $5
            WHERE id = $1
            RETURNING {SERVICE_COLUMNS}
            "#
        ))
        .bind(service_id.as_i64())
        .bind(&draft.name)
        .bind(&draft.start_time)
        .bind(&draft.end_time)
        .bind(updated_at)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(ServiceRow::into_service))
    }

    async fn delete(&self, service_id: ServiceId) -> PlanningResult<bool> {
        let deleted = sqlx::query("DELETE FROM services WHERE id = $1")
            .bind(service_id.as_i64())
            .execute(&self.pool)
            .await?
            .rows_affected();

        Ok(deleted > 0)
    }
}

// ============================================================================
// Song Repository Implementation
// ============================================================================

impl SongRepository for PgPlanningRepository {
    async fn create(&self, fields: &SongFields) -> PlanningResult<Song> {
        let row = sqlx::query_as::<_, SongRow>(&format!(
            r#"
            INSERT INTO songs (
                name, author, song_key, bpm, time_signature, duration, structure,
                has_sequence, has_chart, has_score, youtube_url, voice_url, guitar_url,
                piano_url, drums_url, bass_url, wind_url
            ) VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15, $16, $17)
            RETURNING {SONG_COLUMNS}
            "#
        ))
        .bind(&fields.name)
        .bind(&fields.author)
        .bind(&fields.song_key)
        .bind(fields.bpm)
        .bind(&fields.time_signature)
        .bind(&fields.duration)
        .bind(&fields.structure)
        .bind(&fields.has_sequence)
        .bind(&fields.has_chart)
        .bind(&fields.has_score)
        .bind(&fields.youtube_url)
        .bind(&fields.voice_url)
        .bind(&fields.guitar_url)
        .bind(&fields.piano_url)
        .bind(&fields.drums_url)
        .bind(&fields.bass_url)
        .bind(&fields.wind_url)
        .fetch_one(&self.pool)
        .await?;

        Ok(row.into_song())
    }

    async fn find_by_id(&self, song_id: SongId) -> PlanningResult<Option<Song>> {
        let row = sqlx::query_as::<_, SongRow>(&format!(
            "SELECT {SONG_COLUMNS} FROM songs WHERE id = $1"
        ))
        .bind(song_id.as_i64())
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(SongRow::into_song))
    }

    async fn find_by_ids(&self, song_ids: &[SongId]) -> PlanningResult<Vec<Song>> {
        if song_ids.is_empty() {
            return Ok(Vec::new());
        }
        let ids: Vec<i64> = song_ids.iter().map(SongId::as_i64).collect();

        let rows = sqlx::query_as::<_, SongRow>(&format!(
            "SELECT {SONG_COLUMNS} FROM songs WHERE id = ANY($1) ORDER BY id"
        ))
        .bind(&ids)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.into_iter().map(SongRow::into_song).collect())
    }

    async fn list(&self) -> PlanningResult<Vec<Song>> {
        let rows = sqlx::query_as::<_, SongRow>(&format!(
            "SELECT {SONG_COLUMNS} FROM songs ORDER BY id"
        ))
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.into_iter().map(SongRow::into_song).collect())
    }

    async fn update(
        &self,
        song_id: SongId,
        fields: &SongFields,
        updated_at: DateTime<Utc>,
    ) -> PlanningResult<Option<Song>> {
        let row = sqlx::query_as::<_, SongRow>(&format!(
            r#"
            UPDATE songs SET
                name = $2, author = $3, song_key = $4, bpm = $5, time_signature = $6,
                duration = $7, structure = $8, has_sequence = $9, has_chart = $10,
                has_score = $11, youtube_url = $12, voice_url = $13, guitar_url = $14,
                piano_url = $15, drums_url = $16, bass_url = $17, wind_url = $18,
                updated_at = $19
            WHERE id = $1
            RETURNING {SONG_COLUMNS}
            "#
        ))
        .bind(song_id.as_i64())
        .bind(&fields.name)
        .bind(&fields.author)
        .bind(&fields.song_key)
        .bind(fields.bpm)
        .bind(&fields.time_signature)
        .bind(&fields.duration)
        .bind(&fields.structure)
        .bind(&fields.has_sequence)
        .bind(&fields.has_chart)
        .bind(&fields.has_score)
        .bind(&fields.youtube_url)
        .bind(&fields.voice_url)
        .bind(&fields.guitar_url)
        .bind(&fields.piano_url)
        .bind(&fields.drums_url)
        .bind(&fields.bass_url)
        .bind(&fields.wind_url)
        .bind(updated_at)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(SongRow::into_song))
    }

    async fn delete(&self, song_id: SongId) -> PlanningResult<bool> {
        let deleted = sqlx::query("DELETE FROM songs WHERE id = $1")
            .bind(song_id.as_i64())
            .execute(&self.pool)
            .await?
            .rows_affected();

        Ok(deleted > 0)
    }
}

// ============================================================================
// Assignment Repository Implementation
// ============================================================================

impl AssignmentRepository for PgPlanningRepository {
    async fn replace_users(
        &self,
        service_id: ServiceId,
        user_ids: &[UserId],
    ) -> PlanningResult<Vec<ServiceUser>> {
        let ids: Vec<i64> = user_ids.iter().map(UserId::as_i64).collect();
        let mut tx = self.pool.begin().await?;

        sqlx::query("DELETE FROM service_users WHERE service_id = $1")
            .bind(service_id.as_i64())
            .execute(&mut *tx)
            .await?;

        let rows = sqlx::query_as::<_, ServiceUserRow>(
            r#"
            INSERT INTO service_users (service_id, user_id, status)
            SELECT $1, u, $3 FROM UNNEST($2::BIGINT[]) AS u
            RETURNING service_id, user_id, status
            "#,
        )
        .bind(service_id.as_i64())
        .bind(&ids)
        .bind(AssignmentStatus::Pending.code())
        .fetch_all(&mut *tx)
        .await?;

        tx.commit().await?;

        rows.into_iter().map(ServiceUserRow::into_assignment).collect()
    }

    async fn list_users(&self, service_id: ServiceId) -> PlanningResult<Vec<ServiceUser>> {
        let rows = sqlx::query_as::<_, ServiceUserRow>(
            r#"
            SELECT service_id, user_id, status
            FROM service_users
            WHERE service_id = $1
            ORDER BY user_id
            "#,
        )
        .bind(service_id.as_i64())
        .fetch_all(&self.pool)
        .await?;

        rows.into_iter().map(ServiceUserRow::into_assignment).collect()
    }

    async fn set_user_status(
        &self,
        service_id: ServiceId,
        user_id: UserId,
        status: AssignmentStatus,
    ) -> PlanningResult<Option<ServiceUser>> {
        let row = sqlx::query_as::<_, ServiceUserRow>(
            r#"
            UPDATE service_users SET status = $3
            WHERE service_id = $1 AND user_id = $2
            RETURNING service_id, user_id, status
            "#,
        )
        .bind(service_id.as_i64())
        .bind(user_id.as_i64())
        .bind(status.code())
        .fetch_optional(&self.pool)
        .await?;

        row.map(ServiceUserRow::into_assignment).transpose()
    }

    async fn replace_songs(
        &self,
        service_id: ServiceId,
        song_ids: &[SongId],
    ) -> PlanningResult<Vec<ServiceSong>> {
        let ids: Vec<i64> = song_ids.iter().map(SongId::as_i64).collect();
        let mut tx = self.pool.begin().await?;

        sqlx::query("DELETE FROM service_songs WHERE service_id = $1")
            .bind(service_id.as_i64())
            .execute(&mut *tx)
            .await?;

        let rows = sqlx::query_as::<_, ServiceSongRow>(
            r#"
            INSERT INTO service_songs (service_id, song_id)
            SELECT $1, s FROM UNNEST($2::BIGINT[]) AS s
            RETURNING service_id, song_id
            "#,
        )
        .bind(service_id.as_i64())
        .bind(&ids)
        .fetch_all(&mut *tx)
        .await?;

        tx.commit().await?;

        Ok(rows.into_iter().map(ServiceSongRow::into_assignment).collect())
    }

    async fn list_songs(&self, service_id: ServiceId) -> PlanningResult<Vec<ServiceSong>> {
        let rows = sqlx::query_as::<_, ServiceSongRow>(
            "SELECT service_id, song_id FROM service_songs WHERE service_id = $1 ORDER BY song_id",
        )
        .bind(service_id.as_i64())
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.into_iter().map(ServiceSongRow::into_assignment).collect())
    }

    async fn remove_song(&self, service_id: ServiceId, song_id: SongId) -> PlanningResult<bool> {
        let deleted =
            sqlx::query("DELETE FROM service_songs WHERE service_id = $1 AND song_id = $2")
                .bind(service_id.as_i64())
                .bind(song_id.as_i64())
                .execute(&self.pool)
                .await?
                .rows_affected();

        Ok(deleted > 0)
    }

    async fn add_outfits(
        &self,
        service_id: ServiceId,
        outfit_ids: &[OutfitId],
    ) -> PlanningResult<Vec<ServiceOutfit>> {
        let ids: Vec<i64> = outfit_ids.iter().map(OutfitId::as_i64).collect();

        sqlx::query(
            r#"
            INSERT INTO service_outfits (service_id, outfit_id)
            SELECT $1, o FROM UNNEST($2::BIGINT[]) AS o
            ON CONFLICT DO NOTHING
            "#,
        )
        .bind(service_id.as_i64())
        .bind(&ids)
        .execute(&self.pool)
        .await?;

        self.list_outfits(service_id).await
    }

    async fn list_outfits(&self, service_id: ServiceId) -> PlanningResult<Vec<ServiceOutfit>> {
        let rows = sqlx::query_as::<_, ServiceOutfitRow>(
            r#"
            SELECT service_id, outfit_id
            FROM service_outfits
            WHERE service_id = $1
            ORDER BY outfit_id
            "#,
        )
        .bind(service_id.as_i64())
        .fetch_all(&self.pool)
        .await?;

        Ok(rows
            .into_iter()
            .map(|r| ServiceOutfit {
                service_id: ServiceId::new(r.service_id),
                outfit_id: OutfitId::new(r.outfit_id),
            })
            .collect())
    }

    async fn remove_outfit(
        &self,
        service_id: ServiceId,
        outfit_id: OutfitId,
    ) -> PlanningResult<bool> {
        let deleted =
            sqlx::query("DELETE FROM service_outfits WHERE service_id = $1 AND outfit_id = $2")
                .bind(service_id.as_i64())
                .bind(outfit_id.as_i64())
                .execute(&self.pool)
                .await?
                .rows_affected();

        Ok(deleted > 0)
    }
}

// ============================================================================
// Row Types
// ============================================================================

#[derive(sqlx::FromRow)]
struct ServiceRow {
    id: i64,
    name: String,
    start_time: String,
    end_time: String,
    created_by: i64,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl ServiceRow {
    fn into_service(self) -> Service {
        Service {
            service_id: ServiceId::new(self.id),
            name: self.name,
            start_time: self.start_time,
            end_time: self.end_time,
            created_by: UserId::new(self.created_by),
            created_at: self.created_at,
            updated_at: self.updated_at,
        }
    }
}

#[derive(sqlx::FromRow)]
struct SongRow {
    id: i64,
    name: String,
    author: String,
    song_key: String,
    bpm: i32,
    time_signature: String,
    duration: String,
    structure: String,
    has_sequence: String,
    has_chart: String,
    has_score: String,
    youtube_url: String,
    voice_url: String,
    guitar_url: String,
    piano_url: String,
    drums_url: String,
    bass_url: String,
    wind_url: String,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl SongRow {
    fn into_song(self) -> Song {
        Song {
            song_id: SongId::new(self.id),
            fields: SongFields {
                name: self.name,
                author: self.author,
                song_key: self.song_key,
                bpm: self.bpm,
                time_signature: self.time_signature,
                duration: self.duration,
                structure: self.structure,
                has_sequence: self.has_sequence,
                has_chart: self.has_chart,
                has_score: self.has_score,
                youtube_url: self.youtube_url,
                voice_url: self.voice_url,
                guitar_url: self.guitar_url,
                piano_url: self.piano_url,
                drums_url: self.drums_url,
                bass_url: self.bass_url,
                wind_url: self.wind_url,
            },
            created_at: self.created_at,
            updated_at: self.updated_at,
        }
    }
}

#[derive(sqlx::FromRow)]
struct ServiceUserRow {
    service_id: i64,
    user_id: i64,
    status: String,
}

impl ServiceUserRow {
    fn into_assignment(self) -> PlanningResult<ServiceUser> {
        let status = self
            .status
            .parse::<AssignmentStatus>()
            .map_err(|e| PlanningError::Internal(format!("stored status: {e}")))?;

        Ok(ServiceUser {
            service_id: ServiceId::new(self.service_id),
            user_id: UserId::new(self.user_id),
            status,
        })
    }
}

#[derive(sqlx::FromRow)]
struct ServiceSongRow {
    service_id: i64,
    song_id: i64,
}

impl ServiceSongRow {
    fn into_assignment(self) -> ServiceSong {
        ServiceSong {
            service_id: ServiceId::new(self.service_id),
            song_id: SongId::new(self.song_id),
        }
    }
}

#[derive(sqlx::FromRow)]
struct ServiceOutfitRow {
    service_id: i64,
    outfit_id: i64,
}
