//! Song Entity

use chrono::{DateTime, Utc};

use crate::domain::value_object::ids::SongId;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Song {
    pub song_id: SongId,
    pub fields: SongFields,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Repertoire metadata and practice links
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SongFields {
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
