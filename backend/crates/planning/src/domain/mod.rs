//! Domain Layer
//!
//! Contains entities, value objects, and repository traits.

pub mod entity;
pub mod repository;
pub mod value_object;

// Re-exports
pub use entity::{
    assignment::{ServiceOutfit, ServiceSong, ServiceUser},
    service::{Service, ServiceDraft},
    song::{Song, SongFields},
};
pub use repository::{AssignmentRepository, ServiceRepository, SongRepository};
