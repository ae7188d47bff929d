//! Planning Backend Module
//!
//! Services (events), the song catalog, and the links between them.
//!
//! - `domain/` - Service, song and assignment entities, repository traits
//! - `application/` - Catalog and assignment use cases
//! - `infra/` - PostgreSQL and in-memory stores
//! - `presentation/` - HTTP handlers, DTOs, router
//!
//! Every route sits behind `auth::require_auth`. Reads are open to any
//! signed-in user; writes are admin-only, except the assignment status,
//! which only the assigned user may answer.

pub mod application;
pub mod domain;
pub mod error;
pub mod infra;
pub mod presentation;


pub use error::{PlanningError, PlanningResult};
pub use infra::{InMemoryPlanningRepository, PgPlanningRepository};
pub use presentation::{PlanningAppState, planning_router};
