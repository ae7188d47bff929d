//! Infrastructure Layer

pub mod memory;
pub mod postgres;

pub use memory::InMemoryPlanningRepository;
pub use postgres::PgPlanningRepository;
