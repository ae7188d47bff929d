//! Infrastructure Layer
//!
//! Database and in-process store implementations.

pub mod memory;
pub mod postgres;

pub use memory::{InMemorySessionRegistry, InMemoryUserRepository};
pub use postgres::PgUserRepository;
