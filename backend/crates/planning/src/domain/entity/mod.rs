pub mod assignment;
pub mod service;
pub mod song;
