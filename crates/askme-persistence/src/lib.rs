//! AskMe Persistence - Database entities and storage layer
//!
//! This crate provides:
//! - SeaORM entity definitions for every AskMe table
//! - Domain models returned to the rest of the application
//! - Persistence traits and their SQL implementation

pub mod entity;
pub mod model;
pub mod sql;
pub mod traits;

// Re-export sea_orm for downstream crates
pub use sea_orm;

pub use entity::prelude;

pub use model::*;
pub use sql::ExternalDbPersistService;
pub use traits::*;
