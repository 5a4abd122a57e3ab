pub mod repository;
pub mod sqlite;

pub use sqlite::{open_database, open_in_memory, run_migrations};

use thiserror::Error;

#[derive(Error, Debug)]
pub enum DatabaseError {
    #[error("SQLite error: {0}")]
    Sqlite(#[from] rusqlite::Error),
    #[error("Entity not found: {entity_type} with id {id}")]
    NotFound { entity_type: String, id: String },
    #[error("Invalid enum value for {field}: {value}")]
    InvalidEnum { field: String, value: String },
    #[error("Migration to version {version} failed: {reason}")]
    MigrationFailed { version: i64, reason: String },
}
