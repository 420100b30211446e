// ABOUTME: Storage error types shared by every storage struct
// ABOUTME: Maps database and serialization failures into one enum

use thiserror::Error;

/// Storage errors
#[derive(Error, Debug)]
pub enum StorageError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Database error: {0}")]
    Database(String),
    #[error("Sqlx error: {0}")]
    Sqlx(#[from] sqlx::Error),
    #[error("JSON serialization error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("record not found")]
    NotFound,
}

pub type StorageResult<T> = Result<T, StorageError>;
