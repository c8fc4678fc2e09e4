use crate::types::InvalidUser;
use thiserror::Error;

/// Failures of the key-value store backing the persisted session
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StorageError {
    #[error("Storage unavailable: {0}")]
    Unavailable(String),

    #[error("Failed to read {key}: {message}")]
    Read { key: String, message: String },

    #[error("Failed to write {key}: {message}")]
    Write { key: String, message: String },

    #[error("Failed to remove {key}: {message}")]
    Remove { key: String, message: String },
}

#[derive(Debug, Error)]
pub enum SessionError {
    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Invalid persisted record: {0}")]
    InvalidRecord(#[from] InvalidUser),
}

pub type Result<T> = std::result::Result<T, SessionError>;
