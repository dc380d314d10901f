//! Error types for the heritage atlas

use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum HeritageError {
    // Entity errors
    #[error("Unknown craft category: {value}")]
    UnknownCraftCategory { value: String },

    #[error("Entity not found: {id}")]
    EntityNotFound { id: String },

    // Filter errors
    #[error("Invalid filter criteria: {reason}")]
    InvalidCriteria { reason: String },

    // Map session errors
    #[error("Map session is closed")]
    SessionClosed,

    #[error("A marker rebuild is already in progress")]
    RebuildInProgress,

    #[error("No marker for entity {id}")]
    MarkerNotFound { id: String },

    #[error("Unknown map layer: {name}")]
    LayerNotFound { name: String },

    // Source errors
    #[error("Entity source unavailable at {path}: {reason}")]
    SourceUnavailable { path: PathBuf, reason: String },

    // Configuration errors
    #[error("Missing required configuration: {key}")]
    ConfigMissing { key: String },

    #[error("Invalid configuration value for {key}: {reason}")]
    ConfigInvalid { key: String, reason: String },

    // IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    // Serialization errors
    #[error("Serialization error: {0}")]
    Serialization(String),
}

impl From<serde_json::Error> for HeritageError {
    fn from(err: serde_json::Error) -> Self {
        HeritageError::Serialization(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, HeritageError>;
