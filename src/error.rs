//! Error types for File Hub.

use thiserror::Error;

/// Common error type for File Hub.
#[derive(Error, Debug)]
pub enum FileHubError {
    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON (de)serialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// The backing document file could not be read, parsed or written.
    #[error("storage error: {0}")]
    Storage(String),

    /// The named collection is not declared in the database.
    #[error("resource not found: {0}")]
    ResourceNotFound(String),

    /// No item with the given id exists in an existing collection.
    #[error("item {id} not found in {resource}")]
    ItemNotFound {
        /// Collection name.
        resource: String,
        /// Requested item id.
        id: String,
    },

    /// File or folder not found.
    #[error("{0} not found")]
    NotFound(String),

    /// Validation error for user input.
    #[error("validation error: {0}")]
    Validation(String),

    /// Configuration error.
    #[error("configuration error: {0}")]
    Config(String),
}

/// Result type alias for File Hub operations.
pub type Result<T> = std::result::Result<T, FileHubError>;
