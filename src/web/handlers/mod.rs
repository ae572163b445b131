//! API handlers for File Hub.

pub mod data;
pub mod file;
pub mod home;

pub use data::*;
pub use file::*;
pub use home::*;

use crate::file::{FileStorage, DEFAULT_MAX_FILE_SIZE};
use crate::store::CollectionService;

/// Application state shared by all handlers.
#[derive(Debug, Clone)]
pub struct AppState {
    /// Collection operations over the JSON database.
    pub collections: CollectionService,
    /// Upload storage.
    pub files: FileStorage,
    /// Item fields accepted as substring filters on list requests.
    pub filter_fields: Vec<String>,
    /// Maximum upload size in bytes.
    pub max_upload_size: u64,
}

impl AppState {
    /// Create a new application state.
    pub fn new(collections: CollectionService, files: FileStorage) -> Self {
        Self {
            collections,
            files,
            filter_fields: vec!["nome".to_string()],
            max_upload_size: DEFAULT_MAX_FILE_SIZE,
        }
    }

    /// Set the filterable fields.
    pub fn with_filter_fields(mut self, fields: Vec<String>) -> Self {
        self.filter_fields = fields;
        self
    }

    /// Set the maximum upload size in bytes.
    pub fn with_max_upload_size(mut self, bytes: u64) -> Self {
        self.max_upload_size = bytes;
        self
    }
}
