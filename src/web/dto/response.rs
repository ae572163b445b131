//! Response DTOs for the file API.

use serde::Serialize;

use crate::datetime::to_rfc3339;
use crate::file::StoredFile;

/// Plain message response.
#[derive(Debug, Serialize)]
pub struct MessageResponse {
    /// Human-readable message.
    pub message: String,
}

impl MessageResponse {
    /// Create a new message response.
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

/// Upload result.
#[derive(Debug, Serialize)]
pub struct UploadResponse {
    /// Human-readable message.
    pub message: String,
    /// Destination folder.
    pub folder: String,
    /// Stored file name.
    pub name: String,
    /// Size in bytes.
    pub size: u64,
}

/// Folder listing.
#[derive(Debug, Serialize)]
pub struct FolderListResponse {
    /// Folder names.
    pub folders: Vec<String>,
}

/// File entry in a folder listing.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FileEntryResponse {
    /// File name.
    pub name: String,
    /// Size in bytes.
    pub size: u64,
    /// Last modification time (RFC 3339).
    pub modified_time: String,
}

impl From<StoredFile> for FileEntryResponse {
    fn from(file: StoredFile) -> Self {
        Self {
            name: file.name,
            size: file.size,
            modified_time: to_rfc3339(&file.modified),
        }
    }
}

/// Files in one folder.
#[derive(Debug, Serialize)]
pub struct FolderContentsResponse {
    /// Folder name.
    pub folder: String,
    /// Files in the folder.
    pub files: Vec<FileEntryResponse>,
}
