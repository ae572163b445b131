//! Upload storage for File Hub.
//!
//! Files are stored under named subfolders of a base directory, keeping
//! their original names:
//! ```text
//! {base_path}/
//! ├── default/
//! │   └── report.pdf
//! └── avatars/
//!     └── ana.png
//! ```

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};

use crate::datetime::from_system_time;
use crate::{FileHubError, Result};

use super::DEFAULT_FOLDER;

/// Metadata of a stored file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredFile {
    /// File name.
    pub name: String,
    /// Size in bytes.
    pub size: u64,
    /// Last modification time.
    pub modified: DateTime<Utc>,
}

/// File storage service for managing uploaded files.
#[derive(Debug, Clone)]
pub struct FileStorage {
    /// Base directory for file storage.
    base_path: PathBuf,
}

impl FileStorage {
    /// Create a new FileStorage with the given base path.
    ///
    /// The base directory will be created if it doesn't exist.
    pub fn new(base_path: impl Into<PathBuf>) -> Result<Self> {
        let base_path = base_path.into();
        fs::create_dir_all(&base_path)?;

        Ok(Self { base_path })
    }

    /// Get the base path of this storage.
    pub fn base_path(&self) -> &Path {
        &self.base_path
    }

    /// Save content into a folder under its original name.
    ///
    /// The folder is created if absent; an existing file is overwritten.
    /// `None` selects the default folder.
    pub fn save(&self, folder: Option<&str>, file_name: &str, content: &[u8]) -> Result<PathBuf> {
        let folder = folder.unwrap_or(DEFAULT_FOLDER);
        let file_path = self.file_path(folder, file_name)?;

        if let Some(parent) = file_path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(&file_path, content)?;

        Ok(file_path)
    }

    /// Load a file's content.
    pub fn load(&self, folder: &str, file_name: &str) -> Result<Vec<u8>> {
        let file_path = self.file_path(folder, file_name)?;

        match fs::read(&file_path) {
            Ok(content) => Ok(content),
            Err(e) if is_missing(&e) => Err(file_not_found(folder, file_name)),
            Err(e) => Err(e.into()),
        }
    }

    /// Delete a file.
    ///
    /// A missing file is reported as `NotFound`; any other failure as `Io`.
    pub fn delete(&self, folder: &str, file_name: &str) -> Result<()> {
        let file_path = self.file_path(folder, file_name)?;

        match fs::remove_file(&file_path) {
            Ok(()) => Ok(()),
            Err(e) if is_missing(&e) => Err(file_not_found(folder, file_name)),
            Err(e) => Err(e.into()),
        }
    }

    /// List folder names, sorted.
    pub fn list_folders(&self) -> Result<Vec<String>> {
        let mut folders = Vec::new();

        for entry in fs::read_dir(&self.base_path)? {
            let entry = entry?;
            if entry.file_type()?.is_dir() {
                if let Ok(name) = entry.file_name().into_string() {
                    folders.push(name);
                }
            }
        }

        folders.sort();
        Ok(folders)
    }

    /// List regular files in a folder, sorted by name.
    pub fn list_files(&self, folder: &str) -> Result<Vec<StoredFile>> {
        let dir = self.folder_path(folder)?;

        let entries = match fs::read_dir(&dir) {
            Ok(entries) => entries,
            Err(e) if is_missing(&e) => {
                return Err(FileHubError::NotFound(format!("Folder \"{folder}\"")));
            }
            Err(e) => return Err(e.into()),
        };

        let mut files = Vec::new();
        for entry in entries {
            let entry = entry?;
            let metadata = entry.metadata()?;
            if !metadata.is_file() {
                continue;
            }
            let Ok(name) = entry.file_name().into_string() else {
                continue;
            };

            files.push(StoredFile {
                name,
                size: metadata.len(),
                modified: from_system_time(metadata.modified()?),
            });
        }

        files.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(files)
    }

    /// Get the directory for a folder name.
    pub fn folder_path(&self, folder: &str) -> Result<PathBuf> {
        validate_segment(folder, "folder")?;
        Ok(self.base_path.join(folder))
    }

    /// Get the full path for a file in a folder.
    pub fn file_path(&self, folder: &str, file_name: &str) -> Result<PathBuf> {
        validate_segment(file_name, "file name")?;
        Ok(self.folder_path(folder)?.join(file_name))
    }
}

/// Reject names that are not a single plain path segment.
pub fn validate_segment(name: &str, what: &str) -> Result<()> {
    let invalid = name.is_empty()
        || name == "."
        || name == ".."
        || name.contains(|c: char| matches!(c, '/' | '\\' | '\0'));

    if invalid {
        return Err(FileHubError::Validation(format!("invalid {what}: {name:?}")));
    }
    Ok(())
}

fn is_missing(e: &io::Error) -> bool {
    e.kind() == io::ErrorKind::NotFound
}

fn file_not_found(folder: &str, file_name: &str) -> FileHubError {
    FileHubError::NotFound(format!("File \"{file_name}\" in folder \"{folder}\""))
}
