//! File management module for File Hub.
//!
//! This module provides upload storage:
//! - Named subfolders created on demand
//! - Original file names preserved
//! - Listing, loading and deletion

mod storage;

pub use storage::{validate_segment, FileStorage, StoredFile};

/// Folder used when an upload names none.
pub const DEFAULT_FOLDER: &str = "default";

/// Default maximum file size (10MB).
pub const DEFAULT_MAX_FILE_SIZE: u64 = 10 * 1024 * 1024;
