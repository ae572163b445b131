//! Whole-file JSON document storage.
//!
//! The database is a single JSON object whose top-level keys name
//! collections. It is read in full at the start of every operation and
//! written back in full after every mutation.

use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use tokio::sync::Mutex;

use crate::{FileHubError, Result};

/// A schemaless record. Field order follows insertion order.
pub type Item = Map<String, Value>;

/// The full persisted document: collection name to item sequence.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Database {
    entries: Map<String, Value>,
}

impl Database {
    /// Create an empty database.
    pub fn new() -> Self {
        Self::default()
    }

    /// Get the items of a collection.
    ///
    /// Returns `None` when the name is not a top-level key or its value is
    /// not an array.
    pub fn collection(&self, name: &str) -> Option<&Vec<Value>> {
        self.entries.get(name).and_then(Value::as_array)
    }

    /// Get the items of a collection for mutation.
    pub fn collection_mut(&mut self, name: &str) -> Option<&mut Vec<Value>> {
        self.entries.get_mut(name).and_then(Value::as_array_mut)
    }

    /// Declare an empty collection if the name is not already present.
    ///
    /// Returns `true` if the collection was added.
    pub fn declare(&mut self, name: &str) -> bool {
        if self.entries.contains_key(name) {
            return false;
        }
        self.entries.insert(name.to_string(), Value::Array(Vec::new()));
        true
    }

    /// Names of all top-level keys holding a collection.
    pub fn collection_names(&self) -> Vec<&str> {
        self.entries
            .iter()
            .filter(|(_, v)| v.is_array())
            .map(|(k, _)| k.as_str())
            .collect()
    }
}

/// Document store bound to a single backing file.
///
/// Writers go through [`DocumentStore::update`], which holds a lock across
/// the load-mutate-save sequence. Readers do not take the lock; a save
/// replaces the file by rename so readers never see a partial write.
#[derive(Debug)]
pub struct DocumentStore {
    path: PathBuf,
    write_lock: Mutex<()>,
}

impl DocumentStore {
    /// Create a store for the given backing file.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            write_lock: Mutex::new(()),
        }
    }

    /// Path of the backing file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Read and parse the whole database.
    pub fn load(&self) -> Result<Database> {
        let content = fs::read_to_string(&self.path).map_err(|e| {
            FileHubError::Storage(format!("failed to read {}: {e}", self.path.display()))
        })?;

        serde_json::from_str(&content).map_err(|e| {
            FileHubError::Storage(format!("failed to parse {}: {e}", self.path.display()))
        })
    }

    /// Serialize the whole database as pretty JSON and replace the backing file.
    pub fn save(&self, db: &Database) -> Result<()> {
        let content = serde_json::to_string_pretty(db)?;

        write_atomic(&self.path, content.as_bytes()).map_err(|e| {
            FileHubError::Storage(format!("failed to write {}: {e}", self.path.display()))
        })
    }

    /// Run a load-mutate-save sequence under the store's write lock.
    ///
    /// Nothing is saved when `mutate` returns an error.
    pub async fn update<T, F>(&self, mutate: F) -> Result<T>
    where
        F: FnOnce(&mut Database) -> Result<T>,
    {
        let _guard = self.write_lock.lock().await;

        let mut db = self.load()?;
        let output = mutate(&mut db)?;
        self.save(&db)?;

        Ok(output)
    }

    /// Make sure the backing file exists and declares the given collections.
    ///
    /// Returns the names that were added.
    pub async fn ensure_collections(&self, names: &[String]) -> Result<Vec<String>> {
        let _guard = self.write_lock.lock().await;

        let (mut db, mut dirty) = if self.path.exists() {
            (self.load()?, false)
        } else {
            if let Some(parent) = self.path.parent() {
                if !parent.as_os_str().is_empty() {
                    fs::create_dir_all(parent)?;
                }
            }
            (Database::new(), true)
        };

        let mut added = Vec::new();
        for name in names {
            if db.declare(name) {
                added.push(name.clone());
                dirty = true;
            }
        }

        if dirty {
            self.save(&db)?;
        }
        tracing::debug!(collections = ?db.collection_names(), "Document store ready");

        Ok(added)
    }
}

/// Write `content` to a sibling temp file and rename it over `path`.
fn write_atomic(path: &Path, content: &[u8]) -> io::Result<()> {
    let tmp_path = path.with_extension("json.tmp");

    let mut file = fs::File::create(&tmp_path)?;
    file.write_all(content)?;
    file.sync_all()?;
    drop(file);

    if let Err(e) = fs::rename(&tmp_path, path) {
        let _ = fs::remove_file(&tmp_path);
        return Err(e);
    }

    Ok(())
}
