//! File Hub
//!
//! A small HTTP service with two halves: upload storage organized into
//! folders, and a REST API over a JSON document database.

pub mod config;
pub mod datetime;
pub mod error;
pub mod file;
pub mod logging;
pub mod store;
pub mod web;

pub use config::Config;
pub use error::{FileHubError, Result};
pub use file::{FileStorage, StoredFile};
pub use store::{CollectionService, Database, DocumentStore, Item, ListQuery};
pub use web::WebServer;
