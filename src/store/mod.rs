//! JSON document database for File Hub.
//!
//! This module provides the data API backend:
//! - Whole-file JSON persistence with atomic replacement
//! - Filter, pagination, sort and search over collections
//! - CRUD operations with generated item ids

mod document;
mod query;
mod service;

pub use document::{Database, DocumentStore, Item};
pub use query::{
    contains_text, sort_items, text_of, FieldFilter, ListQuery, PageWindow, SortOrder, SortSpec,
};
pub use service::{find_position, generate_id, CollectionService, ID_FIELD};
