//! Shared helpers for Web API integration tests.

#![allow(dead_code)]

use std::path::PathBuf;
use std::sync::Arc;

use axum_test::TestServer;
use filehub::file::FileStorage;
use filehub::store::{CollectionService, DocumentStore};
use filehub::web::handlers::AppState;
use filehub::web::router::{create_health_router, create_router};
use serde_json::Value;
use tempfile::TempDir;

/// A test server backed by a temporary data file and upload root.
pub struct TestApp {
    pub server: TestServer,
    pub dir: TempDir,
}

impl TestApp {
    /// Path of the JSON database file.
    pub fn data_path(&self) -> PathBuf {
        self.dir.path().join("data.json")
    }

    /// Path of the upload root.
    pub fn uploads_path(&self) -> PathBuf {
        self.dir.path().join("uploads")
    }

    /// Read the persisted database straight from disk.
    pub fn read_data(&self) -> Value {
        let content = std::fs::read_to_string(self.data_path()).expect("Failed to read data file");
        serde_json::from_str(&content).expect("Data file is not valid JSON")
    }
}

/// Options for building a test app.
#[derive(Default)]
pub struct TestAppOptions {
    pub cors_origins: Vec<String>,
    pub max_upload_size: Option<u64>,
}

/// Create a test app whose data file holds `initial`.
pub fn create_test_app(initial: &Value) -> TestApp {
    create_test_app_with(initial, TestAppOptions::default())
}

/// Create a test app with custom options.
pub fn create_test_app_with(initial: &Value, options: TestAppOptions) -> TestApp {
    let dir = TempDir::new().expect("Failed to create temp dir");
    let data_path = dir.path().join("data.json");
    std::fs::write(&data_path, serde_json::to_string_pretty(initial).unwrap())
        .expect("Failed to write data file");

    let store = Arc::new(DocumentStore::new(&data_path));
    let files =
        FileStorage::new(dir.path().join("uploads")).expect("Failed to create file storage");

    let mut app_state = AppState::new(CollectionService::new(store), files);
    if let Some(max) = options.max_upload_size {
        app_state = app_state.with_max_upload_size(max);
    }

    let router = create_router(Arc::new(app_state), &options.cors_origins)
        .merge(create_health_router());
    let server = TestServer::new(router).expect("Failed to create test server");

    TestApp { server, dir }
}
