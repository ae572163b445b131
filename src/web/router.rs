//! Router configuration for Web API.

use axum::{
    extract::DefaultBodyLimit,
    middleware,
    routing::get,
    Router,
};
use std::sync::Arc;
use tower::ServiceBuilder;
use tower_http::trace::TraceLayer;

use super::handlers::{
    create_item, delete_file, delete_item, dump_database, get_item, landing_page,
    list_folder_files, list_folders, list_items, replace_item, serve_file, upload_default,
    upload_to_folder, AppState,
};
use super::middleware::{cors_guard, create_cors_layer, OriginAllowList};

/// Multipart framing overhead allowed on top of the upload limit.
const MULTIPART_SLACK_BYTES: u64 = 1024 * 1024;

/// Create the main API router.
pub fn create_router(app_state: Arc<AppState>, cors_origins: &[String]) -> Router {
    // Data routes
    let data_routes = Router::new()
        .route("/", get(dump_database))
        .route("/:resource", get(list_items).post(create_item))
        .route(
            "/:resource/:id",
            get(get_item).put(replace_item).delete(delete_item),
        );

    // File routes
    let file_routes = Router::new()
        .route(
            "/",
            get(list_folders).post(upload_default).put(upload_default),
        )
        .route(
            "/:folder",
            get(list_folder_files)
                .post(upload_to_folder)
                .put(upload_to_folder),
        )
        .route("/:folder/:name", get(serve_file).delete(delete_file));

    let body_limit =
        usize::try_from(app_state.max_upload_size.saturating_add(MULTIPART_SLACK_BYTES))
            .unwrap_or(usize::MAX);

    Router::new()
        .route("/", get(landing_page))
        .nest("/data", data_routes)
        .nest("/files", file_routes)
        .layer(DefaultBodyLimit::max(body_limit))
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(middleware::from_fn_with_state(
                    OriginAllowList::new(cors_origins),
                    cors_guard,
                ))
                .layer(create_cors_layer(cors_origins)),
        )
        .with_state(app_state)
}

/// Create a health check router.
pub fn create_health_router() -> Router {
    Router::new().route("/health", get(health_check))
}

/// Health check handler.
async fn health_check() -> &'static str {
    "OK"
}
