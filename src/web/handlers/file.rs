//! File handlers for Web API.

use axum::{
    body::Body,
    extract::{Multipart, Path, State},
    http::header,
    response::Response,
    Json,
};
use std::sync::Arc;

use crate::file::DEFAULT_FOLDER;
use crate::web::dto::{
    FileEntryResponse, FolderContentsResponse, FolderListResponse, MessageResponse,
    UploadResponse,
};
use crate::web::error::ApiError;
use crate::web::handlers::AppState;

/// POST|PUT /files - Upload a file into the default folder.
pub async fn upload_default(
    State(state): State<Arc<AppState>>,
    multipart: Multipart,
) -> Result<Json<UploadResponse>, ApiError> {
    store_upload(&state, DEFAULT_FOLDER, multipart).await
}

/// POST|PUT /files/:folder - Upload a file into a named folder.
///
/// Request body: multipart/form-data with a "file" field.
pub async fn upload_to_folder(
    State(state): State<Arc<AppState>>,
    Path(folder): Path<String>,
    multipart: Multipart,
) -> Result<Json<UploadResponse>, ApiError> {
    store_upload(&state, &folder, multipart).await
}

async fn store_upload(
    state: &AppState,
    folder: &str,
    mut multipart: Multipart,
) -> Result<Json<UploadResponse>, ApiError> {
    let mut filename: Option<String> = None;
    let mut content: Option<Vec<u8>> = None;

    while let Some(field) = multipart.next_field().await.map_err(|e| {
        tracing::error!("Failed to read multipart field: {}", e);
        ApiError::bad_request("Invalid multipart data")
    })? {
        if field.name() != Some("file") {
            continue;
        }

        filename = field.file_name().map(|s| s.to_string());
        content = Some(
            field
                .bytes()
                .await
                .map_err(|e| {
                    tracing::error!("Failed to read file content: {}", e);
                    ApiError::bad_request("Failed to read file")
                })?
                .to_vec(),
        );
    }

    let filename = filename.ok_or_else(|| ApiError::bad_request("No file provided"))?;
    let content = content.ok_or_else(|| ApiError::bad_request("No file content"))?;

    if content.len() as u64 > state.max_upload_size {
        let max_mb = state.max_upload_size / 1024 / 1024;
        return Err(ApiError::bad_request(format!(
            "File too large (max {}MB)",
            max_mb
        )));
    }

    state.files.save(Some(folder), &filename, &content)?;
    tracing::info!(folder, file = %filename, size = content.len(), "Stored upload");

    Ok(Json(UploadResponse {
        message: "File uploaded successfully".to_string(),
        folder: folder.to_string(),
        name: filename,
        size: content.len() as u64,
    }))
}

/// GET /files - List upload folders.
pub async fn list_folders(
    State(state): State<Arc<AppState>>,
) -> Result<Json<FolderListResponse>, ApiError> {
    let folders = state.files.list_folders()?;
    Ok(Json(FolderListResponse { folders }))
}

/// GET /files/:folder - List files in a folder.
pub async fn list_folder_files(
    State(state): State<Arc<AppState>>,
    Path(folder): Path<String>,
) -> Result<Json<FolderContentsResponse>, ApiError> {
    let files = state
        .files
        .list_files(&folder)?
        .into_iter()
        .map(FileEntryResponse::from)
        .collect();

    Ok(Json(FolderContentsResponse { folder, files }))
}

/// GET /files/:folder/:name - Serve a stored file.
pub async fn serve_file(
    State(state): State<Arc<AppState>>,
    Path((folder, name)): Path<(String, String)>,
) -> Result<Response<Body>, ApiError> {
    let content = state.files.load(&folder, &name)?;

    let content_type = mime_guess::from_path(&name)
        .first_or_octet_stream()
        .to_string();

    Response::builder()
        .header(header::CONTENT_TYPE, content_type)
        .header(header::CONTENT_LENGTH, content.len())
        .body(Body::from(content))
        .map_err(|e| {
            tracing::error!("Failed to build response: {}", e);
            ApiError::internal("Failed to build response")
        })
}

/// DELETE /files/:folder/:name - Delete a stored file.
pub async fn delete_file(
    State(state): State<Arc<AppState>>,
    Path((folder, name)): Path<(String, String)>,
) -> Result<Json<MessageResponse>, ApiError> {
    state.files.delete(&folder, &name)?;

    tracing::info!(folder = %folder, file = %name, "Deleted file");
    Ok(Json(MessageResponse::new(format!(
        "File \"{name}\" deleted successfully"
    ))))
}
