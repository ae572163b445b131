//! Data API handlers: REST over the JSON document database.

use std::collections::HashMap;
use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use serde_json::Value;

use crate::store::{Database, Item, ListQuery};
use crate::web::error::ApiError;
use crate::web::handlers::AppState;

/// GET /data - Dump the whole database.
pub async fn dump_database(
    State(state): State<Arc<AppState>>,
) -> Result<Json<Database>, ApiError> {
    let db = state.collections.dump()?;
    Ok(Json(db))
}

/// GET /data/:resource - List a collection.
///
/// Query parameters: configured filter fields (default `nome`), `_page`
/// and `_limit`, `_sort` and `_order`, and `q`.
pub async fn list_items(
    State(state): State<Arc<AppState>>,
    Path(resource): Path<String>,
    Query(params): Query<HashMap<String, String>>,
) -> Result<Json<Vec<Value>>, ApiError> {
    let query = ListQuery::from_params(&params, &state.filter_fields);
    tracing::debug!(resource = %resource, ?query, "Listing collection");

    let items = state.collections.list(&resource, &query)?;
    Ok(Json(items))
}

/// GET /data/:resource/:id - Get one item.
pub async fn get_item(
    State(state): State<Arc<AppState>>,
    Path((resource, id)): Path<(String, String)>,
) -> Result<Json<Value>, ApiError> {
    let item = state.collections.get(&resource, &id)?;
    Ok(Json(item))
}

/// POST /data/:resource - Create an item with a generated id.
pub async fn create_item(
    State(state): State<Arc<AppState>>,
    Path(resource): Path<String>,
    Json(fields): Json<Item>,
) -> Result<(StatusCode, Json<Value>), ApiError> {
    let item = state.collections.create(&resource, fields).await?;
    Ok((StatusCode::CREATED, Json(item)))
}

/// PUT /data/:resource/:id - Replace an item's fields.
pub async fn replace_item(
    State(state): State<Arc<AppState>>,
    Path((resource, id)): Path<(String, String)>,
    Json(fields): Json<Item>,
) -> Result<Json<Value>, ApiError> {
    let item = state.collections.replace(&resource, &id, fields).await?;
    Ok(Json(item))
}

/// DELETE /data/:resource/:id - Delete an item.
pub async fn delete_item(
    State(state): State<Arc<AppState>>,
    Path((resource, id)): Path<(String, String)>,
) -> Result<StatusCode, ApiError> {
    state.collections.delete(&resource, &id).await?;
    Ok(StatusCode::NO_CONTENT)
}
