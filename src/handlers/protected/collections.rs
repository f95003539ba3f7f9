// handlers/protected/collections.rs - /api/collections[/:id]

use axum::{
    extract::{Path, State},
    Extension,
};

use crate::database::models::{Collection, CollectionSummary};
use crate::middleware::{ApiResponse, ApiResult, AuthUser, JsonBody, Message};
use crate::services::{CollectionService, CreateCollectionRequest};
use crate::state::AppState;

/// GET /api/collections - caller's collections with bookmark counts, newest first
pub async fn list(State(state): State<AppState>, Extension(user): Extension<AuthUser>) -> ApiResult<Vec<CollectionSummary>> {
    let service = CollectionService::new(state.store.as_ref(), &user);
    Ok(ApiResponse::success(service.list().await?))
}

/// POST /api/collections
pub async fn create(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    JsonBody(payload): JsonBody<CreateCollectionRequest>,
) -> ApiResult<Collection> {
    let service = CollectionService::new(state.store.as_ref(), &user);
    Ok(ApiResponse::created(service.create(payload).await?))
}

/// GET /api/collections/:id
pub async fn get(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    Path(id): Path<String>,
) -> ApiResult<Collection> {
    let service = CollectionService::new(state.store.as_ref(), &user);
    Ok(ApiResponse::success(service.get(&id).await?))
}

/// DELETE /api/collections/:id - also removes the bookmarks filed in it
pub async fn delete(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    Path(id): Path<String>,
) -> ApiResult<Message> {
    let service = CollectionService::new(state.store.as_ref(), &user);
    service.delete(&id).await?;
    Ok(ApiResponse::success(Message::new("Collection deleted successfully")))
}
