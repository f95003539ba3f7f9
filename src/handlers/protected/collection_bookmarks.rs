// handlers/protected/collection_bookmarks.rs - /api/collections/:id/bookmarks[/:bookmarkId]
//
// Item routes only act on bookmarks that are filed in the named collection.

use axum::{
    extract::{Path, State},
    Extension,
};

use crate::database::models::Bookmark;
use crate::middleware::{ApiResponse, ApiResult, AuthUser, JsonBody, Message};
use crate::services::{BookmarkService, CreateBookmarkRequest, UpdateBookmarkRequest};
use crate::state::AppState;

/// GET /api/collections/:id/bookmarks
pub async fn list(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    Path(collection_id): Path<String>,
) -> ApiResult<Vec<Bookmark>> {
    let service = BookmarkService::new(state.store.as_ref(), &user);
    Ok(ApiResponse::success(service.list_in(&collection_id).await?))
}

/// POST /api/collections/:id/bookmarks
pub async fn create(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    Path(collection_id): Path<String>,
    JsonBody(payload): JsonBody<CreateBookmarkRequest>,
) -> ApiResult<Bookmark> {
    let service = BookmarkService::new(state.store.as_ref(), &user);
    Ok(ApiResponse::created(service.create_in(&collection_id, payload).await?))
}

/// PUT /api/collections/:id/bookmarks/:bookmarkId
pub async fn update(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    Path((collection_id, bookmark_id)): Path<(String, String)>,
    JsonBody(payload): JsonBody<UpdateBookmarkRequest>,
) -> ApiResult<Bookmark> {
    let service = BookmarkService::new(state.store.as_ref(), &user);
    let updated = service.update_in(&collection_id, &bookmark_id, payload).await?;
    Ok(ApiResponse::success(updated))
}

/// DELETE /api/collections/:id/bookmarks/:bookmarkId
pub async fn delete(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    Path((collection_id, bookmark_id)): Path<(String, String)>,
) -> ApiResult<Message> {
    let service = BookmarkService::new(state.store.as_ref(), &user);
    service.delete_in(&collection_id, &bookmark_id).await?;
    Ok(ApiResponse::success(Message::new("Bookmark deleted successfully")))
}
