// handlers/protected/bookmarks.rs - /api/bookmarks[/:id]

use axum::{
    extract::{Path, State},
    Extension,
};

use crate::database::models::Bookmark;
use crate::middleware::{ApiResponse, ApiResult, AuthUser, JsonBody, Message};
use crate::services::{BookmarkService, CreateBookmarkRequest, UpdateBookmarkRequest};
use crate::state::AppState;

/// GET /api/bookmarks - every bookmark the caller owns, newest first
pub async fn list(State(state): State<AppState>, Extension(user): Extension<AuthUser>) -> ApiResult<Vec<Bookmark>> {
    let service = BookmarkService::new(state.store.as_ref(), &user);
    Ok(ApiResponse::success(service.list().await?))
}

/// POST /api/bookmarks
pub async fn create(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    JsonBody(payload): JsonBody<CreateBookmarkRequest>,
) -> ApiResult<Bookmark> {
    let service = BookmarkService::new(state.store.as_ref(), &user);
    Ok(ApiResponse::created(service.create(payload).await?))
}

/// GET /api/bookmarks/:id
pub async fn get(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    Path(id): Path<String>,
) -> ApiResult<Bookmark> {
    let service = BookmarkService::new(state.store.as_ref(), &user);
    Ok(ApiResponse::success(service.get(&id).await?))
}

/// PUT /api/bookmarks/:id
pub async fn update(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    Path(id): Path<String>,
    JsonBody(payload): JsonBody<UpdateBookmarkRequest>,
) -> ApiResult<Bookmark> {
    let service = BookmarkService::new(state.store.as_ref(), &user);
    Ok(ApiResponse::success(service.update(&id, payload).await?))
}

/// DELETE /api/bookmarks/:id
pub async fn delete(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    Path(id): Path<String>,
) -> ApiResult<Message> {
    let service = BookmarkService::new(state.store.as_ref(), &user);
    service.delete(&id).await?;
    Ok(ApiResponse::success(Message::new("Bookmark deleted successfully")))
}
