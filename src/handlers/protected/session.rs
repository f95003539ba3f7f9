// handlers/protected/session.rs - GET /api/auth/user

use axum::{extract::State, Extension};

use crate::database::models::User;
use crate::error::ApiError;
use crate::middleware::{ApiResponse, ApiResult, AuthUser};
use crate::state::AppState;

/// GET /api/auth/user - local profile of the caller
pub async fn current_user(State(state): State<AppState>, Extension(user): Extension<AuthUser>) -> ApiResult<User> {
    state
        .store
        .find_user(&user.id)
        .await?
        .map(ApiResponse::success)
        .ok_or_else(|| ApiError::not_found("User not found"))
}
