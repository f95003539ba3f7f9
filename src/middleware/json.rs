use axum::extract::FromRequest;

use crate::error::ApiError;

/// `axum::Json` with rejections reported through [`ApiError`] (400 `INVALID_JSON`)
#[derive(Debug, FromRequest)]
#[from_request(via(axum::Json), rejection(ApiError))]
pub struct JsonBody<T>(pub T);
