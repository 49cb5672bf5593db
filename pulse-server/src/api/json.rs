use axum::extract::FromRequest;

use super::ApiError;

/// `axum::Json` whose rejections are reported as `{"error": ...}` with 400
#[derive(FromRequest)]
#[from_request(via(axum::Json), rejection(ApiError))]
pub struct ApiJson<T>(pub T);
