//! Request extractors.

use crate::error::ApiError;
use axum::extract::FromRequest;

/// `axum::Json` whose rejections (malformed JSON, wrong field types, missing fields,
/// wrong content type) are answered with the API error body as `400`.
#[derive(Debug, FromRequest)]
#[from_request(via(axum::Json), rejection(ApiError))]
pub struct ApiJson<T>(pub T);
