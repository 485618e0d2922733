// Request extractors whose rejections render as the JSON error body

use axum::extract::{FromRequest, FromRequestParts};

use crate::types::AppError;

/// `axum::Json` with malformed bodies reported through [`AppError`].
#[derive(Debug, FromRequest)]
#[from_request(via(axum::Json), rejection(AppError))]
pub struct ApiJson<T>(pub T);

/// `axum::extract::Path` with unparsable segments reported through [`AppError`].
#[derive(Debug, FromRequestParts)]
#[from_request(via(axum::extract::Path), rejection(AppError))]
pub struct ApiPath<T>(pub T);
