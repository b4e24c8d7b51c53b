//! Request extractors whose rejections go through `AppError`, so malformed
//! bodies and query strings get the same `{detail, code}` 400 as every other
//! validation failure.

use axum::extract::{FromRequest, FromRequestParts, Query};

use crate::errors::AppError;

/// `axum::Json` with an `AppError` rejection.
#[derive(FromRequest)]
#[from_request(via(axum::Json), rejection(AppError))]
pub struct AppJson<T>(pub T);

/// `axum::extract::Query` with an `AppError` rejection.
#[derive(FromRequestParts)]
#[from_request(via(Query), rejection(AppError))]
pub struct AppQuery<T>(pub T);
