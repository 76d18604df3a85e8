//! Request extractors whose rejections render as `ApiError`.
//!
//! `Json` and `Path` wrap the axum extractors of the same name, so a body that
//! fails to deserialize or a non-numeric `:id` becomes a 400 with the usual
//! `{"detail": ...}` body instead of axum's plain-text rejection.

use axum::{
    extract::{FromRequest, FromRequestParts},
    response::{IntoResponse, Response},
};
use serde::Serialize;

use crate::errors::ApiError;

#[derive(Debug, Clone, Copy, Default, FromRequest)]
#[from_request(via(axum::Json), rejection(ApiError))]
pub struct Json<T>(pub T);

impl<T: Serialize> IntoResponse for Json<T> {
    fn into_response(self) -> Response {
        axum::Json(self.0).into_response()
    }
}

#[derive(Debug, FromRequestParts)]
#[from_request(via(axum::extract::Path), rejection(ApiError))]
pub struct Path<T>(pub T);
