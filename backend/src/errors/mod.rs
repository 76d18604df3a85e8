//! Global application error types and handlers.
//!
//! This module defines the error type returned by every handler and maps each
//! variant to an HTTP status with a `{"detail": ...}` body.

use axum::{
    extract::rejection::{JsonRejection, PathRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use foodgram_adapters::AdapterError;
use serde_json::json;
use thiserror::Error;
use tracing::{error, warn};

use crate::{auth::AuthError, services::relations::RelationError};

#[derive(Error, Debug)]
pub enum ApiError {
    #[error("{0}")]
    Validation(String),

    #[error("{0}")]
    Forbidden(String),

    #[error("{0}")]
    NotFound(String),

    #[error(transparent)]
    Auth(#[from] AuthError),

    #[error(transparent)]
    Relation(#[from] RelationError),

    #[error(transparent)]
    Image(#[from] AdapterError),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
}

pub type ApiResult<T> = Result<T, ApiError>;

impl ApiError {
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation(message.into())
    }

    pub fn not_found(what: &str) -> Self {
        Self::NotFound(format!("{what} not found."))
    }

    pub fn forbidden() -> Self {
        Self::Forbidden("You do not have permission to perform this action.".to_string())
    }

    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::Validation(_) => StatusCode::BAD_REQUEST,
            ApiError::Forbidden(_) => StatusCode::FORBIDDEN,
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::Auth(err) => err.status(),
            ApiError::Relation(err) => err.status(),
            ApiError::Image(AdapterError::Io(_)) => StatusCode::INTERNAL_SERVER_ERROR,
            ApiError::Image(_) => StatusCode::BAD_REQUEST,
            ApiError::Database(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        Self::Validation(rejection.body_text())
    }
}

impl From<PathRejection> for ApiError {
    fn from(rejection: PathRejection) -> Self {
        Self::Validation(rejection.body_text())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();

        let detail = if status.is_server_error() {
            error!(error = %self, "request failed");
            "Internal server error.".to_string()
        } else {
            warn!(status = status.as_u16(), error = %self, "request rejected");
            self.to_string()
        };

        (status, Json(json!({ "detail": detail }))).into_response()
    }
}
