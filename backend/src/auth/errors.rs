//! Custom error types specific to authentication failures.
//!
//! This module defines the errors that can occur during registration, login
//! and token validation, each mapped to the status the client receives.

use axum::http::StatusCode;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum AuthError {
    #[error("Authentication credentials were not provided.")]
    MissingCredentials,

    #[error("Invalid token.")]
    InvalidToken,

    #[error("Unable to log in with provided credentials.")]
    InvalidCredentials,

    #[error("Invalid password.")]
    WrongPassword,

    #[error("{0}")]
    InvalidRegistration(String),

    #[error("Password hashing failed: {0}")]
    Hashing(String),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
}

impl AuthError {
    pub fn status(&self) -> StatusCode {
        match self {
            AuthError::MissingCredentials | AuthError::InvalidToken => StatusCode::UNAUTHORIZED,
            AuthError::InvalidCredentials
            | AuthError::WrongPassword
            | AuthError::InvalidRegistration(_) => StatusCode::BAD_REQUEST,
            AuthError::Hashing(_) | AuthError::Database(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl From<argon2::password_hash::Error> for AuthError {
    fn from(err: argon2::password_hash::Error) -> Self {
        AuthError::Hashing(err.to_string())
    }
}
