//! Defines the HTTP routes specifically for token authentication.
//!
//! Registration, `me` and `set_password` live under `/api/users/` and are
//! wired by `api::user::routes`; this router only covers token login/logout.

use axum::{routing::post, Router};

use super::handlers::{login, logout};
use crate::state::AppState;

pub fn auth_router() -> Router<AppState> {
    Router::new()
        .route("/api/auth/token/login/", post(login))
        .route("/api/auth/token/logout/", post(logout))
}
