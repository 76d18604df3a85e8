use axum::{routing::get, Router};

use super::handlers::{get_tag, list_tags};
use crate::state::AppState;

pub fn tag_router() -> Router<AppState> {
    Router::new()
        .route("/api/tags/", get(list_tags))
        .route("/api/tags/:id/", get(get_tag))
}
