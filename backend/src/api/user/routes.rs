//! Defines the HTTP routes for users: registration, profiles and subscriptions.

use axum::{
    routing::{get, post},
    Router,
};

use super::handlers::{get_user, list_users, subscribe, subscriptions, unsubscribe};
use crate::{
    auth::handlers::{me, register, set_password},
    state::AppState,
};

pub fn user_router() -> Router<AppState> {
    Router::new()
        .route("/api/users/", get(list_users).post(register))
        .route("/api/users/me/", get(me))
        .route("/api/users/set_password/", post(set_password))
        .route("/api/users/subscriptions/", get(subscriptions))
        .route("/api/users/:id/", get(get_user))
        .route("/api/users/:id/subscribe/", post(subscribe).delete(unsubscribe))
}
