//! Central module for organizing the application's main API endpoints.
//!
//! This module acts as a top-level container for the API domains (recipes,
//! tags, ingredients, users) and merges their routers with the token
//! authentication routes.

pub mod extract;
pub mod ingredient;
pub mod models;
pub mod pagination;
pub mod recipe;
pub mod tag;
pub mod user;

use axum::Router;

use crate::{auth::auth_router, state::AppState};

pub fn api_router() -> Router<AppState> {
    Router::new()
        .merge(recipe::routes::recipe_router())
        .merge(tag::routes::tag_router())
        .merge(ingredient::routes::ingredient_router())
        .merge(user::routes::user_router())
        .merge(auth_router())
}
