//! Defines the HTTP routes for recipes, favorites, the cart and the shopping list.

use axum::{
    routing::{get, post},
    Router,
};

use super::handlers::{
    add_favorite, add_to_cart, create_recipe, delete_recipe, download_shopping_cart, get_recipe,
    list_recipes, remove_favorite, remove_from_cart, update_recipe,
};
use crate::state::AppState;

pub fn recipe_router() -> Router<AppState> {
    Router::new()
        .route("/api/recipes/", get(list_recipes).post(create_recipe))
        .route(
            "/api/recipes/download_shopping_cart/",
            get(download_shopping_cart),
        )
        .route(
            "/api/recipes/:id/",
            get(get_recipe).patch(update_recipe).delete(delete_recipe),
        )
        .route(
            "/api/recipes/:id/favorite/",
            post(add_favorite).delete(remove_favorite),
        )
        .route(
            "/api/recipes/:id/shopping_cart/",
            post(add_to_cart).delete(remove_from_cart),
        )
}
