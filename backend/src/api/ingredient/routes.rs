use axum::{routing::get, Router};

use super::handlers::{
    create_ingredient, delete_ingredient, get_ingredient, list_ingredients, update_ingredient,
};
use crate::state::AppState;

pub fn ingredient_router() -> Router<AppState> {
    Router::new()
        .route(
            "/api/ingredients/",
            get(list_ingredients).post(create_ingredient),
        )
        .route(
            "/api/ingredients/:id/",
            get(get_ingredient)
                .patch(update_ingredient)
                .delete(delete_ingredient),
        )
}
