//! Handler functions for the ingredient API.
//!
//! Reads are public and unpaginated; `name` filters by case-insensitive
//! prefix. Creating, editing and deleting ingredients requires an admin.

use axum::{
    extract::{RawQuery, State},
    http::StatusCode,
};
use serde::Deserialize;
use tracing::info;

use crate::{
    api::extract::{Json, Path},
    auth::CurrentUser,
    database::{
        models::{Ingredient, UserRow},
        queries,
    },
    errors::{ApiError, ApiResult},
    services::recipes::MAX_NAME_LENGTH,
    state::AppState,
    utils::query::QueryPairs,
};

#[derive(Debug, Deserialize)]
pub struct IngredientWrite {
    pub name: String,
    pub measurement_unit: String,
}

impl IngredientWrite {
    fn validate(&self) -> ApiResult<(&str, &str)> {
        let name = self.name.trim();
        let unit = self.measurement_unit.trim();
        for (field, value) in [("name", name), ("measurement_unit", unit)] {
            let length = value.chars().count();
            if length == 0 || length > MAX_NAME_LENGTH {
                return Err(ApiError::validation(format!(
                    "Ingredient {field} must be between 1 and {MAX_NAME_LENGTH} characters."
                )));
            }
        }
        Ok((name, unit))
    }
}

fn require_admin(user: &UserRow) -> ApiResult<()> {
    if user.is_admin() {
        Ok(())
    } else {
        Err(ApiError::forbidden())
    }
}

pub async fn list_ingredients(
    State(state): State<AppState>,
    RawQuery(raw): RawQuery,
) -> ApiResult<Json<Vec<Ingredient>>> {
    let query = QueryPairs::parse(raw.as_deref());
    let ingredients = queries::list_ingredients(&state.pool, query.get("name")).await?;
    Ok(Json(ingredients))
}

pub async fn get_ingredient(
    State(state): State<AppState>,
    Path(ingredient_id): Path<i64>,
) -> ApiResult<Json<Ingredient>> {
    queries::find_ingredient(&state.pool, ingredient_id)
        .await?
        .map(Json)
        .ok_or_else(|| ApiError::not_found("Ingredient"))
}

pub async fn create_ingredient(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Json(payload): Json<IngredientWrite>,
) -> ApiResult<(StatusCode, Json<Ingredient>)> {
    require_admin(&user)?;
    let (name, unit) = payload.validate()?;

    let ingredient = queries::insert_ingredient(&state.pool, name, unit).await?;
    info!(ingredient_id = ingredient.id, "ingredient created");
    Ok((StatusCode::CREATED, Json(ingredient)))
}

pub async fn update_ingredient(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Path(ingredient_id): Path<i64>,
    Json(payload): Json<IngredientWrite>,
) -> ApiResult<Json<Ingredient>> {
    require_admin(&user)?;
    let (name, unit) = payload.validate()?;

    queries::update_ingredient(&state.pool, ingredient_id, name, unit)
        .await?
        .map(Json)
        .ok_or_else(|| ApiError::not_found("Ingredient"))
}

pub async fn delete_ingredient(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Path(ingredient_id): Path<i64>,
) -> ApiResult<StatusCode> {
    require_admin(&user)?;

    if queries::delete_ingredient(&state.pool, ingredient_id).await? == 0 {
        return Err(ApiError::not_found("Ingredient"));
    }
    info!(ingredient_id, "ingredient deleted");
    Ok(StatusCode::NO_CONTENT)
}
