//! Handler functions for the recipe API.
//!
//! These functions list, read and write recipes, toggle favorites and cart
//! entries through `services::relations`, and serve the aggregated shopping
//! list from `services::shopping_list`.

use axum::{
    extract::{OriginalUri, RawQuery, State},
    http::{header, StatusCode},
    response::IntoResponse,
};

use crate::{
    api::{
        extract::{Json, Path},
        models::{RecipeShort, RecipeView},
        pagination::{Page, PageParams},
    },
    auth::{CurrentUser, MaybeUser},
    database::{
        models::{RecipeFilter, RecipeRow},
        queries,
    },
    errors::{ApiError, ApiResult},
    services::{
        recipes::{self, RecipeWrite},
        relations::{self, RelationKind},
        shopping_list,
    },
    state::AppState,
    utils::query::QueryPairs,
};

async fn load_recipe(state: &AppState, recipe_id: i64) -> ApiResult<RecipeRow> {
    queries::find_recipe(&state.pool, recipe_id)
        .await?
        .ok_or_else(|| ApiError::not_found("Recipe"))
}

pub async fn list_recipes(
    State(state): State<AppState>,
    viewer: MaybeUser,
    OriginalUri(uri): OriginalUri,
    RawQuery(raw): RawQuery,
) -> ApiResult<Json<Page<RecipeView>>> {
    let query = QueryPairs::parse(raw.as_deref());
    let params = PageParams::from_query(&query, state.config.page_size)?;

    let viewer_id = viewer.user().map(|user| user.id);
    let wants_favorites = query.flag("is_favorited");
    let wants_cart = query.flag("is_in_shopping_cart");

    // Anonymous users have no favorites and no cart.
    if viewer_id.is_none() && (wants_favorites || wants_cart) {
        return Ok(Json(Page::new(Vec::new(), 0, &params, &uri)));
    }

    let filter = RecipeFilter {
        author: query.parsed::<i64>("author")?,
        tags: query
            .get_all("tags")
            .into_iter()
            .filter(|slug| !slug.is_empty())
            .map(str::to_string)
            .collect(),
        favorited_by: viewer_id.filter(|_| wants_favorites),
        in_cart_of: viewer_id.filter(|_| wants_cart),
    };

    let count = queries::count_recipes(&state.pool, &filter).await?;
    params.ensure_in_range(count)?;
    let rows = queries::list_recipes(&state.pool, &filter, params.limit(), params.offset()).await?;

    let mut results = Vec::with_capacity(rows.len());
    for row in &rows {
        results.push(RecipeView::for_viewer(&state, row, viewer.user()).await?);
    }

    Ok(Json(Page::new(results, count, &params, &uri)))
}

pub async fn get_recipe(
    State(state): State<AppState>,
    viewer: MaybeUser,
    Path(recipe_id): Path<i64>,
) -> ApiResult<Json<RecipeView>> {
    let recipe = load_recipe(&state, recipe_id).await?;
    Ok(Json(RecipeView::for_viewer(&state, &recipe, viewer.user()).await?))
}

pub async fn create_recipe(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Json(payload): Json<RecipeWrite>,
) -> ApiResult<(StatusCode, Json<RecipeView>)> {
    let recipe_id = recipes::create(&state, &user, payload).await?;
    let recipe = load_recipe(&state, recipe_id).await?;
    let view = RecipeView::for_viewer(&state, &recipe, Some(&user)).await?;
    Ok((StatusCode::CREATED, Json(view)))
}

pub async fn update_recipe(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Path(recipe_id): Path<i64>,
    Json(payload): Json<RecipeWrite>,
) -> ApiResult<Json<RecipeView>> {
    recipes::update(&state, &user, recipe_id, payload).await?;
    let recipe = load_recipe(&state, recipe_id).await?;
    Ok(Json(RecipeView::for_viewer(&state, &recipe, Some(&user)).await?))
}

pub async fn delete_recipe(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Path(recipe_id): Path<i64>,
) -> ApiResult<StatusCode> {
    recipes::delete(&state, &user, recipe_id).await?;
    Ok(StatusCode::NO_CONTENT)
}

async fn add_relation(
    state: &AppState,
    kind: RelationKind,
    user_id: i64,
    recipe_id: i64,
) -> ApiResult<(StatusCode, Json<RecipeShort>)> {
    relations::add(&state.pool, kind, user_id, recipe_id).await?;
    let recipe = load_recipe(state, recipe_id).await?;
    Ok((StatusCode::CREATED, Json(RecipeShort::new(&recipe, &state.config))))
}

pub async fn add_favorite(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Path(recipe_id): Path<i64>,
) -> ApiResult<(StatusCode, Json<RecipeShort>)> {
    add_relation(&state, RelationKind::Favorite, user.id, recipe_id).await
}

pub async fn remove_favorite(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Path(recipe_id): Path<i64>,
) -> ApiResult<StatusCode> {
    relations::remove(&state.pool, RelationKind::Favorite, user.id, recipe_id).await?;
    Ok(StatusCode::NO_CONTENT)
}

pub async fn add_to_cart(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Path(recipe_id): Path<i64>,
) -> ApiResult<(StatusCode, Json<RecipeShort>)> {
    add_relation(&state, RelationKind::Cart, user.id, recipe_id).await
}

pub async fn remove_from_cart(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Path(recipe_id): Path<i64>,
) -> ApiResult<StatusCode> {
    relations::remove(&state.pool, RelationKind::Cart, user.id, recipe_id).await?;
    Ok(StatusCode::NO_CONTENT)
}

pub async fn download_shopping_cart(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
) -> ApiResult<impl IntoResponse> {
    let body = shopping_list::download(&state.pool, user.id).await?;

    Ok((
        [
            (header::CONTENT_TYPE, "text/plain; charset=utf-8".to_string()),
            (
                header::CONTENT_DISPOSITION,
                format!("attachment; filename=\"{}\"", shopping_list::FILE_NAME),
            ),
        ],
        body,
    ))
}
