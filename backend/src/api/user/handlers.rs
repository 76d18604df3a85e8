//! Handler functions for user profile and subscription API endpoints.
//!
//! These functions process requests for user data and author subscriptions,
//! interact with the database and `services::relations`, and return
//! viewer-specific representations.

use axum::{
    extract::{OriginalUri, RawQuery, State},
    http::StatusCode,
};

use crate::{
    api::{
        extract::{Json, Path},
        models::{SubscriptionView, UserView},
        pagination::{Page, PageParams},
    },
    auth::{CurrentUser, MaybeUser},
    database::{models::UserRow, queries},
    errors::{ApiError, ApiResult},
    services::relations::{self, RelationKind},
    state::AppState,
    utils::query::QueryPairs,
};

fn recipes_limit(query: &QueryPairs) -> ApiResult<Option<i64>> {
    match query.parsed::<i64>("recipes_limit")? {
        Some(limit) if limit < 0 => Err(ApiError::validation("recipes_limit must not be negative.")),
        other => Ok(other),
    }
}

async fn load_user(state: &AppState, user_id: i64) -> ApiResult<UserRow> {
    queries::find_user_by_id(&state.pool, user_id)
        .await?
        .ok_or_else(|| ApiError::not_found("User"))
}

pub async fn list_users(
    State(state): State<AppState>,
    viewer: MaybeUser,
    OriginalUri(uri): OriginalUri,
    RawQuery(raw): RawQuery,
) -> ApiResult<Json<Page<UserView>>> {
    let query = QueryPairs::parse(raw.as_deref());
    let params = PageParams::from_query(&query, state.config.page_size)?;

    let count = queries::count_users(&state.pool).await?;
    params.ensure_in_range(count)?;
    let rows = queries::list_users(&state.pool, params.limit(), params.offset()).await?;

    let mut results = Vec::with_capacity(rows.len());
    for row in &rows {
        results.push(UserView::for_viewer(&state, row, viewer.user()).await?);
    }

    Ok(Json(Page::new(results, count, &params, &uri)))
}

pub async fn get_user(
    State(state): State<AppState>,
    viewer: MaybeUser,
    Path(user_id): Path<i64>,
) -> ApiResult<Json<UserView>> {
    let user = load_user(&state, user_id).await?;
    Ok(Json(UserView::for_viewer(&state, &user, viewer.user()).await?))
}

pub async fn subscriptions(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    OriginalUri(uri): OriginalUri,
    RawQuery(raw): RawQuery,
) -> ApiResult<Json<Page<SubscriptionView>>> {
    let query = QueryPairs::parse(raw.as_deref());
    let params = PageParams::from_query(&query, state.config.page_size)?;
    let recipes_limit = recipes_limit(&query)?;

    let count = queries::count_followed_authors(&state.pool, user.id).await?;
    params.ensure_in_range(count)?;
    let authors = queries::list_followed_authors(&state.pool, user.id, params.limit(), params.offset()).await?;

    let mut results = Vec::with_capacity(authors.len());
    for author in &authors {
        results.push(SubscriptionView::for_viewer(&state, author, &user, recipes_limit).await?);
    }

    Ok(Json(Page::new(results, count, &params, &uri)))
}

pub async fn subscribe(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Path(author_id): Path<i64>,
    RawQuery(raw): RawQuery,
) -> ApiResult<(StatusCode, Json<SubscriptionView>)> {
    let query = QueryPairs::parse(raw.as_deref());
    let recipes_limit = recipes_limit(&query)?;

    relations::add(&state.pool, RelationKind::Follow, user.id, author_id).await?;

    let author = load_user(&state, author_id).await?;
    let view = SubscriptionView::for_viewer(&state, &author, &user, recipes_limit).await?;
    Ok((StatusCode::CREATED, Json(view)))
}

pub async fn unsubscribe(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Path(author_id): Path<i64>,
) -> ApiResult<StatusCode> {
    relations::remove(&state.pool, RelationKind::Follow, user.id, author_id).await?;
    Ok(StatusCode::NO_CONTENT)
}
