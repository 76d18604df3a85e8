use axum::extract::State;

use crate::{
    api::extract::{Json, Path},
    database::{models::Tag, queries},
    errors::{ApiError, ApiResult},
    state::AppState,
};

pub async fn list_tags(State(state): State<AppState>) -> ApiResult<Json<Vec<Tag>>> {
    Ok(Json(queries::list_tags(&state.pool).await?))
}

pub async fn get_tag(State(state): State<AppState>, Path(tag_id): Path<i64>) -> ApiResult<Json<Tag>> {
    queries::find_tag(&state.pool, tag_id)
        .await?
        .map(Json)
        .ok_or_else(|| ApiError::not_found("Tag"))
}
