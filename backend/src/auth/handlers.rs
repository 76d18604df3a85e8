//! Handler functions for authentication-related API endpoints.
//!
//! These functions process incoming HTTP requests for registration, token
//! login and logout, the current user's profile and password changes, and
//! delegate to `auth::service` for the core logic.

use axum::{extract::State, http::StatusCode};

use super::{
    middleware::CurrentUser,
    models::{LoginRequest, RegisterRequest, SetPasswordRequest, TokenResponse},
    service,
};
use crate::{
    api::{
        extract::Json,
        models::{RegisteredUser, UserView},
    },
    errors::ApiResult,
    state::AppState,
};

pub async fn register(
    State(state): State<AppState>,
    Json(request): Json<RegisterRequest>,
) -> ApiResult<(StatusCode, Json<RegisteredUser>)> {
    let user = service::register(&state.pool, &request).await?;
    Ok((StatusCode::CREATED, Json(RegisteredUser::from(&user))))
}

pub async fn login(
    State(state): State<AppState>,
    Json(request): Json<LoginRequest>,
) -> ApiResult<Json<TokenResponse>> {
    let auth_token = service::login(&state.pool, &request.email, &request.password).await?;
    Ok(Json(TokenResponse { auth_token }))
}

pub async fn logout(State(state): State<AppState>, CurrentUser(user): CurrentUser) -> ApiResult<StatusCode> {
    service::logout(&state.pool, user.id).await?;
    Ok(StatusCode::NO_CONTENT)
}

pub async fn me(CurrentUser(user): CurrentUser) -> Json<UserView> {
    Json(UserView::new(&user, false))
}

pub async fn set_password(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Json(request): Json<SetPasswordRequest>,
) -> ApiResult<StatusCode> {
    service::set_password(
        &state.pool,
        &user,
        &request.current_password,
        &request.new_password,
    )
    .await?;
    Ok(StatusCode::NO_CONTENT)
}
