//! Extractors for authenticated routes.
//!
//! Requests carry `Authorization: Token <key>`. `CurrentUser` rejects requests
//! without a valid token; `MaybeUser` lets anonymous requests through but still
//! rejects a token that does not resolve to a user.

use async_trait::async_trait;
use axum::{
    extract::FromRequestParts,
    http::{header::AUTHORIZATION, request::Parts},
};

use super::{errors::AuthError, service};
use crate::{database::models::UserRow, errors::ApiError, state::AppState};

const SCHEME: &str = "token";

pub struct CurrentUser(pub UserRow);

pub struct MaybeUser(pub Option<UserRow>);

impl MaybeUser {
    pub fn user(&self) -> Option<&UserRow> {
        self.0.as_ref()
    }
}

fn token_from_parts(parts: &Parts) -> Result<Option<&str>, AuthError> {
    let Some(header) = parts.headers.get(AUTHORIZATION) else {
        return Ok(None);
    };

    let value = header.to_str().map_err(|_| AuthError::InvalidToken)?;
    let (scheme, token) = value
        .trim()
        .split_once(' ')
        .ok_or(AuthError::InvalidToken)?;
    if !scheme.eq_ignore_ascii_case(SCHEME) || token.trim().is_empty() {
        return Err(AuthError::InvalidToken);
    }

    Ok(Some(token.trim()))
}

async fn resolve(parts: &Parts, state: &AppState) -> Result<Option<UserRow>, AuthError> {
    match token_from_parts(parts)? {
        Some(token) => service::authenticate(&state.pool, token).await.map(Some),
        None => Ok(None),
    }
}

#[async_trait]
impl FromRequestParts<AppState> for CurrentUser {
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, Self::Rejection> {
        resolve(parts, state)
            .await?
            .map(CurrentUser)
            .ok_or_else(|| AuthError::MissingCredentials.into())
    }
}

#[async_trait]
impl FromRequestParts<AppState> for MaybeUser {
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, Self::Rejection> {
        Ok(MaybeUser(resolve(parts, state).await?))
    }
}
