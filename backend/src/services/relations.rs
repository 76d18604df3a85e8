//! Create-or-conflict / delete-or-404 toggles for favorites, cart entries and
//! author subscriptions.
//!
//! Duplicate detection is left to the unique constraints on the relation
//! tables: the insert is attempted and a unique violation becomes
//! `AlreadyExists`. Two concurrent POSTs for the same pair therefore yield one
//! row and one conflict, never two rows.

use axum::http::StatusCode;
use sqlx::SqlitePool;
use thiserror::Error;
use tracing::info;

use crate::database::{is_unique_violation, queries};

pub use crate::database::models::RelationKind;

#[derive(Error, Debug)]
pub enum RelationError {
    #[error("{0} not found.")]
    TargetNotFound(&'static str),

    #[error("Not in {}.", .0.label())]
    NotPresent(RelationKind),

    #[error("Already in {}.", .0.label())]
    AlreadyExists(RelationKind),

    #[error("You cannot subscribe to yourself.")]
    SelfFollow,

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
}

impl RelationError {
    pub fn status(&self) -> StatusCode {
        match self {
            RelationError::TargetNotFound(_) | RelationError::NotPresent(_) => StatusCode::NOT_FOUND,
            RelationError::AlreadyExists(_) => StatusCode::CONFLICT,
            RelationError::SelfFollow => StatusCode::BAD_REQUEST,
            RelationError::Database(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

async fn ensure_target(pool: &SqlitePool, kind: RelationKind, target_id: i64) -> Result<(), RelationError> {
    match kind {
        RelationKind::Favorite | RelationKind::Cart => {
            if queries::find_recipe(pool, target_id).await?.is_none() {
                return Err(RelationError::TargetNotFound("Recipe"));
            }
        }
        RelationKind::Follow => {
            if queries::find_user_by_id(pool, target_id).await?.is_none() {
                return Err(RelationError::TargetNotFound("User"));
            }
        }
    }
    Ok(())
}

pub async fn add(pool: &SqlitePool, kind: RelationKind, user_id: i64, target_id: i64) -> Result<(), RelationError> {
    ensure_target(pool, kind, target_id).await?;

    if kind == RelationKind::Follow && user_id == target_id {
        return Err(RelationError::SelfFollow);
    }

    match queries::insert_relation(pool, kind, user_id, target_id).await {
        Ok(()) => {
            info!(user_id, target_id, relation = kind.table(), "relation created");
            Ok(())
        }
        Err(err) if is_unique_violation(&err) => Err(RelationError::AlreadyExists(kind)),
        Err(sqlx::Error::Database(db)) if db.is_check_violation() => Err(RelationError::SelfFollow),
        Err(sqlx::Error::Database(db)) if db.is_foreign_key_violation() => Err(RelationError::TargetNotFound(
            match kind {
                RelationKind::Follow => "User",
                _ => "Recipe",
            },
        )),
        Err(err) => Err(err.into()),
    }
}

pub async fn remove(pool: &SqlitePool, kind: RelationKind, user_id: i64, target_id: i64) -> Result<(), RelationError> {
    ensure_target(pool, kind, target_id).await?;

    if queries::delete_relation(pool, kind, user_id, target_id).await? == 0 {
        return Err(RelationError::NotPresent(kind));
    }

    info!(user_id, target_id, relation = kind.table(), "relation removed");
    Ok(())
}

pub async fn exists(
    pool: &SqlitePool,
    kind: RelationKind,
    user_id: i64,
    target_id: i64,
) -> Result<bool, sqlx::Error> {
    queries::relation_exists(pool, kind, user_id, target_id).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::database::{
        self,
        models::{NewUser, RecipeFields},
    };

    async fn pool_with_users() -> (SqlitePool, i64, i64) {
        let pool = database::connect("sqlite::memory:", 1).await.unwrap();
        database::migrate(&pool).await.unwrap();
        let (anna, boris) = insert_users(&pool).await;
        (pool, anna, boris)
    }

    async fn insert_users(pool: &SqlitePool) -> (i64, i64) {
        let mut ids = Vec::new();
        for name in ["anna", "boris"] {
            let email = format!("{name}@example.com");
            let user = queries::insert_user(
                pool,
                &NewUser {
                    email: &email,
                    username: name,
                    first_name: name,
                    last_name: name,
                    password_hash: "x",
                },
            )
            .await
            .unwrap();
            ids.push(user.id);
        }
        (ids[0], ids[1])
    }

    #[tokio::test]
    async fn follow_toggles_with_conflict_and_not_found() {
        let (pool, anna, boris) = pool_with_users().await;

        add(&pool, RelationKind::Follow, anna, boris).await.unwrap();
        assert!(exists(&pool, RelationKind::Follow, anna, boris).await.unwrap());

        let err = add(&pool, RelationKind::Follow, anna, boris).await.unwrap_err();
        assert!(matches!(err, RelationError::AlreadyExists(RelationKind::Follow)));
        assert_eq!(err.status(), StatusCode::CONFLICT);

        remove(&pool, RelationKind::Follow, anna, boris).await.unwrap();
        let err = remove(&pool, RelationKind::Follow, anna, boris).await.unwrap_err();
        assert_eq!(err.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn self_follow_is_rejected() {
        let (pool, anna, _) = pool_with_users().await;

        let err = add(&pool, RelationKind::Follow, anna, anna).await.unwrap_err();
        assert!(matches!(err, RelationError::SelfFollow));
        assert_eq!(err.status(), StatusCode::BAD_REQUEST);
        assert!(!exists(&pool, RelationKind::Follow, anna, anna).await.unwrap());
    }

    #[tokio::test]
    async fn store_rejects_self_follow_rows() {
        let (pool, anna, _) = pool_with_users().await;

        let err = queries::insert_relation(&pool, RelationKind::Follow, anna, anna)
            .await
            .unwrap_err();
        assert!(matches!(err, sqlx::Error::Database(db) if db.is_check_violation()));
    }

    #[tokio::test]
    async fn missing_targets_are_not_found() {
        let (pool, anna, _) = pool_with_users().await;

        let err = add(&pool, RelationKind::Favorite, anna, 999).await.unwrap_err();
        assert!(matches!(err, RelationError::TargetNotFound("Recipe")));

        let err = remove(&pool, RelationKind::Follow, anna, 999).await.unwrap_err();
        assert!(matches!(err, RelationError::TargetNotFound("User")));
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 2)]
    async fn concurrent_duplicate_adds_store_one_row() {
        let dir = tempfile::tempdir().unwrap();
        let url = format!("sqlite://{}", dir.path().join("relations.db").display());
        let pool = database::connect(&url, 4).await.unwrap();
        database::migrate(&pool).await.unwrap();

        let (anna, boris) = insert_users(&pool).await;
        let mut conn = pool.acquire().await.unwrap();
        let recipe = queries::insert_recipe(
            &mut conn,
            boris,
            &RecipeFields {
                name: "Soup",
                text: "Boil",
                cooking_time: 30,
                image: "recipes/soup.png",
            },
        )
        .await
        .unwrap();
        drop(conn);

        for _ in 0..5 {
            let (first, second) = tokio::join!(
                add(&pool, RelationKind::Favorite, anna, recipe),
                add(&pool, RelationKind::Favorite, anna, recipe),
            );

            let results = [first, second];
            assert_eq!(results.iter().filter(|r| r.is_ok()).count(), 1);
            assert!(results
                .iter()
                .any(|r| matches!(r, Err(RelationError::AlreadyExists(RelationKind::Favorite)))));

            let rows: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM favorites")
                .fetch_one(&pool)
                .await
                .unwrap();
            assert_eq!(rows, 1);

            remove(&pool, RelationKind::Favorite, anna, recipe).await.unwrap();
        }
    }
}
