//! Module for database connection setup and common utilities.
//!
//! This module is responsible for initializing the SQLite connection pool and
//! running the embedded migrations.

pub mod models;
pub mod queries;

use std::str::FromStr;

use sqlx::{
    migrate::MigrateError,
    sqlite::{SqliteConnectOptions, SqlitePoolOptions},
    SqlitePool,
};
use tracing::info;

pub async fn connect(database_url: &str, max_connections: u32) -> Result<SqlitePool, sqlx::Error> {
    let options = SqliteConnectOptions::from_str(database_url)?
        .create_if_missing(true)
        .foreign_keys(true);

    // Every connection to `:memory:` opens its own empty database, so the
    // pool must hold exactly one connection and never recycle it.
    let pool_options = if is_in_memory(database_url) {
        SqlitePoolOptions::new()
            .max_connections(1)
            .min_connections(1)
            .idle_timeout(None)
            .max_lifetime(None)
    } else {
        SqlitePoolOptions::new().max_connections(max_connections.max(1))
    };

    let pool = pool_options.connect_with(options).await?;
    info!("Connected to {database_url}");

    Ok(pool)
}

pub async fn migrate(pool: &SqlitePool) -> Result<(), MigrateError> {
    sqlx::migrate!("./migrations").run(pool).await?;
    backfill_name_lower(pool).await?;
    info!("Database migrations applied");
    Ok(())
}

/// Fills `ingredients.name_lower` for rows stored before the column existed.
///
/// SQLite's `lower()` only folds ASCII, so the search key is computed here.
pub async fn backfill_name_lower(pool: &SqlitePool) -> Result<u64, sqlx::Error> {
    let rows: Vec<(i64, String)> =
        sqlx::query_as("SELECT id, name FROM ingredients WHERE name_lower = '' AND name <> ''")
            .fetch_all(pool)
            .await?;
    if rows.is_empty() {
        return Ok(0);
    }

    let mut tx = pool.begin().await?;
    for (id, name) in &rows {
        sqlx::query("UPDATE ingredients SET name_lower = ? WHERE id = ?")
            .bind(name.to_lowercase())
            .bind(id)
            .execute(&mut *tx)
            .await?;
    }
    tx.commit().await?;

    info!(rows = rows.len(), "ingredient search names backfilled");
    Ok(rows.len() as u64)
}

/// Whether the error is the store rejecting a duplicate row.
pub fn is_unique_violation(err: &sqlx::Error) -> bool {
    matches!(err, sqlx::Error::Database(db) if db.is_unique_violation())
}

fn is_in_memory(database_url: &str) -> bool {
    database_url.contains(":memory:") || database_url.contains("mode=memory")
}
