use std::sync::Arc;

use foodgram_adapters::{ImageStore, LocalImageStore};
use sqlx::SqlitePool;

use crate::{config::Config, database};

/// Shared handler state: the pool, settings and the image store.
#[derive(Clone)]
pub struct AppState {
    pub pool: SqlitePool,
    pub config: Arc<Config>,
    pub images: Arc<dyn ImageStore>,
}

impl AppState {
    pub fn new(pool: SqlitePool, config: Config, images: Arc<dyn ImageStore>) -> Self {
        Self {
            pool,
            config: Arc::new(config),
            images,
        }
    }

    /// Connects, migrates and wires a filesystem image store under `MEDIA_ROOT`.
    pub async fn from_config(config: Config) -> anyhow::Result<Self> {
        let pool = database::connect(&config.database_url, config.db_max_connections).await?;
        database::migrate(&pool).await?;

        let images = Arc::new(LocalImageStore::new(config.media_root.clone()));
        Ok(Self::new(pool, config, images))
    }
}
