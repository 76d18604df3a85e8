//! Central module for application-wide configuration settings.
//!
//! This module handles loading and managing configuration parameters such as
//! the database URL, listen address, media directory and page size. Every
//! value comes from the environment and falls back to a default.

use std::{env, fmt::Display, path::PathBuf, str::FromStr};

use thiserror::Error;
use tracing::{info, warn};

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Invalid {key} value {value:?}: {message}")]
    InvalidValue {
        key: &'static str,
        value: String,
        message: String,
    },
}

#[derive(Debug, Clone)]
pub struct Config {
    pub host: String,
    pub port: u16,
    pub database_url: String,
    pub db_max_connections: u32,
    pub media_root: PathBuf,
    pub media_url: String,
    pub page_size: u32,
}

impl Config {
    pub fn load() -> Result<Self, ConfigError> {
        let config = Self {
            host: try_load("FOODGRAM_HOST", "0.0.0.0")?,
            port: try_load("FOODGRAM_PORT", "8000")?,
            database_url: try_load("DATABASE_URL", "sqlite://foodgram.db")?,
            db_max_connections: try_load("DB_MAX_CONNECTIONS", "5")?,
            media_root: try_load("MEDIA_ROOT", "./media")?,
            media_url: normalize_media_url(&try_load::<String>("MEDIA_URL", "/media/")?),
            page_size: try_load("PAGE_SIZE", "6")?,
        };

        if config.page_size == 0 {
            return Err(ConfigError::InvalidValue {
                key: "PAGE_SIZE",
                value: "0".to_string(),
                message: "must be positive".to_string(),
            });
        }

        Ok(config)
    }

    pub fn address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    /// Public URL for an image stored at `path` relative to the media root.
    pub fn media_link(&self, path: &str) -> String {
        format!("{}{}", self.media_url, path)
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 8000,
            database_url: "sqlite::memory:".to_string(),
            db_max_connections: 1,
            media_root: PathBuf::from("./media"),
            media_url: "/media/".to_string(),
            page_size: 6,
        }
    }
}

fn try_load<T: FromStr>(key: &'static str, default: &str) -> Result<T, ConfigError>
where
    T::Err: Display,
{
    let value = env::var(key).unwrap_or_else(|_| {
        info!("{key} not set, using default: {default}");
        default.to_string()
    });

    match value.parse::<T>() {
        Ok(parsed) => Ok(parsed),
        Err(e) => {
            warn!("Invalid {key} value: {e}");
            Err(ConfigError::InvalidValue {
                key,
                message: e.to_string(),
                value,
            })
        }
    }
}

fn normalize_media_url(raw: &str) -> String {
    let trimmed = raw.trim_matches('/');
    if trimmed.is_empty() {
        "/".to_string()
    } else {
        format!("/{trimmed}/")
    }
}
