//! Filesystem implementation of `ImageStore`.
//!
//! Images are written under a media root directory, the same directory the
//! backend serves statically, so the returned relative path doubles as the
//! URL suffix.

use std::path::{Component, Path, PathBuf};

use async_trait::async_trait;
use tokio::fs;
use tracing::debug;

use crate::{errors::AdapterError, models::DecodedImage, new_image_path, ImageStore};

#[derive(Debug, Clone)]
pub struct LocalImageStore {
    root: PathBuf,
}

impl LocalImageStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn resolve(&self, relative: &str) -> Result<PathBuf, AdapterError> {
        let path = Path::new(relative);
        let is_plain = path
            .components()
            .all(|component| matches!(component, Component::Normal(_)));
        if relative.is_empty() || !is_plain {
            return Err(AdapterError::InvalidPath(relative.to_string()));
        }

        Ok(self.root.join(path))
    }
}

#[async_trait]
impl ImageStore for LocalImageStore {
    async fn save(&self, image: &DecodedImage) -> Result<String, AdapterError> {
        let relative = new_image_path(image.format);
        let target = self.resolve(&relative)?;

        if let Some(parent) = target.parent() {
            fs::create_dir_all(parent).await?;
        }
        fs::write(&target, &image.bytes).await?;
        debug!(path = %target.display(), bytes = image.bytes.len(), "stored image");

        Ok(relative)
    }

    async fn delete(&self, path: &str) -> Result<(), AdapterError> {
        let target = self.resolve(path)?;

        match fs::remove_file(&target).await {
            Ok(()) => Ok(()),
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(err) => Err(err.into()),
        }
    }
}
