//! In-memory implementation of `ImageStore`, used by tests and ephemeral setups.

use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::Mutex;

use crate::{errors::AdapterError, models::DecodedImage, new_image_path, ImageStore};

#[derive(Debug, Default)]
pub struct MemoryImageStore {
    files: Mutex<HashMap<String, Vec<u8>>>,
}

impl MemoryImageStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn get(&self, path: &str) -> Option<Vec<u8>> {
        self.files.lock().await.get(path).cloned()
    }

    pub async fn len(&self) -> usize {
        self.files.lock().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.files.lock().await.is_empty()
    }
}

#[async_trait]
impl ImageStore for MemoryImageStore {
    async fn save(&self, image: &DecodedImage) -> Result<String, AdapterError> {
        let path = new_image_path(image.format);
        self.files
            .lock()
            .await
            .insert(path.clone(), image.bytes.clone());
        Ok(path)
    }

    async fn delete(&self, path: &str) -> Result<(), AdapterError> {
        self.files.lock().await.remove(path);
        Ok(())
    }
}
