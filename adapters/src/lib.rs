//! Core `adapters` crate for storing recipe images.
//!
//! This crate defines the `ImageStore` trait, which outlines how decoded images
//! are persisted and removed, and provides a central point for accessing the
//! concrete implementations (local filesystem, in-memory).

pub mod errors;
pub mod local;
pub mod memory;
pub mod models;

use async_trait::async_trait;

pub use errors::AdapterError;
pub use local::LocalImageStore;
pub use memory::MemoryImageStore;
pub use models::{DecodedImage, ImageFormat};

/// Directory, relative to the store root, that recipe images are written to.
pub const RECIPE_IMAGE_DIR: &str = "recipes";

#[async_trait]
pub trait ImageStore: Send + Sync {
    /// Persists the image and returns its path relative to the store root.
    async fn save(&self, image: &DecodedImage) -> Result<String, AdapterError>;

    /// Removes a previously saved image. Removing a missing image succeeds.
    async fn delete(&self, path: &str) -> Result<(), AdapterError>;
}

/// Builds a fresh relative path for an image of the given format.
pub fn new_image_path(format: ImageFormat) -> String {
    format!(
        "{}/{}.{}",
        RECIPE_IMAGE_DIR,
        uuid::Uuid::new_v4().simple(),
        format.extension()
    )
}
