//! Custom error types specific to the `adapters` crate.
//!
//! This module defines errors that can occur while decoding uploaded images or
//! writing them to and removing them from a backing store.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum AdapterError {
    #[error("Image must be a base64 data URI")]
    InvalidDataUri,

    #[error("Unsupported image format: {0}")]
    UnsupportedFormat(String),

    #[error("Image payload is empty")]
    EmptyImage,

    #[error("Invalid base64 payload: {0}")]
    Decode(#[from] base64::DecodeError),

    #[error("Invalid image path: {0}")]
    InvalidPath(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}
