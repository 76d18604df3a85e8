//! Generic data models for the `adapters` crate.
//!
//! These models describe an uploaded image independently of where it ends up,
//! so every `ImageStore` implementation works with the same decoded form.

use base64::{engine::general_purpose::STANDARD, Engine};

use crate::errors::AdapterError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImageFormat {
    Png,
    Jpeg,
    Gif,
    Webp,
}

impl ImageFormat {
    pub fn from_mime_subtype(subtype: &str) -> Result<Self, AdapterError> {
        match subtype.to_ascii_lowercase().as_str() {
            "png" => Ok(Self::Png),
            "jpeg" | "jpg" => Ok(Self::Jpeg),
            "gif" => Ok(Self::Gif),
            "webp" => Ok(Self::Webp),
            other => Err(AdapterError::UnsupportedFormat(other.to_string())),
        }
    }

    pub fn extension(&self) -> &'static str {
        match self {
            Self::Png => "png",
            Self::Jpeg => "jpg",
            Self::Gif => "gif",
            Self::Webp => "webp",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DecodedImage {
    pub format: ImageFormat,
    pub bytes: Vec<u8>,
}

impl DecodedImage {
    /// Parses `data:image/<subtype>;base64,<payload>`.
    pub fn from_data_uri(uri: &str) -> Result<Self, AdapterError> {
        let rest = uri
            .trim()
            .strip_prefix("data:")
            .ok_or(AdapterError::InvalidDataUri)?;
        let (header, payload) = rest.split_once(',').ok_or(AdapterError::InvalidDataUri)?;
        let mime = header
            .strip_suffix(";base64")
            .ok_or(AdapterError::InvalidDataUri)?;
        let subtype = mime
            .strip_prefix("image/")
            .ok_or_else(|| AdapterError::UnsupportedFormat(mime.to_string()))?;

        let format = ImageFormat::from_mime_subtype(subtype)?;
        let bytes = STANDARD.decode(payload.trim())?;
        if bytes.is_empty() {
            return Err(AdapterError::EmptyImage);
        }

        Ok(Self { format, bytes })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decodes_png_data_uri() {
        let image = DecodedImage::from_data_uri("data:image/png;base64,iVBORw0KGgo=").unwrap();

        assert_eq!(image.format, ImageFormat::Png);
        assert_eq!(&image.bytes[1..4], b"PNG");
    }

    #[test]
    fn accepts_jpg_alias() {
        let image = DecodedImage::from_data_uri("data:image/jpg;base64,/9j/").unwrap();
        assert_eq!(image.format, ImageFormat::Jpeg);
    }

    #[test]
    fn rejects_plain_base64() {
        let err = DecodedImage::from_data_uri("iVBORw0KGgo=").unwrap_err();
        assert!(matches!(err, AdapterError::InvalidDataUri));
    }

    #[test]
    fn rejects_non_image_mime() {
        let err = DecodedImage::from_data_uri("data:text/plain;base64,aGVsbG8=").unwrap_err();
        assert!(matches!(err, AdapterError::UnsupportedFormat(_)));
    }

    #[test]
    fn rejects_unknown_image_subtype() {
        let err = DecodedImage::from_data_uri("data:image/tiff;base64,aGVsbG8=").unwrap_err();
        assert!(matches!(err, AdapterError::UnsupportedFormat(s) if s == "tiff"));
    }

    #[test]
    fn rejects_broken_payload() {
        let err = DecodedImage::from_data_uri("data:image/png;base64,@@@").unwrap_err();
        assert!(matches!(err, AdapterError::Decode(_)));
    }

    #[test]
    fn rejects_empty_payload() {
        let err = DecodedImage::from_data_uri("data:image/png;base64,").unwrap_err();
        assert!(matches!(err, AdapterError::EmptyImage));
    }
}
