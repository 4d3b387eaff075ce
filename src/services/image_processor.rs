// src/services/image_processor.rs
use crate::errors::StyleSeerError;
use base64::{Engine as _, engine::general_purpose};
use image::{DynamicImage, GenericImageView, ImageFormat as ImgFormat};

/// A `data:<mime>;base64,<payload>` string split into its parts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DataUri<'a> {
    pub mime_type: &'a str,
    pub payload: &'a str,
}

impl<'a> DataUri<'a> {
    /// Checks the shape only; the payload is never decoded here.
    pub fn parse(uri: &'a str) -> Result<Self, StyleSeerError> {
        let rest = uri.strip_prefix("data:").ok_or_else(|| {
            StyleSeerError::ImageProcessing("Image must be a data URI".to_string())
        })?;
        let (header, payload) = rest.split_once(',').ok_or_else(|| {
            StyleSeerError::ImageProcessing("Data URI has no payload".to_string())
        })?;
        let mime_type = header.strip_suffix(";base64").ok_or_else(|| {
            StyleSeerError::ImageProcessing("Data URI must use base64 encoding".to_string())
        })?;

        if !mime_type.starts_with("image/") {
            return Err(StyleSeerError::ImageProcessing(format!(
                "Unsupported media type: {}",
                mime_type
            )));
        }
        if payload.is_empty() {
            return Err(StyleSeerError::ImageProcessing(
                "Data URI payload is empty".to_string(),
            ));
        }

        Ok(Self { mime_type, payload })
    }
}

pub struct ImageProcessor;

impl ImageProcessor {
    pub fn new() -> Self {
        Self
    }

    /// Decodes the upload once; the returned image feeds [`Self::resize_if_needed`].
    pub fn validate_image(&self, data: &[u8]) -> Result<DynamicImage, StyleSeerError> {
        let img = image::load_from_memory(data)
            .map_err(|e| StyleSeerError::ImageProcessing(format!("Invalid image format: {}", e)))?;

        let (width, height) = img.dimensions();

        if width > 8192 || height > 8192 {
            return Err(StyleSeerError::ImageProcessing(
                "Image dimensions exceed 8192x8192".to_string(),
            ));
        }

        Ok(img)
    }

    /// Downscales so the longest edge fits `max_size`; returns the bytes and their MIME type.
    /// Images that already fit keep their original bytes.
    pub fn resize_if_needed(
        &self,
        img: &DynamicImage,
        data: &[u8],
        content_type: &str,
        max_size: u32,
    ) -> Result<(Vec<u8>, String), StyleSeerError> {
        let (width, height) = img.dimensions();

        if width <= max_size && height <= max_size {
            return Ok((data.to_vec(), content_type.to_string()));
        }

        let ratio = (max_size as f32 / width.max(height) as f32).min(1.0);
        let new_width = ((width as f32 * ratio) as u32).max(1);
        let new_height = ((height as f32 * ratio) as u32).max(1);

        let resized = img.resize(new_width, new_height, image::imageops::FilterType::Lanczos3);

        let mut output = Vec::new();
        resized
            .write_to(&mut std::io::Cursor::new(&mut output), ImgFormat::Png)
            .map_err(|e| {
                StyleSeerError::ImageProcessing(format!("Failed to encode resized image: {}", e))
            })?;

        Ok((output, "image/png".to_string()))
    }

    pub fn to_data_uri(&self, data: &[u8], content_type: &str) -> String {
        format!(
            "data:{};base64,{}",
            content_type,
            general_purpose::STANDARD.encode(data)
        )
    }
}

impl Default for ImageProcessor {
    fn default() -> Self {
        Self::new()
    }
}
