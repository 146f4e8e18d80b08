//! Source image normalization for image-to-image requests.

use crate::{
    error::{GatewayError, Result},
    models::ImageBytes,
};
use image::{imageops::FilterType, DynamicImage, GenericImageView, ImageFormat};
use std::io::Cursor;

/// Edge length the SDXL 1024 engine expects for init images.
pub const TARGET_DIMENSION: u32 = 1024;

/// Detect an image format from its magic bytes.
pub fn detect_format(bytes: &[u8]) -> Result<ImageFormat> {
    match bytes {
        [0x89, 0x50, 0x4E, 0x47, ..] => Ok(ImageFormat::Png),
        [0xFF, 0xD8, 0xFF, ..] => Ok(ImageFormat::Jpeg),
        [0x52, 0x49, 0x46, 0x46, _, _, _, _, 0x57, 0x45, 0x42, 0x50, ..] => Ok(ImageFormat::WebP),
        [0x47, 0x49, 0x46, 0x38, x, ..] if *x == 0x37 || *x == 0x39 => Ok(ImageFormat::Gif),
        [0x42, 0x4D, ..] => Ok(ImageFormat::Bmp),
        [0x49, 0x49, 0x2A, 0x00, ..] | [0x4D, 0x4D, 0x00, 0x2A, ..] => Ok(ImageFormat::Tiff),
        _ => Err(GatewayError::ImageError("Unsupported image format".into())),
    }
}

/// Decode, convert to RGB, resize to 1024x1024 and re-encode as PNG.
pub fn normalize_source_image(source: &ImageBytes) -> Result<ImageBytes> {
    let decoded = decode(source)?;
    let (width, height) = decoded.dimensions();
    log::debug!("Normalizing source image {}x{}", width, height);

    let rgb = DynamicImage::ImageRgb8(decoded.to_rgb8());
    let resized = if (width, height) == (TARGET_DIMENSION, TARGET_DIMENSION) {
        rgb
    } else {
        rgb.resize_exact(TARGET_DIMENSION, TARGET_DIMENSION, FilterType::CatmullRom)
    };

    encode_png(&resized)
}

pub fn encode_png(image: &DynamicImage) -> Result<ImageBytes> {
    let mut buffer = Cursor::new(Vec::new());
    image.write_to(&mut buffer, ImageFormat::Png)?;
    Ok(ImageBytes::new(buffer.into_inner()))
}

fn decode(image: &ImageBytes) -> Result<DynamicImage> {
    if image.is_empty() {
        return Err(GatewayError::ImageError("Image data is empty".into()));
    }
    let format = detect_format(image.as_bytes())?;
    image::load_from_memory_with_format(image.as_bytes(), format)
        .map_err(|e| GatewayError::ImageError(format!("Failed to decode image: {}", e)))
}
