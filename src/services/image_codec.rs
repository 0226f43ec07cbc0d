//! Decode arbitrary uploaded image bytes and re-encode them into the configured
//! output format.

use std::io::Cursor;

use bytes::Bytes;
use image::codecs::jpeg::JpegEncoder;
use image::{DynamicImage, ExtendedColorType, GenericImageView, ImageEncoder};
use thiserror::Error;

use crate::domain::models::{
    file::CompressedArtifact,
    format::{OutputFormat, Quality},
};

/// libwebp refuses larger canvases.
const WEBP_MAX_DIMENSION: u32 = 16383;

#[derive(Debug, Error)]
pub enum CodecError {
    #[error("Unable to decode image: {0}")]
    Decode(String),

    #[error("Unable to encode image: {0}")]
    Encode(String),
}

/// Deterministic for a given input, format and quality.
pub fn recompress(
    input: &[u8],
    format: OutputFormat,
    quality: Quality,
) -> Result<CompressedArtifact, CodecError> {
    let img = image::load_from_memory(input).map_err(|e| CodecError::Decode(e.to_string()))?;

    let bytes = match format {
        OutputFormat::WebP => encode_webp(&img, quality)?,
        OutputFormat::Jpeg => encode_jpeg(&img, quality)?,
    };

    Ok(CompressedArtifact {
        bytes,
        format,
        quality,
    })
}

fn encode_webp(img: &DynamicImage, quality: Quality) -> Result<Bytes, CodecError> {
    let (width, height) = img.dimensions();
    if width > WEBP_MAX_DIMENSION || height > WEBP_MAX_DIMENSION {
        return Err(CodecError::Encode(format!(
            "{}x{} exceeds the WebP limit of {}x{}",
            width, height, WEBP_MAX_DIMENSION, WEBP_MAX_DIMENSION
        )));
    }

    let rgba = img.to_rgba8();
    let encoder = webp::Encoder::from_rgba(&rgba, width, height);
    let webp_data = encoder
        .encode_simple(false, f32::from(quality.value()))
        .map_err(|e| CodecError::Encode(format!("{:?}", e)))?;

    Ok(Bytes::copy_from_slice(&webp_data))
}

fn encode_jpeg(img: &DynamicImage, quality: Quality) -> Result<Bytes, CodecError> {
    let rgb = img.to_rgb8();
    let (width, height) = rgb.dimensions();
    let mut buffer = Cursor::new(Vec::new());

    JpegEncoder::new_with_quality(&mut buffer, quality.value())
        .write_image(rgb.as_raw(), width, height, ExtendedColorType::Rgb8)
        .map_err(|e| CodecError::Encode(e.to_string()))?;

    Ok(Bytes::from(buffer.into_inner()))
}
