//! Image decoding.
//!
//! Accepts raw image bytes (PNG, JPEG, BMP, WebP) and produces an 8-bit
//! RGB raster. Alpha is dropped; the map is assumed to be opaque.

use image::RgbImage;

use crate::types::PipelineError;

/// Decode raw image bytes into RGB.
///
/// # Errors
///
/// Returns [`PipelineError::EmptyInput`] if `bytes` is empty.
/// Returns [`PipelineError::ImageDecode`] if the image format is
/// unrecognized or the data is corrupt.
#[must_use = "returns the decoded image"]
pub fn decode_rgb(bytes: &[u8]) -> Result<RgbImage, PipelineError> {
    if bytes.is_empty() {
        return Err(PipelineError::EmptyInput);
    }

    let img = image::load_from_memory(bytes)?;
    Ok(img.to_rgb8())
}

/// Encode an RGB raster as PNG.
///
/// # Errors
///
/// Returns [`PipelineError::ImageDecode`] if the encoder rejects the
/// image.
pub fn encode_png(image: &RgbImage) -> Result<Vec<u8>, PipelineError> {
    let mut buf = Vec::new();
    let encoder = image::codecs::png::PngEncoder::new(&mut buf);
    image::ImageEncoder::write_image(
        encoder,
        image.as_raw(),
        image.width(),
        image.height(),
        image::ExtendedColorType::Rgb8,
    )?;
    Ok(buf)
}
