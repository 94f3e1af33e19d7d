//! Image decoding helpers built on the `image` codec crate.
//!
//! The reader surface exposes three image operations: filtering listings down
//! to image files, decoding a single image with an optional bounded downscale,
//! and summarizing a batch of images into tabular rows. The helpers here keep
//! that logic in one place; the readers only supply the raw bytes.

use crate::error::{DatarootError, Result};
use image::RgbImage;
use mime_guess::mime;

/// Decode behavior threaded explicitly into batch summarization.
///
/// There is no process-wide decoder state. The default tolerates images whose
/// bytes fail to decode (truncated downloads are common in scraped datasets):
/// [`crate::Reader::get_image_info`] skips such rows with a warning. A strict
/// config propagates the first decode failure instead.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DecodeConfig {
    /// Skip undecodable images during batch summarization instead of failing
    pub tolerate_truncated: bool,
}

impl Default for DecodeConfig {
    fn default() -> Self {
        Self {
            tolerate_truncated: true,
        }
    }
}

/// One summary row produced by [`crate::Reader::get_image_info`].
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct ImageInfo {
    /// Path relative to the reader root
    pub file_path: String,
    /// Raw byte length divided by 1024
    pub size_kb: f64,
    /// Decoded width in pixels
    pub width: u32,
    /// Decoded height in pixels
    pub height: u32,
}

/// Whether the MIME registry maps this path's extension to an `image/*` type.
pub(crate) fn is_image_path(path: &str) -> bool {
    mime_guess::from_path(path)
        .iter()
        .any(|m| m.type_() == mime::IMAGE)
}

/// Downscale factor implied by the supplied bounds.
///
/// An unset bound contributes nothing to the max, so a single bound scales by
/// that dimension alone. Values at or below 1.0 mean the image already fits.
fn scale_ratio(width: u32, height: u32, max_width: Option<u32>, max_height: Option<u32>) -> f64 {
    let by_width = max_width
        .filter(|m| *m > 0)
        .map(|m| width as f64 / m as f64)
        .unwrap_or(0.0);
    let by_height = max_height
        .filter(|m| *m > 0)
        .map(|m| height as f64 / m as f64)
        .unwrap_or(0.0);
    by_width.max(by_height)
}

/// Decode raw bytes into a 3-channel RGB image, downscaling to approximately
/// `(width/ratio, height/ratio)` when the bounds call for shrinking.
///
/// The downscale is a fast approximate resize, a performance hint rather than
/// a guaranteed exact output size. Bounds never cause an upscale.
pub(crate) fn decode_scaled(
    path: &str,
    bytes: &[u8],
    max_width: Option<u32>,
    max_height: Option<u32>,
) -> Result<RgbImage> {
    let decoded = image::load_from_memory(bytes).map_err(|source| DatarootError::Image {
        path: path.to_string(),
        source,
    })?;
    let (width, height) = (decoded.width(), decoded.height());
    let ratio = scale_ratio(width, height, max_width, max_height);
    let decoded = if ratio > 1.0 {
        let target_width = ((width as f64 / ratio).round() as u32).max(1);
        let target_height = ((height as f64 / ratio).round() as u32).max(1);
        decoded.thumbnail(target_width, target_height)
    } else {
        decoded
    };
    Ok(decoded.to_rgb8())
}

/// Build one summary row from raw bytes.
pub(crate) fn info_row(path: &str, bytes: &[u8]) -> Result<ImageInfo> {
    let decoded = image::load_from_memory(bytes).map_err(|source| DatarootError::Image {
        path: path.to_string(),
        source,
    })?;
    Ok(ImageInfo {
        file_path: path.to_string(),
        size_kb: bytes.len() as f64 / 1024.0,
        width: decoded.width(),
        height: decoded.height(),
    })
}

/// Encode a solid-color PNG for fixtures (shared by reader tests).
#[cfg(test)]
pub(crate) fn png_bytes(width: u32, height: u32) -> Vec<u8> {
    let img = RgbImage::from_pixel(width, height, image::Rgb([20, 120, 220]));
    let mut bytes = Vec::new();
    image::DynamicImage::ImageRgb8(img)
        .write_to(
            &mut std::io::Cursor::new(&mut bytes),
            image::ImageFormat::Png,
        )
        .expect("Failed to encode test image");
    bytes
}
