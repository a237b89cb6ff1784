use std::io::Cursor;

use anyhow::Context;
use base64::Engine;
use base64::engine::general_purpose::STANDARD as BASE64;

use crate::foundation::error::{CutoutError, CutoutResult};

/// Largest raster (in pixels) accepted by the PNG encoder unless configured otherwise.
pub const DEFAULT_MAX_ENCODE_PIXELS: u64 = 16_384 * 16_384;

/// Encode a straight-alpha RGBA8 raster as PNG.
///
/// Rasters larger than `max_pixels` are refused up front, the same way a canvas backend
/// refuses to serialize an oversized surface.
pub fn encode_png(img: &image::RgbaImage, max_pixels: u64) -> CutoutResult<Vec<u8>> {
    let pixels = u64::from(img.width()) * u64::from(img.height());
    if pixels == 0 {
        return Err(CutoutError::encode("cannot encode an empty raster"));
    }
    if pixels > max_pixels {
        return Err(CutoutError::encode(format!(
            "{}x{} raster exceeds the encode limit of {max_pixels} pixels",
            img.width(),
            img.height()
        )));
    }

    let mut buf = Vec::new();
    img.write_to(&mut Cursor::new(&mut buf), image::ImageFormat::Png)
        .context("encode rgba8 raster as png")
        .map_err(|e| CutoutError::encode(format!("{e:#}")))?;
    Ok(buf)
}

pub(crate) fn png_data_url(png: &[u8]) -> String {
    format!("data:image/png;base64,{}", BASE64.encode(png))
}
