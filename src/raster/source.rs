use std::sync::Arc;

use anyhow::Context;
use base64::Engine;
use base64::engine::general_purpose::STANDARD as BASE64;

use crate::foundation::core::Size;
use crate::foundation::error::{CutoutError, CutoutResult};

/// Immutable decoded source raster at its natural resolution (straight RGBA8).
#[derive(Clone, Debug)]
pub struct SourceImage {
    pixels: Arc<image::RgbaImage>,
}

impl SourceImage {
    /// Wrap an already-decoded raster. Zero-sized rasters are rejected.
    pub fn from_rgba(pixels: image::RgbaImage) -> CutoutResult<Self> {
        if pixels.width() == 0 || pixels.height() == 0 {
            return Err(CutoutError::decode("source image has zero natural size"));
        }
        Ok(Self {
            pixels: Arc::new(pixels),
        })
    }

    /// Decode encoded image bytes (PNG, JPEG, WebP, ...).
    pub fn decode(bytes: &[u8]) -> CutoutResult<Self> {
        let dyn_img = image::load_from_memory(bytes)
            .context("decode source image from memory")
            .map_err(|e| CutoutError::decode(format!("{e:#}")))?;
        Self::from_rgba(dyn_img.to_rgba8())
    }

    /// Decode a `data:` URL carrying a base64-encoded image.
    pub fn from_data_url(url: &str) -> CutoutResult<Self> {
        let bytes = decode_data_url(url)?;
        Self::decode(&bytes)
    }

    pub fn natural_width(&self) -> u32 {
        self.pixels.width()
    }

    pub fn natural_height(&self) -> u32 {
        self.pixels.height()
    }

    pub fn natural_size(&self) -> Size {
        Size {
            width: self.natural_width(),
            height: self.natural_height(),
        }
    }

    pub fn pixels(&self) -> &image::RgbaImage {
        &self.pixels
    }
}

pub(crate) fn decode_data_url(url: &str) -> CutoutResult<Vec<u8>> {
    let rest = url
        .strip_prefix("data:")
        .ok_or_else(|| CutoutError::decode("data url must start with 'data:'"))?;
    let (meta, payload) = rest
        .split_once(',')
        .ok_or_else(|| CutoutError::decode("data url is missing the ',' separator"))?;
    if !meta.split(';').any(|p| p.eq_ignore_ascii_case("base64")) {
        return Err(CutoutError::decode("only base64 data urls are supported"));
    }
    BASE64
        .decode(payload.trim())
        .context("decode data url payload")
        .map_err(|e| CutoutError::decode(format!("{e:#}")))
}

#[cfg(test)]
#[path = "../../tests/unit/raster/source.rs"]
mod tests;
