use std::path::{Path, PathBuf};

use anyhow::Context;

use crate::foundation::core::Size;
use crate::foundation::error::{CutoutError, CutoutResult};
use crate::raster::blend::transplant_alpha_in_place;
use crate::raster::encode::{encode_png, png_data_url};
use crate::raster::mask::MaskRaster;
use crate::raster::source::SourceImage;

/// File name used when a cutout is persisted for download.
pub const CUTOUT_FILE_NAME: &str = "cutout.png";

/// Final cutout at natural resolution, PNG-encoded with an alpha channel.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CutoutArtifact {
    pub size: Size,
    pub png: Vec<u8>,
}

impl CutoutArtifact {
    pub fn to_data_url(&self) -> String {
        png_data_url(&self.png)
    }

    /// Write the artifact as [`CUTOUT_FILE_NAME`] inside `dir`, creating it if needed.
    pub fn save_in(&self, dir: &Path) -> CutoutResult<PathBuf> {
        std::fs::create_dir_all(dir)
            .with_context(|| format!("create output dir '{}'", dir.display()))?;
        let path = dir.join(CUTOUT_FILE_NAME);
        std::fs::write(&path, &self.png)
            .with_context(|| format!("write cutout '{}'", path.display()))?;
        Ok(path)
    }
}

/// Scale the display-resolution mask up to `natural` with bilinear interpolation.
///
/// Interpolation is lossy at stroke edges; when the sizes already match the mask is
/// copied unchanged and uniform masks are expanded exactly.
pub fn scale_mask(mask: &MaskRaster, natural: Size) -> image::GrayImage {
    if mask.size() == natural {
        return mask.as_image().clone();
    }
    let first = mask.get(0, 0);
    if mask.is_uniform(first) {
        return image::GrayImage::from_pixel(natural.width, natural.height, image::Luma([first]));
    }
    image::imageops::resize(
        mask.as_image(),
        natural.width,
        natural.height,
        image::imageops::FilterType::Triangle,
    )
}

/// Build the natural-resolution cutout raster without encoding it.
///
/// RGB comes from the source untouched; alpha is transplanted from the scaled mask.
pub fn export_raster(source: &SourceImage, mask: &MaskRaster) -> CutoutResult<image::RgbaImage> {
    let natural = source.natural_size();
    if natural.width == 0 || natural.height == 0 {
        return Err(CutoutError::validation("source has zero natural size"));
    }

    let mut output = source.pixels().clone();
    let scaled = scale_mask(mask, natural);
    let samples: &mut [u8] = &mut output;
    transplant_alpha_in_place(samples, scaled.as_raw())?;
    Ok(output)
}

/// Full export: build the cutout raster and encode it as PNG.
#[tracing::instrument(skip(source, mask))]
pub fn export_cutout(
    source: &SourceImage,
    mask: &MaskRaster,
    max_encode_pixels: u64,
) -> CutoutResult<CutoutArtifact> {
    let output = export_raster(source, mask)?;
    let png = encode_png(&output, max_encode_pixels)?;
    tracing::debug!(bytes = png.len(), "cutout encoded");
    Ok(CutoutArtifact {
        size: source.natural_size(),
        png,
    })
}

#[cfg(test)]
#[path = "../../tests/unit/export/pipeline.rs"]
mod tests;
