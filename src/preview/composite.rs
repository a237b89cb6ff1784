use crate::foundation::core::Size;
use crate::foundation::error::CutoutResult;
use crate::raster::blend::{BlendMode, mask_rgba_in_place};
use crate::raster::encode::{encode_png, png_data_url};
use crate::raster::mask::MaskRaster;
use crate::raster::store::RasterStore;

/// Encoded display-resolution composite shown in the read-only preview panel.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PreviewArtifact {
    pub size: Size,
    pub png: Vec<u8>,
    /// Monotonic counter of successful encodes within the session.
    pub generation: u64,
}

impl PreviewArtifact {
    pub fn to_data_url(&self) -> String {
        png_data_url(&self.png)
    }
}

/// Composite `img` with `mask` using destination-in: RGB from the image, alpha is the
/// product of image alpha and mask alpha.
pub fn composite_masked(
    img: &image::RgbaImage,
    mask: &MaskRaster,
) -> CutoutResult<image::RgbaImage> {
    let mut out = img.clone();
    let samples: &mut [u8] = &mut out;
    mask_rgba_in_place(samples, mask.as_slice(), BlendMode::DestinationIn)?;
    Ok(out)
}

/// Owns the editor-facing composite and the last good preview artifact.
#[derive(Clone, Debug)]
pub struct PreviewRenderer {
    editor: Option<image::RgbaImage>,
    artifact: Option<PreviewArtifact>,
    max_encode_pixels: u64,
    generation: u64,
    failures: u64,
}

impl PreviewRenderer {
    pub fn new(max_encode_pixels: u64) -> Self {
        Self {
            editor: None,
            artifact: None,
            max_encode_pixels,
            generation: 0,
            failures: 0,
        }
    }

    /// Recompose the editor raster and refresh the preview artifact.
    ///
    /// Returns `true` when a new artifact was produced. Failures are logged and leave the
    /// previous artifact in place.
    #[tracing::instrument(skip(self, store))]
    pub fn render(&mut self, store: &RasterStore) -> bool {
        let composite = match composite_masked(store.display_source(), store.mask()) {
            Ok(img) => img,
            Err(err) => {
                self.failures += 1;
                tracing::warn!(%err, "preview composite failed");
                return false;
            }
        };

        let encoded = encode_png(&composite, self.max_encode_pixels);
        let size = Size {
            width: composite.width(),
            height: composite.height(),
        };
        self.editor = Some(composite);

        match encoded {
            Ok(png) => {
                self.generation += 1;
                self.artifact = Some(PreviewArtifact {
                    size,
                    png,
                    generation: self.generation,
                });
                true
            }
            Err(err) => {
                self.failures += 1;
                tracing::warn!(%err, "preview encode failed; keeping previous preview");
                false
            }
        }
    }

    pub fn editor_raster(&self) -> Option<&image::RgbaImage> {
        self.editor.as_ref()
    }

    pub fn artifact(&self) -> Option<&PreviewArtifact> {
        self.artifact.as_ref()
    }

    pub fn failures(&self) -> u64 {
        self.failures
    }

    pub fn set_max_encode_pixels(&mut self, max_pixels: u64) {
        self.max_encode_pixels = max_pixels;
    }

    /// Forget all rendered output (used when the source image goes away).
    pub fn clear(&mut self) {
        self.editor = None;
        self.artifact = None;
    }
}

#[cfg(test)]
#[path = "../../tests/unit/preview/composite.rs"]
mod tests;
