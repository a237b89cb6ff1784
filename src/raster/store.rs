use crate::foundation::error::CutoutResult;
use crate::history::stack::HistoryManager;
use crate::raster::geometry::DisplayGeometry;
use crate::raster::mask::MaskRaster;
use crate::raster::source::SourceImage;

/// Every raster one editing session works on, plus the undo history tied to them.
///
/// A store is built per source image; loading a different source builds a new store,
/// which drops the previous mask, overlay and both history stacks.
#[derive(Debug)]
pub struct RasterStore {
    source: SourceImage,
    geometry: DisplayGeometry,
    display_source: image::RgbaImage,
    mask: MaskRaster,
    overlay: image::RgbaImage,
    history: HistoryManager,
}

impl RasterStore {
    #[tracing::instrument(skip(source))]
    pub fn new(
        source: SourceImage,
        max_display_width: u32,
        history_depth: usize,
    ) -> CutoutResult<Self> {
        let geometry = DisplayGeometry::fit(source.natural_size(), max_display_width)?;
        let display_source = if geometry.is_identity() {
            source.pixels().clone()
        } else {
            image::imageops::resize(
                source.pixels(),
                geometry.display_width(),
                geometry.display_height(),
                image::imageops::FilterType::Triangle,
            )
        };
        let display_size = geometry.display;
        tracing::debug!(
            natural_w = geometry.natural_width(),
            natural_h = geometry.natural_height(),
            display_w = display_size.width,
            display_h = display_size.height,
            scale = geometry.scale,
            "raster store initialized"
        );

        Ok(Self {
            source,
            geometry,
            display_source,
            mask: MaskRaster::opaque(display_size),
            overlay: image::RgbaImage::new(display_size.width, display_size.height),
            history: HistoryManager::new(history_depth),
        })
    }

    /// Back to the freshly-opened state: opaque mask, empty overlay, no history.
    pub fn reset(&mut self) {
        self.mask.fill(255);
        self.clear_overlay();
        self.history.clear();
    }

    pub fn source(&self) -> &SourceImage {
        &self.source
    }

    pub fn geometry(&self) -> &DisplayGeometry {
        &self.geometry
    }

    /// Source scaled to display resolution.
    pub fn display_source(&self) -> &image::RgbaImage {
        &self.display_source
    }

    pub fn mask(&self) -> &MaskRaster {
        &self.mask
    }

    pub fn overlay(&self) -> &image::RgbaImage {
        &self.overlay
    }

    pub fn history(&self) -> &HistoryManager {
        &self.history
    }

    pub fn clear_overlay(&mut self) {
        let samples: &mut [u8] = &mut self.overlay;
        samples.fill(0);
    }

    /// Snapshot the mask into the undo history ahead of an edit.
    pub fn checkpoint(&mut self) {
        self.history.push_undo(self.mask.snapshot());
    }

    pub fn undo(&mut self) -> bool {
        self.history.undo(&mut self.mask)
    }

    pub fn redo(&mut self) -> bool {
        self.history.redo(&mut self.mask)
    }

    /// Disjoint mutable access to the rasters a stroke paints into.
    pub(crate) fn paint_targets(&mut self) -> (&mut MaskRaster, &mut image::RgbaImage) {
        (&mut self.mask, &mut self.overlay)
    }

    pub(crate) fn mask_mut(&mut self) -> &mut MaskRaster {
        &mut self.mask
    }
}

#[cfg(test)]
#[path = "../../tests/unit/raster/store.rs"]
mod tests;
