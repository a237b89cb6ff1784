use crate::foundation::core::Point;
use crate::foundation::math::{mul_div255_u16, unit_to_u8};
use crate::raster::blend::{BlendMode, blend_alpha, over};
use crate::raster::mask::MaskRaster;
use crate::raster::store::RasterStore;
use crate::stroke::brush::{BrushConfig, EditMode};
use crate::stroke::segment::for_each_covered_pixel;

/// Paint parameters resolved at the time a segment is drawn.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct StrokeStyle {
    pub mode: EditMode,
    pub brush: BrushConfig,
    /// Opacity of the overlay tint, in [0, 1].
    pub overlay_opacity: f32,
}

/// Turns pointer samples into incremental segment paints on the mask and overlay.
#[derive(Clone, Debug, Default)]
pub struct StrokeEngine {
    last: Option<Point>,
    segments: u64,
}

impl StrokeEngine {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_active(&self) -> bool {
        self.last.is_some()
    }

    /// Segments painted by the current (or last) stroke, including the initial dot.
    pub fn segment_count(&self) -> u64 {
        self.segments
    }

    /// Start a stroke: one undo checkpoint, then a dot at `point`.
    pub fn begin(&mut self, store: &mut RasterStore, point: Point, style: StrokeStyle) {
        store.checkpoint();
        self.last = Some(point);
        self.segments = 0;
        self.paint(store, point, point, style);
    }

    /// Extend the stroke to `point`. Returns `false` when no stroke is active.
    pub fn extend(&mut self, store: &mut RasterStore, point: Point, style: StrokeStyle) -> bool {
        let Some(from) = self.last else {
            return false;
        };
        self.paint(store, from, point, style);
        self.last = Some(point);
        true
    }

    /// Finish the stroke and wipe the overlay.
    pub fn end(&mut self, store: &mut RasterStore) {
        if self.last.take().is_some() {
            tracing::debug!(segments = self.segments, "stroke finished");
        }
        store.clear_overlay();
    }

    fn paint(&mut self, store: &mut RasterStore, from: Point, to: Point, style: StrokeStyle) {
        let radius = f64::from(style.brush.radius());
        let size = store.geometry().display;
        let (mask, overlay) = store.paint_targets();

        let tint = style.mode.overlay_color();
        let tint_alpha = unit_to_u8(style.overlay_opacity);
        let blend = style.mode.mask_blend();

        for_each_covered_pixel(size, from, to, radius, |x, y, coverage| {
            paint_mask_pixel(mask, x, y, coverage, blend);

            let a = mul_div255_u16(tint_alpha, coverage) as u8;
            let px = overlay.get_pixel_mut(x, y);
            px.0 = over(px.0, [tint.r, tint.g, tint.b, a]);
        });
        self.segments += 1;
    }
}

fn paint_mask_pixel(mask: &mut MaskRaster, x: u32, y: u32, coverage: u16, blend: BlendMode) {
    // Keep paints opaque white, so the source alpha is the coverage itself.
    let next = blend_alpha(mask.get(x, y), coverage as u8, blend);
    mask.set(x, y, next);
}

#[cfg(test)]
#[path = "../../tests/unit/stroke/engine.rs"]
mod tests;
