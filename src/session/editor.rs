use std::path::{Path, PathBuf};

use crate::export::pipeline::{CutoutArtifact, export_cutout};
use crate::foundation::core::{Point, Size};
use crate::foundation::error::{CutoutError, CutoutResult};
use crate::preview::composite::{PreviewArtifact, PreviewRenderer};
use crate::preview::scheduler::{FrameTicket, PreviewScheduler, SchedulerStats};
use crate::raster::geometry::DisplayGeometry;
use crate::raster::mask::MaskRaster;
use crate::raster::source::SourceImage;
use crate::raster::store::RasterStore;
use crate::session::opts::EditorOpts;
use crate::stroke::brush::{BrushConfig, EditMode};
use crate::stroke::engine::{StrokeEngine, StrokeStyle};

/// Smallest presentation zoom factor.
pub const MIN_ZOOM: f64 = 0.5;
/// Largest presentation zoom factor.
pub const MAX_ZOOM: f64 = 2.0;
/// Increment applied by [`EditorSession::zoom_in`] / [`EditorSession::zoom_out`].
pub const ZOOM_STEP: f64 = 0.2;

/// Callback receiving each confirmed cutout.
pub type ConfirmHandler = Box<dyn FnMut(&CutoutArtifact)>;

/// Pointer state machine of the drawing surface.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PointerState {
    Idle,
    /// A drag is in progress; only `pointer_id` may extend it.
    Stroking { pointer_id: u64 },
}

/// One cutout editing session over a single source image.
///
/// The session is the command surface a host drives: pointer events, history, bulk edits,
/// preview frames and export. Without a loaded source every command is a no-op.
pub struct EditorSession {
    opts: EditorOpts,
    store: Option<RasterStore>,
    stroke: StrokeEngine,
    pointer: PointerState,
    mode: EditMode,
    brush: BrushConfig,
    zoom: f64,
    scheduler: PreviewScheduler,
    preview: PreviewRenderer,
    on_confirm: Option<ConfirmHandler>,
}

impl EditorSession {
    pub fn new(opts: EditorOpts) -> CutoutResult<Self> {
        opts.validate()?;
        Ok(Self {
            mode: opts.default_mode,
            brush: BrushConfig::new(i64::from(opts.default_radius)),
            preview: PreviewRenderer::new(opts.max_encode_pixels),
            opts,
            store: None,
            stroke: StrokeEngine::new(),
            pointer: PointerState::Idle,
            zoom: 1.0,
            scheduler: PreviewScheduler::new(),
            on_confirm: None,
        })
    }

    pub fn opts(&self) -> &EditorOpts {
        &self.opts
    }

    // ---- source lifecycle ----

    /// Decode `bytes` and start editing it. On failure the session is left empty.
    #[tracing::instrument(skip(self, bytes), fields(len = bytes.len()))]
    pub fn open(&mut self, bytes: &[u8]) -> CutoutResult<DisplayGeometry> {
        match SourceImage::decode(bytes) {
            Ok(source) => self.open_image(source),
            Err(err) => self.fail_open(err),
        }
    }

    /// Decode a base64 `data:` URL and start editing it.
    pub fn open_data_url(&mut self, url: &str) -> CutoutResult<DisplayGeometry> {
        match SourceImage::from_data_url(url) {
            Ok(source) => self.open_image(source),
            Err(err) => self.fail_open(err),
        }
    }

    /// Start editing an already-decoded source, replacing any previous one.
    pub fn open_image(&mut self, source: SourceImage) -> CutoutResult<DisplayGeometry> {
        self.close();
        let store = match RasterStore::new(
            source,
            self.opts.max_display_width,
            self.opts.history_depth,
        ) {
            Ok(store) => store,
            Err(err) => return self.fail_open(err),
        };
        let geometry = *store.geometry();
        self.store = Some(store);
        self.request_preview();
        Ok(geometry)
    }

    fn fail_open(&mut self, err: CutoutError) -> CutoutResult<DisplayGeometry> {
        tracing::warn!(%err, "source image rejected; editor is empty");
        self.close();
        Err(err)
    }

    /// Drop the source, all rasters, history and pending preview work.
    pub fn close(&mut self) {
        if let Some(store) = self.store.as_mut() {
            self.stroke.end(store);
        }
        self.store = None;
        self.pointer = PointerState::Idle;
        self.scheduler.cancel();
        self.preview.clear();
    }

    pub fn is_open(&self) -> bool {
        self.store.is_some()
    }

    pub fn source(&self) -> Option<&SourceImage> {
        self.store.as_ref().map(RasterStore::source)
    }

    pub fn geometry(&self) -> Option<DisplayGeometry> {
        self.store.as_ref().map(|s| *s.geometry())
    }

    /// Restore the freshly-opened state: opaque mask, no history.
    pub fn reset(&mut self) -> bool {
        let Some(store) = self.store.as_mut() else {
            return false;
        };
        self.stroke.end(store);
        self.pointer = PointerState::Idle;
        store.reset();
        self.request_preview();
        true
    }

    // ---- tool settings ----

    pub fn mode(&self) -> EditMode {
        self.mode
    }

    pub fn set_mode(&mut self, mode: EditMode) {
        self.mode = mode;
    }

    pub fn brush_radius(&self) -> u32 {
        self.brush.radius()
    }

    /// Set the brush radius; returns the effective (clamped) radius.
    pub fn set_brush_radius(&mut self, radius: i64) -> u32 {
        self.brush = BrushConfig::new(radius);
        self.brush.radius()
    }

    pub fn zoom(&self) -> f64 {
        self.zoom
    }

    /// Set the presentation zoom; returns the effective (clamped) factor.
    ///
    /// Zoom only affects how surface coordinates map onto the mask, never the mask
    /// resolution or the export.
    pub fn set_zoom(&mut self, zoom: f64) -> f64 {
        if zoom.is_finite() {
            self.zoom = zoom.clamp(MIN_ZOOM, MAX_ZOOM);
        }
        self.zoom
    }

    pub fn zoom_in(&mut self) -> f64 {
        self.set_zoom(self.zoom + ZOOM_STEP)
    }

    pub fn zoom_out(&mut self) -> f64 {
        self.set_zoom(self.zoom - ZOOM_STEP)
    }

    /// On-screen size of the drawing surface at the current zoom.
    pub fn surface_size(&self) -> Option<(f64, f64)> {
        self.geometry().map(|g| {
            (
                f64::from(g.display_width()) * self.zoom,
                f64::from(g.display_height()) * self.zoom,
            )
        })
    }

    /// Map a point on the zoomed drawing surface into mask coordinates.
    pub fn surface_to_mask(&self, p: Point) -> Point {
        Point::new(p.x / self.zoom, p.y / self.zoom)
    }

    fn style(&self) -> StrokeStyle {
        StrokeStyle {
            mode: self.mode,
            brush: self.brush,
            overlay_opacity: self.opts.overlay_opacity,
        }
    }

    // ---- pointer state machine ----

    pub fn pointer_state(&self) -> PointerState {
        self.pointer
    }

    pub fn is_stroking(&self) -> bool {
        matches!(self.pointer, PointerState::Stroking { .. })
    }

    /// Pointer pressed on the drawing surface (surface coordinates). Captures the pointer
    /// and starts a stroke. Ignored while another pointer is captured.
    pub fn pointer_down(&mut self, pointer_id: u64, at: Point) -> bool {
        if self.is_stroking() || self.store.is_none() {
            return false;
        }
        let point = self.surface_to_mask(at);
        if !self.begin_stroke(point) {
            return false;
        }
        self.pointer = PointerState::Stroking { pointer_id };
        true
    }

    /// Pointer moved (surface coordinates). Only the captured pointer extends the stroke.
    pub fn pointer_move(&mut self, pointer_id: u64, at: Point) -> bool {
        match self.pointer {
            PointerState::Stroking { pointer_id: id } if id == pointer_id => {
                let point = self.surface_to_mask(at);
                self.continue_stroke(point)
            }
            _ => false,
        }
    }

    /// Pointer released anywhere, on or off the surface. Ends any drag in progress.
    pub fn pointer_up(&mut self) -> bool {
        self.finish_drag()
    }

    /// Pointer interaction cancelled by the platform. Ends any drag in progress.
    pub fn pointer_cancel(&mut self) -> bool {
        self.finish_drag()
    }

    fn finish_drag(&mut self) -> bool {
        let was_stroking = self.is_stroking();
        self.pointer = PointerState::Idle;
        if was_stroking {
            self.end_stroke();
        }
        was_stroking
    }

    // ---- stroke commands (mask coordinates) ----

    /// Anchor a stroke at `point`, checkpoint history and paint a dot.
    pub fn begin_stroke(&mut self, point: Point) -> bool {
        let style = self.style();
        let Some(store) = self.store.as_mut() else {
            return false;
        };
        self.stroke.begin(store, point, style);
        self.request_preview();
        true
    }

    /// Paint from the last stroke point to `point`.
    pub fn continue_stroke(&mut self, point: Point) -> bool {
        let style = self.style();
        let Some(store) = self.store.as_mut() else {
            return false;
        };
        if !self.stroke.extend(store, point, style) {
            return false;
        }
        self.request_preview();
        true
    }

    /// Release the stroke anchor and wipe the overlay.
    pub fn end_stroke(&mut self) {
        if let Some(store) = self.store.as_mut() {
            self.stroke.end(store);
        }
    }

    // ---- history ----

    pub fn undo(&mut self) -> bool {
        let done = self.store.as_mut().is_some_and(RasterStore::undo);
        if done {
            self.request_preview();
        }
        done
    }

    pub fn redo(&mut self) -> bool {
        let done = self.store.as_mut().is_some_and(RasterStore::redo);
        if done {
            self.request_preview();
        }
        done
    }

    pub fn can_undo(&self) -> bool {
        self.store.as_ref().is_some_and(|s| s.history().can_undo())
    }

    pub fn can_redo(&self) -> bool {
        self.store.as_ref().is_some_and(|s| s.history().can_redo())
    }

    /// `(undo, redo)` stack depths, for toolbar state.
    pub fn history_depths(&self) -> (usize, usize) {
        self.store.as_ref().map_or((0, 0), |s| {
            (s.history().undo_len(), s.history().redo_len())
        })
    }

    // ---- bulk edits ----

    /// Keep everything (mask fully opaque). Undoable.
    pub fn fill_all(&mut self) -> bool {
        self.bulk_fill(255)
    }

    /// Remove everything (mask fully transparent). Undoable.
    pub fn clear(&mut self) -> bool {
        self.bulk_fill(0)
    }

    fn bulk_fill(&mut self, value: u8) -> bool {
        let Some(store) = self.store.as_mut() else {
            return false;
        };
        store.checkpoint();
        store.mask_mut().fill(value);
        store.clear_overlay();
        self.request_preview();
        true
    }

    // ---- rasters ----

    pub fn mask(&self) -> Option<&MaskRaster> {
        self.store.as_ref().map(RasterStore::mask)
    }

    pub fn overlay(&self) -> Option<&image::RgbaImage> {
        self.store.as_ref().map(RasterStore::overlay)
    }

    pub fn display_size(&self) -> Option<Size> {
        self.geometry().map(|g| g.display)
    }

    // ---- preview ----

    /// Ask for a recomposition on the next frame. Returns the ticket for hosts that
    /// drive frames through callbacks; `None` when nothing is loaded.
    pub fn request_preview(&mut self) -> Option<FrameTicket> {
        self.store.as_ref()?;
        Some(self.scheduler.request())
    }

    /// Headless frame tick: run at most one pending recomposition.
    pub fn pump_frame(&mut self) -> bool {
        if !self.scheduler.take_due() {
            return false;
        }
        self.render_composite()
    }

    /// Frame callback for `ticket`; stale tickets do nothing.
    pub fn fire_frame(&mut self, ticket: FrameTicket) -> bool {
        if !self.scheduler.fire(ticket) {
            return false;
        }
        self.render_composite()
    }

    /// Recompose the editor raster and preview artifact immediately.
    pub fn render_composite(&mut self) -> bool {
        match self.store.as_ref() {
            Some(store) => self.preview.render(store),
            None => false,
        }
    }

    pub fn preview_pending(&self) -> bool {
        self.scheduler.is_pending()
    }

    pub fn scheduler_stats(&self) -> SchedulerStats {
        self.scheduler.stats()
    }

    /// Source × mask at display resolution, as last recomposed.
    pub fn editor_raster(&self) -> Option<&image::RgbaImage> {
        self.preview.editor_raster()
    }

    pub fn preview(&self) -> Option<&PreviewArtifact> {
        self.preview.artifact()
    }

    // ---- export ----

    /// Register the handler that receives confirmed cutouts.
    pub fn on_confirm(&mut self, handler: impl FnMut(&CutoutArtifact) + 'static) {
        self.on_confirm = Some(Box::new(handler));
    }

    /// Build the natural-resolution cutout from the current mask.
    ///
    /// Runs to completion inside the call; the `&mut self` borrow keeps a second export
    /// from starting until this one returns.
    pub fn export(&mut self) -> CutoutResult<CutoutArtifact> {
        let store = self
            .store
            .as_ref()
            .ok_or_else(|| CutoutError::validation("no source image loaded"))?;

        let result = export_cutout(store.source(), store.mask(), self.opts.max_encode_pixels);
        if let Err(err) = &result {
            tracing::warn!(%err, "export failed");
        }
        result
    }

    /// Export and hand the cutout to the confirm handler.
    pub fn confirm(&mut self) -> CutoutResult<CutoutArtifact> {
        let artifact = self.export()?;
        if let Some(handler) = self.on_confirm.as_mut() {
            handler(&artifact);
        }
        Ok(artifact)
    }

    /// Export and write `cutout.png` into `dir`.
    pub fn download(&mut self, dir: &Path) -> CutoutResult<PathBuf> {
        let artifact = self.export()?;
        artifact.save_in(dir)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/session/editor.rs"]
mod tests;
