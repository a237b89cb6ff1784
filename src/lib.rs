//! Cutout is a mask-editing and compositing engine for producing transparent cutouts.
//!
//! A host opens an [`EditorSession`] with a source image, forwards pointer events to it, and
//! receives a PNG [`CutoutArtifact`] when the user confirms.
//!
//! # Model
//!
//! - **Source** ([`SourceImage`]): decoded once, kept at natural resolution, never mutated.
//! - **Mask** ([`MaskRaster`]): 8-bit alpha at a reduced display resolution
//!   ([`DisplayGeometry`]), fully opaque on open.
//! - **Overlay**: RGBA scratch raster tinting the stroke in progress; never exported.
//!
//! # Pipeline
//!
//! 1. **Stroke**: pointer samples become round-capped segments painted onto mask and overlay
//!    (source-over for [`EditMode::Keep`], destination-out for [`EditMode::Remove`]).
//! 2. **History**: every stroke or bulk edit checkpoints the mask into a bounded undo deque.
//! 3. **Preview**: edit events request a recomposition; requests are coalesced to at most
//!    one destination-in composite per frame.
//! 4. **Export**: the mask is rescaled to natural resolution and its alpha transplanted onto
//!    a full-resolution copy of the source, then PNG-encoded.
#![forbid(unsafe_code)]

mod export;
mod foundation;
mod history;
mod preview;
mod raster;
mod script;
mod session;
mod stroke;

pub use export::pipeline::{
    CUTOUT_FILE_NAME, CutoutArtifact, export_cutout, export_raster, scale_mask,
};
pub use foundation::core::{Point, Rect, Rgba8, Size};
pub use foundation::error::{CutoutError, CutoutResult};
pub use history::stack::{DEFAULT_HISTORY_DEPTH, HistoryManager};
pub use preview::composite::{PreviewArtifact, PreviewRenderer, composite_masked};
pub use preview::scheduler::{FrameTicket, PreviewScheduler, SchedulerStats};
pub use raster::blend::{BlendMode, blend_alpha, mask_rgba_in_place, transplant_alpha_in_place};
pub use raster::encode::{DEFAULT_MAX_ENCODE_PIXELS, encode_png};
pub use raster::geometry::{DEFAULT_MAX_DISPLAY_WIDTH, DisplayGeometry};
pub use raster::mask::{MaskRaster, MaskSnapshot};
pub use raster::source::SourceImage;
pub use raster::store::RasterStore;
pub use script::edit::{EditOp, EditScript, ScriptReport};
pub use session::editor::{
    ConfirmHandler, EditorSession, MAX_ZOOM, MIN_ZOOM, PointerState, ZOOM_STEP,
};
pub use session::opts::EditorOpts;
pub use stroke::brush::{
    BrushConfig, DEFAULT_BRUSH_RADIUS, EditMode, KEEP_OVERLAY_COLOR, MAX_BRUSH_RADIUS,
    MIN_BRUSH_RADIUS, REMOVE_OVERLAY_COLOR,
};
pub use stroke::engine::{StrokeEngine, StrokeStyle};
pub use stroke::segment::{distance_to_segment, for_each_covered_pixel};
