use std::path::Path;

use anyhow::Context;

use crate::foundation::error::{CutoutError, CutoutResult};
use crate::history::stack::DEFAULT_HISTORY_DEPTH;
use crate::raster::encode::DEFAULT_MAX_ENCODE_PIXELS;
use crate::raster::geometry::DEFAULT_MAX_DISPLAY_WIDTH;
use crate::stroke::brush::{DEFAULT_BRUSH_RADIUS, EditMode};

/// Options controlling an [`EditorSession`](crate::EditorSession).
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct EditorOpts {
    /// Upper bound on the working raster width; larger sources are scaled down.
    pub max_display_width: u32,
    /// Undo steps retained before the oldest is evicted.
    pub history_depth: usize,
    /// Brush radius a new session starts with (clamped like any other radius).
    pub default_radius: u32,
    /// Mode a new session starts in.
    pub default_mode: EditMode,
    /// Opacity of the stroke overlay tint, in [0, 1].
    pub overlay_opacity: f32,
    /// Largest raster, in pixels, the PNG encoder accepts.
    pub max_encode_pixels: u64,
}

impl Default for EditorOpts {
    fn default() -> Self {
        Self {
            max_display_width: DEFAULT_MAX_DISPLAY_WIDTH,
            history_depth: DEFAULT_HISTORY_DEPTH,
            default_radius: DEFAULT_BRUSH_RADIUS,
            default_mode: EditMode::default(),
            overlay_opacity: 0.6,
            max_encode_pixels: DEFAULT_MAX_ENCODE_PIXELS,
        }
    }
}

impl EditorOpts {
    pub fn validate(&self) -> CutoutResult<()> {
        if self.max_display_width == 0 {
            return Err(CutoutError::validation("max_display_width must be > 0"));
        }
        if self.history_depth == 0 {
            return Err(CutoutError::validation("history_depth must be > 0"));
        }
        if !(0.0..=1.0).contains(&self.overlay_opacity) {
            return Err(CutoutError::validation(
                "overlay_opacity must be within [0, 1]",
            ));
        }
        if self.max_encode_pixels == 0 {
            return Err(CutoutError::validation("max_encode_pixels must be > 0"));
        }
        Ok(())
    }

    pub fn from_json_str(s: &str) -> CutoutResult<Self> {
        let opts: Self = serde_json::from_str(s)
            .context("parse editor options json")
            .map_err(|e| CutoutError::validation(format!("{e:#}")))?;
        opts.validate()?;
        Ok(opts)
    }

    pub fn from_path(path: &Path) -> CutoutResult<Self> {
        let s = std::fs::read_to_string(path)
            .with_context(|| format!("read editor options '{}'", path.display()))?;
        Self::from_json_str(&s)
    }
}
