use crate::foundation::core::Rgba8;
use crate::raster::blend::BlendMode;

/// Smallest brush radius, in display pixels.
pub const MIN_BRUSH_RADIUS: u32 = 8;
/// Largest brush radius, in display pixels.
pub const MAX_BRUSH_RADIUS: u32 = 120;
/// Radius a fresh session starts with.
pub const DEFAULT_BRUSH_RADIUS: u32 = 28;

/// Overlay tint while marking regions to keep (indigo).
pub const KEEP_OVERLAY_COLOR: Rgba8 = Rgba8::rgb(99, 102, 241);
/// Overlay tint while marking regions to remove (red).
pub const REMOVE_OVERLAY_COLOR: Rgba8 = Rgba8::rgb(239, 68, 68);

/// What a stroke does to the mask.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EditMode {
    /// Paint opaque mask: the stroked region survives the cutout.
    Keep,
    /// Erase mask: the stroked region becomes transparent.
    #[default]
    Remove,
}

impl EditMode {
    pub fn mask_blend(self) -> BlendMode {
        match self {
            Self::Keep => BlendMode::SourceOver,
            Self::Remove => BlendMode::DestinationOut,
        }
    }

    pub fn overlay_color(self) -> Rgba8 {
        match self {
            Self::Keep => KEEP_OVERLAY_COLOR,
            Self::Remove => REMOVE_OVERLAY_COLOR,
        }
    }
}

/// Brush settings shared by every segment of a stroke.
///
/// The configured value is a radius: a stroke is `2 * radius` pixels wide. Hosts carrying
/// over a slider that meant line width (diameter) should halve it before calling
/// [`BrushConfig::new`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize)]
pub struct BrushConfig {
    radius: u32,
}

impl BrushConfig {
    /// Build a brush, clamping `radius` into `[MIN_BRUSH_RADIUS, MAX_BRUSH_RADIUS]`.
    pub fn new(radius: i64) -> Self {
        let radius = radius.clamp(i64::from(MIN_BRUSH_RADIUS), i64::from(MAX_BRUSH_RADIUS));
        Self {
            radius: radius as u32,
        }
    }

    pub fn radius(self) -> u32 {
        self.radius
    }
}

impl Default for BrushConfig {
    fn default() -> Self {
        Self {
            radius: DEFAULT_BRUSH_RADIUS,
        }
    }
}
