use crate::foundation::core::{Point, Size};
use crate::foundation::error::{CutoutError, CutoutResult};

/// Default upper bound on the editing raster width.
pub const DEFAULT_MAX_DISPLAY_WIDTH: u32 = 520;

/// Working (display) resolution derived from the natural source size.
///
/// The source is scaled down, never up, so that its width fits `max_display_width`;
/// aspect ratio is preserved within rounding.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize)]
pub struct DisplayGeometry {
    pub natural: Size,
    pub display: Size,
    pub scale: f64,
}

impl DisplayGeometry {
    pub fn fit(natural: Size, max_display_width: u32) -> CutoutResult<Self> {
        if natural.width == 0 || natural.height == 0 {
            return Err(CutoutError::validation("natural size must be > 0"));
        }
        if max_display_width == 0 {
            return Err(CutoutError::validation("max_display_width must be > 0"));
        }

        let scale = if natural.width > max_display_width {
            f64::from(max_display_width) / f64::from(natural.width)
        } else {
            1.0
        };
        let scaled = |v: u32| ((f64::from(v) * scale).round() as u32).max(1);

        Ok(Self {
            natural,
            display: Size {
                width: scaled(natural.width),
                height: scaled(natural.height),
            },
            scale,
        })
    }

    pub fn display_width(&self) -> u32 {
        self.display.width
    }

    pub fn display_height(&self) -> u32 {
        self.display.height
    }

    pub fn natural_width(&self) -> u32 {
        self.natural.width
    }

    pub fn natural_height(&self) -> u32 {
        self.natural.height
    }

    /// Whether display and natural rasters have identical dimensions.
    pub fn is_identity(&self) -> bool {
        self.display == self.natural
    }

    /// Map a display-space point into natural-resolution space.
    pub fn display_to_natural(&self, p: Point) -> Point {
        Point::new(
            p.x * f64::from(self.natural.width) / f64::from(self.display.width),
            p.y * f64::from(self.natural.height) / f64::from(self.display.height),
        )
    }
}

#[cfg(test)]
#[path = "../../tests/unit/raster/geometry.rs"]
mod tests;
