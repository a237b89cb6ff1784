use std::sync::Arc;

use crate::foundation::core::Size;
use crate::foundation::error::{CutoutError, CutoutResult};

/// 8-bit alpha mask at display resolution. 255 keeps a pixel, 0 discards it.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MaskRaster {
    alpha: image::GrayImage,
}

impl MaskRaster {
    /// Allocate a fully opaque ("everything kept") mask.
    pub fn opaque(size: Size) -> Self {
        Self::filled(size, 255)
    }

    pub fn filled(size: Size, value: u8) -> Self {
        Self {
            alpha: image::GrayImage::from_pixel(size.width, size.height, image::Luma([value])),
        }
    }

    pub fn width(&self) -> u32 {
        self.alpha.width()
    }

    pub fn height(&self) -> u32 {
        self.alpha.height()
    }

    pub fn size(&self) -> Size {
        Size {
            width: self.width(),
            height: self.height(),
        }
    }

    pub fn get(&self, x: u32, y: u32) -> u8 {
        self.alpha.get_pixel(x, y).0[0]
    }

    pub fn set(&mut self, x: u32, y: u32, value: u8) {
        self.alpha.put_pixel(x, y, image::Luma([value]));
    }

    pub fn fill(&mut self, value: u8) {
        let samples: &mut [u8] = &mut self.alpha;
        samples.fill(value);
    }

    pub fn is_uniform(&self, value: u8) -> bool {
        self.alpha.as_raw().iter().all(|&a| a == value)
    }

    /// Row-major alpha samples.
    pub fn as_slice(&self) -> &[u8] {
        self.alpha.as_raw()
    }

    pub(crate) fn as_mut_slice(&mut self) -> &mut [u8] {
        &mut self.alpha
    }

    pub(crate) fn as_image(&self) -> &image::GrayImage {
        &self.alpha
    }

    /// Capture an independent copy of the current contents.
    pub fn snapshot(&self) -> MaskSnapshot {
        MaskSnapshot {
            size: self.size(),
            alpha: Arc::from(self.alpha.as_raw().as_slice()),
        }
    }

    /// Overwrite the mask with a previously captured snapshot.
    pub fn restore(&mut self, snapshot: &MaskSnapshot) -> CutoutResult<()> {
        if snapshot.size != self.size() {
            return Err(CutoutError::validation(format!(
                "snapshot is {}x{}, mask is {}x{}",
                snapshot.size.width,
                snapshot.size.height,
                self.width(),
                self.height()
            )));
        }
        self.as_mut_slice().copy_from_slice(&snapshot.alpha);
        Ok(())
    }
}

/// Immutable full copy of a mask's pixels at one instant.
///
/// Never aliases the live mask: restoring copies the bytes back.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MaskSnapshot {
    size: Size,
    alpha: Arc<[u8]>,
}

impl MaskSnapshot {
    pub fn size(&self) -> Size {
        self.size
    }

    pub fn as_slice(&self) -> &[u8] {
        &self.alpha
    }

    pub fn byte_len(&self) -> usize {
        self.alpha.len()
    }
}

#[cfg(test)]
#[path = "../../tests/unit/raster/mask.rs"]
mod tests;
