//! Pixel-wise composition operators on straight-alpha rasters.
//!
//! Coverage is an 8-bit factor describing how much of a pixel a painted shape covers
//! (anti-aliased edges fall strictly between 0 and 255).

use rayon::prelude::*;

use crate::foundation::error::{CutoutError, CutoutResult};
use crate::foundation::math::mul_div255_u16;

/// Named alpha-blend modes used by the editor.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BlendMode {
    /// Paint the source over the destination.
    SourceOver,
    /// Erase the destination where the source is opaque.
    DestinationOut,
    /// Keep the destination only where the source is opaque.
    DestinationIn,
}

pub type StraightRgba8 = [u8; 4];

/// Compose a source alpha (already scaled by coverage) onto a destination alpha.
pub fn blend_alpha(dst: u8, src: u8, mode: BlendMode) -> u8 {
    let (d, s) = (u16::from(dst), u16::from(src));
    let out = match mode {
        BlendMode::SourceOver => s + mul_div255_u16(d, 255 - s),
        BlendMode::DestinationOut => mul_div255_u16(d, 255 - s),
        BlendMode::DestinationIn => mul_div255_u16(d, s),
    };
    out.min(255) as u8
}

/// Straight-alpha source-over of a color onto a destination pixel.
pub fn over(dst: StraightRgba8, src: StraightRgba8) -> StraightRgba8 {
    let sa = u32::from(src[3]);
    if sa == 0 {
        return dst;
    }
    if sa == 255 {
        return src;
    }

    let da = u32::from(dst[3]);
    // All terms scaled by 255*255.
    let da_term = da * (255 - sa);
    let out_a = sa * 255 + da_term;
    if out_a == 0 {
        return [0, 0, 0, 0];
    }

    let mut out = [0u8; 4];
    for i in 0..3 {
        let c = u32::from(src[i]) * sa * 255 + u32::from(dst[i]) * da_term;
        out[i] = ((c + out_a / 2) / out_a).min(255) as u8;
    }
    out[3] = ((out_a + 127) / 255).min(255) as u8;
    out
}

/// Apply `mode` to the alpha channel of `dst` using `src` alpha, keeping `dst` RGB.
///
/// Only [`BlendMode::DestinationIn`] and [`BlendMode::DestinationOut`] are meaningful on
/// an RGBA destination driven by a plain alpha source.
pub fn mask_rgba_in_place(dst: &mut [u8], alpha: &[u8], mode: BlendMode) -> CutoutResult<()> {
    if mode == BlendMode::SourceOver {
        return Err(CutoutError::validation(
            "mask_rgba_in_place supports destination-in/out only",
        ));
    }
    if !dst.len().is_multiple_of(4) || dst.len() / 4 != alpha.len() {
        return Err(CutoutError::validation(
            "mask_rgba_in_place expects one alpha sample per rgba8 pixel",
        ));
    }
    dst.par_chunks_exact_mut(4)
        .zip(alpha.par_iter())
        .for_each(|(d, &a)| d[3] = blend_alpha(d[3], a, mode));
    Ok(())
}

/// Overwrite the alpha channel of `dst` with `alpha`, leaving RGB untouched.
pub fn transplant_alpha_in_place(dst: &mut [u8], alpha: &[u8]) -> CutoutResult<()> {
    if !dst.len().is_multiple_of(4) || dst.len() / 4 != alpha.len() {
        return Err(CutoutError::validation(
            "transplant_alpha_in_place expects one alpha sample per rgba8 pixel",
        ));
    }
    dst.par_chunks_exact_mut(4)
        .zip(alpha.par_iter())
        .for_each(|(d, &a)| d[3] = a);
    Ok(())
}

#[cfg(test)]
#[path = "../../tests/unit/raster/blend.rs"]
mod tests;
