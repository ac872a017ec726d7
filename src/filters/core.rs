//! Shared kernels for the glow and drop-shadow pipelines.
//!
//! The two filters are near-duplicates; the stages they share live here:
//! - packed-color helpers (0xRRGGBB <-> channel triple)
//! - the tint-and-mask builder
//! - the strength amplifier (blur once, self-composite `strength - 1` times)

use ndarray::{Array3, ArrayView3};
use rayon::prelude::*;

use crate::context::RasterContext;
use crate::error::Error;
use crate::filters::blur::BlurFilter;

/// Upper bound on the strength iteration count.
pub const MAX_STRENGTH: i32 = 255;

/// Split a packed 0xRRGGBB color into channels. Bits above the low 24 are
/// discarded (truncating coercion at the configuration boundary).
pub fn unpack_rgb(color: u32) -> (u8, u8, u8) {
    (
        (color >> 16 & 0xFF) as u8,
        (color >> 8 & 0xFF) as u8,
        (color & 0xFF) as u8,
    )
}

/// Reassemble channels into a packed 0xRRGGBB color.
pub fn pack_rgb(red: u8, green: u8, blue: u8) -> u32 {
    (red as u32) << 16 | (green as u32) << 8 | blue as u32
}

/// Validate a packed color from an untyped caller (binding layers).
pub fn check_rgb(color: u32) -> Result<(u8, u8, u8), Error> {
    if color > 0xFFFFFF {
        return Err(Error::InvalidColor(color));
    }
    Ok(unpack_rgb(color))
}

/// Build the tint mask for a filter pass.
///
/// Outer (`inner == false`): every source pixel with nonzero alpha becomes
/// the tint color carrying the source alpha. Inner: every pixel that is not
/// fully opaque becomes the tint color carrying the *inverted* alpha.
/// Everything else stays transparent black, so fully transparent pixels
/// never get an outer tint and fully opaque pixels never get an inner one.
pub fn tint_mask(
    src: ArrayView3<u8>,
    red: u8,
    green: u8,
    blue: u8,
    inner: bool,
) -> Array3<u8> {
    let (height, width, _) = src.dim();
    let mut out_flat = vec![0u8; height * width * 4];
    out_flat
        .par_chunks_mut(width * 4)
        .enumerate()
        .for_each(|(y, row)| {
            for x in 0..width {
                let alpha = src[[y, x, 3]];
                let px = &mut row[x * 4..x * 4 + 4];
                if !inner {
                    if alpha != 0 {
                        px[0] = red;
                        px[1] = green;
                        px[2] = blue;
                        px[3] = alpha;
                    }
                } else if alpha != 255 {
                    px[0] = red;
                    px[1] = green;
                    px[2] = blue;
                    px[3] = 255 - alpha;
                }
            }
        });
    Array3::from_shape_vec((height, width, 4), out_flat).expect("Shape mismatch in tint_mask")
}

/// Intensify the scratch buffer: one blur pass, then `strength - 1`
/// source-over self-composites (capped at [`MAX_STRENGTH`]).
///
/// `scratch` must carry default drawing state (source-over, alpha 1, no
/// translation) — the self-composites rely on it. `strength <= 0` leaves
/// the buffer untouched, unblurred.
pub fn amplify(scratch: &mut RasterContext, blur: &BlurFilter, strength: i32) {
    if strength <= 0 {
        return;
    }
    let (width, height) = (scratch.width(), scratch.height());
    blur.apply_filter(scratch, 0, 0, width, height);
    let passes = strength.min(MAX_STRENGTH) - 1;
    for _ in 0..passes {
        // each pass snapshots the current surface, canvas drawImage-style
        let snapshot = scratch.surface().to_owned();
        scratch.draw_image(snapshot.view(), 0.0, 0.0);
    }
}
