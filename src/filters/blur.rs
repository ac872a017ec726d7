//! Box-blur component shared by the glow and drop-shadow filters.
//!
//! Separable two-pass box blur (horizontal then vertical), repeated
//! `quality` times — the classic iterated-box approximation of a Gaussian.
//! All four channels are blurred, alpha included; that is what spreads a
//! tint mask outward into a halo.

use ndarray::{Array3, ArrayView3};
use rayon::prelude::*;

use crate::context::RasterContext;
use crate::geom::Rect;

/// Blur parameters owned by a filter instance.
///
/// `blur_x` / `blur_y` are the horizontal and vertical extents in pixels
/// per side (fractions are truncated when the kernel runs); `quality` is
/// the number of blur iterations. Non-positive values disable the
/// corresponding axis or the whole pass.
#[derive(Clone, Debug, PartialEq)]
pub struct BlurFilter {
    pub blur_x: f64,
    pub blur_y: f64,
    pub quality: i32,
}

impl Default for BlurFilter {
    fn default() -> Self {
        BlurFilter::new(0.0, 0.0, 1)
    }
}

impl BlurFilter {
    pub fn new(blur_x: f64, blur_y: f64, quality: i32) -> Self {
        BlurFilter {
            blur_x,
            blur_y,
            quality,
        }
    }

    /// Pad `rect` by the margin this blur reaches: `blur * quality` pixels
    /// per side on each active axis.
    pub fn get_bounds(&self, rect: Rect) -> Rect {
        if self.quality <= 0 {
            return rect;
        }
        let q = self.quality as f64;
        let pad_x = if self.blur_x > 0.0 { self.blur_x * q } else { 0.0 };
        let pad_y = if self.blur_y > 0.0 { self.blur_y * q } else { 0.0 };
        rect.pad(pad_x, pad_y, pad_x, pad_y)
    }

    /// Blur the given region of `ctx` in place.
    pub fn apply_filter(
        &self,
        ctx: &mut RasterContext,
        x: i32,
        y: i32,
        width: usize,
        height: usize,
    ) {
        let rx = if self.blur_x > 0.0 {
            self.blur_x as usize
        } else {
            0
        };
        let ry = if self.blur_y > 0.0 {
            self.blur_y as usize
        } else {
            0
        };
        if (rx == 0 && ry == 0) || self.quality <= 0 {
            return;
        }

        let mut region = ctx.get_image_data(x, y, width, height);
        for _ in 0..self.quality {
            if rx > 0 {
                region = box_blur_h(region.view(), rx);
            }
            if ry > 0 {
                region = box_blur_v(region.view(), ry);
            }
        }
        ctx.put_image_data(region.view(), x, y);
    }
}

/// Horizontal box-blur pass. Edge pixels average over the in-bounds
/// portion of the window.
fn box_blur_h(input: ArrayView3<u8>, radius: usize) -> Array3<u8> {
    let (height, width, channels) = input.dim();
    let r = radius as isize;

    let mut out_flat = vec![0u8; height * width * channels];
    out_flat
        .par_chunks_mut(width * channels)
        .enumerate()
        .for_each(|(y, row)| {
            for x in 0..width {
                let x_start = (x as isize - r).max(0) as usize;
                let x_end = ((x as isize + r + 1).min(width as isize)) as usize;
                let count = (x_end - x_start) as u32;

                for c in 0..channels {
                    let mut sum = 0u32;
                    for sx in x_start..x_end {
                        sum += input[[y, sx, c]] as u32;
                    }
                    row[x * channels + c] = (sum / count) as u8;
                }
            }
        });

    Array3::from_shape_vec((height, width, channels), out_flat)
        .expect("Shape mismatch in box_blur_h")
}

/// Vertical box-blur pass.
fn box_blur_v(input: ArrayView3<u8>, radius: usize) -> Array3<u8> {
    let (height, width, channels) = input.dim();
    let r = radius as isize;

    let mut out_flat = vec![0u8; height * width * channels];
    out_flat
        .par_chunks_mut(width * channels)
        .enumerate()
        .for_each(|(y, row)| {
            let y_start = (y as isize - r).max(0) as usize;
            let y_end = ((y as isize + r + 1).min(height as isize)) as usize;
            let count = (y_end - y_start) as u32;

            for x in 0..width {
                for c in 0..channels {
                    let mut sum = 0u32;
                    for sy in y_start..y_end {
                        sum += input[[sy, x, c]] as u32;
                    }
                    row[x * channels + c] = (sum / count) as u8;
                }
            }
        });

    Array3::from_shape_vec((height, width, channels), out_flat)
        .expect("Shape mismatch in box_blur_v")
}
