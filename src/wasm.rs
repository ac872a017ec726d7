//! WebAssembly exports for the rasterfx filters.
//!
//! These functions are exposed to JavaScript via wasm-bindgen. Images
//! travel as flat RGBA byte arrays (length = width * height * 4).

use ndarray::Array3;
use wasm_bindgen::prelude::*;

use crate::context::RasterContext;
use crate::filters::{BlurFilter, DropShadowFilter, Filter, GlowFilter};

fn context_from(data: &[u8], width: usize, height: usize) -> RasterContext {
    let surface = Array3::from_shape_vec((height, width, 4), data.to_vec())
        .expect("Invalid dimensions");
    RasterContext::from_array(surface).expect("Invalid dimensions")
}

/// Apply a glow filter to a flat RGBA byte array.
///
/// # Arguments
/// * `data` - Flat array of RGBA bytes (length = width * height * 4)
/// * `width` - Image width in pixels
/// * `height` - Image height in pixels
/// * `color` - Glow color in hexadecimal 0xRRGGBB
/// * `alpha` - Glow transparency (0.0-1.0)
/// * `blur_x` - Horizontal blur extent in pixels
/// * `blur_y` - Vertical blur extent in pixels
/// * `strength` - Glow strength (0-255)
/// * `quality` - Number of blur iterations
/// * `inner` - Inner glow instead of outer
/// * `knockout` - Keep only the glow, cutting the object out
#[wasm_bindgen]
#[allow(clippy::too_many_arguments)]
pub fn glow_rgba_wasm(
    data: &[u8],
    width: usize,
    height: usize,
    color: u32,
    alpha: f64,
    blur_x: f64,
    blur_y: f64,
    strength: i32,
    quality: i32,
    inner: bool,
    knockout: bool,
) -> Vec<u8> {
    let mut ctx = context_from(data, width, height);
    let filter = GlowFilter::new(color, alpha, blur_x, blur_y, strength, quality, inner, knockout);
    filter.apply_filter(&mut ctx, 0, 0, width, height);
    ctx.into_surface().into_raw_vec_and_offset().0
}

/// Apply a drop-shadow filter to a flat RGBA byte array.
///
/// # Arguments
/// * `data` - Flat array of RGBA bytes (length = width * height * 4)
/// * `width` - Image width in pixels
/// * `height` - Image height in pixels
/// * `distance` - Shadow offset distance in pixels
/// * `angle` - Shadow angle in degrees (normalized into [0, 360))
/// * `color` - Shadow color in hexadecimal 0xRRGGBB
/// * `alpha` - Shadow transparency (0.0-1.0)
/// * `blur_x` - Horizontal blur extent in pixels
/// * `blur_y` - Vertical blur extent in pixels
/// * `strength` - Shadow strength (0-255)
/// * `quality` - Number of blur iterations
/// * `inner` - Inner shadow instead of outer
/// * `knockout` - Keep only the shadow, cutting the object out
/// * `hide_object` - Hide the object and show only its shadow
#[wasm_bindgen]
#[allow(clippy::too_many_arguments)]
pub fn drop_shadow_rgba_wasm(
    data: &[u8],
    width: usize,
    height: usize,
    distance: f64,
    angle: f64,
    color: u32,
    alpha: f64,
    blur_x: f64,
    blur_y: f64,
    strength: i32,
    quality: i32,
    inner: bool,
    knockout: bool,
    hide_object: bool,
) -> Vec<u8> {
    let mut ctx = context_from(data, width, height);
    let filter = DropShadowFilter::new(
        distance,
        angle,
        color,
        alpha,
        blur_x,
        blur_y,
        strength,
        quality,
        inner,
        knockout,
        hide_object,
    );
    filter.apply_filter(&mut ctx, 0, 0, width, height);
    ctx.into_surface().into_raw_vec_and_offset().0
}

/// Apply an iterated box blur to a flat RGBA byte array.
///
/// # Arguments
/// * `data` - Flat array of RGBA bytes (length = width * height * 4)
/// * `width` - Image width in pixels
/// * `height` - Image height in pixels
/// * `blur_x` - Horizontal blur extent in pixels
/// * `blur_y` - Vertical blur extent in pixels
/// * `quality` - Number of blur iterations
#[wasm_bindgen]
pub fn box_blur_rgba_wasm(
    data: &[u8],
    width: usize,
    height: usize,
    blur_x: f64,
    blur_y: f64,
    quality: i32,
) -> Vec<u8> {
    let mut ctx = context_from(data, width, height);
    BlurFilter::new(blur_x, blur_y, quality).apply_filter(&mut ctx, 0, 0, width, height);
    ctx.into_surface().into_raw_vec_and_offset().0
}
