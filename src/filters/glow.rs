//! Glow filter.
//!
//! Derives a tinted, blurred copy of the target region and composites it
//! against the original. An outer glow radiates from the silhouette's
//! nonzero alpha; an inner glow fills the not-fully-opaque interior.
//! `knockout` keeps only the glow and cuts the original content out.

use std::fmt;

use log::trace;

use crate::context::{CompositeMode, RasterContext};
use crate::filters::blur::BlurFilter;
use crate::filters::core::{self, amplify, tint_mask};
use crate::filters::Filter;
use crate::geom::Rect;

/// Glow configuration and pipeline.
///
/// `alpha` is clamped to [0, 1] and `strength` to [0, 255] when the filter
/// runs, not when they are set; out-of-range stored values are preserved
/// until overwritten.
#[derive(Clone, Debug)]
pub struct GlowFilter {
    red: u8,
    green: u8,
    blue: u8,
    /// Glow transparency, consumed clamped to [0, 1].
    pub alpha: f64,
    /// Self-composite iteration count, consumed clamped to [0, 255].
    pub strength: i32,
    /// Inner glow instead of outer.
    pub inner: bool,
    /// Keep only the glow, cutting the object out.
    pub knockout: bool,
    blur: BlurFilter,
}

impl Default for GlowFilter {
    fn default() -> Self {
        GlowFilter::new(0xFF0000, 1.0, 0.0, 0.0, 1, 1, false, false)
    }
}

impl GlowFilter {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        color: u32,
        alpha: f64,
        blur_x: f64,
        blur_y: f64,
        strength: i32,
        quality: i32,
        inner: bool,
        knockout: bool,
    ) -> Self {
        let (red, green, blue) = core::unpack_rgb(color);
        GlowFilter {
            red,
            green,
            blue,
            alpha,
            strength,
            inner,
            knockout,
            blur: BlurFilter::new(blur_x, blur_y, quality),
        }
    }

    /// Packed 0xRRGGBB glow color, reassembled from the stored channels.
    pub fn color(&self) -> u32 {
        core::pack_rgb(self.red, self.green, self.blue)
    }

    /// Set the glow color; bits above the low 24 are discarded.
    pub fn set_color(&mut self, value: u32) {
        let (red, green, blue) = core::unpack_rgb(value);
        self.red = red;
        self.green = green;
        self.blue = blue;
    }

    pub fn blur_x(&self) -> f64 {
        self.blur.blur_x
    }

    pub fn set_blur_x(&mut self, value: f64) {
        self.blur.blur_x = value;
    }

    pub fn blur_y(&self) -> f64 {
        self.blur.blur_y
    }

    pub fn set_blur_y(&mut self, value: f64) {
        self.blur.blur_y = value;
    }

    pub fn quality(&self) -> i32 {
        self.blur.quality
    }

    pub fn set_quality(&mut self, value: i32) {
        self.blur.quality = value;
    }

    /// Margin required to draw the glow, or `None` for an inner glow
    /// (inner effects do not grow bounds).
    pub fn get_bounds(&self) -> Option<Rect> {
        if self.inner {
            None
        } else {
            Some(self.blur.get_bounds(Rect::ZERO))
        }
    }

    fn composite_mode(&self) -> CompositeMode {
        if self.knockout {
            if self.inner {
                CompositeMode::SourceIn
            } else {
                CompositeMode::SourceOut
            }
        } else if self.inner {
            CompositeMode::SourceAtop
        } else {
            CompositeMode::DestinationOver
        }
    }
}

impl Filter for GlowFilter {
    fn bounds(&self, _rect: Rect) -> Option<Rect> {
        self.get_bounds()
    }

    fn apply_filter_to(
        &self,
        target: &mut RasterContext,
        target_x: i32,
        target_y: i32,
        width: usize,
        height: usize,
    ) -> bool {
        if (self.alpha <= 0.0 || self.strength <= 0) && !self.knockout {
            trace!(
                "glow skipped: alpha={} strength={}",
                self.alpha,
                self.strength
            );
            return true;
        }

        let source = target.get_image_data(target_x, target_y, width, height);
        let mask = tint_mask(source.view(), self.red, self.green, self.blue, self.inner);
        let mut scratch =
            RasterContext::from_array(mask).expect("Shape mismatch in glow scratch");
        amplify(&mut scratch, &self.blur, self.strength);
        let processed = scratch.into_surface();

        let mode = self.composite_mode();
        trace!(
            "glow composite: mode={:?} inner={} knockout={}",
            mode,
            self.inner,
            self.knockout
        );
        let mut target = target.save();
        target.reset_transform();
        target.set_global_alpha(self.alpha.clamp(0.0, 1.0));
        target.set_composite_mode(mode);
        target.draw_image(processed.view(), target_x as f64, target_y as f64);
        true
    }

    fn clone_box(&self) -> Box<dyn Filter> {
        Box::new(self.clone())
    }
}

impl fmt::Display for GlowFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("[GlowFilter]")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::Array3;

    #[test]
    fn test_color_round_trip() {
        let mut glow = GlowFilter::default();
        assert_eq!(glow.color(), 0xFF0000);
        for color in [0x000000, 0xFFFFFF, 0x123456, 0xABCDEF] {
            glow.set_color(color);
            assert_eq!(glow.color(), color);
        }
    }

    #[test]
    fn test_clone_is_independent() {
        let glow = GlowFilter::new(0x00FFFF, 0.5, 4.0, 6.0, 2, 3, true, true);
        let mut copy = glow.clone();
        assert_eq!(copy.color(), 0x00FFFF);
        assert_eq!(copy.alpha, 0.5);
        assert_eq!(copy.blur_x(), 4.0);
        assert_eq!(copy.blur_y(), 6.0);
        assert_eq!(copy.strength, 2);
        assert_eq!(copy.quality(), 3);
        assert!(copy.inner);
        assert!(copy.knockout);

        copy.set_blur_x(99.0);
        copy.set_quality(9);
        assert_eq!(glow.blur_x(), 4.0);
        assert_eq!(glow.quality(), 3);
    }

    #[test]
    fn test_bounds_inner_is_none() {
        let mut glow = GlowFilter::new(0xFF0000, 1.0, 8.0, 8.0, 1, 2, true, false);
        assert_eq!(glow.get_bounds(), None);
        glow.inner = false;
        assert_eq!(glow.get_bounds(), Some(Rect::new(-16.0, -16.0, 32.0, 32.0)));
    }

    #[test]
    fn test_bounds_outer_is_blur_margin() {
        let glow = GlowFilter::new(0xFF0000, 1.0, 2.0, 3.0, 1, 1, false, false);
        assert_eq!(glow.get_bounds(), Some(Rect::new(-2.0, -3.0, 4.0, 6.0)));
    }

    #[test]
    fn test_composite_mode_table() {
        let mut glow = GlowFilter::default();
        let cases = [
            (true, false, CompositeMode::SourceOut),
            (true, true, CompositeMode::SourceIn),
            (false, false, CompositeMode::DestinationOver),
            (false, true, CompositeMode::SourceAtop),
        ];
        for (knockout, inner, expected) in cases {
            glow.knockout = knockout;
            glow.inner = inner;
            assert_eq!(glow.composite_mode(), expected, "knockout={knockout} inner={inner}");
        }
    }

    fn checkerboard() -> RasterContext {
        // (0,0) opaque red, (1,0) half-transparent blue, rest empty
        let mut img = Array3::<u8>::zeros((2, 2, 4));
        img[[0, 0, 0]] = 255;
        img[[0, 0, 3]] = 255;
        img[[0, 1, 2]] = 255;
        img[[0, 1, 3]] = 128;
        RasterContext::from_array(img).unwrap()
    }

    #[test]
    fn test_apply_early_exits_when_invisible() {
        let mut ctx = checkerboard();
        let before = ctx.surface().to_owned();

        let mut glow = GlowFilter::new(0x00FF00, 0.0, 2.0, 2.0, 1, 1, false, false);
        assert!(glow.apply_filter(&mut ctx, 0, 0, 2, 2));
        assert_eq!(ctx.surface(), before.view());

        glow.alpha = 1.0;
        glow.strength = 0;
        assert!(glow.apply_filter(&mut ctx, 0, 0, 2, 2));
        assert_eq!(ctx.surface(), before.view());
    }

    #[test]
    fn test_outer_glow_draws_behind_content() {
        let mut ctx = checkerboard();
        let glow = GlowFilter::new(0x00FF00, 1.0, 0.0, 0.0, 1, 1, false, false);
        assert!(glow.apply_filter(&mut ctx, 0, 0, 2, 2));

        let s = ctx.surface();
        // opaque pixel unchanged: the glow lands behind it
        assert_eq!(
            (s[[0, 0, 0]], s[[0, 0, 1]], s[[0, 0, 2]], s[[0, 0, 3]]),
            (255, 0, 0, 255)
        );
        // semi-transparent pixel gains alpha and picks up green from behind
        assert!(s[[0, 1, 3]] > 128);
        assert!(s[[0, 1, 1]] > 0);
        assert!(s[[0, 1, 2]] > s[[0, 1, 1]], "blue content stays dominant");
        // fully transparent pixels stay empty without blur
        assert_eq!(s[[1, 0, 3]], 0);
        assert_eq!(s[[1, 1, 3]], 0);
    }

    #[test]
    fn test_knockout_removes_content() {
        let mut ctx = checkerboard();
        let glow = GlowFilter::new(0x00FF00, 1.0, 0.0, 0.0, 1, 1, false, true);
        assert!(glow.apply_filter(&mut ctx, 0, 0, 2, 2));

        let s = ctx.surface();
        // source-out keeps the glow only where the target was transparent;
        // the opaque pixel is cut out entirely
        assert_eq!(s[[0, 0, 3]], 0);
        // the half-covered pixel keeps the uncovered share of the glow
        assert!(s[[0, 1, 3]] > 0);
        assert_eq!(s[[0, 1, 1]], 255);
        assert_eq!(s[[0, 1, 2]], 0);
    }

    #[test]
    fn test_zero_alpha_knockout_still_processes() {
        let mut ctx = checkerboard();
        let before = ctx.surface().to_owned();
        let glow = GlowFilter::new(0x00FF00, 0.0, 0.0, 0.0, 1, 1, false, true);
        assert!(glow.apply_filter(&mut ctx, 0, 0, 2, 2));
        // knockout forces the pass; a zero-alpha source-out erases content
        assert_ne!(ctx.surface(), before.view());
        assert_eq!(ctx.surface()[[0, 0, 3]], 0);
    }

    #[test]
    fn test_to_string_literal() {
        assert_eq!(GlowFilter::default().to_string(), "[GlowFilter]");
    }
}
