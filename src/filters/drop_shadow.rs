//! Drop-shadow filter.
//!
//! Same pipeline as the glow, plus a geometric offset: distance and angle
//! are converted to a cached pixel offset, and the tinted, blurred copy is
//! drawn displaced by it. `hide_object` renders only the shadow.

use std::fmt;

use log::trace;

use crate::context::{CompositeMode, RasterContext};
use crate::filters::blur::BlurFilter;
use crate::filters::core::{self, amplify, tint_mask};
use crate::filters::Filter;
use crate::geom::Rect;

/// Drop-shadow configuration and pipeline.
///
/// The pixel offset is derived from `(distance, angle)` whenever either
/// changes — never lazily at apply time. `alpha` and `strength` follow the
/// same consume-time clamping as [`crate::GlowFilter`].
#[derive(Clone, Debug)]
pub struct DropShadowFilter {
    distance: f64,
    angle: f64,
    offset_x: f64,
    offset_y: f64,
    red: u8,
    green: u8,
    blue: u8,
    /// Shadow transparency, consumed clamped to [0, 1].
    pub alpha: f64,
    /// Self-composite iteration count, consumed clamped to [0, 255].
    pub strength: i32,
    /// Inner shadow instead of outer.
    pub inner: bool,
    /// Keep only the shadow, cutting the object out.
    pub knockout: bool,
    /// Hide the object and show only its shadow.
    pub hide_object: bool,
    blur: BlurFilter,
}

impl Default for DropShadowFilter {
    fn default() -> Self {
        DropShadowFilter::new(4.0, 45.0, 0x000000, 1.0, 0.0, 0.0, 1, 1, false, false, false)
    }
}

impl DropShadowFilter {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
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
    ) -> Self {
        let (red, green, blue) = core::unpack_rgb(color);
        let mut filter = DropShadowFilter {
            distance,
            angle: normalize_angle(angle),
            offset_x: 0.0,
            offset_y: 0.0,
            red,
            green,
            blue,
            alpha,
            strength,
            inner,
            knockout,
            hide_object,
            blur: BlurFilter::new(blur_x, blur_y, quality),
        };
        filter.update_offset();
        filter
    }

    /// Shadow angle in degrees, always within `[0, 360)`.
    pub fn angle(&self) -> f64 {
        self.angle
    }

    /// Set the angle; any input is normalized into `[0, 360)` and the
    /// cached offset is recomputed.
    pub fn set_angle(&mut self, value: f64) {
        self.angle = normalize_angle(value);
        self.update_offset();
    }

    pub fn distance(&self) -> f64 {
        self.distance
    }

    pub fn set_distance(&mut self, value: f64) {
        self.distance = value;
        self.update_offset();
    }

    /// Cached horizontal shadow offset in pixels.
    pub fn offset_x(&self) -> f64 {
        self.offset_x
    }

    /// Cached vertical shadow offset in pixels.
    pub fn offset_y(&self) -> f64 {
        self.offset_y
    }

    /// Packed 0xRRGGBB shadow color, reassembled from the stored channels.
    pub fn color(&self) -> u32 {
        core::pack_rgb(self.red, self.green, self.blue)
    }

    /// Set the shadow color; bits above the low 24 are discarded.
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

    fn update_offset(&mut self) {
        let r = self.angle.to_radians();
        self.offset_x = r.cos() * self.distance;
        self.offset_y = r.sin() * self.distance;
    }

    /// Bounds required to draw the shadow. An inner shadow returns the
    /// input rectangle unchanged (pass-through, unlike the glow's
    /// no-extension answer); an outer shadow pads by the blur margin and
    /// then extends along each offset axis.
    pub fn get_bounds(&self, rect: Rect) -> Rect {
        if self.inner {
            return rect;
        }
        let mut bounds = self.blur.get_bounds(rect);
        if self.offset_x != 0.0 {
            if self.offset_x < 0.0 {
                bounds.x += self.offset_x;
                bounds.width += -self.offset_x;
            } else {
                bounds.width += self.offset_x;
            }
        }
        if self.offset_y != 0.0 {
            if self.offset_y < 0.0 {
                bounds.y += self.offset_y;
                bounds.height += -self.offset_y;
            } else {
                bounds.height += self.offset_y;
            }
        }
        bounds
    }

    fn composite_mode(&self) -> CompositeMode {
        if self.knockout {
            if self.inner {
                CompositeMode::SourceIn
            } else {
                CompositeMode::SourceOut
            }
        } else if self.hide_object {
            if self.inner {
                CompositeMode::SourceIn
            } else {
                CompositeMode::Copy
            }
        } else if self.inner {
            CompositeMode::SourceAtop
        } else {
            CompositeMode::DestinationOver
        }
    }
}

impl Filter for DropShadowFilter {
    fn bounds(&self, rect: Rect) -> Option<Rect> {
        Some(self.get_bounds(rect))
    }

    fn apply_filter_to(
        &self,
        target: &mut RasterContext,
        target_x: i32,
        target_y: i32,
        width: usize,
        height: usize,
    ) -> bool {
        if (self.alpha <= 0.0 || self.strength <= 0) && !self.knockout && !self.hide_object {
            trace!(
                "drop shadow skipped: alpha={} strength={}",
                self.alpha,
                self.strength
            );
            return true;
        }

        let source = target.get_image_data(target_x, target_y, width, height);
        let mask = tint_mask(source.view(), self.red, self.green, self.blue, self.inner);
        let mut scratch =
            RasterContext::from_array(mask).expect("Shape mismatch in shadow scratch");
        amplify(&mut scratch, &self.blur, self.strength);
        let processed = scratch.into_surface();

        let mode = self.composite_mode();
        trace!(
            "drop shadow composite: mode={:?} offset=({}, {})",
            mode,
            self.offset_x,
            self.offset_y
        );
        let mut target = target.save();
        target.reset_transform();
        target.set_global_alpha(self.alpha.clamp(0.0, 1.0));
        target.set_composite_mode(mode);
        target.draw_image(
            processed.view(),
            target_x as f64 + self.offset_x,
            target_y as f64 + self.offset_y,
        );
        true
    }

    fn clone_box(&self) -> Box<dyn Filter> {
        Box::new(self.clone())
    }
}

impl fmt::Display for DropShadowFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("[DropShadowFilter]")
    }
}

/// Map any angle in degrees into `[0, 360)`.
fn normalize_angle(value: f64) -> f64 {
    ((value % 360.0) + 360.0) % 360.0
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::Array3;

    const EPS: f64 = 1e-9;

    #[test]
    fn test_angle_normalization() {
        let mut shadow = DropShadowFilter::default();
        assert_eq!(shadow.angle(), 45.0);

        shadow.set_angle(-90.0);
        assert_eq!(shadow.angle(), 270.0);
        shadow.set_angle(450.0);
        assert_eq!(shadow.angle(), 90.0);
        shadow.set_angle(360.0);
        assert_eq!(shadow.angle(), 0.0);
        shadow.set_angle(-0.5);
        assert_eq!(shadow.angle(), 359.5);
    }

    #[test]
    fn test_constructor_normalizes_angle() {
        let shadow =
            DropShadowFilter::new(1.0, -45.0, 0, 1.0, 0.0, 0.0, 1, 1, false, false, false);
        assert_eq!(shadow.angle(), 315.0);
    }

    #[test]
    fn test_offset_tracks_angle_and_distance() {
        let mut shadow = DropShadowFilter::default();
        // distance 4 at 45 degrees
        let expected = 4.0 * (45.0f64).to_radians().cos();
        assert!((shadow.offset_x() - expected).abs() < EPS);
        assert!((shadow.offset_y() - expected).abs() < EPS);

        shadow.set_angle(0.0);
        assert!((shadow.offset_x() - 4.0).abs() < EPS);
        assert!(shadow.offset_y().abs() < EPS);

        shadow.set_distance(10.0);
        assert!((shadow.offset_x() - 10.0).abs() < EPS);

        // offset uses the normalized angle
        shadow.set_angle(-270.0);
        assert_eq!(shadow.angle(), 90.0);
        assert!(shadow.offset_x().abs() < EPS);
        assert!((shadow.offset_y() - 10.0).abs() < EPS);
    }

    #[test]
    fn test_color_round_trip() {
        let mut shadow = DropShadowFilter::default();
        assert_eq!(shadow.color(), 0x000000);
        for color in [0xFFFFFF, 0x123456, 0x0000FF] {
            shadow.set_color(color);
            assert_eq!(shadow.color(), color);
        }
    }

    #[test]
    fn test_clone_is_independent() {
        let shadow =
            DropShadowFilter::new(3.0, 90.0, 0x336699, 0.5, 4.0, 5.0, 2, 3, true, true, true);
        let mut copy = shadow.clone();
        assert_eq!(copy.distance(), 3.0);
        assert_eq!(copy.angle(), 90.0);
        assert_eq!(copy.color(), 0x336699);
        assert_eq!(copy.alpha, 0.5);
        assert_eq!(copy.blur_x(), 4.0);
        assert_eq!(copy.blur_y(), 5.0);
        assert_eq!(copy.strength, 2);
        assert_eq!(copy.quality(), 3);
        assert!(copy.inner && copy.knockout && copy.hide_object);

        copy.set_blur_x(99.0);
        copy.set_distance(50.0);
        assert_eq!(shadow.blur_x(), 4.0);
        assert_eq!(shadow.distance(), 3.0);
    }

    #[test]
    fn test_bounds_inner_passes_rect_through() {
        let shadow =
            DropShadowFilter::new(9.0, 0.0, 0, 1.0, 8.0, 8.0, 1, 2, true, false, false);
        let rect = Rect::new(1.0, 2.0, 3.0, 4.0);
        assert_eq!(shadow.get_bounds(rect), rect);
    }

    #[test]
    fn test_bounds_outer_extends_by_offset() {
        // blur margin {-2, -2, 4, 4} with offset (-5, 3)
        let mut shadow =
            DropShadowFilter::new(0.0, 0.0, 0, 1.0, 2.0, 2.0, 1, 1, false, false, false);
        let d = (34.0f64).sqrt();
        let a = (3.0f64).atan2(-5.0).to_degrees();
        shadow.set_angle(a);
        shadow.set_distance(d);
        assert!((shadow.offset_x() - -5.0).abs() < 1e-9);
        assert!((shadow.offset_y() - 3.0).abs() < 1e-9);

        let b = shadow.get_bounds(Rect::ZERO);
        assert!((b.x - -7.0).abs() < 1e-9);
        assert!((b.y - -2.0).abs() < 1e-9);
        assert!((b.width - 9.0).abs() < 1e-9);
        assert!((b.height - 7.0).abs() < 1e-9);
    }

    #[test]
    fn test_bounds_zero_offset_axis_untouched() {
        let shadow =
            DropShadowFilter::new(0.0, 0.0, 0, 1.0, 1.0, 1.0, 1, 1, false, false, false);
        assert_eq!(shadow.offset_x(), 0.0);
        assert_eq!(shadow.offset_y(), 0.0);
        assert_eq!(shadow.get_bounds(Rect::ZERO), Rect::new(-1.0, -1.0, 2.0, 2.0));
    }

    #[test]
    fn test_composite_mode_table() {
        let mut shadow = DropShadowFilter::default();
        let cases = [
            (true, false, false, CompositeMode::SourceOut),
            (true, true, false, CompositeMode::SourceIn),
            (false, false, false, CompositeMode::DestinationOver),
            (false, true, false, CompositeMode::SourceAtop),
            (false, false, true, CompositeMode::Copy),
            (false, true, true, CompositeMode::SourceIn),
        ];
        for (knockout, inner, hide_object, expected) in cases {
            shadow.knockout = knockout;
            shadow.inner = inner;
            shadow.hide_object = hide_object;
            assert_eq!(
                shadow.composite_mode(),
                expected,
                "knockout={knockout} inner={inner} hide_object={hide_object}"
            );
        }
    }

    fn single_dot() -> RasterContext {
        // one opaque white pixel at (1, 1) in a 4x4 surface
        let mut img = Array3::<u8>::zeros((4, 4, 4));
        for c in 0..4 {
            img[[1, 1, c]] = 255;
        }
        RasterContext::from_array(img).unwrap()
    }

    #[test]
    fn test_apply_early_exits_when_invisible() {
        let mut ctx = single_dot();
        let before = ctx.surface().to_owned();
        let shadow =
            DropShadowFilter::new(1.0, 0.0, 0, 0.0, 2.0, 2.0, 1, 1, false, false, false);
        assert!(shadow.apply_filter(&mut ctx, 0, 0, 4, 4));
        assert_eq!(ctx.surface(), before.view());
    }

    #[test]
    fn test_hide_object_forces_processing() {
        // alpha 0 would normally early-exit, but hide_object must still run
        let mut ctx = single_dot();
        let before = ctx.surface().to_owned();
        let shadow =
            DropShadowFilter::new(1.0, 0.0, 0, 0.0, 0.0, 0.0, 1, 1, false, false, true);
        assert!(shadow.apply_filter(&mut ctx, 0, 0, 4, 4));
        assert_ne!(ctx.surface(), before.view());
    }

    #[test]
    fn test_outer_shadow_lands_at_offset() {
        let mut ctx = single_dot();
        // distance 1 at angle 0: offset (1, 0)
        let shadow =
            DropShadowFilter::new(1.0, 0.0, 0x000000, 1.0, 0.0, 0.0, 1, 1, false, false, false);
        assert!(shadow.apply_filter(&mut ctx, 0, 0, 4, 4));

        let s = ctx.surface();
        // object pixel survives on top
        assert_eq!(
            (s[[1, 1, 0]], s[[1, 1, 3]]),
            (255, 255)
        );
        // shadow shows where the displaced silhouette is not covered
        assert_eq!(s[[1, 2, 3]], 255);
        assert_eq!((s[[1, 2, 0]], s[[1, 2, 1]], s[[1, 2, 2]]), (0, 0, 0));
        // nothing anywhere else
        assert_eq!(s[[2, 2, 3]], 0);
        assert_eq!(s[[0, 0, 3]], 0);
    }

    #[test]
    fn test_hide_object_shows_only_shadow() {
        let mut ctx = single_dot();
        let shadow =
            DropShadowFilter::new(1.0, 0.0, 0x000000, 1.0, 0.0, 0.0, 1, 1, false, false, true);
        assert!(shadow.apply_filter(&mut ctx, 0, 0, 4, 4));

        let s = ctx.surface();
        // copy mode: the object is gone, only the displaced shadow remains
        assert_eq!(s[[1, 1, 3]], 0);
        assert_eq!(s[[1, 2, 3]], 255);
        assert_eq!((s[[1, 2, 0]], s[[1, 2, 1]], s[[1, 2, 2]]), (0, 0, 0));
    }

    #[test]
    fn test_to_string_literal() {
        assert_eq!(DropShadowFilter::default().to_string(), "[DropShadowFilter]");
    }
}
