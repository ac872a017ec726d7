//! Post-processing pixel filters.
//!
//! ## Filters
//!
//! - **Glow** - Tinted, blurred halo around (or inside) the visible
//!   silhouette (`glow.rs`)
//! - **Drop Shadow** - Tinted, blurred, offset copy behind (or inside)
//!   the content (`drop_shadow.rs`)
//! - **Blur** - The box-blur component both filters delegate to (`blur.rs`)
//!
//! ## Pipeline
//!
//! Both filters share the same stages, differing only in offset handling
//! and composite-mode selection:
//!
//! 1. Read the target region's pixels
//! 2. Build a tint mask from the source alpha (`core::tint_mask`)
//! 3. Blur once, then re-composite onto itself to amplify (`core::amplify`)
//! 4. Draw the result back through the selected composite mode
//!
//! Filters never fail: `apply_filter` reports `true` whenever it completes,
//! including the early-exit case where a fully transparent or zero-strength
//! effect with no knockout/hide side effect is skipped outright.

pub mod blur;
pub mod core;
pub mod drop_shadow;
pub mod glow;

pub use blur::BlurFilter;
pub use drop_shadow::DropShadowFilter;
pub use glow::GlowFilter;

use std::fmt;

use crate::context::RasterContext;
use crate::geom::Rect;

/// Contract shared by the glow and drop-shadow filters.
///
/// `Display` stands in for the identity string (`"[GlowFilter]"` /
/// `"[DropShadowFilter]"`).
pub trait Filter: fmt::Display {
    /// Margin the filter needs beyond `rect` to draw without clipping,
    /// or `None` when it does not affect bounds.
    fn bounds(&self, rect: Rect) -> Option<Rect>;

    /// Apply the filter to `ctx` over the given region. The context doubles
    /// as source and target, and the draw lands at `(x, y)`.
    fn apply_filter(
        &self,
        ctx: &mut RasterContext,
        x: i32,
        y: i32,
        width: usize,
        height: usize,
    ) -> bool {
        self.apply_filter_to(ctx, x, y, width, height)
    }

    /// Full form: read the region at `(target_x, target_y)` from `target`,
    /// run the pipeline, and composite back onto `target`. Always reports
    /// `true` on completion.
    fn apply_filter_to(
        &self,
        target: &mut RasterContext,
        target_x: i32,
        target_y: i32,
        width: usize,
        height: usize,
    ) -> bool;

    /// Clone into a boxed trait object.
    fn clone_box(&self) -> Box<dyn Filter>;
}

impl Clone for Box<dyn Filter> {
    fn clone(&self) -> Self {
        self.clone_box()
    }
}
