//! Raster drawing context used by the filter pipeline.
//!
//! A [`RasterContext`] owns an RGBA surface (shape `(height, width, 4)`,
//! row-major, straight alpha) plus a small drawing state: global alpha,
//! composite mode and a translation. It provides the capability set the
//! filters consume:
//!
//! - read / write a rectangular pixel region
//! - draw another surface at an offset through a Porter-Duff operator
//! - save / restore state, reset the transform to identity
//!
//! Composite math works on straight (non-premultiplied) alpha and matches
//! HTML-canvas semantics: for `SourceIn`, `SourceOut` and `Copy` the
//! operator applies across the *whole* surface, with pixels outside the
//! drawn image reading as transparent black. The remaining modes leave
//! uncovered pixels untouched, so only the overlap rectangle is visited.

use ndarray::{Array3, ArrayView3};

use crate::error::Error;

/// Porter-Duff composite operators supported by [`RasterContext::draw_image`].
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub enum CompositeMode {
    /// Source over destination (the default).
    #[default]
    SourceOver,
    /// Source kept only where the destination has alpha.
    SourceIn,
    /// Source kept only where the destination is transparent.
    SourceOut,
    /// Source drawn on top, clipped to the destination's alpha.
    SourceAtop,
    /// Source drawn behind the existing destination content.
    DestinationOver,
    /// Source replaces the destination outright.
    Copy,
}

impl CompositeMode {
    /// Porter-Duff blend factors `(f_src, f_dst)` for the given alphas.
    fn factors(self, src_a: f32, dst_a: f32) -> (f32, f32) {
        match self {
            CompositeMode::SourceOver => (1.0, 1.0 - src_a),
            CompositeMode::SourceIn => (dst_a, 0.0),
            CompositeMode::SourceOut => (1.0 - dst_a, 0.0),
            CompositeMode::SourceAtop => (dst_a, 1.0 - src_a),
            CompositeMode::DestinationOver => (1.0 - dst_a, 1.0),
            CompositeMode::Copy => (1.0, 0.0),
        }
    }

    /// Whether the operator clears destination pixels the source does not
    /// cover. These modes must run over the full surface.
    fn clears_uncovered(self) -> bool {
        matches!(
            self,
            CompositeMode::SourceIn | CompositeMode::SourceOut | CompositeMode::Copy
        )
    }
}

#[derive(Clone, Debug)]
struct DrawState {
    global_alpha: f64,
    composite: CompositeMode,
    translate_x: f64,
    translate_y: f64,
}

impl Default for DrawState {
    fn default() -> Self {
        DrawState {
            global_alpha: 1.0,
            composite: CompositeMode::SourceOver,
            translate_x: 0.0,
            translate_y: 0.0,
        }
    }
}

/// An off-screen RGBA surface with canvas-style drawing state.
#[derive(Clone, Debug)]
pub struct RasterContext {
    surface: Array3<u8>,
    state: DrawState,
    saved: Vec<DrawState>,
}

impl RasterContext {
    /// Create a fully transparent surface of the given size.
    pub fn new(width: usize, height: usize) -> Self {
        RasterContext {
            surface: Array3::zeros((height, width, 4)),
            state: DrawState::default(),
            saved: Vec::new(),
        }
    }

    /// Build a context over a flat RGBA byte buffer.
    pub fn from_vec(width: usize, height: usize, data: Vec<u8>) -> Result<Self, Error> {
        let expected = width * height * 4;
        if data.len() != expected {
            return Err(Error::InvalidDimension {
                width,
                height,
                expected,
                len: data.len(),
            });
        }
        let surface = Array3::from_shape_vec((height, width, 4), data)
            .expect("Shape mismatch in RasterContext::from_vec");
        Ok(RasterContext {
            surface,
            state: DrawState::default(),
            saved: Vec::new(),
        })
    }

    /// Build a context over an existing `(height, width, 4)` array.
    pub fn from_array(surface: Array3<u8>) -> Result<Self, Error> {
        let (height, width, channels) = surface.dim();
        if channels != 4 {
            return Err(Error::InvalidDimension {
                width,
                height,
                expected: width * height * 4,
                len: surface.len(),
            });
        }
        Ok(RasterContext {
            surface,
            state: DrawState::default(),
            saved: Vec::new(),
        })
    }

    pub fn width(&self) -> usize {
        self.surface.dim().1
    }

    pub fn height(&self) -> usize {
        self.surface.dim().0
    }

    pub fn surface(&self) -> ArrayView3<'_, u8> {
        self.surface.view()
    }

    /// Consume the context, returning the underlying surface.
    pub fn into_surface(self) -> Array3<u8> {
        self.surface
    }

    pub fn global_alpha(&self) -> f64 {
        self.state.global_alpha
    }

    pub fn set_global_alpha(&mut self, alpha: f64) {
        self.state.global_alpha = alpha;
    }

    pub fn composite_mode(&self) -> CompositeMode {
        self.state.composite
    }

    pub fn set_composite_mode(&mut self, mode: CompositeMode) {
        self.state.composite = mode;
    }

    /// Shift subsequent draws by the given amount.
    pub fn translate(&mut self, dx: f64, dy: f64) {
        self.state.translate_x += dx;
        self.state.translate_y += dy;
    }

    /// Reset the transform to identity. Translation is the only transform
    /// component this raster core honors.
    pub fn reset_transform(&mut self) {
        self.state.translate_x = 0.0;
        self.state.translate_y = 0.0;
    }

    pub fn translation(&self) -> (f64, f64) {
        (self.state.translate_x, self.state.translate_y)
    }

    /// Push the drawing state and return a guard that restores it when
    /// dropped, so early returns cannot leak modified state.
    pub fn save(&mut self) -> StateGuard<'_> {
        self.saved.push(self.state.clone());
        StateGuard { ctx: self }
    }

    fn restore(&mut self) {
        if let Some(state) = self.saved.pop() {
            self.state = state;
        }
    }

    /// Copy out a rectangular region. Samples outside the surface read as
    /// transparent black.
    pub fn get_image_data(&self, x: i32, y: i32, width: usize, height: usize) -> Array3<u8> {
        let (surf_h, surf_w, _) = self.surface.dim();
        let mut out = Array3::zeros((height, width, 4));
        for oy in 0..height {
            let sy = y as isize + oy as isize;
            if sy < 0 || sy >= surf_h as isize {
                continue;
            }
            for ox in 0..width {
                let sx = x as isize + ox as isize;
                if sx < 0 || sx >= surf_w as isize {
                    continue;
                }
                for c in 0..4 {
                    out[[oy, ox, c]] = self.surface[[sy as usize, sx as usize, c]];
                }
            }
        }
        out
    }

    /// Write raw pixels at the given position, clipped to the surface.
    /// Ignores global alpha and the composite mode (raw replacement).
    pub fn put_image_data(&mut self, data: ArrayView3<'_, u8>, x: i32, y: i32) {
        let (surf_h, surf_w, _) = self.surface.dim();
        let (src_h, src_w, _) = data.dim();
        for sy in 0..src_h {
            let dy = y as isize + sy as isize;
            if dy < 0 || dy >= surf_h as isize {
                continue;
            }
            for sx in 0..src_w {
                let dx = x as isize + sx as isize;
                if dx < 0 || dx >= surf_w as isize {
                    continue;
                }
                for c in 0..4 {
                    self.surface[[dy as usize, dx as usize, c]] = data[[sy, sx, c]];
                }
            }
        }
    }

    /// Draw an RGBA image at `(dx, dy)` (plus the current translation)
    /// through the current composite mode and global alpha.
    pub fn draw_image(&mut self, image: ArrayView3<'_, u8>, dx: f64, dy: f64) {
        let (src_h, src_w, _) = image.dim();
        let px = (self.state.translate_x + dx).round() as isize;
        let py = (self.state.translate_y + dy).round() as isize;
        let ga = self.state.global_alpha.clamp(0.0, 1.0) as f32;
        let mode = self.state.composite;
        let (dst_h, dst_w, _) = self.surface.dim();

        if mode.clears_uncovered() {
            for y in 0..dst_h {
                for x in 0..dst_w {
                    let sx = x as isize - px;
                    let sy = y as isize - py;
                    let src = if sx >= 0
                        && (sx as usize) < src_w
                        && sy >= 0
                        && (sy as usize) < src_h
                    {
                        let (sx, sy) = (sx as usize, sy as usize);
                        [
                            image[[sy, sx, 0]],
                            image[[sy, sx, 1]],
                            image[[sy, sx, 2]],
                            image[[sy, sx, 3]],
                        ]
                    } else {
                        [0, 0, 0, 0]
                    };
                    composite_pixel(&mut self.surface, y, x, src, ga, mode);
                }
            }
        } else {
            let x0 = px.max(0);
            let y0 = py.max(0);
            let x1 = (px + src_w as isize).min(dst_w as isize);
            let y1 = (py + src_h as isize).min(dst_h as isize);
            for y in y0..y1 {
                for x in x0..x1 {
                    let (sx, sy) = ((x - px) as usize, (y - py) as usize);
                    let src = [
                        image[[sy, sx, 0]],
                        image[[sy, sx, 1]],
                        image[[sy, sx, 2]],
                        image[[sy, sx, 3]],
                    ];
                    composite_pixel(&mut self.surface, y as usize, x as usize, src, ga, mode);
                }
            }
        }
    }
}

/// Blend one source pixel into the surface through the given operator.
///
/// Straight-alpha arithmetic: channels are weighted by their own alpha,
/// combined premultiplied, then divided back out.
fn composite_pixel(
    surface: &mut Array3<u8>,
    y: usize,
    x: usize,
    src: [u8; 4],
    global_alpha: f32,
    mode: CompositeMode,
) {
    let src_a = src[3] as f32 / 255.0 * global_alpha;
    let dst_a = surface[[y, x, 3]] as f32 / 255.0;
    let (fs, fd) = mode.factors(src_a, dst_a);
    let out_a = src_a * fs + dst_a * fd;

    if out_a <= 0.0 {
        for c in 0..4 {
            surface[[y, x, c]] = 0;
        }
        return;
    }

    for c in 0..3 {
        let sc = src[c] as f32;
        let dc = surface[[y, x, c]] as f32;
        let v = (sc * src_a * fs + dc * dst_a * fd) / out_a;
        surface[[y, x, c]] = v.round().clamp(0.0, 255.0) as u8;
    }
    surface[[y, x, 3]] = (out_a * 255.0).round().clamp(0.0, 255.0) as u8;
}

/// Restores the owning context's drawing state on drop.
pub struct StateGuard<'a> {
    ctx: &'a mut RasterContext,
}

impl std::ops::Deref for StateGuard<'_> {
    type Target = RasterContext;

    fn deref(&self) -> &RasterContext {
        self.ctx
    }
}

impl std::ops::DerefMut for StateGuard<'_> {
    fn deref_mut(&mut self) -> &mut RasterContext {
        self.ctx
    }
}

impl Drop for StateGuard<'_> {
    fn drop(&mut self) {
        self.ctx.restore();
    }
}
