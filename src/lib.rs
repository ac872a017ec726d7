//! rasterfx
//!
//! Glow and drop-shadow post-processing filters for rasterized 2D
//! graphics, with Python bindings via PyO3 and WASM bindings for
//! JavaScript.
//!
//! ## Image Format
//!
//! Surfaces are RGBA: `(height, width, 4)` arrays of `u8`, row-major,
//! straight (non-premultiplied) alpha.
//!
//! ## Architecture
//!
//! - [`RasterContext`] - off-screen surface with canvas-style drawing
//!   state (composite mode, global alpha, translation, save/restore)
//! - [`BlurFilter`] - iterated separable box blur, the component both
//!   filters delegate their blur parameters to
//! - [`GlowFilter`] / [`DropShadowFilter`] - the filter pipeline: tint
//!   mask from source alpha, blur amplification by `strength`, then a
//!   flag-selected Porter-Duff composite against the target
//!
//! Filters can extend the drawing area beyond the source rectangle;
//! `get_bounds` reports the required margin so callers can size their
//! buffers before applying.

pub mod context;
pub mod error;
pub mod filters;
pub mod geom;

#[cfg(feature = "wasm")]
pub mod wasm;

pub use context::{CompositeMode, RasterContext, StateGuard};
pub use error::Error;
pub use filters::{BlurFilter, DropShadowFilter, Filter, GlowFilter};
pub use geom::Rect;

// Python bindings (only when python feature is enabled)
#[cfg(feature = "python")]
mod python {
    use numpy::{IntoPyArray, PyArray3, PyReadonlyArray3};
    use pyo3::exceptions::PyValueError;
    use pyo3::prelude::*;

    use crate::context::RasterContext;
    use crate::filters::core::check_rgb;
    use crate::filters::{BlurFilter, DropShadowFilter, Filter, GlowFilter};

    fn context_from(image: PyReadonlyArray3<'_, u8>) -> PyResult<RasterContext> {
        RasterContext::from_array(image.as_array().to_owned())
            .map_err(|e| PyValueError::new_err(e.to_string()))
    }

    /// Apply a glow filter to an RGBA u8 image.
    ///
    /// # Arguments
    /// * `image` - Source RGBA image (height, width, 4) as u8
    /// * `color` - Glow color in hexadecimal 0xRRGGBB
    /// * `alpha` - Glow transparency (0.0-1.0)
    /// * `blur_x` - Horizontal blur extent in pixels
    /// * `blur_y` - Vertical blur extent in pixels
    /// * `strength` - Glow strength (0-255)
    /// * `quality` - Number of blur iterations
    /// * `inner` - Inner glow instead of outer
    /// * `knockout` - Keep only the glow, cutting the object out
    #[pyfunction]
    #[pyo3(signature = (image, color=0xFF0000, alpha=1.0, blur_x=0.0, blur_y=0.0, strength=1, quality=1, inner=false, knockout=false))]
    #[allow(clippy::too_many_arguments)]
    pub fn glow_rgba<'py>(
        py: Python<'py>,
        image: PyReadonlyArray3<'py, u8>,
        color: u32,
        alpha: f64,
        blur_x: f64,
        blur_y: f64,
        strength: i32,
        quality: i32,
        inner: bool,
        knockout: bool,
    ) -> PyResult<Bound<'py, PyArray3<u8>>> {
        check_rgb(color).map_err(|e| PyValueError::new_err(e.to_string()))?;
        let mut ctx = context_from(image)?;
        let (width, height) = (ctx.width(), ctx.height());
        let filter =
            GlowFilter::new(color, alpha, blur_x, blur_y, strength, quality, inner, knockout);
        filter.apply_filter(&mut ctx, 0, 0, width, height);
        Ok(ctx.into_surface().into_pyarray(py))
    }

    /// Apply a drop-shadow filter to an RGBA u8 image.
    ///
    /// # Arguments
    /// * `image` - Source RGBA image (height, width, 4) as u8
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
    #[pyfunction]
    #[pyo3(signature = (image, distance=4.0, angle=45.0, color=0x000000, alpha=1.0, blur_x=0.0, blur_y=0.0, strength=1, quality=1, inner=false, knockout=false, hide_object=false))]
    #[allow(clippy::too_many_arguments)]
    pub fn drop_shadow_rgba<'py>(
        py: Python<'py>,
        image: PyReadonlyArray3<'py, u8>,
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
    ) -> PyResult<Bound<'py, PyArray3<u8>>> {
        check_rgb(color).map_err(|e| PyValueError::new_err(e.to_string()))?;
        let mut ctx = context_from(image)?;
        let (width, height) = (ctx.width(), ctx.height());
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
        Ok(ctx.into_surface().into_pyarray(py))
    }

    /// Apply an iterated box blur to an RGBA u8 image.
    ///
    /// # Arguments
    /// * `image` - Source RGBA image (height, width, 4) as u8
    /// * `blur_x` - Horizontal blur extent in pixels
    /// * `blur_y` - Vertical blur extent in pixels
    /// * `quality` - Number of blur iterations
    #[pyfunction]
    #[pyo3(signature = (image, blur_x=0.0, blur_y=0.0, quality=1))]
    pub fn box_blur_rgba<'py>(
        py: Python<'py>,
        image: PyReadonlyArray3<'py, u8>,
        blur_x: f64,
        blur_y: f64,
        quality: i32,
    ) -> PyResult<Bound<'py, PyArray3<u8>>> {
        let mut ctx = context_from(image)?;
        let (width, height) = (ctx.width(), ctx.height());
        BlurFilter::new(blur_x, blur_y, quality).apply_filter(&mut ctx, 0, 0, width, height);
        Ok(ctx.into_surface().into_pyarray(py))
    }

    /// rasterfx extension module
    #[pymodule]
    pub fn rasterfx(m: &Bound<'_, PyModule>) -> PyResult<()> {
        m.add_function(wrap_pyfunction!(glow_rgba, m)?)?;
        m.add_function(wrap_pyfunction!(drop_shadow_rgba, m)?)?;
        m.add_function(wrap_pyfunction!(box_blur_rgba, m)?)?;
        Ok(())
    }
}

#[cfg(feature = "python")]
pub use python::rasterfx;
