//! Error kinds surfaced at the crate's untyped boundaries.
//!
//! The filter pipeline itself has no failure path (`apply_filter` reports
//! success whenever it completes); these kinds exist for buffer construction
//! and for validating packed colors handed in from Python/JavaScript.

/// Errors raised when constructing surfaces or validating inputs.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Buffer length does not describe a `width x height` RGBA surface.
    #[error("invalid dimensions: {width}x{height} RGBA needs {expected} bytes, got {len}")]
    InvalidDimension {
        width: usize,
        height: usize,
        expected: usize,
        len: usize,
    },

    /// Packed color has bits set above the 24-bit RGB range.
    #[error("invalid color {0:#x}: expected 0xRRGGBB")]
    InvalidColor(u32),
}
