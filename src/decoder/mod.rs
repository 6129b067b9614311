//! The `PngDecoder` collaborator: turns a standalone PNG byte sequence into
//! a drawable raster. The crate defines the trait and, behind a feature,
//! one concrete implementation; hosts may bring their own.

#[cfg(feature = "png-decoder")]
pub mod png_crate;

use crate::error::ApngError;

/// A decoded raster: width, height, and tightly packed RGBA8 pixel bytes
/// (`len() == width * height * 4`).
#[derive(Debug, Clone)]
pub struct Raster {
    /// Raster width in pixels.
    pub width: u32,
    /// Raster height in pixels.
    pub height: u32,
    /// Row-major RGBA8 pixel data.
    pub pixels: Vec<u8>,
}

impl Raster {
    /// Builds a raster, asserting the pixel buffer matches the declared
    /// dimensions.
    ///
    /// # Panics
    ///
    /// Panics if `pixels.len() != width * height * 4`.
    #[must_use]
    pub fn new(width: u32, height: u32, pixels: Vec<u8>) -> Self {
        assert_eq!(
            pixels.len(),
            width as usize * height as usize * 4,
            "raster pixel buffer does not match width*height*4"
        );
        Self {
            width,
            height,
            pixels,
        }
    }
}

/// Decodes a standalone PNG byte sequence into a [`Raster`].
///
/// Implementations are expected to be synchronous and side-effect free; the
/// crate's own demux/compositor pipeline calls this once per frame.
pub trait PngDecoder {
    /// Decodes `bytes` (a complete, valid PNG file) into a raster.
    ///
    /// # Errors
    ///
    /// Returns [`ApngError::DecoderError`] if the bytes cannot be decoded.
    fn decode(&self, bytes: &[u8]) -> Result<Raster, ApngError>;
}
