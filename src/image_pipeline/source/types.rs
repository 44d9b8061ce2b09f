//! Source image data types

use crate::image_pipeline::common::error::{ConversionError, Result};

/// One 8-bit RGB pixel.
pub type Rgb = [u8; 3];

/// Decoded source pixels, row-major.
///
/// The pixel count always equals `width * height`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PixelBuffer {
    width: usize,
    height: usize,
    pixels: Vec<Rgb>,
}

impl PixelBuffer {
    pub fn new(width: usize, height: usize, pixels: Vec<Rgb>) -> Result<Self> {
        let expected = width
            .checked_mul(height)
            .ok_or(ConversionError::InvalidDimensions(width, height))?;
        if pixels.len() != expected {
            return Err(ConversionError::BufferSizeMismatch {
                expected,
                actual: pixels.len(),
            });
        }
        Ok(Self {
            width,
            height,
            pixels,
        })
    }

    /// Builds a buffer from interleaved `[R, G, B, R, G, B, ...]` bytes.
    pub fn from_rgb_bytes(width: usize, height: usize, bytes: &[u8]) -> Result<Self> {
        if bytes.len() % 3 != 0 {
            return Err(ConversionError::BufferSizeMismatch {
                expected: width.saturating_mul(height),
                actual: bytes.len() / 3,
            });
        }
        let pixels = bytes
            .chunks_exact(3)
            .map(|c| [c[0], c[1], c[2]])
            .collect();
        Self::new(width, height, pixels)
    }

    /// A buffer where every pixel has the same color.
    pub fn filled(width: usize, height: usize, pixel: Rgb) -> Self {
        Self {
            width,
            height,
            pixels: vec![pixel; width * height],
        }
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn is_empty(&self) -> bool {
        self.pixels.is_empty()
    }

    pub fn pixels(&self) -> &[Rgb] {
        &self.pixels
    }
}
