//! Toroidal pixel lookup.

use crate::image_pipeline::source::types::{PixelBuffer, Rgb};

/// Returns the pixel at column `u mod width`, row `v mod height`.
///
/// Offsets wrap in both directions, so `u = -1` reads the last column. The
/// buffer must not be empty.
pub fn sample(buffer: &PixelBuffer, u: isize, v: isize) -> Rgb {
    let column = u.rem_euclid(buffer.width() as isize) as usize;
    let row = v.rem_euclid(buffer.height() as isize) as usize;
    buffer.pixels()[row * buffer.width() + column]
}
