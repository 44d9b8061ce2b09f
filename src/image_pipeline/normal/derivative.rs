//! Finite-difference slopes and the surface normal they imply.

use crate::image_pipeline::normal::sampler::sample;
use crate::image_pipeline::normal::vector::Vec3;
use crate::image_pipeline::source::types::{PixelBuffer, Rgb};

/// Converts raw scalar differences (up to several hundred) into slopes.
pub const SLOPE_SCALE: f64 = 0.01;

/// Surface tangents at one pixel.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Tangents {
    /// Tangent along u: `(1, dx, 0)`.
    pub t_x: Vec3,
    /// Tangent along v: `(0, dy, 1)`.
    pub t_y: Vec3,
}

/// Backward differences of `op` at `(u, v)`, wrapping at the image edges.
pub fn partial_derivatives(
    buffer: &PixelBuffer,
    u: usize,
    v: usize,
    op: fn(Rgb) -> f64,
) -> Tangents {
    let (u, v) = (u as isize, v as isize);
    let here = op(sample(buffer, u, v));
    let dy = SLOPE_SCALE * (here - op(sample(buffer, u, v - 1)));
    let dx = SLOPE_SCALE * (here - op(sample(buffer, u - 1, v)));

    Tangents {
        t_x: Vec3::new(1.0, dx, 0.0),
        t_y: Vec3::new(0.0, dy, 1.0),
    }
}

/// `normalize(t_y × t_x)`.
///
/// For tangents built by [`partial_derivatives`] the cross product is
/// `(-dx, 1, -dy)`, which is never zero-length.
pub fn surface_normal(tangents: Tangents) -> Vec3 {
    tangents.t_y.cross(tangents.t_x).normalize()
}
