//! Normal map synthesis module
//!
//! Height is estimated per pixel from a scalar of its color channels, slopes
//! come from wraparound finite differences, and the resulting surface normal
//! is quantized into an RGB pixel.

pub mod derivative;
pub mod sampler;
pub mod scalar;
mod synthesizer;
pub mod types;
pub mod vector;

pub use derivative::{SLOPE_SCALE, Tangents, partial_derivatives, surface_normal};
pub use sampler::sample;
pub use scalar::ScalarOp;
pub use synthesizer::{NoProgress, NormalMapSynthesizer, ProgressObserver, encode_normal};
pub use types::NormalMapImage;
pub use vector::Vec3;
