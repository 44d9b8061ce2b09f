//! PNG writing module
//!
//! This module encodes normal maps as 8-bit RGB PNG files with fixed,
//! deterministic encoder settings.

mod standard_png_writer;
pub mod types;
mod writer;

pub use standard_png_writer::StandardPngWriter;
pub use types::{ConversionConfig, ConversionConfigBuilder, PngCompression, PngFilter};
pub use writer::NormalMapWriter;
