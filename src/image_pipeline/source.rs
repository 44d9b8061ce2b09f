//! Source image reading module
//!
//! This module decodes input files into RGB pixel buffers.

mod image_reader;
mod reader;
pub mod types;

pub use image_reader::ImageCrateReader;
pub use reader::SourceImageReader;
pub use types::{PixelBuffer, Rgb};
