//! Pipeline conversions module
//!
//! This module contains orchestration logic for image to normal map conversion.

mod image_to_normal;


pub use image_to_normal::{ConversionReport, ImageToNormalPipeline};
