//! Image processing pipeline module
//!
//! This module turns decoded images into tangent-space normal maps, with
//! separate modules for source reading, normal synthesis, PNG writing, and
//! conversion orchestration.

pub mod common;
pub mod conversions;
pub mod normal;
pub mod png;
pub mod source;

pub use self::common::{ConversionError, PipelineTimings, Result};

pub use self::source::{ImageCrateReader, PixelBuffer, Rgb, SourceImageReader};

pub use self::normal::{
    NoProgress, NormalMapImage, NormalMapSynthesizer, ProgressObserver, ScalarOp, Vec3,
};

pub use self::png::{
    ConversionConfig, ConversionConfigBuilder, NormalMapWriter, PngCompression, PngFilter,
    StandardPngWriter,
};

pub use self::conversions::{ConversionReport, ImageToNormalPipeline};
