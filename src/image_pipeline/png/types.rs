//! Normal map conversion configuration types

use crate::image_pipeline::normal::scalar::ScalarOp;

/// PNG compression levels
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PngCompression {
    /// Fastest encode, largest file
    Fast,
    /// zlib level 6 (default)
    Default,
    /// Smallest file, slowest encode
    Best,
}

/// PNG row filters. All are deterministic.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PngFilter {
    /// No filtering (default)
    None,
    Sub,
    Up,
    Avg,
    Paeth,
}

/// Configuration for image to normal map conversion
#[derive(Debug, Clone)]
pub struct ConversionConfig {
    /// Policy used to derive a height from each pixel
    pub scalar_op: ScalarOp,
    /// Compression level of the output PNG
    pub compression: PngCompression,
    /// Row filter of the output PNG
    pub filter: PngFilter,
    /// Whether to validate image dimensions before conversion
    pub validate_dimensions: bool,
    /// Largest accepted width or height when validating
    pub max_dimension: Option<usize>,
}

impl Default for ConversionConfig {
    fn default() -> Self {
        Self {
            scalar_op: ScalarOp::Luminance,
            compression: PngCompression::Default,
            filter: PngFilter::None,
            validate_dimensions: true,
            max_dimension: None,
        }
    }
}

impl ConversionConfig {
    pub fn builder() -> ConversionConfigBuilder {
        ConversionConfigBuilder::default()
    }
}

/// Builder for ConversionConfig
#[derive(Default)]
pub struct ConversionConfigBuilder {
    scalar_op: Option<ScalarOp>,
    compression: Option<PngCompression>,
    filter: Option<PngFilter>,
    validate_dimensions: Option<bool>,
    max_dimension: Option<Option<usize>>,
}

impl ConversionConfigBuilder {
    pub fn scalar_op(mut self, op: ScalarOp) -> Self {
        self.scalar_op = Some(op);
        self
    }

    /// Same as [`scalar_op`](Self::scalar_op) with the op resolved from an
    /// alias such as `"lum"` or `"gs"`.
    pub fn pixel_op(self, key: &str) -> Self {
        self.scalar_op(ScalarOp::from_key(key))
    }

    pub fn compression(mut self, compression: PngCompression) -> Self {
        self.compression = Some(compression);
        self
    }

    pub fn filter(mut self, filter: PngFilter) -> Self {
        self.filter = Some(filter);
        self
    }

    pub fn validate_dimensions(mut self, validate: bool) -> Self {
        self.validate_dimensions = Some(validate);
        self
    }

    pub fn max_dimension(mut self, max: Option<usize>) -> Self {
        self.max_dimension = Some(max);
        self
    }

    pub fn build(self) -> ConversionConfig {
        let default = ConversionConfig::default();
        ConversionConfig {
            scalar_op: self.scalar_op.unwrap_or(default.scalar_op),
            compression: self.compression.unwrap_or(default.compression),
            filter: self.filter.unwrap_or(default.filter),
            validate_dimensions: self.validate_dimensions.unwrap_or(default.validate_dimensions),
            max_dimension: self.max_dimension.unwrap_or(default.max_dimension),
        }
    }
}
