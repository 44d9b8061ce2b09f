use std::io::Write;

use png::{BitDepth, ColorType, Compression, Encoder, FilterType};
use tracing::debug;

use crate::image_pipeline::common::error::{ConversionError, Result};
use crate::image_pipeline::normal::types::NormalMapImage;
use crate::image_pipeline::png::types::{ConversionConfig, PngCompression, PngFilter};
use crate::image_pipeline::png::writer::NormalMapWriter;

/// Writes RGB8 PNGs with the `png` crate. No timestamps or other variable
/// chunks are emitted, so equal images encode to equal bytes.
pub struct StandardPngWriter;

impl NormalMapWriter for StandardPngWriter {
    fn write_png(
        &self,
        image: &NormalMapImage,
        output: &mut dyn Write,
        config: &ConversionConfig,
    ) -> Result<()> {
        debug!("Encoding PNG image: {}x{}", image.width, image.height);

        let width = u32::try_from(image.width)
            .map_err(|_| ConversionError::InvalidDimensions(image.width, image.height))?;
        let height = u32::try_from(image.height)
            .map_err(|_| ConversionError::InvalidDimensions(image.width, image.height))?;

        let compression = match config.compression {
            PngCompression::Fast => Compression::Fast,
            PngCompression::Default => Compression::Default,
            PngCompression::Best => Compression::Best,
        };

        let filter = match config.filter {
            PngFilter::None => FilterType::NoFilter,
            PngFilter::Sub => FilterType::Sub,
            PngFilter::Up => FilterType::Up,
            PngFilter::Avg => FilterType::Avg,
            PngFilter::Paeth => FilterType::Paeth,
        };

        let mut buffer = Vec::new();

        let mut encoder = Encoder::new(&mut buffer, width, height);
        encoder.set_color(ColorType::Rgb);
        encoder.set_depth(BitDepth::Eight);
        encoder.set_compression(compression);
        encoder.set_filter(filter);

        let mut png_writer = encoder
            .write_header()
            .map_err(|e| ConversionError::EncodeError(e.to_string()))?;
        png_writer
            .write_image_data(&image.data)
            .map_err(|e| ConversionError::EncodeError(e.to_string()))?;
        png_writer
            .finish()
            .map_err(|e| ConversionError::EncodeError(e.to_string()))?;

        output.write_all(&buffer)?;

        debug!("PNG encoding complete, {} bytes", buffer.len());
        Ok(())
    }
}
