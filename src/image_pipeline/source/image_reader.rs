//! Source image reader implementation using the image library.
//!
//! Any format the `image` crate has been built with (PNG, JPEG, BMP, GIF,
//! TIFF) is accepted. Alpha and extra bit depth are discarded by converting
//! to 8-bit RGB.

use tracing::debug;

use crate::image_pipeline::common::error::{ConversionError, Result};
use crate::image_pipeline::source::reader::SourceImageReader;
use crate::image_pipeline::source::types::PixelBuffer;

/// Reader that guesses the format from the content and decodes with `image`.
pub struct ImageCrateReader;

impl SourceImageReader for ImageCrateReader {
    /// Decodes an encoded image into an RGB pixel buffer.
    ///
    /// # Examples
    ///
    /// ```no_run
    /// use normify_rs::image_pipeline::{ImageCrateReader, SourceImageReader};
    ///
    /// let bytes = std::fs::read("bricks.jpg").unwrap();
    /// let pixels = ImageCrateReader.read_image(&bytes).unwrap();
    /// ```
    fn read_image(&self, data: &[u8]) -> Result<PixelBuffer> {
        debug!("Decoding source image, {} bytes", data.len());

        let decoded = image::load_from_memory(data)
            .map_err(|e| ConversionError::DecodeError(e.to_string()))?
            .into_rgb8();

        let width = decoded.width() as usize;
        let height = decoded.height() as usize;

        debug!("Decoded image: {}x{}", width, height);

        PixelBuffer::from_rgb_bytes(width, height, decoded.as_raw())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{ImageFormat, Rgb, RgbImage};
    use std::io::Cursor;

    fn encode(image: &RgbImage, format: ImageFormat) -> Vec<u8> {
        let mut bytes = Cursor::new(Vec::new());
        image.write_to(&mut bytes, format).unwrap();
        bytes.into_inner()
    }

    #[test]
    fn decodes_png_to_row_major_pixels() {
        let mut image = RgbImage::new(2, 2);
        image.put_pixel(1, 0, Rgb([10, 20, 30]));
        image.put_pixel(0, 1, Rgb([40, 50, 60]));

        let buffer = ImageCrateReader
            .read_image(&encode(&image, ImageFormat::Png))
            .unwrap();

        assert_eq!(buffer.width(), 2);
        assert_eq!(buffer.height(), 2);
        assert_eq!(
            buffer.pixels(),
            &[[0, 0, 0], [10, 20, 30], [40, 50, 60], [0, 0, 0]]
        );
    }

    #[test]
    fn decodes_bmp() {
        let image = RgbImage::from_pixel(3, 1, Rgb([7, 8, 9]));
        let buffer = ImageCrateReader
            .read_image(&encode(&image, ImageFormat::Bmp))
            .unwrap();
        assert_eq!(buffer.pixels(), &[[7, 8, 9]; 3]);
    }

    #[test]
    fn garbage_is_a_decode_error() {
        let result = ImageCrateReader.read_image(b"definitely not an image");
        assert!(matches!(result, Err(ConversionError::DecodeError(_))));
    }
}
