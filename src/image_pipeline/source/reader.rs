use crate::image_pipeline::common::error::Result;
use crate::image_pipeline::source::types::PixelBuffer;

pub trait SourceImageReader {
    fn read_image(&self, data: &[u8]) -> Result<PixelBuffer>;
}
