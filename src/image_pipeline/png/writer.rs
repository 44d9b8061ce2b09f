use std::io::Write;

use crate::image_pipeline::common::error::Result;
use crate::image_pipeline::normal::types::NormalMapImage;
use crate::image_pipeline::png::types::ConversionConfig;

pub trait NormalMapWriter {
    fn write_png(
        &self,
        image: &NormalMapImage,
        output: &mut dyn Write,
        config: &ConversionConfig,
    ) -> Result<()>;
}
