use std::io::Write;
use std::path::Path;

use tracing::{info, instrument};

use crate::image_pipeline::{
    common::error::{ConversionError, Result},
    common::timing::{PipelineTimings, Timer},
    normal::{NoProgress, NormalMapSynthesizer, ProgressObserver},
    png::{ConversionConfig, NormalMapWriter, StandardPngWriter},
    source::{ImageCrateReader, SourceImageReader},
};

/// Outcome of one successful conversion.
#[derive(Debug, Clone)]
pub struct ConversionReport {
    pub width: usize,
    pub height: usize,
    pub timings: PipelineTimings,
}

pub struct ImageToNormalPipeline<R: SourceImageReader, W: NormalMapWriter> {
    reader: R,
    writer: W,
    config: ConversionConfig,
}

impl ImageToNormalPipeline<ImageCrateReader, StandardPngWriter> {
    pub fn new(config: ConversionConfig) -> Self {
        Self {
            reader: ImageCrateReader,
            writer: StandardPngWriter,
            config,
        }
    }
}

impl<R: SourceImageReader, W: NormalMapWriter> ImageToNormalPipeline<R, W> {
    pub fn with_custom(reader: R, writer: W, config: ConversionConfig) -> Self {
        Self {
            reader,
            writer,
            config,
        }
    }

    fn validate_dimensions(&self, width: usize, height: usize) -> Result<()> {
        if !self.config.validate_dimensions {
            return Ok(());
        }

        if width == 0 || height == 0 {
            return Err(ConversionError::InvalidDimensions(width, height));
        }

        if let Some(max) = self.config.max_dimension {
            if width > max || height > max {
                return Err(ConversionError::InvalidDimensions(width, height));
            }
        }

        Ok(())
    }

    pub fn convert(&self, input_data: &[u8], output: &mut dyn Write) -> Result<ConversionReport> {
        self.convert_with_progress(input_data, output, &mut NoProgress)
    }

    #[instrument(skip(self, input_data, output, progress), fields(input_size = input_data.len()))]
    pub fn convert_with_progress(
        &self,
        input_data: &[u8],
        output: &mut dyn Write,
        progress: &mut dyn ProgressObserver,
    ) -> Result<ConversionReport> {
        info!(op = %self.config.scalar_op, "Starting normal map conversion");
        let mut timings = PipelineTimings::new();

        let source = {
            let _span = tracing::info_span!("decode_source").entered();
            let timer = Timer::start("decode_source");
            let source = self.reader.read_image(input_data)?;
            timings.record(timer);
            source
        };

        {
            let _span = tracing::info_span!("validate_dimensions",
                width = source.width(),
                height = source.height()
            ).entered();
            self.validate_dimensions(source.width(), source.height())?;
        }

        let normal_map = {
            let _span = tracing::info_span!("synthesize_normals").entered();
            let timer = Timer::start("synthesize_normals");
            let normal_map = NormalMapSynthesizer::new(self.config.scalar_op)
                .synthesize_with_progress(&source, progress)?;
            timings.record(timer);
            normal_map
        };

        {
            let _span = tracing::info_span!("encode_png").entered();
            let timer = Timer::start("encode_png");
            self.writer.write_png(&normal_map, output, &self.config)?;
            timings.record(timer);
        }

        info!(
            width = normal_map.width,
            height = normal_map.height,
            "Conversion complete"
        );
        Ok(ConversionReport {
            width: normal_map.width,
            height: normal_map.height,
            timings,
        })
    }

    pub fn convert_file<P: AsRef<Path>, Q: AsRef<Path>>(
        &self,
        input_path: P,
        output_path: Q,
    ) -> Result<ConversionReport> {
        self.convert_file_with_progress(input_path, output_path, &mut NoProgress)
    }

    /// Reads `input_path`, converts it and writes the PNG to `output_path`.
    ///
    /// The output is only created once the input has been read, so a missing
    /// input never leaves an empty output file behind.
    #[instrument(skip(self, input_path, output_path, progress))]
    pub fn convert_file_with_progress<P: AsRef<Path>, Q: AsRef<Path>>(
        &self,
        input_path: P,
        output_path: Q,
        progress: &mut dyn ProgressObserver,
    ) -> Result<ConversionReport> {
        let input_path = input_path.as_ref();
        let output_path = output_path.as_ref();

        info!(
            input = %input_path.display(),
            output = %output_path.display(),
            "Converting file"
        );

        let input_data = {
            let _span = tracing::info_span!("read_input_file").entered();
            std::fs::read(input_path).map_err(|e| {
                ConversionError::InputReadError(format!("{}: {}", input_path.display(), e))
            })?
        };

        // Encode in memory first: with -w the output may be the input itself.
        let mut encoded = Vec::new();
        let report = self.convert_with_progress(&input_data, &mut encoded, progress)?;

        {
            let _span = tracing::info_span!("write_output_file").entered();
            let mut output_file = std::fs::File::create(output_path).map_err(|e| {
                ConversionError::OutputWriteError(format!("{}: {}", output_path.display(), e))
            })?;
            output_file.write_all(&encoded).map_err(|e| {
                ConversionError::OutputWriteError(format!("{}: {}", output_path.display(), e))
            })?;
        }

        Ok(report)
    }

    pub fn config(&self) -> &ConversionConfig {
        &self.config
    }

    pub fn set_config(&mut self, config: ConversionConfig) {
        self.config = config;
    }
}
