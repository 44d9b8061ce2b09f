use tracing::{debug, instrument};

use crate::image_pipeline::common::error::{ConversionError, Result};
use crate::image_pipeline::normal::derivative::{partial_derivatives, surface_normal};
use crate::image_pipeline::normal::scalar::ScalarOp;
use crate::image_pipeline::normal::types::NormalMapImage;
use crate::image_pipeline::normal::vector::Vec3;
use crate::image_pipeline::source::types::PixelBuffer;

/// Notified after each finished column of the output image.
pub trait ProgressObserver {
    fn column_done(&mut self, completed: usize, total: usize);
}

impl<F: FnMut(usize, usize)> ProgressObserver for F {
    fn column_done(&mut self, completed: usize, total: usize) {
        self(completed, total)
    }
}

/// Observer that ignores progress.
pub struct NoProgress;

impl ProgressObserver for NoProgress {
    fn column_done(&mut self, _completed: usize, _total: usize) {}
}

/// Maps a unit normal to an output pixel.
///
/// Each component goes from [-1, 1] to [0, 255] by `(c + 1) * 127.5`,
/// truncated. Channels are written as R = x, G = z, B = y.
pub fn encode_normal(normal: Vec3) -> [u8; 3] {
    [
        encode_component(normal.x),
        encode_component(normal.z),
        encode_component(normal.y),
    ]
}

fn encode_component(c: f64) -> u8 {
    ((c + 1.0) * 127.5) as u8
}

/// Turns a pixel buffer into a normal map under a fixed scalar policy.
#[derive(Debug, Clone, Copy, Default)]
pub struct NormalMapSynthesizer {
    op: ScalarOp,
}

impl NormalMapSynthesizer {
    pub fn new(op: ScalarOp) -> Self {
        Self { op }
    }

    pub fn op(&self) -> ScalarOp {
        self.op
    }

    pub fn synthesize(&self, source: &PixelBuffer) -> Result<NormalMapImage> {
        self.synthesize_with_progress(source, &mut NoProgress)
    }

    /// Visits columns outermost, calling `progress` once per finished column.
    #[instrument(skip_all, fields(op = %self.op, width = source.width(), height = source.height()))]
    pub fn synthesize_with_progress(
        &self,
        source: &PixelBuffer,
        progress: &mut dyn ProgressObserver,
    ) -> Result<NormalMapImage> {
        let (width, height) = (source.width(), source.height());
        if source.is_empty() {
            return Err(ConversionError::InvalidDimensions(width, height));
        }

        let op = self.op.as_fn();
        let mut output = NormalMapImage::new(width, height);

        for u in 0..width {
            for v in 0..height {
                let normal = surface_normal(partial_derivatives(source, u, v, op));
                output.set_pixel(u, v, encode_normal(normal));
            }
            progress.column_done(u + 1, width);
        }

        debug!("Synthesized {} normals", width * height);
        Ok(output)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const WHITE: [u8; 3] = [255, 255, 255];
    const BLACK: [u8; 3] = [0, 0, 0];
    const FLAT: [u8; 3] = [127, 127, 255];

    #[test]
    fn encodes_with_swapped_y_and_z() {
        assert_eq!(encode_normal(Vec3::new(0.0, 1.0, 0.0)), [127, 127, 255]);
        assert_eq!(encode_normal(Vec3::new(0.0, 0.0, 1.0)), [127, 255, 127]);
        assert_eq!(encode_normal(Vec3::new(-1.0, 0.0, 0.0)), [0, 127, 127]);
        assert_eq!(encode_normal(Vec3::new(1.0, 0.0, 0.0)), [255, 127, 127]);
    }

    #[test]
    fn flat_white_image_is_uniform() {
        let source = PixelBuffer::filled(4, 4, WHITE);
        let map = NormalMapSynthesizer::new(ScalarOp::Luminance)
            .synthesize(&source)
            .unwrap();
        assert_eq!((map.width, map.height), (4, 4));
        assert!(map.pixels().all(|p| p == FLAT));
    }

    #[test]
    fn every_policy_sees_a_flat_color_as_flat() {
        let source = PixelBuffer::filled(3, 2, [12, 200, 77]);
        for op in ScalarOp::ALL {
            let map = NormalMapSynthesizer::new(op).synthesize(&source).unwrap();
            assert!(map.pixels().all(|p| p == FLAT), "{op}");
        }
    }

    #[test]
    fn horizontal_gradient_wraps_at_both_columns() {
        let source = PixelBuffer::new(2, 1, vec![BLACK, WHITE]).unwrap();
        let map = NormalMapSynthesizer::default().synthesize(&source).unwrap();
        // Left column: 0 - 255 against the wrapped right edge.
        assert_eq!(map.pixel(0, 0), [246, 127, 174]);
        assert_eq!(map.pixel(1, 0), [8, 127, 174]);
    }

    #[test]
    fn checkerboard_is_deterministic() {
        let source = PixelBuffer::new(2, 2, vec![BLACK, WHITE, WHITE, BLACK]).unwrap();
        let synthesizer = NormalMapSynthesizer::new(ScalarOp::Luminance);
        let first = synthesizer.synthesize(&source).unwrap();
        let second = synthesizer.synthesize(&source).unwrap();

        assert_eq!(first, second);
        assert_eq!(first.pixel(0, 0), [214, 214, 161]);
        assert_eq!(first.pixel(1, 0), [40, 40, 161]);
        assert_eq!(first.pixel(0, 1), [40, 40, 161]);
        assert_eq!(first.pixel(1, 1), [214, 214, 161]);
    }

    #[test]
    fn unknown_policy_matches_luminance() {
        let source = PixelBuffer::new(
            3,
            2,
            vec![[10, 90, 200], [0, 0, 0], [255, 3, 9], [1, 2, 3], [77, 77, 0], [250, 250, 250]],
        )
        .unwrap();
        let fallback = NormalMapSynthesizer::new(ScalarOp::from_key("foo"))
            .synthesize(&source)
            .unwrap();
        let explicit = NormalMapSynthesizer::new(ScalarOp::from_key("luminance"))
            .synthesize(&source)
            .unwrap();
        assert_eq!(fallback, explicit);
    }

    #[test]
    fn red_policy_ignores_other_channels() {
        let source = PixelBuffer::new(2, 1, vec![[0, 255, 255], [200, 0, 0]]).unwrap();
        let map = NormalMapSynthesizer::new(ScalarOp::Red)
            .synthesize(&source)
            .unwrap();
        assert_eq!(map.pixel(1, 0), [13, 127, 184]);
    }

    #[test]
    fn reports_each_column_in_order() {
        let source = PixelBuffer::filled(5, 2, WHITE);
        let mut seen = Vec::new();
        let mut observer = |done: usize, total: usize| seen.push((done, total));
        NormalMapSynthesizer::default()
            .synthesize_with_progress(&source, &mut observer)
            .unwrap();
        assert_eq!(seen, vec![(1, 5), (2, 5), (3, 5), (4, 5), (5, 5)]);
    }

    #[test]
    fn empty_source_is_rejected() {
        let source = PixelBuffer::new(0, 3, Vec::new()).unwrap();
        let result = NormalMapSynthesizer::default().synthesize(&source);
        assert!(matches!(result, Err(ConversionError::InvalidDimensions(0, 3))));
    }
}
