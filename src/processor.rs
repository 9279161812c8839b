//! Unified patch post-processing pipeline
//!
//! `PatchProcessor` owns the two pipeline stages and runs them in order over
//! a single exclusively-owned image buffer: flood-fill background removal,
//! then exact-size nearest-neighbor resampling. Each invocation is
//! synchronous and shares no state with concurrent invocations, so callers
//! may process images from parallel tasks without coordination.

use crate::{
    config::PatchConfig,
    error::{PatchError, Result},
    resampler::NearestNeighborResampler,
    segmenter::BackgroundSegmenter,
    services::OutputFormatHandler,
    types::{PatchResult, ProcessingMetadata, StageTimings},
};
use image::DynamicImage;
use instant::Instant;
use log::{debug, info};
use tracing::instrument;

/// Patch post-processing pipeline
pub struct PatchProcessor {
    config: PatchConfig,
    segmenter: BackgroundSegmenter,
}

impl PatchProcessor {
    /// Create a processor from a validated configuration
    ///
    /// # Errors
    /// Returns [`PatchError::InvalidConfig`] when the configuration fails
    /// validation.
    pub fn new(config: PatchConfig) -> Result<Self> {
        config.validate()?;
        OutputFormatHandler::validate_for_fabrication(config.output_format);
        let segmenter = BackgroundSegmenter::from_config(&config)?;
        Ok(Self { config, segmenter })
    }

    /// The configuration this processor runs with
    #[must_use]
    pub fn config(&self) -> &PatchConfig {
        &self.config
    }

    /// Decode transport bytes and run the full pipeline
    ///
    /// # Errors
    /// Returns [`PatchError::Image`] for undecodable bytes plus every error
    /// [`Self::process_image`] can produce.
    #[instrument(skip_all, fields(bytes = image_bytes.len()))]
    pub fn process_bytes(&self, image_bytes: &[u8]) -> Result<PatchResult> {
        let decode_start = Instant::now();
        let image = image::load_from_memory(image_bytes)?;
        let decode_ms = decode_start.elapsed().as_millis() as u64;
        debug!("decoded {} input bytes in {}ms", image_bytes.len(), decode_ms);

        let mut result = self.process_image(&image)?;
        result.metadata.timings.decode_ms = Some(decode_ms);
        result.metadata.timings.total_ms += decode_ms;
        Ok(result)
    }

    /// Run segmentation and resampling over an already-decoded image
    ///
    /// The input is normalized to RGBA8 first, so any color mode is
    /// accepted; sources without an alpha channel become fully opaque before
    /// segmentation.
    ///
    /// # Errors
    /// - [`PatchError::EmptyImage`] for a zero-area input
    /// - [`PatchError::Processing`] when a stage fails internally
    #[instrument(skip_all, fields(width = image.width(), height = image.height()))]
    pub fn process_image(&self, image: &DynamicImage) -> Result<PatchResult> {
        let total_start = Instant::now();

        let (width, height) = (image.width(), image.height());
        if width == 0 || height == 0 {
            return Err(PatchError::empty_image(width, height));
        }

        // Normalize to 4-channel RGBA; segmentation reads and writes alpha.
        let mut rgba = image.to_rgba8();

        let segment_start = Instant::now();
        let report = self.segmenter.segment(&mut rgba)?;
        let segmentation_ms = segment_start.elapsed().as_millis() as u64;
        debug!(
            "segmentation cleared {} of {} visited pixels in {}ms (reference RGB{:?})",
            report.pixels_cleared, report.pixels_visited, segmentation_ms, report.background_color
        );

        let resample_start = Instant::now();
        let resized = NearestNeighborResampler::resize_to_target(&rgba, self.config.target)?;
        let resampling_ms = resample_start.elapsed().as_millis() as u64;

        let mut metadata = ProcessingMetadata::new(
            self.config.tolerance,
            self.config.target.to_string(),
            OutputFormatHandler::get_extension(self.config.output_format).to_string(),
        );
        metadata.timings = StageTimings {
            decode_ms: None,
            segmentation_ms,
            resampling_ms,
            total_ms: total_start.elapsed().as_millis() as u64,
        };

        if self.config.debug {
            debug!("metadata: {}", metadata.to_json()?);
        }

        info!(
            "processed {}x{} -> {} in {}ms",
            width, height, self.config.target, metadata.timings.total_ms
        );

        Ok(PatchResult::new(resized, (width, height), report, metadata))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::TargetSize;
    use image::{Rgba, RgbaImage};

    fn bordered_image(width: u32, height: u32) -> DynamicImage {
        // Background border around a solid subject block.
        let mut image = RgbaImage::from_pixel(width, height, Rgba([10, 10, 10, 255]));
        for x in 1..width - 1 {
            for y in 1..height - 1 {
                image.put_pixel(x, y, Rgba([200, 50, 50, 255]));
            }
        }
        DynamicImage::ImageRgba8(image)
    }

    #[test]
    fn test_pipeline_produces_target_dimensions() {
        let config = PatchConfig::builder()
            .target(TargetSize::new(8, 8).unwrap())
            .build()
            .unwrap();
        let processor = PatchProcessor::new(config).unwrap();

        let result = processor.process_image(&bordered_image(4, 4)).unwrap();
        assert_eq!(result.dimensions(), (8, 8));
        assert_eq!(result.original_dimensions, (4, 4));
        assert_eq!(result.report.pixels_cleared, 12);
    }

    #[test]
    fn test_rgb_input_is_normalized_to_rgba() {
        // An RGB source has no alpha channel; normalization must make it
        // opaque so segmentation can introduce transparency.
        let rgb = image::RgbImage::from_pixel(4, 4, image::Rgb([10, 10, 10]));
        let config = PatchConfig::builder()
            .target(TargetSize::new(4, 4).unwrap())
            .build()
            .unwrap();
        let processor = PatchProcessor::new(config).unwrap();

        let result = processor
            .process_image(&DynamicImage::ImageRgb8(rgb))
            .unwrap();
        assert!(result.image.pixels().all(|p| *p == Rgba([255, 255, 255, 0])));
    }

    #[test]
    fn test_empty_image_rejected() {
        let processor = PatchProcessor::new(PatchConfig::default()).unwrap();
        let empty = DynamicImage::ImageRgba8(RgbaImage::new(0, 0));
        assert!(matches!(
            processor.process_image(&empty),
            Err(PatchError::EmptyImage { .. })
        ));
    }

    #[test]
    fn test_process_bytes_records_decode_timing() {
        let mut png = Vec::new();
        bordered_image(4, 4)
            .write_to(&mut std::io::Cursor::new(&mut png), image::ImageFormat::Png)
            .unwrap();

        let config = PatchConfig::builder()
            .target(TargetSize::new(4, 4).unwrap())
            .build()
            .unwrap();
        let processor = PatchProcessor::new(config).unwrap();

        let result = processor.process_bytes(&png).unwrap();
        assert!(result.metadata.timings.decode_ms.is_some());
        assert_eq!(result.dimensions(), (4, 4));
    }

    #[test]
    fn test_process_bytes_rejects_garbage() {
        let processor = PatchProcessor::new(PatchConfig::default()).unwrap();
        assert!(matches!(
            processor.process_bytes(b"not an image"),
            Err(PatchError::Image(_))
        ));
    }

    #[test]
    fn test_invalid_config_rejected_at_construction() {
        let config = PatchConfig {
            tolerance: -5.0,
            ..PatchConfig::default()
        };
        assert!(matches!(
            PatchProcessor::new(config),
            Err(PatchError::InvalidConfig(_))
        ));
    }
}
