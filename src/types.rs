//! Core types for patch post-processing results

use crate::{
    config::OutputFormat, error::Result, segmenter::SegmentationReport,
    services::OutputFormatHandler,
};
use base64::{engine::general_purpose::STANDARD as BASE64, Engine as _};
use image::{DynamicImage, RgbaImage};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Result of a patch post-processing run
#[derive(Debug, Clone)]
pub struct PatchResult {
    /// The processed image: background removed, resized to the target
    pub image: RgbaImage,

    /// Dimensions of the image before resampling
    pub original_dimensions: (u32, u32),

    /// Statistics from the segmentation pass
    pub report: SegmentationReport,

    /// Processing metadata
    pub metadata: ProcessingMetadata,
}

impl PatchResult {
    /// Create a new patch result
    #[must_use]
    pub fn new(
        image: RgbaImage,
        original_dimensions: (u32, u32),
        report: SegmentationReport,
        metadata: ProcessingMetadata,
    ) -> Self {
        Self {
            image,
            original_dimensions,
            report,
            metadata,
        }
    }

    /// Final image dimensions (always the requested target)
    #[must_use]
    pub fn dimensions(&self) -> (u32, u32) {
        self.image.dimensions()
    }

    /// Get the image as raw RGBA bytes
    #[must_use]
    pub fn to_rgba_bytes(&self) -> Vec<u8> {
        self.image.as_raw().clone()
    }

    /// Get the image as encoded bytes in the specified format
    ///
    /// # Errors
    /// Returns an error when encoding fails.
    pub fn to_bytes(&self, format: OutputFormat, quality: u8) -> Result<Vec<u8>> {
        match format {
            OutputFormat::Png => {
                let mut buffer = Vec::new();
                let mut cursor = std::io::Cursor::new(&mut buffer);
                let converted = OutputFormatHandler::convert_format(self.image.clone(), format)?;
                converted.write_to(&mut cursor, image::ImageFormat::Png)?;
                Ok(buffer)
            },
            OutputFormat::Jpeg => {
                let mut buffer = Vec::new();
                let mut cursor = std::io::Cursor::new(&mut buffer);
                let rgb_image =
                    OutputFormatHandler::convert_format(self.image.clone(), format)?.to_rgb8();
                let mut jpeg_encoder =
                    image::codecs::jpeg::JpegEncoder::new_with_quality(&mut cursor, quality);
                jpeg_encoder.encode_image(&rgb_image)?;
                Ok(buffer)
            },
            OutputFormat::Rgba8 => Ok(self.to_rgba_bytes()),
        }
    }

    /// Encode as a PNG `data:` URL, the transport form the fabrication
    /// frontend consumes
    ///
    /// # Errors
    /// Returns an error when PNG encoding fails.
    pub fn to_png_data_url(&self) -> Result<String> {
        let png_bytes = self.to_bytes(OutputFormat::Png, 100)?;
        Ok(format!(
            "data:image/png;base64,{}",
            BASE64.encode(png_bytes)
        ))
    }

    /// Save the result as PNG with alpha channel
    ///
    /// # Errors
    /// Returns an error when the file cannot be written or encoding fails.
    pub fn save_png<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        DynamicImage::ImageRgba8(self.image.clone())
            .save_with_format(path, image::ImageFormat::Png)?;
        Ok(())
    }

    /// Save in the specified format
    ///
    /// # Errors
    /// Returns an error when the file cannot be written or encoding fails.
    pub fn save<P: AsRef<Path>>(&self, path: P, format: OutputFormat, quality: u8) -> Result<()> {
        let bytes = self.to_bytes(format, quality)?;
        std::fs::write(path, bytes)?;
        Ok(())
    }

    /// Get detailed timing breakdown
    #[must_use]
    pub fn timings(&self) -> &StageTimings {
        &self.metadata.timings
    }

    /// Get timing summary for display
    #[must_use]
    pub fn timing_summary(&self) -> String {
        let t = &self.metadata.timings;
        let mut summary = format!(
            "Total: {}ms | Segment: {}ms | Resample: {}ms",
            t.total_ms, t.segmentation_ms, t.resampling_ms
        );
        if let Some(decode_ms) = t.decode_ms {
            summary.push_str(&format!(" | Decode: {}ms", decode_ms));
        }
        summary
    }
}

/// Timing breakdown across the pipeline stages
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct StageTimings {
    /// Image decoding from transport bytes (absent for pre-decoded inputs)
    pub decode_ms: Option<u64>,

    /// Flood-fill background segmentation
    pub segmentation_ms: u64,

    /// Nearest-neighbor resampling
    pub resampling_ms: u64,

    /// Total end-to-end processing time
    pub total_ms: u64,
}

/// Metadata about a processing run
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProcessingMetadata {
    /// Detailed timing breakdown
    pub timings: StageTimings,

    /// Color-distance tolerance used for segmentation
    pub tolerance: f64,

    /// Requested target size, rendered as `"WxH"`
    pub target: String,

    /// Output format name
    pub output_format: String,
}

impl ProcessingMetadata {
    /// Create new processing metadata
    #[must_use]
    pub fn new(tolerance: f64, target: String, output_format: String) -> Self {
        Self {
            timings: StageTimings::default(),
            tolerance,
            target,
            output_format,
        }
    }

    /// Serialize metadata to a JSON string for debug dumps
    ///
    /// # Errors
    /// Returns an error when serialization fails.
    pub fn to_json(&self) -> Result<String> {
        serde_json::to_string(self)
            .map_err(|e| crate::error::PatchError::processing(format!("metadata dump: {}", e)))
    }
}
