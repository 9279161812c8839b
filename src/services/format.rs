//! Output format handling service
//!
//! Separates output format conversion from pipeline logic so encoding
//! decisions stay testable in isolation.

use crate::{config::OutputFormat, error::Result};
use image::{DynamicImage, ImageBuffer, RgbaImage};

/// Service for handling output format conversions
pub struct OutputFormatHandler;

impl OutputFormatHandler {
    /// Convert an RGBA image to the specified output format
    ///
    /// # Errors
    /// Currently infallible; the `Result` return keeps the seam uniform with
    /// the encoders that can fail.
    pub fn convert_format(rgba_image: RgbaImage, format: OutputFormat) -> Result<DynamicImage> {
        match format {
            OutputFormat::Png | OutputFormat::Rgba8 => Ok(DynamicImage::ImageRgba8(rgba_image)),
            OutputFormat::Jpeg => {
                // Drop the alpha channel; JPEG cannot carry transparency.
                let (width, height) = rgba_image.dimensions();
                let mut rgb_image = ImageBuffer::new(width, height);

                for (x, y, pixel) in rgba_image.enumerate_pixels() {
                    rgb_image.put_pixel(x, y, image::Rgb([pixel[0], pixel[1], pixel[2]]));
                }

                Ok(DynamicImage::ImageRgb8(rgb_image))
            },
        }
    }

    /// Get the appropriate file extension for a given output format
    #[must_use]
    pub fn get_extension(format: OutputFormat) -> &'static str {
        match format {
            OutputFormat::Png => "png",
            OutputFormat::Jpeg => "jpg",
            OutputFormat::Rgba8 => "raw",
        }
    }

    /// Check if a format supports transparency (alpha channel)
    #[must_use]
    pub fn supports_transparency(format: OutputFormat) -> bool {
        match format {
            OutputFormat::Png | OutputFormat::Rgba8 => true,
            OutputFormat::Jpeg => false,
        }
    }

    /// Warn when a format is a poor fit for background-removed patches
    ///
    /// The whole point of segmentation is the transparent background; a
    /// format without alpha silently flattens it.
    pub fn validate_for_fabrication(format: OutputFormat) {
        if !Self::supports_transparency(format) {
            log::warn!(
                "Output format {:?} does not support transparency; the removed background will reappear as a solid color",
                format
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Rgba;

    #[test]
    fn test_png_keeps_alpha() {
        let rgba = RgbaImage::from_pixel(2, 2, Rgba([255, 255, 255, 0]));
        let converted = OutputFormatHandler::convert_format(rgba, OutputFormat::Png).unwrap();
        assert!(matches!(converted, DynamicImage::ImageRgba8(_)));
    }

    #[test]
    fn test_jpeg_drops_alpha() {
        let rgba = RgbaImage::from_pixel(2, 2, Rgba([10, 20, 30, 0]));
        let converted = OutputFormatHandler::convert_format(rgba, OutputFormat::Jpeg).unwrap();
        match converted {
            DynamicImage::ImageRgb8(rgb) => {
                assert_eq!(*rgb.get_pixel(0, 0), image::Rgb([10, 20, 30]));
            },
            other => panic!("expected RGB8, got {:?}", other.color()),
        }
    }

    #[test]
    fn test_extensions() {
        assert_eq!(OutputFormatHandler::get_extension(OutputFormat::Png), "png");
        assert_eq!(OutputFormatHandler::get_extension(OutputFormat::Jpeg), "jpg");
        assert_eq!(OutputFormatHandler::get_extension(OutputFormat::Rgba8), "raw");
    }

    #[test]
    fn test_transparency_support() {
        assert!(OutputFormatHandler::supports_transparency(OutputFormat::Png));
        assert!(OutputFormatHandler::supports_transparency(OutputFormat::Rgba8));
        assert!(!OutputFormatHandler::supports_transparency(OutputFormat::Jpeg));
    }
}
