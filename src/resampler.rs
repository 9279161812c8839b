//! Exact-size nearest-neighbor resampling
//!
//! Fabrication output needs crisp edges: every destination pixel copies
//! exactly one source pixel, so the hard alpha boundaries produced by the
//! segmenter survive without any semi-transparent fringe. The trade-off is
//! aliasing, which is acceptable for printed patches. Smoothing filters such
//! as `image::imageops::FilterType::Triangle` would blend across the alpha
//! boundary and are deliberately not used here.

use crate::config::TargetSize;
use crate::error::{PatchError, Result};
use image::RgbaImage;
use log::debug;

/// Nearest-neighbor resampler producing an image of exact target dimensions
pub struct NearestNeighborResampler;

impl NearestNeighborResampler {
    /// Resize `image` to exactly `width` x `height`
    ///
    /// Source indices are derived with pixel-center mapping
    /// (`sx = floor((dx + 0.5) * src_w / dst_w)`, computed in integer
    /// arithmetic), so each destination pixel samples the source pixel whose
    /// center is nearest. Integer upscales replicate each source pixel into
    /// an even block (a 2x2 image resized to 4x4 yields four 2x2 blocks).
    /// No aspect-ratio correction is applied; the caller is responsible for
    /// requesting a sane target.
    ///
    /// # Errors
    /// - [`PatchError::InvalidTarget`] when either target dimension is 0,
    ///   before any pixel work is performed
    /// - [`PatchError::EmptyImage`] when the source has zero area
    pub fn resize(image: &RgbaImage, width: u32, height: u32) -> Result<RgbaImage> {
        if width == 0 || height == 0 {
            return Err(PatchError::invalid_target(format!(
                "dimensions must be positive, got {}x{}",
                width, height
            )));
        }

        let (src_width, src_height) = image.dimensions();
        if src_width == 0 || src_height == 0 {
            return Err(PatchError::empty_image(src_width, src_height));
        }

        debug!(
            "resampling {}x{} -> {}x{} (nearest-neighbor)",
            src_width, src_height, width, height
        );

        let output = RgbaImage::from_fn(width, height, |dx, dy| {
            let sx =
                ((u64::from(dx) * 2 + 1) * u64::from(src_width) / (u64::from(width) * 2)) as u32;
            let sy =
                ((u64::from(dy) * 2 + 1) * u64::from(src_height) / (u64::from(height) * 2)) as u32;
            *image.get_pixel(sx, sy)
        });

        Ok(output)
    }

    /// Resize `image` to a validated [`TargetSize`]
    ///
    /// # Errors
    /// Returns [`PatchError::EmptyImage`] when the source has zero area.
    pub fn resize_to_target(image: &RgbaImage, target: TargetSize) -> Result<RgbaImage> {
        Self::resize(image, target.width, target.height)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Rgba;

    fn quad_image() -> RgbaImage {
        // Four distinct quadrant colors in a 2x2 grid.
        let mut image = RgbaImage::new(2, 2);
        image.put_pixel(0, 0, Rgba([255, 0, 0, 255]));
        image.put_pixel(1, 0, Rgba([0, 255, 0, 255]));
        image.put_pixel(0, 1, Rgba([0, 0, 255, 255]));
        image.put_pixel(1, 1, Rgba([255, 255, 255, 0]));
        image
    }

    #[test]
    fn test_upscale_replicates_blocks() {
        let source = quad_image();
        let resized = NearestNeighborResampler::resize(&source, 4, 4).unwrap();

        assert_eq!(resized.dimensions(), (4, 4));
        for dx in 0..4 {
            for dy in 0..4 {
                let expected = source.get_pixel(dx / 2, dy / 2);
                assert_eq!(resized.get_pixel(dx, dy), expected);
            }
        }
    }

    #[test]
    fn test_downscale_picks_single_source_pixels() {
        // 4x4 down to 2x2 with pixel-center mapping samples source indices
        // {1,3} on each axis: floor((0+0.5)*2) = 1, floor((1+0.5)*2) = 3.
        let mut source = RgbaImage::from_pixel(4, 4, Rgba([0, 0, 0, 255]));
        source.put_pixel(1, 1, Rgba([1, 0, 0, 255]));
        source.put_pixel(3, 1, Rgba([2, 0, 0, 255]));
        source.put_pixel(1, 3, Rgba([3, 0, 0, 255]));
        source.put_pixel(3, 3, Rgba([4, 0, 0, 255]));

        let resized = NearestNeighborResampler::resize(&source, 2, 2).unwrap();
        assert_eq!(resized.get_pixel(0, 0)[0], 1);
        assert_eq!(resized.get_pixel(1, 0)[0], 2);
        assert_eq!(resized.get_pixel(0, 1)[0], 3);
        assert_eq!(resized.get_pixel(1, 1)[0], 4);
    }

    #[test]
    fn test_downscale_never_samples_from_cell_floors() {
        // Center-based sampling must skip the top-left pixel of each 2x2
        // source cell on an even downscale; only the cell centers survive.
        let mut source = RgbaImage::from_pixel(4, 4, Rgba([0, 0, 0, 255]));
        source.put_pixel(0, 0, Rgba([99, 0, 0, 255]));
        source.put_pixel(2, 0, Rgba([99, 0, 0, 255]));
        source.put_pixel(0, 2, Rgba([99, 0, 0, 255]));
        source.put_pixel(2, 2, Rgba([99, 0, 0, 255]));

        let resized = NearestNeighborResampler::resize(&source, 2, 2).unwrap();
        for pixel in resized.pixels() {
            assert_eq!(pixel[0], 0);
        }
    }

    #[test]
    fn test_output_dimensions_always_exact() {
        let source = RgbaImage::from_pixel(3, 5, Rgba([9, 9, 9, 255]));
        for &(w, h) in &[(1, 1), (2, 7), (10, 3), (3, 5), (17, 1)] {
            let resized = NearestNeighborResampler::resize(&source, w, h).unwrap();
            assert_eq!(resized.dimensions(), (w, h));
        }
    }

    #[test]
    fn test_no_new_colors_introduced() {
        // Nearest-neighbor copies pixels verbatim, so an image with only two
        // distinct RGBA values can never produce a third (no blended fringe).
        let mut source = RgbaImage::from_pixel(3, 3, Rgba([255, 255, 255, 0]));
        source.put_pixel(1, 1, Rgba([200, 50, 50, 255]));

        let resized = NearestNeighborResampler::resize(&source, 7, 5).unwrap();
        for pixel in resized.pixels() {
            assert!(
                *pixel == Rgba([255, 255, 255, 0]) || *pixel == Rgba([200, 50, 50, 255]),
                "unexpected blended pixel {:?}",
                pixel
            );
        }
    }

    #[test]
    fn test_identity_resize_preserves_pixels() {
        let source = quad_image();
        let resized = NearestNeighborResampler::resize(&source, 2, 2).unwrap();
        assert_eq!(resized, source);
    }

    #[test]
    fn test_zero_target_rejected_before_any_work() {
        let source = quad_image();
        let err = NearestNeighborResampler::resize(&source, 0, 5).unwrap_err();
        assert!(matches!(err, PatchError::InvalidTarget(_)));
        assert!(NearestNeighborResampler::resize(&source, 5, 0).is_err());
        // Source untouched by the failed call.
        assert_eq!(source, quad_image());
    }

    #[test]
    fn test_empty_source_rejected() {
        let empty = RgbaImage::new(0, 0);
        let err = NearestNeighborResampler::resize(&empty, 4, 4).unwrap_err();
        assert!(matches!(err, PatchError::EmptyImage { .. }));
    }

    #[test]
    fn test_resize_to_target() {
        let source = quad_image();
        let target = TargetSize::new(6, 6).unwrap();
        let resized = NearestNeighborResampler::resize_to_target(&source, target).unwrap();
        assert_eq!(resized.dimensions(), (6, 6));
    }
}
