//! Corner-seeded flood-fill background segmentation
//!
//! The segmenter samples the four corner pixels, averages them into a single
//! background reference color, then flood-fills every pixel transitively
//! connected to a corner whose color sits within the configured tolerance of
//! that reference. Matched pixels become transparent white (255,255,255,0);
//! everything else is left byte-for-byte untouched. The fill is bounded by
//! connectivity and color similarity, not a global color key, which is why a
//! white garment adjacent to a white background survives.
//!
//! Visited tracking uses a separate bitmap rather than reusing alpha==0 as an
//! implicit marker. Pixels that are already transparent in the source are
//! marked visited and skipped without being rewritten, and the fill does not
//! propagate through them. A legitimately transparent interior region can
//! therefore block the fill from reaching background-colored pixels behind
//! it; this propagation-blocking behavior is inherited from the original
//! service and is preserved as-is.

use crate::{
    config::{Connectivity, PatchConfig, DEFAULT_TOLERANCE},
    error::{PatchError, Result},
    utils::{color_distance, corner_average_color},
};
use image::{Rgba, RgbaImage};
use log::debug;
use serde::{Deserialize, Serialize};

/// The value written over every background pixel: transparent white
const CLEARED_PIXEL: Rgba<u8> = Rgba([255, 255, 255, 0]);

/// Statistics from a segmentation pass
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SegmentationReport {
    /// Background reference color sampled from the four corners (RGB)
    pub background_color: [u8; 3],

    /// Number of pixels popped off the work stack and evaluated
    pub pixels_visited: usize,

    /// Number of pixels rewritten to transparent white
    pub pixels_cleared: usize,
}

/// Flood-fill background segmenter
///
/// Tolerance and connectivity are fixed per instance; the defaults
/// (tolerance 25.0, 4-connectivity) reproduce the behavior of the original
/// fabrication service.
#[derive(Debug, Clone)]
pub struct BackgroundSegmenter {
    tolerance: f64,
    connectivity: Connectivity,
}

impl Default for BackgroundSegmenter {
    fn default() -> Self {
        Self {
            tolerance: DEFAULT_TOLERANCE,
            connectivity: Connectivity::Four,
        }
    }
}

impl BackgroundSegmenter {
    /// Create a segmenter with explicit parameters
    ///
    /// # Errors
    /// Returns [`PatchError::InvalidConfig`] for a non-finite or negative
    /// tolerance.
    pub fn new(tolerance: f64, connectivity: Connectivity) -> Result<Self> {
        if !tolerance.is_finite() || tolerance < 0.0 {
            return Err(PatchError::config_value_error(
                "tolerance",
                tolerance,
                "0.0-441.67",
                Some(DEFAULT_TOLERANCE),
            ));
        }
        Ok(Self {
            tolerance,
            connectivity,
        })
    }

    /// Create a segmenter from a pipeline configuration
    ///
    /// # Errors
    /// Returns [`PatchError::InvalidConfig`] when the configured tolerance is
    /// out of range.
    pub fn from_config(config: &PatchConfig) -> Result<Self> {
        Self::new(config.tolerance, config.connectivity)
    }

    /// The color-distance tolerance this segmenter fills with
    #[must_use]
    pub fn tolerance(&self) -> f64 {
        self.tolerance
    }

    /// Remove the background from `image` in place
    ///
    /// Every pixel reachable from a corner via connected background-colored
    /// paths is rewritten to (255,255,255,0). All other pixels, including
    /// their RGB channels, are left unchanged. Each pixel is evaluated at
    /// most once, so the pass runs in time proportional to the image area.
    ///
    /// # Errors
    /// Returns [`PatchError::EmptyImage`] when the image has zero width or
    /// height; corner sampling is undefined on an empty grid.
    pub fn segment(&self, image: &mut RgbaImage) -> Result<SegmentationReport> {
        let (width, height) = image.dimensions();
        if width == 0 || height == 0 {
            return Err(PatchError::empty_image(width, height));
        }

        let reference = corner_average_color(image);
        debug!(
            "segmenting {}x{} image, background reference RGB{:?}, tolerance {}",
            width, height, reference, self.tolerance
        );

        let (w, h) = (i64::from(width), i64::from(height));
        let mut visited = vec![false; width as usize * height as usize];
        let mut stack: Vec<(i64, i64)> = vec![(0, 0), (w - 1, 0), (0, h - 1), (w - 1, h - 1)];

        let mut pixels_visited = 0usize;
        let mut pixels_cleared = 0usize;

        while let Some((x, y)) = stack.pop() {
            if x < 0 || y < 0 || x >= w || y >= h {
                continue;
            }

            #[allow(clippy::indexing_slicing)] // index bounded by the checks above
            let seen = &mut visited[y as usize * width as usize + x as usize];
            if *seen {
                continue;
            }
            *seen = true;
            pixels_visited += 1;

            let pixel = *image.get_pixel(x as u32, y as u32);

            // Already transparent in the source: visited but never rewritten,
            // and the fill does not continue through it.
            if pixel[3] == 0 {
                continue;
            }

            if color_distance([pixel[0], pixel[1], pixel[2]], reference) <= self.tolerance {
                image.put_pixel(x as u32, y as u32, CLEARED_PIXEL);
                pixels_cleared += 1;
                for &(dx, dy) in self.connectivity.offsets() {
                    stack.push((x + dx, y + dy));
                }
            }
            // Out-of-tolerance pixels stay untouched and bound the fill.
        }

        debug!(
            "background removed: {} pixels cleared, {} visited",
            pixels_cleared, pixels_visited
        );

        Ok(SegmentationReport {
            background_color: reference,
            pixels_visited,
            pixels_cleared,
        })
    }
}
