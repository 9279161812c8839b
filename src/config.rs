//! Configuration types for patch post-processing operations

use crate::error::{PatchError, Result};
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// Default color-distance tolerance for background segmentation (0-255 scale)
pub const DEFAULT_TOLERANCE: f64 = 25.0;

/// Default fabrication target size (ideal for a 5cm TPU/silicone patch)
pub const DEFAULT_TARGET_SIZE: TargetSize = TargetSize {
    width: 512,
    height: 512,
};

/// Exact output dimensions requested by the caller
///
/// Both components are guaranteed positive once constructed; the `"WxH"`
/// string form used by upstream callers is accepted via [`FromStr`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TargetSize {
    /// Output width in pixels
    pub width: u32,
    /// Output height in pixels
    pub height: u32,
}

impl TargetSize {
    /// Create a target size, rejecting zero dimensions
    ///
    /// # Errors
    /// Returns [`PatchError::InvalidTarget`] when either dimension is 0.
    pub fn new(width: u32, height: u32) -> Result<Self> {
        if width == 0 || height == 0 {
            return Err(PatchError::invalid_target(format!(
                "dimensions must be positive, got {}x{}",
                width, height
            )));
        }
        Ok(Self { width, height })
    }

    /// Total pixel count of the target grid
    #[must_use]
    pub fn pixel_count(&self) -> u64 {
        u64::from(self.width) * u64::from(self.height)
    }
}

impl Default for TargetSize {
    fn default() -> Self {
        DEFAULT_TARGET_SIZE
    }
}

impl FromStr for TargetSize {
    type Err = PatchError;

    /// Parse a `"WxH"` string such as `"512x512"`
    fn from_str(s: &str) -> Result<Self> {
        let (width_str, height_str) = s.split_once('x').ok_or_else(|| {
            PatchError::invalid_target(format!("expected WxH form (e.g. 512x512), got '{}'", s))
        })?;

        let width: u32 = width_str.parse().map_err(|_| {
            PatchError::invalid_target(format!("width '{}' is not a valid integer", width_str))
        })?;
        let height: u32 = height_str.parse().map_err(|_| {
            PatchError::invalid_target(format!("height '{}' is not a valid integer", height_str))
        })?;

        Self::new(width, height)
    }
}

impl std::fmt::Display for TargetSize {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}x{}", self.width, self.height)
    }
}

/// Pixel adjacency rule used by the flood fill
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Connectivity {
    /// Edge-sharing neighbors only (up/down/left/right)
    Four,
    /// Edge- and corner-sharing neighbors
    Eight,
}

impl Default for Connectivity {
    fn default() -> Self {
        // The fill must not leak through diagonal single-pixel gaps
        Self::Four
    }
}

impl Connectivity {
    /// Neighbor coordinate offsets for this adjacency rule
    #[must_use]
    pub fn offsets(self) -> &'static [(i64, i64)] {
        match self {
            Self::Four => &[(1, 0), (-1, 0), (0, 1), (0, -1)],
            Self::Eight => &[
                (1, 0),
                (-1, 0),
                (0, 1),
                (0, -1),
                (1, 1),
                (1, -1),
                (-1, 1),
                (-1, -1),
            ],
        }
    }
}

/// Output image format options
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum OutputFormat {
    /// PNG with alpha channel transparency
    Png,
    /// JPEG (no transparency, alpha dropped)
    Jpeg,
    /// Raw RGBA8 pixel data (4 bytes per pixel)
    Rgba8,
}

impl Default for OutputFormat {
    fn default() -> Self {
        Self::Png
    }
}

/// Configuration for the patch post-processing pipeline
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PatchConfig {
    /// Color-distance tolerance for background matching (0-255 scale)
    pub tolerance: f64,

    /// Flood-fill adjacency rule
    pub connectivity: Connectivity,

    /// Exact output dimensions
    pub target: TargetSize,

    /// Output format
    pub output_format: OutputFormat,

    /// JPEG quality (0-100, only used for JPEG output)
    pub jpeg_quality: u8,

    /// Enable debug mode (additional logging and metadata dumps)
    pub debug: bool,
}

impl Default for PatchConfig {
    fn default() -> Self {
        Self {
            tolerance: DEFAULT_TOLERANCE,
            connectivity: Connectivity::default(),
            target: TargetSize::default(),
            output_format: OutputFormat::default(),
            jpeg_quality: 90,
            debug: false,
        }
    }
}

impl PatchConfig {
    /// Create a new configuration builder for fluent API construction
    #[must_use]
    pub fn builder() -> PatchConfigBuilder {
        PatchConfigBuilder::default()
    }

    /// Validate all configuration parameters
    ///
    /// # Errors
    /// - Non-finite or negative tolerance
    /// - JPEG quality above 100
    pub fn validate(&self) -> Result<()> {
        if !self.tolerance.is_finite() || self.tolerance < 0.0 {
            return Err(PatchError::config_value_error(
                "tolerance",
                self.tolerance,
                "0.0-441.67",
                Some(DEFAULT_TOLERANCE),
            ));
        }

        if self.jpeg_quality > 100 {
            return Err(PatchError::config_value_error(
                "JPEG quality",
                self.jpeg_quality,
                "0-100",
                Some(90),
            ));
        }

        Ok(())
    }
}

/// Builder for [`PatchConfig`]
#[derive(Debug, Default)]
pub struct PatchConfigBuilder {
    config: PatchConfig,
}

impl PatchConfigBuilder {
    /// Set the background color-distance tolerance
    #[must_use]
    pub fn tolerance(mut self, tolerance: f64) -> Self {
        self.config.tolerance = tolerance;
        self
    }

    /// Set the flood-fill adjacency rule
    #[must_use]
    pub fn connectivity(mut self, connectivity: Connectivity) -> Self {
        self.config.connectivity = connectivity;
        self
    }

    /// Set the exact output dimensions
    #[must_use]
    pub fn target(mut self, target: TargetSize) -> Self {
        self.config.target = target;
        self
    }

    /// Set the output format
    #[must_use]
    pub fn output_format(mut self, format: OutputFormat) -> Self {
        self.config.output_format = format;
        self
    }

    /// Set JPEG quality
    #[must_use]
    pub fn jpeg_quality(mut self, quality: u8) -> Self {
        self.config.jpeg_quality = quality.min(100);
        self
    }

    /// Enable debug mode
    #[must_use]
    pub fn debug(mut self, debug: bool) -> Self {
        self.config.debug = debug;
        self
    }

    /// Build the configuration, validating all parameters
    ///
    /// # Errors
    /// Returns [`PatchError::InvalidConfig`] when validation fails.
    pub fn build(self) -> Result<PatchConfig> {
        self.config.validate()?;
        Ok(self.config)
    }
}
