#![allow(clippy::uninlined_format_args)]

//! # fabpatch
//!
//! Post-processing pipeline that turns a generated image into a
//! fabrication-ready patch (e.g. for printing on a 3D printer): the
//! generated background is stripped by a corner-seeded flood fill and the
//! result is resampled to an exact target resolution with a non-blurring
//! nearest-neighbor filter.
//!
//! The pipeline runs two sequential stages over one owned image buffer:
//!
//! 1. **Background segmentation** - a reference color is averaged from the
//!    four corner pixels, then every pixel transitively 4-connected to a
//!    corner and within a Euclidean color-distance tolerance (default 25)
//!    becomes transparent white. Subjects that merely resemble the
//!    background but are not connected to a corner survive.
//! 2. **Nearest-neighbor resampling** - the image is resized to the exact
//!    requested width and height without blending, so the hard alpha
//!    boundaries from stage 1 stay crisp.
//!
//! Upstream concerns (calling the generation provider, HTTP transport,
//! retries, auth) are out of scope; this crate accepts raw bytes, a decoded
//! [`image::DynamicImage`], or an async reader, and hands back a
//! [`PatchResult`] ready to encode.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use fabpatch::{prepare_patch_from_bytes, PatchConfig, TargetSize};
//!
//! # fn example(upload_bytes: Vec<u8>) -> fabpatch::Result<()> {
//! let config = PatchConfig::builder()
//!     .target("512x512".parse::<TargetSize>()?)
//!     .build()?;
//!
//! let result = prepare_patch_from_bytes(&upload_bytes, &config)?;
//! assert_eq!(result.dimensions(), (512, 512));
//! let data_url = result.to_png_data_url()?;
//! # let _ = data_url;
//! # Ok(())
//! # }
//! ```
//!
//! ## Stage access
//!
//! The individual stages are public for callers that manage their own
//! buffers:
//!
//! ```rust
//! use fabpatch::{BackgroundSegmenter, NearestNeighborResampler};
//! use image::{Rgba, RgbaImage};
//!
//! # fn example() -> fabpatch::Result<()> {
//! let mut image = RgbaImage::from_pixel(8, 8, Rgba([10, 10, 10, 255]));
//! let report = BackgroundSegmenter::default().segment(&mut image)?;
//! let resized = NearestNeighborResampler::resize(&image, 4, 4)?;
//! # let _ = (report, resized);
//! # Ok(())
//! # }
//! # example().unwrap();
//! ```

pub mod config;
pub mod error;
pub mod processor;
pub mod resampler;
pub mod segmenter;
pub mod services;
pub mod types;
pub mod utils;

// Internal imports for lib functions
use tokio::io::AsyncRead;

// Public API exports
pub use config::{
    Connectivity, OutputFormat, PatchConfig, PatchConfigBuilder, TargetSize, DEFAULT_TARGET_SIZE,
    DEFAULT_TOLERANCE,
};
pub use error::{PatchError, Result};
pub use processor::PatchProcessor;
pub use resampler::NearestNeighborResampler;
pub use segmenter::{BackgroundSegmenter, SegmentationReport};
pub use services::OutputFormatHandler;
pub use types::{PatchResult, ProcessingMetadata, StageTimings};
pub use utils::{color_distance, corner_average_color};

/// Prepare a patch from encoded image bytes
///
/// Decodes the bytes with the image crate (PNG, JPEG), then runs background
/// segmentation and exact-size resampling per `config`. Suitable for web
/// handlers and other memory-based callers.
///
/// # Errors
/// - [`PatchError::Image`] for undecodable input bytes
/// - [`PatchError::EmptyImage`] for a zero-area image
/// - [`PatchError::InvalidConfig`] for an invalid configuration
pub fn prepare_patch_from_bytes(image_bytes: &[u8], config: &PatchConfig) -> Result<PatchResult> {
    let processor = PatchProcessor::new(config.clone())?;
    processor.process_bytes(image_bytes)
}

/// Prepare a patch from an already-decoded [`image::DynamicImage`]
///
/// The most direct API for in-memory processing; no decoding is performed.
/// Any color mode is accepted and normalized to RGBA internally.
///
/// # Errors
/// - [`PatchError::EmptyImage`] for a zero-area image
/// - [`PatchError::InvalidConfig`] for an invalid configuration
pub fn prepare_patch_from_image(
    image: &image::DynamicImage,
    config: &PatchConfig,
) -> Result<PatchResult> {
    let processor = PatchProcessor::new(config.clone())?;
    processor.process_image(image)
}

/// Prepare a patch from an async reader stream
///
/// Reads the stream to completion, then hands off to
/// [`prepare_patch_from_bytes`]. Useful for network streams and large files
/// arriving over async I/O.
///
/// # Errors
/// - [`PatchError::Processing`] when the stream cannot be read
/// - Every error [`prepare_patch_from_bytes`] can produce
pub async fn prepare_patch_from_reader<R: AsyncRead + Unpin>(
    mut reader: R,
    config: &PatchConfig,
) -> Result<PatchResult> {
    let mut buffer = Vec::new();
    tokio::io::AsyncReadExt::read_to_end(&mut reader, &mut buffer)
        .await
        .map_err(|e| PatchError::processing(format!("Failed to read from stream: {}", e)))?;

    prepare_patch_from_bytes(&buffer, config)
}
