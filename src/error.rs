//! Error types for patch post-processing operations

use thiserror::Error;

/// Result type alias for patch post-processing operations
pub type Result<T> = std::result::Result<T, PatchError>;

/// Error types for the patch post-processing pipeline
#[derive(Error, Debug)]
pub enum PatchError {
    /// Input/output errors (file not found, permission denied, etc.)
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Image format or codec errors from the image crate
    #[error("Image processing error: {0}")]
    Image(#[from] image::ImageError),

    /// Source image has zero width or height
    #[error("Empty image: {width}x{height} has no pixels to process")]
    EmptyImage {
        /// Width of the rejected image
        width: u32,
        /// Height of the rejected image
        height: u32,
    },

    /// Target dimensions are malformed or non-positive
    #[error("Invalid target dimensions: {0}")]
    InvalidTarget(String),

    /// Invalid configuration or parameters
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// Pipeline processing errors
    #[error("Processing error: {0}")]
    Processing(String),
}

impl PatchError {
    /// Create a new empty-image error
    #[must_use]
    pub fn empty_image(width: u32, height: u32) -> Self {
        Self::EmptyImage { width, height }
    }

    /// Create a new invalid-target error
    pub fn invalid_target<S: Into<String>>(msg: S) -> Self {
        Self::InvalidTarget(msg.into())
    }

    /// Create a new invalid configuration error
    pub fn invalid_config<S: Into<String>>(msg: S) -> Self {
        Self::InvalidConfig(msg.into())
    }

    /// Create a new processing error
    pub fn processing<S: Into<String>>(msg: S) -> Self {
        Self::Processing(msg.into())
    }

    /// Create a processing error with stage context
    pub fn processing_stage_error(stage: &str, details: &str, input_info: Option<&str>) -> Self {
        let input_context = match input_info {
            Some(info) => format!(" (input: {})", info),
            None => String::new(),
        };

        Self::Processing(format!(
            "Processing failed at stage '{}'{}: {}",
            stage, input_context, details
        ))
    }

    /// Create a configuration error with valid ranges
    pub fn config_value_error<T: std::fmt::Display>(
        parameter: &str,
        value: T,
        valid_range: &str,
        recommended: Option<T>,
    ) -> Self {
        let recommendation = match recommended {
            Some(rec) => format!(" Recommended: {}", rec),
            None => String::new(),
        };

        Self::InvalidConfig(format!(
            "Invalid {}: {} (valid range: {}).{}",
            parameter, value, valid_range, recommendation
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_creation() {
        let err = PatchError::invalid_target("0x512");
        assert!(matches!(err, PatchError::InvalidTarget(_)));

        let err = PatchError::empty_image(0, 480);
        assert!(matches!(err, PatchError::EmptyImage { width: 0, .. }));
    }

    #[test]
    fn test_error_display() {
        let err = PatchError::empty_image(0, 0);
        assert_eq!(err.to_string(), "Empty image: 0x0 has no pixels to process");

        let err = PatchError::invalid_config("tolerance must be finite");
        assert_eq!(
            err.to_string(),
            "Invalid configuration: tolerance must be finite"
        );
    }

    #[test]
    fn test_stage_error_context() {
        let err = PatchError::processing_stage_error(
            "segmentation",
            "corner sampling failed",
            Some("1024x1024 RGBA"),
        );
        let error_string = err.to_string();
        assert!(error_string.contains("segmentation"));
        assert!(error_string.contains("1024x1024 RGBA"));
    }

    #[test]
    fn test_config_value_error() {
        let err = PatchError::config_value_error("JPEG quality", 150, "0-100", Some(90));
        let error_string = err.to_string();
        assert!(error_string.contains("150"));
        assert!(error_string.contains("Recommended: 90"));
    }
}
