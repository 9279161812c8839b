//! Shared utilities for the patch post-processing pipeline

pub mod color;

pub use color::{color_distance, corner_average_color};
