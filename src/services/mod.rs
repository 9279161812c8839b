//! Support services for the patch pipeline

pub mod format;

pub use format::OutputFormatHandler;
