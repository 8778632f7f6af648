//! Error types for the crop engine.

use thiserror::Error;

/// Errors reported by the bounds solver, surfaces, codec and cropper.
///
/// None of these leave a surface half-updated: every operation validates its
/// inputs before touching state.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum CropError {
    /// The operation needs state the surface does not currently have
    /// (usually: no image is loaded).
    #[error("Invalid state: {0}")]
    InvalidState(String),

    /// A natural image size or viewport size is zero, negative or non-finite.
    #[error("Invalid {what} dimensions: {width}x{height}")]
    InvalidDimension {
        what: &'static str,
        width: f64,
        height: f64,
    },

    /// A scale, offset or delta is non-finite, or a scale is not positive.
    #[error("Invalid {name}: {value}")]
    InvalidValue { name: &'static str, value: f64 },

    /// A widget option is inconsistent with the others.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
}

impl CropError {
    pub(crate) fn no_image(operation: &str) -> Self {
        CropError::InvalidState(format!("{operation} requires a loaded image"))
    }
}

/// Result alias used throughout the crate.
pub type Result<T> = std::result::Result<T, CropError>;
