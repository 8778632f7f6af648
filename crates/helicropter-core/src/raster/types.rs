//! Pixel buffer and resampling types for the raster crop path.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::error::CropError;

/// Error types for raster operations.
#[derive(Debug, Error)]
pub enum RasterError {
    /// The pixel buffer does not match the stated dimensions.
    #[error("Pixel buffer is {actual} bytes, expected {expected} for {width}x{height} RGB")]
    BufferMismatch {
        width: u32,
        height: u32,
        expected: usize,
        actual: usize,
    },

    /// Requested output size is zero on some axis.
    #[error("Invalid output size: {0}x{1}")]
    InvalidOutputSize(u32, u32),

    /// Crop coordinates or viewport were rejected by the crop engine.
    #[error(transparent)]
    Crop(#[from] CropError),
}

/// Filter type for resampling a cropped region.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum FilterType {
    /// Nearest neighbor interpolation (fastest, lowest quality).
    Nearest,
    /// Bilinear interpolation (fast, acceptable quality).
    #[default]
    Bilinear,
    /// Lanczos3 interpolation (slower, highest quality).
    Lanczos3,
}

impl FilterType {
    /// Convert to the image crate's FilterType.
    pub fn to_image_filter(self) -> image::imageops::FilterType {
        match self {
            FilterType::Nearest => image::imageops::FilterType::Nearest,
            FilterType::Bilinear => image::imageops::FilterType::Triangle,
            FilterType::Lanczos3 => image::imageops::FilterType::Lanczos3,
        }
    }
}

/// A decoded image with RGB pixel data.
#[derive(Debug, Clone, PartialEq)]
pub struct DecodedImage {
    /// Image width in pixels.
    pub width: u32,
    /// Image height in pixels.
    pub height: u32,
    /// RGB pixel data in row-major order (3 bytes per pixel).
    pub pixels: Vec<u8>,
}

impl DecodedImage {
    /// Wrap an RGB buffer, checking its length against the dimensions.
    pub fn new(width: u32, height: u32, pixels: Vec<u8>) -> Result<Self, RasterError> {
        let image = Self {
            width,
            height,
            pixels,
        };
        image.check_buffer()?;
        Ok(image)
    }

    /// Check that the buffer holds exactly `width * height` RGB pixels and
    /// that neither dimension is zero.
    pub fn check_buffer(&self) -> Result<(), RasterError> {
        let expected = self.width as usize * self.height as usize * 3;
        if self.pixels.len() != expected || self.width == 0 || self.height == 0 {
            return Err(RasterError::BufferMismatch {
                width: self.width,
                height: self.height,
                expected,
                actual: self.pixels.len(),
            });
        }
        Ok(())
    }

    pub fn from_rgb_image(img: image::RgbImage) -> Self {
        let (width, height) = img.dimensions();
        Self {
            width,
            height,
            pixels: img.into_raw(),
        }
    }

    pub fn to_rgb_image(&self) -> Option<image::RgbImage> {
        image::RgbImage::from_raw(self.width, self.height, self.pixels.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_filter_type_conversion() {
        assert!(matches!(
            FilterType::Nearest.to_image_filter(),
            image::imageops::FilterType::Nearest
        ));
        assert!(matches!(
            FilterType::Bilinear.to_image_filter(),
            image::imageops::FilterType::Triangle
        ));
        assert!(matches!(
            FilterType::Lanczos3.to_image_filter(),
            image::imageops::FilterType::Lanczos3
        ));
    }

    #[test]
    fn test_decoded_image_checks_buffer() {
        assert!(DecodedImage::new(4, 2, vec![0u8; 24]).is_ok());
        let err = DecodedImage::new(4, 2, vec![0u8; 23]).unwrap_err();
        assert_eq!(
            err.to_string(),
            "Pixel buffer is 23 bytes, expected 24 for 4x2 RGB"
        );
        assert!(DecodedImage::new(0, 0, vec![]).is_err());
    }

    #[test]
    fn test_rgb_image_round_trip() {
        let img = DecodedImage::new(3, 1, vec![1, 2, 3, 4, 5, 6, 7, 8, 9]).unwrap();
        let rgb = img.to_rgb_image().unwrap();
        assert_eq!(DecodedImage::from_rgb_image(rgb), img);
    }
}
