//! Applying a saved crop to decoded pixels.
//!
//! The decoded image is expected at natural size, i.e. the same pixel grid
//! the crop coordinates are anchored to.
//!
//! # Behavior
//!
//! - Region edges are rounded to whole pixels
//! - Regions extending beyond the image are clamped to its bounds
//! - Minimum output dimension is 1x1 pixels

use super::{DecodedImage, FilterType, RasterError};
use crate::codec::{CropCoordinates, CropRegion};
use crate::geometry::Size;

/// Whole-pixel rectangle inside an image.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PixelRect {
    pub x: u32,
    pub y: u32,
    pub width: u32,
    pub height: u32,
}

/// Round `region` to whole pixels and clamp it to a `width` x `height` image.
pub fn pixel_rect(region: &CropRegion, width: u32, height: u32) -> PixelRect {
    let (x, w) = clamp_span(region.x, region.width, width);
    let (y, h) = clamp_span(region.y, region.height, height);
    PixelRect {
        x,
        y,
        width: w,
        height: h,
    }
}

fn clamp_span(start: f64, len: f64, limit: u32) -> (u32, u32) {
    let start = if start.is_finite() { start } else { 0.0 };
    let len = if len.is_nan() { 0.0 } else { len };
    let limit_f = limit as f64;
    let begin = start.round().clamp(0.0, (limit_f - 1.0).max(0.0));
    let end = (start + len).round().clamp(begin + 1.0, limit_f.max(1.0));
    (begin as u32, (end - begin).max(1.0) as u32)
}

impl PixelRect {
    /// Intersect with a `width` x `height` image, keeping at least 1x1.
    ///
    /// Both dimensions must be non-zero.
    pub fn clamped_to(self, width: u32, height: u32) -> PixelRect {
        let x = self.x.min(width - 1);
        let y = self.y.min(height - 1);
        PixelRect {
            x,
            y,
            width: self.width.min(width - x).max(1),
            height: self.height.min(height - y).max(1),
        }
    }
}

/// Copy `rect` out of `image`, clamping it to the image bounds first.
///
/// # Errors
///
/// `RasterError::BufferMismatch` if the pixel buffer does not match the
/// image dimensions.
pub fn extract_region(image: &DecodedImage, rect: PixelRect) -> Result<DecodedImage, RasterError> {
    image.check_buffer()?;
    let rect = rect.clamped_to(image.width, image.height);

    // Fast path: full image
    if rect.x == 0 && rect.y == 0 && rect.width == image.width && rect.height == image.height {
        return Ok(image.clone());
    }

    let src_stride = image.width as usize * 3;
    let row_len = rect.width as usize * 3;
    let mut output = Vec::with_capacity(row_len * rect.height as usize);

    for y in rect.y..rect.y + rect.height {
        let start = y as usize * src_stride + rect.x as usize * 3;
        output.extend_from_slice(&image.pixels[start..start + row_len]);
    }

    Ok(DecodedImage {
        width: rect.width,
        height: rect.height,
        pixels: output,
    })
}

/// Render the part of `image` visible through a `viewport`-sized crop frame.
///
/// With `output` the region is resampled to that size (typically the crop
/// frame size), otherwise it is returned at natural resolution.
///
/// # Errors
///
/// - `RasterError::Crop` if the coordinates or viewport are invalid
/// - `RasterError::BufferMismatch` if the pixel buffer does not match the image
/// - `RasterError::InvalidOutputSize` for a zero output dimension
pub fn render_crop(
    image: &DecodedImage,
    coordinates: &CropCoordinates,
    viewport: Size,
    output: Option<(u32, u32)>,
    filter: FilterType,
) -> Result<DecodedImage, RasterError> {
    image.check_buffer()?;
    let region = coordinates.region(viewport)?;
    let rect = pixel_rect(&region, image.width, image.height);
    let cropped = extract_region(image, rect)?;

    let Some((out_w, out_h)) = output else {
        return Ok(cropped);
    };
    if out_w == 0 || out_h == 0 {
        return Err(RasterError::InvalidOutputSize(out_w, out_h));
    }
    if cropped.width == out_w && cropped.height == out_h {
        return Ok(cropped);
    }

    let rgb = cropped.to_rgb_image().ok_or(RasterError::BufferMismatch {
        width: cropped.width,
        height: cropped.height,
        expected: cropped.width as usize * cropped.height as usize * 3,
        actual: cropped.pixels.len(),
    })?;
    let resized = image::imageops::resize(&rgb, out_w, out_h, filter.to_image_filter());
    Ok(DecodedImage::from_rgb_image(resized))
}


// ============================================================================
// Property-Based Tests
// ============================================================================
