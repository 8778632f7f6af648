//! Raster crop: re-deriving the pixel crop from a saved descriptor.
//!
//! The crop engine itself never touches pixels. This module is the save-side
//! counterpart: given the natural-size decoded image and the persisted
//! coordinates, it produces exactly the region the user framed.
//!
//! # Example
//!
//! ```ignore
//! use helicropter_core::raster::{render_crop, FilterType};
//!
//! let saved = cropper.crop().unwrap();
//! let frame = cropper.surface().viewport();
//! let out = render_crop(&decoded, &saved.coordinates, frame, Some((320, 250)), FilterType::Lanczos3)?;
//! ```

mod crop;
mod types;

pub use crop::{extract_region, pixel_rect, render_crop, PixelRect};
pub use types::{DecodedImage, FilterType, RasterError};
