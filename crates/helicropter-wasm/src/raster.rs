//! WASM bindings for rendering a saved crop.
//!
//! Lets the export path turn a crop descriptor back into pixels without a
//! round trip through a canvas.

use crate::types::{js_err, JsDecodedImage};
use helicropter_core::raster::{self, FilterType};
use helicropter_core::{CropCoordinates, Size};
use wasm_bindgen::prelude::*;

/// Pick the resampling filter for an export.
pub(crate) fn filter_for(use_lanczos: bool) -> FilterType {
    if use_lanczos {
        FilterType::Lanczos3
    } else {
        FilterType::Bilinear
    }
}

/// Render the region framed by `coordinates`.
///
/// # Arguments
///
/// * `image` - Source image at natural size
/// * `coordinates` - `{ scale, left, top }` as returned by `crop()`
/// * `frame_width`, `frame_height` - Crop frame size the coordinates were saved with
/// * `output_width`, `output_height` - Optional output size (both or neither)
/// * `use_lanczos` - Use high-quality Lanczos3 filter (slower), otherwise bilinear
///
/// # Example (TypeScript)
///
/// ```typescript
/// const saved = cropper.crop();
/// const out = render_crop(source, saved.coordinates, 320, 250, 320, 250, true);
/// ```
#[wasm_bindgen]
pub fn render_crop(
    image: &JsDecodedImage,
    coordinates: JsValue,
    frame_width: f64,
    frame_height: f64,
    output_width: Option<u32>,
    output_height: Option<u32>,
    use_lanczos: bool,
) -> Result<JsDecodedImage, JsValue> {
    let coordinates: CropCoordinates = serde_wasm_bindgen::from_value(coordinates)
        .map_err(|e| JsValue::from_str(&format!("Invalid coordinates: {}", e)))?;
    let output = match (output_width, output_height) {
        (Some(w), Some(h)) => Some((w, h)),
        (None, None) => None,
        _ => return Err(JsValue::from_str("Output size needs both width and height")),
    };

    let src = image.to_decoded().map_err(js_err)?;
    let result = raster::render_crop(
        &src,
        &coordinates,
        Size::new(frame_width, frame_height),
        output,
        filter_for(use_lanczos),
    )
    .map_err(js_err)?;
    Ok(JsDecodedImage::from_decoded(result))
}
