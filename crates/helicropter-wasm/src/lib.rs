//! Helicropter WASM - WebAssembly bindings for the crop engine
//!
//! This crate exposes helicropter-core to the JavaScript widget glue.
//!
//! # Module Structure
//!
//! - `cropper` - `JsCropper`, the engine for one widget instance, plus events
//! - `raster` - Rendering a saved crop from decoded pixels
//! - `types` - WASM-compatible wrapper types and serde helpers
//!
//! # Usage
//!
//! ```typescript
//! import init, { JsCropper } from '@helicropter/wasm';
//!
//! await init();
//! const cropper = new JsCropper({ showRatioLock: true });
//! cropper.on('scaling', (t) => slider.value = t.scale);
//! ```

use wasm_bindgen::prelude::*;

mod cropper;
mod raster;
mod types;

pub use cropper::{JsCropper, EVENT_NAMES};
pub use raster::render_crop;
pub use types::JsDecodedImage;

/// Initialize the WASM module (called automatically on load)
#[wasm_bindgen(start)]
pub fn init() {
    // Future: Set up panic hook for better error messages in browser console
    // when console_error_panic_hook feature is added
}

/// Get the version of the WASM module
#[wasm_bindgen]
pub fn version() -> String {
    env!("CARGO_PKG_VERSION").to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version() {
        assert!(!version().is_empty());
    }
}
