//! Cropper WASM bindings.
//!
//! This module exposes the crop engine to the widget glue. Options and crop
//! descriptors are plain JS objects converted via serde_wasm_bindgen, and
//! engine events are delivered to JS callbacks registered with `on`.
//!
//! # Example (TypeScript)
//!
//! ```typescript
//! const cropper = new JsCropper({ cropSize: { width: 320, height: 250 } });
//! cropper.on('moving', (t) => preview.style.transform = `translate(${t.left}px, ${t.top}px)`);
//! cropper.setImage(url, img.naturalWidth, img.naturalHeight);
//! cropper.drag(-10, 0);
//! const saved = cropper.crop(); // { url, coordinates: { scale, left, top } } or undefined
//! ```
//!
//! Callbacks run synchronously inside the call that triggered them and must
//! not call back into the same `JsCropper`.

use crate::types::{from_js_opt, js_err, to_js};
use helicropter_core::{
    CropCoordinates, Cropper, CropperConfig, Point, Size, SubscriptionId, SurfaceEvent,
};
use serde::Serialize;
use wasm_bindgen::prelude::*;

/// Event names accepted by [`JsCropper::on`].
pub const EVENT_NAMES: [&str; 5] = [
    "image-loaded",
    "moving",
    "scaling",
    "viewport-resized",
    "reset",
];

/// Check an event name passed from JS.
pub(crate) fn is_known_event(name: &str) -> bool {
    EVENT_NAMES.contains(&name)
}

/// Scale range for a zoom slider.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub(crate) struct JsScaleBounds {
    pub min: f64,
    pub max: Option<f64>,
}

/// Payload passed to JS for an event, or `None` for `reset`.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub(crate) enum EventPayload {
    Transform(helicropter_core::Transform),
    Size(Size),
}

pub(crate) fn event_payload(event: &SurfaceEvent) -> Option<EventPayload> {
    match event {
        SurfaceEvent::ViewportResized(size) => Some(EventPayload::Size(*size)),
        other => other.transform().map(EventPayload::Transform),
    }
}

fn dispatch(callback: &js_sys::Function, event: &SurfaceEvent) {
    let result = match event_payload(event) {
        Some(payload) => match to_js(&payload) {
            Ok(value) => callback.call1(&JsValue::NULL, &value),
            Err(err) => Err(err),
        },
        None => callback.call0(&JsValue::NULL),
    };
    if let Err(err) = result {
        let label = JsValue::from_str(&format!("{} listener failed:", event.name()));
        web_sys::console::error_2(&label, &err);
    }
}

/// The crop engine for one widget instance.
#[wasm_bindgen]
pub struct JsCropper {
    inner: Cropper,
    // Ids issued by `on`; internal subscriptions such as the preview are never exposed.
    callbacks: Vec<SubscriptionId>,
}

#[wasm_bindgen]
impl JsCropper {
    /// Create a cropper from the widget option object (`undefined` for defaults).
    #[wasm_bindgen(constructor)]
    pub fn new(options: JsValue) -> Result<JsCropper, JsValue> {
        let config: CropperConfig = from_js_opt(options, "options")?.unwrap_or_default();
        let inner = Cropper::new(config).map_err(js_err)?;
        Ok(JsCropper {
            inner,
            callbacks: Vec::new(),
        })
    }

    /// Register `callback` for `event`. Returns an id for `off`.
    pub fn on(&mut self, event: String, callback: js_sys::Function) -> Result<f64, JsValue> {
        if !is_known_event(&event) {
            return Err(JsValue::from_str(&format!("Unknown event: {}", event)));
        }
        let id = self.inner.subscribe(move |e| {
            if e.name() == event {
                dispatch(&callback, e);
            }
        });
        self.callbacks.push(id);
        Ok(id.as_u64() as f64)
    }

    /// Remove a callback registered with `on`.
    pub fn off(&mut self, id: f64) -> bool {
        let id = SubscriptionId::from_u64(id as u64);
        let Some(index) = self.callbacks.iter().position(|known| *known == id) else {
            return false;
        };
        self.callbacks.swap_remove(index);
        self.inner.unsubscribe(id)
    }

    /// Load an image. `coordinates` restores a saved crop when given.
    #[wasm_bindgen(js_name = setImage)]
    pub fn set_image(
        &mut self,
        url: String,
        width: f64,
        height: f64,
        coordinates: JsValue,
    ) -> Result<JsValue, JsValue> {
        let coordinates: Option<CropCoordinates> = from_js_opt(coordinates, "coordinates")?;
        let t = self
            .inner
            .set_image(url, Size::new(width, height), coordinates)
            .map_err(js_err)?;
        to_js(&t)
    }

    /// Load suggestion `index` once its natural size is known.
    #[wasm_bindgen(js_name = selectSuggestion)]
    pub fn select_suggestion(
        &mut self,
        index: usize,
        width: f64,
        height: f64,
    ) -> Result<JsValue, JsValue> {
        let t = self
            .inner
            .select_suggestion(index, Size::new(width, height))
            .map_err(js_err)?;
        to_js(&t)
    }

    pub fn drag(&mut self, delta_left: f64, delta_top: f64) -> Result<JsValue, JsValue> {
        let t = self.inner.drag(delta_left, delta_top).map_err(js_err)?;
        to_js(&t)
    }

    /// Zoom to `scale`, anchored at (`anchor_x`, `anchor_y`) or the frame center.
    pub fn zoom(
        &mut self,
        scale: f64,
        anchor_x: Option<f64>,
        anchor_y: Option<f64>,
    ) -> Result<JsValue, JsValue> {
        let anchor = match (anchor_x, anchor_y) {
            (Some(x), Some(y)) => Some(Point::new(x, y)),
            (None, None) => None,
            _ => return Err(JsValue::from_str("Zoom anchor needs both x and y")),
        };
        let t = self.inner.zoom(scale, anchor).map_err(js_err)?;
        to_js(&t)
    }

    #[wasm_bindgen(js_name = removeImage)]
    pub fn remove_image(&mut self) {
        self.inner.remove_image();
    }

    #[wasm_bindgen(js_name = hasImage)]
    pub fn has_image(&self) -> bool {
        self.inner.has_image()
    }

    /// Crop descriptor to persist, or `undefined` when no image is loaded.
    pub fn crop(&self) -> Result<JsValue, JsValue> {
        match self.inner.crop() {
            Some(descriptor) => to_js(&descriptor),
            None => Ok(JsValue::UNDEFINED),
        }
    }

    pub fn transform(&self) -> Result<JsValue, JsValue> {
        match self.inner.transform() {
            Some(t) => to_js(&t),
            None => Ok(JsValue::UNDEFINED),
        }
    }

    #[wasm_bindgen(js_name = previewTransform)]
    pub fn preview_transform(&self) -> Result<JsValue, JsValue> {
        match self.inner.preview().and_then(|p| p.transform()) {
            Some(t) => to_js(&t),
            None => Ok(JsValue::UNDEFINED),
        }
    }

    #[wasm_bindgen(js_name = previewSize)]
    pub fn preview_size(&self) -> Result<JsValue, JsValue> {
        match self.inner.preview() {
            Some(p) => to_js(&p.viewport()),
            None => Ok(JsValue::UNDEFINED),
        }
    }

    /// `{ min, max }` scale range for the loaded image.
    #[wasm_bindgen(js_name = scaleBounds)]
    pub fn scale_bounds(&self) -> Result<JsValue, JsValue> {
        match self.inner.scale_bounds() {
            Some((min, max)) => to_js(&JsScaleBounds { min, max }),
            None => Ok(JsValue::UNDEFINED),
        }
    }

    #[wasm_bindgen(js_name = isRatioLocked)]
    pub fn is_ratio_locked(&self) -> bool {
        self.inner.is_ratio_locked()
    }

    #[wasm_bindgen(js_name = setRatioLocked)]
    pub fn set_ratio_locked(&mut self, locked: bool) -> Result<(), JsValue> {
        self.inner.set_ratio_locked(locked).map_err(js_err)
    }

    /// Resize the crop frame while the ratio is unlocked.
    #[wasm_bindgen(js_name = resizeCrop)]
    pub fn resize_crop(&mut self, width: f64, height: f64) -> Result<JsValue, JsValue> {
        match self.inner.resize_crop(Size::new(width, height)).map_err(js_err)? {
            Some(t) => to_js(&t),
            None => Ok(JsValue::UNDEFINED),
        }
    }

    /// Top-left of the crop frame inside the canvas.
    #[wasm_bindgen(js_name = cropFrameOrigin)]
    pub fn crop_frame_origin(&self) -> Result<JsValue, JsValue> {
        to_js(&self.inner.crop_frame_origin())
    }
}
