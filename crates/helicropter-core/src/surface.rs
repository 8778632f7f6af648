//! Crop surface: one image, one viewport, one transform.
//!
//! The surface is the only thing that mutates a transform. Every mutation
//! goes through the bounds solver and is announced to subscribers
//! synchronously, in registration order, before the call returns.
//!
//! # Events
//!
//! | event              | emitted by                          |
//! |--------------------|-------------------------------------|
//! | `image-loaded`     | [`CropSurface::set_image`]          |
//! | `moving`           | [`CropSurface::drag`]               |
//! | `scaling`          | [`CropSurface::zoom`], resize       |
//! | `viewport-resized` | [`CropSurface::resize_viewport`]    |
//! | `reset`            | [`CropSurface::reset`]              |

use std::rc::Rc;

use tracing::{debug, trace, warn};

use crate::bounds::{self, ScaleLimits};
use crate::codec::{self, CropCoordinates, CropDescriptor};
use crate::error::{CropError, Result};
use crate::geometry::{check_finite, Point, Size, Transform};

/// The loaded source image. Shared, never mutated.
#[derive(Debug, Clone, PartialEq)]
pub struct ImageHandle {
    url: String,
    natural: Size,
}

impl ImageHandle {
    pub fn new(url: impl Into<String>, natural: Size) -> Result<Self> {
        Ok(Self {
            url: url.into(),
            natural: natural.validated("image")?,
        })
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    /// Natural (source pixel) size.
    pub fn natural_size(&self) -> Size {
        self.natural
    }
}

/// Change notification from a [`CropSurface`].
#[derive(Debug, Clone, PartialEq)]
pub enum SurfaceEvent {
    ImageLoaded {
        image: Rc<ImageHandle>,
        transform: Transform,
    },
    Moving(Transform),
    Scaling(Transform),
    ViewportResized(Size),
    Reset,
}

impl SurfaceEvent {
    /// Wire name of the event, as used by the widget glue.
    pub fn name(&self) -> &'static str {
        match self {
            SurfaceEvent::ImageLoaded { .. } => "image-loaded",
            SurfaceEvent::Moving(_) => "moving",
            SurfaceEvent::Scaling(_) => "scaling",
            SurfaceEvent::ViewportResized(_) => "viewport-resized",
            SurfaceEvent::Reset => "reset",
        }
    }

    /// The transform carried by the event, if any.
    pub fn transform(&self) -> Option<Transform> {
        match self {
            SurfaceEvent::ImageLoaded { transform, .. } => Some(*transform),
            SurfaceEvent::Moving(t) | SurfaceEvent::Scaling(t) => Some(*t),
            SurfaceEvent::ViewportResized(_) | SurfaceEvent::Reset => None,
        }
    }
}

/// Handle returned by [`CropSurface::subscribe`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

impl SubscriptionId {
    pub fn as_u64(self) -> u64 {
        self.0
    }

    pub fn from_u64(raw: u64) -> Self {
        Self(raw)
    }
}

type Listener = Box<dyn FnMut(&SurfaceEvent)>;

#[derive(Debug, Clone)]
struct Loaded {
    image: Rc<ImageHandle>,
    transform: Transform,
}

/// A draggable, zoomable image inside a fixed-size crop viewport.
pub struct CropSurface {
    viewport: Size,
    limits: ScaleLimits,
    loaded: Option<Loaded>,
    listeners: Vec<(SubscriptionId, Listener)>,
    next_id: u64,
}

impl std::fmt::Debug for CropSurface {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CropSurface")
            .field("viewport", &self.viewport)
            .field("limits", &self.limits)
            .field("loaded", &self.loaded)
            .field("listeners", &self.listeners.len())
            .finish()
    }
}

impl CropSurface {
    /// Create an empty surface.
    ///
    /// # Errors
    ///
    /// `InvalidDimension` if the viewport is not finite and positive.
    pub fn new(viewport: Size, limits: ScaleLimits) -> Result<Self> {
        Ok(Self {
            viewport: viewport.validated("viewport")?,
            limits,
            loaded: None,
            listeners: Vec::new(),
            next_id: 0,
        })
    }

    pub fn viewport(&self) -> Size {
        self.viewport
    }

    pub fn limits(&self) -> ScaleLimits {
        self.limits
    }

    pub fn has_image(&self) -> bool {
        self.loaded.is_some()
    }

    pub fn image(&self) -> Option<&Rc<ImageHandle>> {
        self.loaded.as_ref().map(|l| &l.image)
    }

    pub fn transform(&self) -> Option<Transform> {
        self.loaded.as_ref().map(|l| l.transform)
    }

    /// Legal `(min, max)` scale for the loaded image.
    pub fn scale_bounds(&self) -> Option<(f64, Option<f64>)> {
        let loaded = self.loaded.as_ref()?;
        self.limits
            .range(loaded.image.natural_size(), self.viewport)
            .ok()
    }

    /// Register a listener for every subsequent event.
    pub fn subscribe(&mut self, listener: impl FnMut(&SurfaceEvent) + 'static) -> SubscriptionId {
        let id = SubscriptionId(self.next_id);
        self.next_id += 1;
        self.listeners.push((id, Box::new(listener)));
        id
    }

    /// Remove a listener. Returns false if it was not registered.
    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        let before = self.listeners.len();
        self.listeners.retain(|(existing, _)| *existing != id);
        self.listeners.len() != before
    }

    /// Load a new image, replacing any current one.
    ///
    /// With `coordinates` the persisted crop is decoded and clamped against
    /// the current viewport, otherwise the image is centered at the smallest
    /// legal scale.
    ///
    /// # Errors
    ///
    /// `InvalidDimension` for a bad natural size, `InvalidValue` for corrupt
    /// coordinates. The previous image is kept on error.
    pub fn set_image(
        &mut self,
        url: impl Into<String>,
        natural: Size,
        coordinates: Option<CropCoordinates>,
    ) -> Result<Transform> {
        let image = Rc::new(ImageHandle::new(url, natural)?);
        let natural = image.natural_size();

        let transform = match coordinates {
            Some(coords) => {
                let decoded = codec::decode(coords, natural, self.viewport)?;
                let clamped =
                    bounds::clamp_transform(decoded, natural, self.viewport, &self.limits)?;
                if clamped != decoded {
                    warn!(
                        url = image.url(),
                        ?decoded,
                        ?clamped,
                        "restored crop coordinates were out of bounds"
                    );
                }
                clamped
            }
            None => bounds::centered(natural, self.viewport, &self.limits)?,
        };

        debug!(
            url = image.url(),
            width = natural.width,
            height = natural.height,
            scale = transform.scale,
            "image loaded"
        );

        self.loaded = Some(Loaded {
            image: Rc::clone(&image),
            transform,
        });
        self.emit(SurfaceEvent::ImageLoaded { image, transform });
        Ok(transform)
    }

    /// Move the image by a delta in viewport pixels.
    ///
    /// Emits `moving` even when clamping absorbs the whole delta.
    pub fn drag(&mut self, delta_left: f64, delta_top: f64) -> Result<Transform> {
        check_finite("delta left", delta_left)?;
        check_finite("delta top", delta_top)?;
        let loaded = self.loaded.as_ref().ok_or_else(|| CropError::no_image("drag"))?;

        let natural = loaded.image.natural_size();
        let t = loaded.transform;
        let (vp, limits) = (self.viewport, self.limits);
        let next = Transform {
            scale: t.scale,
            left: limits.clamp_offset(t.left + delta_left, t.scale, natural.width, vp.width)?,
            top: limits.clamp_offset(t.top + delta_top, t.scale, natural.height, vp.height)?,
        };

        trace!(delta_left, delta_top, left = next.left, top = next.top, "drag");
        self.commit(next);
        self.emit(SurfaceEvent::Moving(next));
        Ok(next)
    }

    /// Change the scale, keeping the image point under `anchor` in place.
    ///
    /// `anchor` is in viewport pixels and defaults to the viewport center.
    /// The anchor is honored first and the offsets are clamped afterwards, so
    /// near an edge the image point drifts by exactly the clamp correction.
    pub fn zoom(&mut self, requested_scale: f64, anchor: Option<Point>) -> Result<Transform> {
        let anchor = anchor.unwrap_or_else(|| self.viewport.center());
        check_finite("anchor x", anchor.x)?;
        check_finite("anchor y", anchor.y)?;
        let loaded = self.loaded.as_ref().ok_or_else(|| CropError::no_image("zoom"))?;

        let natural = loaded.image.natural_size();
        let scale = self.limits.clamp(requested_scale, natural, self.viewport)?;
        let pinned = loaded.transform.image_point_at(anchor);
        let (vp, limits) = (self.viewport, self.limits);
        let next = Transform {
            scale,
            left: limits.clamp_offset(anchor.x - pinned.x * scale, scale, natural.width, vp.width)?,
            top: limits.clamp_offset(anchor.y - pinned.y * scale, scale, natural.height, vp.height)?,
        };

        trace!(requested_scale, scale, left = next.left, top = next.top, "zoom");
        self.commit(next);
        self.emit(SurfaceEvent::Scaling(next));
        Ok(next)
    }

    /// Replace the viewport size and re-clamp the current transform.
    ///
    /// Returns the re-clamped transform when an image is loaded.
    pub fn resize_viewport(&mut self, viewport: Size) -> Result<Option<Transform>> {
        let viewport = viewport.validated("viewport")?;
        let next = match &self.loaded {
            Some(loaded) => Some(bounds::clamp_transform(
                loaded.transform,
                loaded.image.natural_size(),
                viewport,
                &self.limits,
            )?),
            None => None,
        };

        debug!(width = viewport.width, height = viewport.height, "viewport resized");
        self.viewport = viewport;
        self.emit(SurfaceEvent::ViewportResized(viewport));
        if let Some(next) = next {
            self.commit(next);
            self.emit(SurfaceEvent::Scaling(next));
        }
        Ok(next)
    }

    /// Drop the image and transform. A no-op when nothing is loaded.
    pub fn reset(&mut self) {
        if let Some(loaded) = self.loaded.take() {
            debug!(url = loaded.image.url(), "surface reset");
            self.emit(SurfaceEvent::Reset);
        }
    }

    /// Persisted form of the current crop, or `None` when no image is loaded.
    pub fn crop_data(&self) -> Option<CropDescriptor> {
        let loaded = self.loaded.as_ref()?;
        let coordinates =
            match codec::encode(loaded.transform, loaded.image.natural_size(), self.viewport) {
                Ok(coordinates) => coordinates,
                Err(err) => {
                    warn!(url = loaded.image.url(), %err, "committed transform failed to encode");
                    return None;
                }
            };
        Some(CropDescriptor {
            url: loaded.image.url().to_string(),
            coordinates,
        })
    }

    fn commit(&mut self, transform: Transform) {
        if let Some(loaded) = self.loaded.as_mut() {
            loaded.transform = transform;
        }
    }

    fn emit(&mut self, event: SurfaceEvent) {
        for (_, listener) in self.listeners.iter_mut() {
            listener(&event);
        }
    }
}


// ============================================================================
// Property-Based Tests
// ============================================================================
