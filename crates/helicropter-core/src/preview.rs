//! Preview surface: a scaled-down mirror of a primary crop surface.
//!
//! The preview never takes drag or zoom input. Its transform is always the
//! primary's transform multiplied by a fixed proportion, recomputed inside
//! the primary's notification before the primary call returns.

use std::cell::RefCell;
use std::rc::{Rc, Weak};

use crate::error::{CropError, Result};
use crate::geometry::{Size, Transform};
use crate::surface::{CropSurface, ImageHandle, SubscriptionId, SurfaceEvent};

/// Linear size of the preview relative to the primary viewport.
pub const DEFAULT_PROPORTION: f64 = 0.25;

/// Derived view state. Read it through [`Preview`].
#[derive(Debug, Clone, PartialEq)]
pub struct PreviewSurface {
    proportion: f64,
    viewport: Size,
    image: Option<Rc<ImageHandle>>,
    transform: Option<Transform>,
}

impl PreviewSurface {
    /// Empty preview for a primary viewport of `primary_viewport`.
    pub fn new(primary_viewport: Size, proportion: f64) -> Result<Self> {
        let proportion = validate_proportion(proportion)?;
        Ok(Self {
            proportion,
            viewport: primary_viewport.validated("viewport")?.scaled(proportion),
            image: None,
            transform: None,
        })
    }

    /// Subscribe a new preview to `primary`, synced to its current state.
    pub fn attach(primary: &mut CropSurface, proportion: f64) -> Result<Preview> {
        let mut surface = Self::new(primary.viewport(), proportion)?;
        if let (Some(image), Some(transform)) = (primary.image(), primary.transform()) {
            surface.handle(&SurfaceEvent::ImageLoaded {
                image: Rc::clone(image),
                transform,
            });
        }

        let inner = Rc::new(RefCell::new(surface));
        let weak: Weak<RefCell<PreviewSurface>> = Rc::downgrade(&inner);
        let subscription = primary.subscribe(move |event| {
            if let Some(preview) = weak.upgrade() {
                preview.borrow_mut().handle(event);
            }
        });

        Ok(Preview {
            inner,
            subscription,
        })
    }

    /// Apply one primary notification.
    pub fn handle(&mut self, event: &SurfaceEvent) {
        match event {
            SurfaceEvent::ImageLoaded { image, transform } => {
                self.image = Some(Rc::clone(image));
                self.transform = Some(transform.rescaled(self.proportion));
            }
            SurfaceEvent::Moving(transform) | SurfaceEvent::Scaling(transform) => {
                // Movement without a loaded image is ignored: the preview stays hidden.
                if self.image.is_some() {
                    self.transform = Some(transform.rescaled(self.proportion));
                }
            }
            SurfaceEvent::ViewportResized(viewport) => {
                self.viewport = viewport.scaled(self.proportion);
            }
            SurfaceEvent::Reset => {
                self.image = None;
                self.transform = None;
            }
        }
    }

    pub fn proportion(&self) -> f64 {
        self.proportion
    }

    pub fn viewport(&self) -> Size {
        self.viewport
    }

    pub fn image(&self) -> Option<&Rc<ImageHandle>> {
        self.image.as_ref()
    }

    pub fn transform(&self) -> Option<Transform> {
        self.transform
    }

    pub fn is_visible(&self) -> bool {
        self.image.is_some() && self.transform.is_some()
    }
}

/// Handle to a preview attached to a primary surface.
#[derive(Debug, Clone)]
pub struct Preview {
    inner: Rc<RefCell<PreviewSurface>>,
    subscription: SubscriptionId,
}

impl Preview {
    /// Copy of the current preview state.
    pub fn snapshot(&self) -> PreviewSurface {
        self.inner.borrow().clone()
    }

    pub fn transform(&self) -> Option<Transform> {
        self.inner.borrow().transform()
    }

    pub fn viewport(&self) -> Size {
        self.inner.borrow().viewport()
    }

    pub fn image(&self) -> Option<Rc<ImageHandle>> {
        self.inner.borrow().image().cloned()
    }

    pub fn proportion(&self) -> f64 {
        self.inner.borrow().proportion()
    }

    pub fn is_visible(&self) -> bool {
        self.inner.borrow().is_visible()
    }

    /// Stop following `primary`. Returns false if it was already detached.
    pub fn detach(&self, primary: &mut CropSurface) -> bool {
        primary.unsubscribe(self.subscription)
    }
}

fn validate_proportion(proportion: f64) -> Result<f64> {
    if proportion.is_finite() && proportion > 0.0 && proportion <= 1.0 {
        Ok(proportion)
    } else {
        Err(CropError::InvalidValue {
            name: "preview proportion",
            value: proportion,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bounds::ScaleLimits;
    use crate::codec::CropCoordinates;

    const NATURAL: Size = Size::new(800.0, 600.0);
    const VIEWPORT: Size = Size::new(320.0, 250.0);

    fn primary() -> CropSurface {
        CropSurface::new(VIEWPORT, ScaleLimits::default()).unwrap()
    }

    #[test]
    fn test_viewport_is_scaled_down() {
        let mut p = primary();
        let preview = PreviewSurface::attach(&mut p, 0.25).unwrap();
        assert_eq!(preview.viewport(), Size::new(80.0, 62.5));
        assert!(!preview.is_visible());
    }

    #[test]
    fn test_rejects_bad_proportion() {
        let mut p = primary();
        assert!(PreviewSurface::attach(&mut p, 0.0).is_err());
        assert!(PreviewSurface::attach(&mut p, 1.5).is_err());
        assert!(PreviewSurface::attach(&mut p, f64::NAN).is_err());
        assert!(PreviewSurface::attach(&mut p, 1.0).is_ok());
    }

    #[test]
    fn test_mirrors_primary_exactly() {
        let mut p = primary();
        let preview = PreviewSurface::attach(&mut p, 0.25).unwrap();
        let saved = CropCoordinates {
            scale: 1.0,
            left: -50.0,
            top: 0.0,
        };
        p.set_image("flower.jpg", NATURAL, Some(saved)).unwrap();
        assert_eq!(preview.transform(), Some(Transform::new(0.25, -12.5, 0.0)));

        let t = p.drag(-100.0, -100.0).unwrap();
        let mirrored = preview.transform().unwrap();
        assert_eq!(mirrored.scale, t.scale * 0.25);
        assert_eq!(mirrored.left, t.left * 0.25);
        assert_eq!(mirrored.top, t.top * 0.25);

        let t = p.zoom(0.75, None).unwrap();
        let mirrored = preview.transform().unwrap();
        assert_eq!(mirrored.scale, t.scale * 0.25);
        assert_eq!(mirrored.left, t.left * 0.25);
        assert_eq!(mirrored.top, t.top * 0.25);
    }

    #[test]
    fn test_moving_shrinks_offsets() {
        let mut preview = PreviewSurface::new(VIEWPORT, DEFAULT_PROPORTION).unwrap();
        let image = Rc::new(ImageHandle::new("flower.jpg", NATURAL).unwrap());
        preview.handle(&SurfaceEvent::ImageLoaded {
            image,
            transform: Transform::new(1.0, 0.0, 0.0),
        });
        preview.handle(&SurfaceEvent::Moving(Transform::new(1.0, 100.0, 100.0)));
        let t = preview.transform().unwrap();
        assert!(t.left < 100.0 && t.left != 0.0);
        assert!(t.top < 100.0 && t.top != 0.0);

        preview.handle(&SurfaceEvent::Scaling(Transform::new(0.75, 100.0, 100.0)));
        let t = preview.transform().unwrap();
        assert!(t.scale < 0.75);
        assert!(t.left < 100.0);
    }

    #[test]
    fn test_ignores_movement_without_image() {
        let mut preview = PreviewSurface::new(VIEWPORT, DEFAULT_PROPORTION).unwrap();
        preview.handle(&SurfaceEvent::Moving(Transform::new(1.0, -10.0, 0.0)));
        assert_eq!(preview.transform(), None);
        assert!(!preview.is_visible());
    }

    #[test]
    fn test_shares_image_handle() {
        let mut p = primary();
        let preview = PreviewSurface::attach(&mut p, 0.5).unwrap();
        p.set_image("flower.jpg", NATURAL, None).unwrap();
        let shared = preview.image().unwrap();
        assert!(Rc::ptr_eq(&shared, p.image().unwrap()));
    }

    #[test]
    fn test_snapshot_is_detached_copy() {
        let mut p = primary();
        let preview = PreviewSurface::attach(&mut p, 0.5).unwrap();
        p.set_image("flower.jpg", NATURAL, None).unwrap();

        let snapshot = preview.snapshot();
        assert_eq!(snapshot.proportion(), 0.5);
        assert_eq!(snapshot.transform(), preview.transform());
        assert!(snapshot.is_visible());

        p.reset();
        assert!(snapshot.is_visible());
        assert!(!preview.is_visible());
        assert_eq!(preview.proportion(), 0.5);
    }

    #[test]
    fn test_reset_hides_preview() {
        let mut p = primary();
        let preview = PreviewSurface::attach(&mut p, 0.25).unwrap();
        p.set_image("flower.jpg", NATURAL, None).unwrap();
        assert!(preview.is_visible());
        p.reset();
        assert!(!preview.is_visible());
        assert!(preview.image().is_none());
    }

    #[test]
    fn test_attach_syncs_current_state() {
        let mut p = primary();
        let t = p.set_image("flower.jpg", NATURAL, None).unwrap();
        let preview = PreviewSurface::attach(&mut p, 0.25).unwrap();
        assert_eq!(preview.transform(), Some(t.rescaled(0.25)));
    }

    #[test]
    fn test_follows_viewport_resize() {
        let mut p = primary();
        let preview = PreviewSurface::attach(&mut p, 0.25).unwrap();
        p.set_image("flower.jpg", NATURAL, None).unwrap();
        let t = p.resize_viewport(Size::new(400.0, 300.0)).unwrap().unwrap();
        assert_eq!(preview.viewport(), Size::new(100.0, 75.0));
        assert_eq!(preview.transform(), Some(t.rescaled(0.25)));
    }

    #[test]
    fn test_detach_stops_updates() {
        let mut p = primary();
        let preview = PreviewSurface::attach(&mut p, 0.25).unwrap();
        p.set_image("flower.jpg", NATURAL, None).unwrap();
        let frozen = preview.transform();
        assert!(preview.detach(&mut p));
        assert!(!preview.detach(&mut p));
        p.zoom(2.0, None).unwrap();
        assert_eq!(preview.transform(), frozen);
    }

    #[test]
    fn test_dropped_preview_is_harmless() {
        let mut p = primary();
        drop(PreviewSurface::attach(&mut p, 0.25).unwrap());
        p.set_image("flower.jpg", NATURAL, None).unwrap();
        assert!(p.drag(-1.0, 0.0).is_ok());
    }
}

// ============================================================================
// Property-Based Tests
// ============================================================================
