//! Value types shared by every part of the engine.
//!
//! # Coordinate System
//!
//! - Viewport coordinates are UI pixels, origin at the crop frame's top-left
//! - Natural coordinates are source image pixels, origin at the image's top-left
//! - A [`Transform`] maps natural to viewport: `viewport = left/top + natural * scale`

use serde::{Deserialize, Serialize};

use crate::error::{CropError, Result};

/// Width and height in pixels (viewport or natural, depending on context).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Size {
    pub width: f64,
    pub height: f64,
}

impl Size {
    pub const fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }

    /// Returns the size unchanged if both sides are finite and positive.
    ///
    /// `what` names the size in the error ("image", "viewport", ...).
    pub fn validated(self, what: &'static str) -> Result<Self> {
        let ok = |v: f64| v.is_finite() && v > 0.0;
        if ok(self.width) && ok(self.height) {
            Ok(self)
        } else {
            Err(CropError::InvalidDimension {
                what,
                width: self.width,
                height: self.height,
            })
        }
    }

    /// Multiply both sides by `factor`.
    pub fn scaled(self, factor: f64) -> Self {
        Self::new(self.width * factor, self.height * factor)
    }

    /// True if this size fits inside `outer` on both axes.
    pub fn fits_within(self, outer: Size) -> bool {
        self.width <= outer.width && self.height <= outer.height
    }

    pub fn center(self) -> Point {
        Point::new(self.width / 2.0, self.height / 2.0)
    }
}

/// A position in pixels.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// Placement of an image relative to its viewport.
///
/// `left`/`top` is the offset of the scaled image's top-left corner in
/// viewport pixels. For a legal transform both are `<= 0`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Transform {
    pub scale: f64,
    pub left: f64,
    pub top: f64,
}

impl Transform {
    pub const fn new(scale: f64, left: f64, top: f64) -> Self {
        Self { scale, left, top }
    }

    /// Reject non-finite components and non-positive scale.
    pub fn validated(self) -> Result<Self> {
        check_scale("scale", self.scale)?;
        check_finite("left", self.left)?;
        check_finite("top", self.top)?;
        Ok(self)
    }

    /// Linear rescale of every component, used to derive a proportional
    /// preview transform.
    ///
    /// Each component is a single multiplication, so callers can rely on
    /// `rescaled(p).left == left * p` bit for bit.
    pub fn rescaled(self, factor: f64) -> Self {
        Self {
            scale: self.scale * factor,
            left: self.left * factor,
            top: self.top * factor,
        }
    }

    /// Size of the image on screen.
    pub fn scaled_size(self, natural: Size) -> Size {
        natural.scaled(self.scale)
    }

    /// Natural-pixel coordinate of the image point displayed at `at`.
    pub fn image_point_at(self, at: Point) -> Point {
        Point::new((at.x - self.left) / self.scale, (at.y - self.top) / self.scale)
    }
}

pub(crate) fn check_finite(name: &'static str, value: f64) -> Result<f64> {
    if value.is_finite() {
        Ok(value)
    } else {
        Err(CropError::InvalidValue { name, value })
    }
}

pub(crate) fn check_scale(name: &'static str, value: f64) -> Result<f64> {
    if value.is_finite() && value > 0.0 {
        Ok(value)
    } else {
        Err(CropError::InvalidValue { name, value })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_size_validation() {
        assert!(Size::new(320.0, 250.0).validated("viewport").is_ok());
        assert!(Size::new(0.0, 250.0).validated("viewport").is_err());
        assert!(Size::new(320.0, -1.0).validated("viewport").is_err());
        assert!(Size::new(f64::INFINITY, 1.0).validated("viewport").is_err());
        assert!(Size::new(f64::NAN, 1.0).validated("viewport").is_err());
    }

    #[test]
    fn test_size_fits_within() {
        let canvas = Size::new(432.0, 300.0);
        assert!(Size::new(320.0, 250.0).fits_within(canvas));
        assert!(canvas.fits_within(canvas));
        assert!(!Size::new(433.0, 100.0).fits_within(canvas));
    }

    #[test]
    fn test_transform_validation() {
        assert!(Transform::new(1.0, -10.0, 0.0).validated().is_ok());
        assert!(Transform::new(0.0, 0.0, 0.0).validated().is_err());
        assert!(Transform::new(-1.0, 0.0, 0.0).validated().is_err());
        assert!(Transform::new(1.0, f64::NAN, 0.0).validated().is_err());
        assert!(Transform::new(1.0, 0.0, f64::NEG_INFINITY).validated().is_err());
    }

    #[test]
    fn test_rescaled() {
        let t = Transform::new(1.0, -50.0, 0.0).rescaled(0.25);
        assert_eq!(t, Transform::new(0.25, -12.5, 0.0));
    }

    #[test]
    fn test_image_point_at() {
        let t = Transform::new(2.0, -100.0, -50.0);
        let p = t.image_point_at(Point::new(100.0, 50.0));
        assert_eq!(p, Point::new(100.0, 50.0));
    }

    #[test]
    fn test_transform_serde_shape() {
        let json = serde_json::to_string(&Transform::new(0.5, -10.0, -2.5)).unwrap();
        assert_eq!(json, r#"{"scale":0.5,"left":-10.0,"top":-2.5}"#);
    }
}
