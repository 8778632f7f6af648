//! Crop codec: the persisted form of a crop selection.
//!
//! A [`CropDescriptor`] is what the widget hands back on save and accepts on
//! restore. Its coordinates are anchored to the source image's pixel grid:
//!
//! - `scale` is the display scale (unitless, it multiplies natural pixels)
//! - `left`/`top` are the display offsets divided by `scale`, i.e. the
//!   offset measured in natural image pixels
//!
//! So `-left, -top` is the natural pixel shown at the crop frame's top-left
//! corner, which stays meaningful if the frame is displayed at another size.

use serde::{Deserialize, Serialize};

use crate::error::{CropError, Result};
use crate::geometry::{check_finite, check_scale, Size, Transform};

/// Persisted crop coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CropCoordinates {
    pub scale: f64,
    pub left: f64,
    pub top: f64,
}

/// Externally persisted crop selection.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CropDescriptor {
    pub url: String,
    pub coordinates: CropCoordinates,
}

/// Rectangle on the natural image, in source pixels.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CropRegion {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl CropCoordinates {
    pub fn validated(self) -> Result<Self> {
        check_scale("persisted scale", self.scale)?;
        check_finite("persisted left", self.left)?;
        check_finite("persisted top", self.top)?;
        Ok(self)
    }

    /// Natural-pixel rectangle visible through a viewport of `viewport` size.
    pub fn region(&self, viewport: Size) -> Result<CropRegion> {
        let coords = self.validated()?;
        let viewport = viewport.validated("viewport")?;
        Ok(CropRegion {
            x: -coords.left,
            y: -coords.top,
            width: viewport.width / coords.scale,
            height: viewport.height / coords.scale,
        })
    }
}

impl CropDescriptor {
    pub fn region(&self, viewport: Size) -> Result<CropRegion> {
        self.coordinates.region(viewport)
    }
}

/// Convert a display transform into persisted coordinates.
///
/// `natural` and `viewport` are validated so that an encode never produces
/// a descriptor for a surface that could not have existed.
pub fn encode(transform: Transform, natural: Size, viewport: Size) -> Result<CropCoordinates> {
    let t = transform.validated()?;
    natural.validated("image")?;
    viewport.validated("viewport")?;
    Ok(CropCoordinates {
        scale: t.scale,
        left: t.left / t.scale,
        top: t.top / t.scale,
    })
}

/// Inverse of [`encode`]. The result is not clamped.
pub fn decode(coordinates: CropCoordinates, natural: Size, viewport: Size) -> Result<Transform> {
    let c = coordinates.validated()?;
    natural.validated("image")?;
    viewport.validated("viewport")?;
    let transform = Transform {
        scale: c.scale,
        left: c.left * c.scale,
        top: c.top * c.scale,
    };
    // Huge scales can overflow the product even with finite inputs.
    transform.validated().map_err(|_| CropError::InvalidValue {
        name: "persisted scale",
        value: c.scale,
    })
}


// ============================================================================
// Property-Based Tests
// ============================================================================

#[cfg(test)]
mod proptests {
    use super::*;
    use crate::bounds::{clamp_transform, ScaleLimits};
    use proptest::prelude::*;

    proptest! {
        /// Property: decode(encode(t)) reproduces any legal transform.
        #[test]
        fn prop_round_trip(
            (nw, nh) in (1.0f64..=6000.0, 1.0f64..=6000.0),
            (vw, vh) in (1.0f64..=2000.0, 1.0f64..=2000.0),
            scale in 0.001f64..=50.0,
            left in -50_000.0f64..=0.0,
            top in -50_000.0f64..=0.0,
        ) {
            let natural = Size::new(nw, nh);
            let viewport = Size::new(vw, vh);
            let t = clamp_transform(
                Transform::new(scale, left, top),
                natural,
                viewport,
                &ScaleLimits::default(),
            ).unwrap();

            let back = decode(encode(t, natural, viewport).unwrap(), natural, viewport).unwrap();

            let tol = |v: f64| 1e-9 * v.abs().max(1.0);
            prop_assert_eq!(back.scale, t.scale);
            prop_assert!((back.left - t.left).abs() <= tol(t.left));
            prop_assert!((back.top - t.top).abs() <= tol(t.top));
        }
    }
}
