//! Bounds solver: scale floors and offset clamping.
//!
//! Everything here is a pure function of its arguments. The crop surface,
//! the restore path and viewport resizing all go through these so that a
//! transform can never leave the frame partially uncovered.
//!
//! # Clamping Rules
//!
//! - Scale is bounded below by the fit threshold (cover by default) and
//!   optionally above by a configured maximum. The floor wins if they conflict.
//! - In cover mode each axis offset is clamped to `min(0, max(offset, vp - size))`
//!   where `size = scale * natural`: no gap on any edge.
//! - In contain mode an axis where the image is smaller than the viewport is
//!   clamped into `[0, vp - size]` instead, so the image stays fully visible.
//!
//! Both bounds hold exactly in `f64`, not just up to rounding: the cover
//! floor and the far-edge offset are nudged up by single ulps when a product
//! rounds below the viewport.

use serde::{Deserialize, Serialize};

use crate::error::{CropError, Result};
use crate::geometry::{check_finite, check_scale, Size, Transform};

/// How small the image may get relative to the viewport.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FitMode {
    /// The image always covers the whole viewport.
    #[default]
    Cover,
    /// The image may shrink until it fits entirely inside the viewport,
    /// leaving transparent margins.
    Contain,
}

/// Scale constraints for one surface.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct ScaleLimits {
    pub fit: FitMode,
    /// Optional zoom-in cap. `None` means zoom-in is unbounded.
    pub max: Option<f64>,
}

impl ScaleLimits {
    pub fn new(fit: FitMode, max: Option<f64>) -> Result<Self> {
        if let Some(max) = max {
            check_scale("max scale", max)?;
        }
        Ok(Self { fit, max })
    }

    /// Smallest legal scale for this fit mode.
    pub fn floor(&self, natural: Size, viewport: Size) -> Result<f64> {
        match self.fit {
            FitMode::Cover => minimum_scale(natural, viewport),
            FitMode::Contain => contain_scale(natural, viewport),
        }
    }

    /// Clamp a requested scale into `[floor, max]`.
    pub fn clamp(&self, requested: f64, natural: Size, viewport: Size) -> Result<f64> {
        check_scale("scale", requested)?;
        let floor = self.floor(natural, viewport)?;
        let capped = match self.max {
            Some(max) => requested.min(max),
            None => requested,
        };
        Ok(capped.max(floor))
    }

    /// Clamp one axis offset for this fit mode.
    pub fn clamp_offset(
        &self,
        offset: f64,
        scale: f64,
        natural_len: f64,
        viewport_len: f64,
    ) -> Result<f64> {
        check_axis(offset, scale, natural_len, viewport_len)?;
        let shown = scale * natural_len;
        if self.fit == FitMode::Contain && shown < viewport_len {
            return Ok(offset.clamp(0.0, viewport_len - shown));
        }
        Ok(offset.max(far_edge_offset(shown, viewport_len)).min(0.0))
    }

    /// `(min, max)` scale range, e.g. for driving a zoom slider.
    pub fn range(&self, natural: Size, viewport: Size) -> Result<(f64, Option<f64>)> {
        let floor = self.floor(natural, viewport)?;
        Ok((floor, self.max.map(|max| max.max(floor))))
    }
}

/// Smallest scale at which the image covers the viewport on both axes.
///
/// `scale * natural >= viewport` holds exactly on both axes.
pub fn minimum_scale(natural: Size, viewport: Size) -> Result<f64> {
    let natural = natural.validated("image")?;
    let viewport = viewport.validated("viewport")?;
    let mut scale = (viewport.width / natural.width).max(viewport.height / natural.height);
    while scale * natural.width < viewport.width || scale * natural.height < viewport.height {
        scale = next_up(scale);
    }
    Ok(scale)
}

/// Largest scale at which the whole image is visible inside the viewport.
pub fn contain_scale(natural: Size, viewport: Size) -> Result<f64> {
    let natural = natural.validated("image")?;
    let viewport = viewport.validated("viewport")?;
    Ok((viewport.width / natural.width).min(viewport.height / natural.height))
}

/// Cover-fit scale clamp with an optional maximum.
pub fn clamp_scale(
    requested: f64,
    natural: Size,
    viewport: Size,
    max: Option<f64>,
) -> Result<f64> {
    ScaleLimits::new(FitMode::Cover, max)?.clamp(requested, natural, viewport)
}

/// Cover-fit clamp of one axis offset: `min(0, max(offset, vp - scale * n))`.
///
/// `natural_len` and `viewport_len` are the image and viewport length along
/// the same axis.
pub fn clamp_offset(offset: f64, scale: f64, natural_len: f64, viewport_len: f64) -> Result<f64> {
    ScaleLimits::default().clamp_offset(offset, scale, natural_len, viewport_len)
}

fn check_axis(offset: f64, scale: f64, natural_len: f64, viewport_len: f64) -> Result<()> {
    check_finite("offset", offset)?;
    check_scale("scale", scale)?;
    let positive = |v: f64| v.is_finite() && v > 0.0;
    if !(positive(natural_len) && positive(viewport_len)) {
        return Err(CropError::InvalidDimension {
            what: "axis",
            width: natural_len,
            height: viewport_len,
        });
    }
    Ok(())
}

/// Most negative offset whose far edge still reaches the viewport edge,
/// i.e. the smallest `o <= 0` with `o + shown >= viewport_len` in `f64`.
fn far_edge_offset(shown: f64, viewport_len: f64) -> f64 {
    let mut lower = viewport_len - shown;
    while lower + shown < viewport_len {
        lower = next_up(lower);
    }
    lower.min(0.0)
}

/// Next representable `f64` above a finite `x`.
fn next_up(x: f64) -> f64 {
    if x == 0.0 {
        return f64::from_bits(1);
    }
    let bits = x.to_bits();
    if x > 0.0 {
        f64::from_bits(bits + 1)
    } else {
        f64::from_bits(bits - 1)
    }
}

/// Clamp scale, then both offsets.
pub fn clamp_transform(
    transform: Transform,
    natural: Size,
    viewport: Size,
    limits: &ScaleLimits,
) -> Result<Transform> {
    let transform = transform.validated()?;
    let scale = limits.clamp(transform.scale, natural, viewport)?;
    Ok(Transform {
        scale,
        left: limits.clamp_offset(transform.left, scale, natural.width, viewport.width)?,
        top: limits.clamp_offset(transform.top, scale, natural.height, viewport.height)?,
    })
}

/// Initial placement for a freshly loaded image: smallest legal scale,
/// centered on both axes.
pub fn centered(natural: Size, viewport: Size, limits: &ScaleLimits) -> Result<Transform> {
    let scale = limits.floor(natural, viewport)?;
    let left = (viewport.width - scale * natural.width) / 2.0;
    let top = (viewport.height - scale * natural.height) / 2.0;
    Ok(Transform {
        scale,
        left: limits.clamp_offset(left, scale, natural.width, viewport.width)?,
        top: limits.clamp_offset(top, scale, natural.height, viewport.height)?,
    })
}


// ============================================================================
// Property-Based Tests
// ============================================================================
