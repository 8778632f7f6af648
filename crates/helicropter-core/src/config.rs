//! Widget configuration.
//!
//! The option object handed to the widget deserializes into
//! [`CropperConfig`]. Missing keys take the defaults below. They match the
//! widget's documented defaults except `allowTransparency`, which the widget
//! defaults to `true` and this crate deliberately defaults to `false` so an
//! unconfigured cropper keeps the image covering the crop frame. Validation
//! happens once, in [`CropperConfig::validate`], before any component is built.
//!
//! | option              | default   | effect                                   |
//! |---------------------|-----------|------------------------------------------|
//! | `canvasSize`        | 432x300   | stage that bounds crop frame resizing    |
//! | `cropSize`          | 320x250   | primary viewport                         |
//! | `viewportRatio`     | `static`  | initial ratio-lock state                 |
//! | `allowTransparency` | `false`   | contain fit instead of cover             |
//! | `maxScale`          | none      | zoom-in cap                              |
//! | `initialImage`      | none      | image restored at construction           |
//! | `showRatioLock`     | `false`   | enables the ratio-lock toggle            |
//! | `showSuggestions`   | `false`   | enables suggestion picks                 |
//! | `suggestions`       | `[]`      | suggestion list                          |
//! | `showPreview`       | `true`    | builds an attached preview               |
//! | `previewProportion` | `0.25`    | preview size relative to the crop frame  |

use serde::{Deserialize, Serialize};

use crate::bounds::{FitMode, ScaleLimits};
use crate::codec::CropCoordinates;
use crate::error::{CropError, Result};
use crate::geometry::Size;
use crate::preview::DEFAULT_PROPORTION;

/// Whether the crop frame keeps its aspect ratio.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ViewportRatio {
    /// Locked to `cropSize`.
    #[default]
    Static,
    /// The crop frame may be resized inside the canvas.
    Dynamic,
}

/// Image restored when the widget is constructed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InitialImage {
    pub url: String,
    pub natural_size: Size,
    #[serde(default)]
    pub coordinates: Option<CropCoordinates>,
}

/// One entry in the suggestion gallery.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Suggestion {
    pub url: String,
}

/// Immutable widget configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct CropperConfig {
    pub canvas_size: Size,
    pub crop_size: Size,
    pub viewport_ratio: ViewportRatio,
    pub allow_transparency: bool,
    pub max_scale: Option<f64>,
    pub initial_image: Option<InitialImage>,
    pub show_ratio_lock: bool,
    pub show_suggestions: bool,
    pub suggestions: Vec<Suggestion>,
    pub show_preview: bool,
    pub preview_proportion: f64,
}

impl Default for CropperConfig {
    fn default() -> Self {
        Self {
            canvas_size: Size::new(432.0, 300.0),
            crop_size: Size::new(320.0, 250.0),
            viewport_ratio: ViewportRatio::Static,
            allow_transparency: false,
            max_scale: None,
            initial_image: None,
            show_ratio_lock: false,
            show_suggestions: false,
            suggestions: Vec::new(),
            show_preview: true,
            preview_proportion: DEFAULT_PROPORTION,
        }
    }
}

impl CropperConfig {
    /// Check every option against the others.
    pub fn validate(&self) -> Result<()> {
        let canvas = self.canvas_size.validated("canvas")?;
        let crop = self.crop_size.validated("crop")?;
        if !crop.fits_within(canvas) {
            return Err(CropError::InvalidConfig(format!(
                "crop size {}x{} does not fit canvas {}x{}",
                crop.width, crop.height, canvas.width, canvas.height
            )));
        }

        let p = self.preview_proportion;
        if !(p.is_finite() && p > 0.0 && p <= 1.0) {
            return Err(CropError::InvalidConfig(format!(
                "preview proportion must be in (0, 1], got {p}"
            )));
        }

        self.scale_limits()?;

        if let Some(initial) = &self.initial_image {
            initial.natural_size.validated("image")?;
            if let Some(coords) = initial.coordinates {
                coords.validated()?;
            }
        }

        if let Some(empty) = self.suggestions.iter().position(|s| s.url.is_empty()) {
            return Err(CropError::InvalidConfig(format!(
                "suggestion {empty} has an empty url"
            )));
        }

        Ok(())
    }

    pub fn fit_mode(&self) -> FitMode {
        if self.allow_transparency {
            FitMode::Contain
        } else {
            FitMode::Cover
        }
    }

    pub fn scale_limits(&self) -> Result<ScaleLimits> {
        ScaleLimits::new(self.fit_mode(), self.max_scale)
    }

    /// Initial ratio-lock state.
    pub fn starts_locked(&self) -> bool {
        self.viewport_ratio == ViewportRatio::Static
    }
}
