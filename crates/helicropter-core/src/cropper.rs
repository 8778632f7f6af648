//! Widget facade tying the configuration, primary surface and preview together.

use tracing::debug;

use crate::codec::{CropCoordinates, CropDescriptor};
use crate::config::CropperConfig;
use crate::error::{CropError, Result};
use crate::geometry::{Point, Size, Transform};
use crate::preview::{Preview, PreviewSurface};
use crate::surface::{CropSurface, SubscriptionId, SurfaceEvent};

/// The crop engine behind one widget instance.
#[derive(Debug)]
pub struct Cropper {
    config: CropperConfig,
    surface: CropSurface,
    preview: Option<Preview>,
    ratio_locked: bool,
}

impl Cropper {
    /// Validate `config`, build the components it enables and restore
    /// `initialImage` if present.
    pub fn new(config: CropperConfig) -> Result<Self> {
        config.validate()?;

        let mut surface = CropSurface::new(config.crop_size, config.scale_limits()?)?;
        let preview = if config.show_preview {
            Some(PreviewSurface::attach(&mut surface, config.preview_proportion)?)
        } else {
            None
        };

        if let Some(initial) = &config.initial_image {
            surface.set_image(initial.url.clone(), initial.natural_size, initial.coordinates)?;
        }

        debug!(
            crop_width = config.crop_size.width,
            crop_height = config.crop_size.height,
            preview = config.show_preview,
            "cropper created"
        );

        Ok(Self {
            ratio_locked: config.starts_locked(),
            config,
            surface,
            preview,
        })
    }

    pub fn config(&self) -> &CropperConfig {
        &self.config
    }

    pub fn surface(&self) -> &CropSurface {
        &self.surface
    }

    pub fn preview(&self) -> Option<&Preview> {
        self.preview.as_ref()
    }

    pub fn has_image(&self) -> bool {
        self.surface.has_image()
    }

    pub fn transform(&self) -> Option<Transform> {
        self.surface.transform()
    }

    pub fn scale_bounds(&self) -> Option<(f64, Option<f64>)> {
        self.surface.scale_bounds()
    }

    pub fn subscribe(&mut self, listener: impl FnMut(&SurfaceEvent) + 'static) -> SubscriptionId {
        self.surface.subscribe(listener)
    }

    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        self.surface.unsubscribe(id)
    }

    /// Load an uploaded or restored image.
    pub fn set_image(
        &mut self,
        url: impl Into<String>,
        natural: Size,
        coordinates: Option<CropCoordinates>,
    ) -> Result<Transform> {
        self.surface.set_image(url, natural, coordinates)
    }

    /// Load suggestion `index` from the configured list.
    pub fn select_suggestion(&mut self, index: usize, natural: Size) -> Result<Transform> {
        if !self.config.show_suggestions {
            return Err(CropError::InvalidState("suggestions are disabled".to_string()));
        }
        let url = self
            .config
            .suggestions
            .get(index)
            .map(|s| s.url.clone())
            .ok_or_else(|| CropError::InvalidState(format!("no suggestion at index {index}")))?;
        self.surface.set_image(url, natural, None)
    }

    pub fn drag(&mut self, delta_left: f64, delta_top: f64) -> Result<Transform> {
        self.surface.drag(delta_left, delta_top)
    }

    pub fn zoom(&mut self, scale: f64, anchor: Option<Point>) -> Result<Transform> {
        self.surface.zoom(scale, anchor)
    }

    pub fn remove_image(&mut self) {
        self.surface.reset();
    }

    /// Crop descriptor to persist, or `None` when there is nothing to save.
    pub fn crop(&self) -> Option<CropDescriptor> {
        self.surface.crop_data()
    }

    pub fn is_ratio_locked(&self) -> bool {
        self.ratio_locked
    }

    pub fn set_ratio_locked(&mut self, locked: bool) -> Result<()> {
        if !self.config.show_ratio_lock {
            return Err(CropError::InvalidState("ratio lock is not shown".to_string()));
        }
        debug!(locked, "ratio lock toggled");
        self.ratio_locked = locked;
        Ok(())
    }

    /// Resize the crop frame. Only allowed while the ratio is unlocked, and
    /// the frame must stay inside the canvas.
    pub fn resize_crop(&mut self, size: Size) -> Result<Option<Transform>> {
        if self.ratio_locked {
            return Err(CropError::InvalidState("crop ratio is locked".to_string()));
        }
        let size = size.validated("crop")?;
        if !size.fits_within(self.config.canvas_size) {
            return Err(CropError::InvalidDimension {
                what: "crop",
                width: size.width,
                height: size.height,
            });
        }
        self.surface.resize_viewport(size)
    }

    /// Top-left of the crop frame in canvas pixels. The frame is centered.
    pub fn crop_frame_origin(&self) -> Point {
        let canvas = self.config.canvas_size;
        let frame = self.surface.viewport();
        Point::new(
            (canvas.width - frame.width) / 2.0,
            (canvas.height - frame.height) / 2.0,
        )
    }
}
