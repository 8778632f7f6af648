//! Helicropter Core - crop transform and constraint engine
//!
//! This crate provides the engine behind the Helicropter image cropping
//! widget: keeping a dragged and zoomed image inside a fixed crop frame,
//! mirroring it into a scaled-down preview, and turning the result into
//! crop coordinates that can be saved and restored.
//!
//! # Module Structure
//!
//! - `geometry` - `Size`, `Point` and `Transform` value types
//! - `bounds` - Scale floors and offset clamping (pure functions)
//! - `surface` - The stateful primary crop surface and its events
//! - `preview` - The derived, proportionally scaled preview
//! - `codec` - Persisted crop descriptors and natural-pixel regions
//! - `config` - Widget options, validated once at construction
//! - `cropper` - Facade combining the above for one widget instance
//! - `raster` - Applying saved coordinates to decoded pixels
//!
//! # Threading
//!
//! Everything is single-threaded and synchronous. Events fire before the
//! mutating call returns, in subscription order.

pub mod bounds;
pub mod codec;
pub mod config;
pub mod cropper;
pub mod error;
pub mod geometry;
pub mod preview;
pub mod raster;
pub mod surface;

pub use bounds::{clamp_offset, clamp_scale, minimum_scale, FitMode, ScaleLimits};
pub use codec::{decode, encode, CropCoordinates, CropDescriptor, CropRegion};
pub use config::{CropperConfig, InitialImage, Suggestion, ViewportRatio};
pub use cropper::Cropper;
pub use error::{CropError, Result};
pub use geometry::{Point, Size, Transform};
pub use preview::{Preview, PreviewSurface, DEFAULT_PROPORTION};
pub use surface::{CropSurface, ImageHandle, SubscriptionId, SurfaceEvent};
