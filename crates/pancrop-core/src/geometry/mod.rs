//! Viewport geometry for the crop editor.
//!
//! This module converts pointer drag and zoom gestures over an on-screen
//! preview into a crop rectangle expressed in source-image pixels.
//!
//! # Coordinate Systems
//!
//! - **Viewport space**: CSS pixels of the rendered preview image, origin at
//!   its top-left corner. The pointer frame and pan offsets live here.
//! - **Source space**: pixels of the source image *after* rotation. The crop
//!   rectangle sent to the render backend lives here.
//!
//! The preview image is drawn scaled by `zoom` around its top-left corner and
//! then translated by `pan`, so a viewport point `p` maps back to the
//! unscaled image at `(p - pan) / zoom`.
//!
//! # Failure Model
//!
//! Nothing in this module returns an error. Operations that need measured
//! dimensions return `None` (or their input unchanged) until those
//! dimensions are known.

mod crop;
mod frame;
mod pan;
mod rotation;

pub use crop::{compute_crop, crop_coverage_pct, CropRect};
pub use frame::{
    compute_pointer_frame, compute_pointer_frame_with, FrameParams, DEFAULT_FRAME_FILL,
    DEFAULT_FRAME_INSET,
};
pub use pan::{centered_pan, clamp_pan};
pub use rotation::Rotation;

use serde::{Deserialize, Serialize};

/// Width and height in viewport (CSS pixel) units.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Size {
    pub width: f64,
    pub height: f64,
}

impl Size {
    pub fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }

    /// True once both dimensions are finite and strictly positive.
    ///
    /// A preview that has not been laid out yet reports `0x0`.
    pub fn is_measured(&self) -> bool {
        self.width.is_finite() && self.height.is_finite() && self.width > 0.0 && self.height > 0.0
    }

    pub fn aspect(&self) -> f64 {
        self.width / self.height
    }
}

/// Integer pixel dimensions of a source image.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct PixelSize {
    pub width: u32,
    pub height: u32,
}

impl PixelSize {
    pub fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    pub fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0
    }

    /// Number of pixels, widened so large images cannot overflow.
    pub fn area(&self) -> u64 {
        self.width as u64 * self.height as u64
    }
}

/// A point or offset in viewport space.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub const ORIGIN: Point = Point { x: 0.0, y: 0.0 };

    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// Axis-aligned rectangle in viewport space.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Rect {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl Rect {
    pub fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    pub fn right(&self) -> f64 {
        self.x + self.width
    }

    pub fn bottom(&self) -> f64 {
        self.y + self.height
    }

    /// True when the rectangle has a finite, positive area.
    pub fn is_usable(&self) -> bool {
        self.x.is_finite()
            && self.y.is_finite()
            && self.width.is_finite()
            && self.height.is_finite()
            && self.width > 0.0
            && self.height > 0.0
    }
}

/// Clamp that never panics: NaN bounds fall through instead of aborting.
///
/// `f64::clamp` asserts `min <= max`; gesture input can produce degenerate
/// bounds for a frame wider than the scaled image, so callers order the
/// bounds first and this helper applies them max-then-min.
#[inline]
pub(crate) fn clamp_f64(value: f64, min: f64, max: f64) -> f64 {
    value.max(min).min(max)
}
