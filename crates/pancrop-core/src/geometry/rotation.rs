//! Quarter-turn rotation state.
//!
//! Rotation is tracked as an unbounded count of degrees that only ever moves
//! in 90 degree steps, so "left then right" restores the exact value the
//! backend saw before. It is normalized to `[0, 360)` for display only.
//!
//! The render backend rotates the source image before cropping, so the crop
//! rectangle has to be computed against the rotated dimensions:
//!
//! ```text
//! rotate % 180 == 0   ->  (width, height)
//! rotate % 180 == 90  ->  (height, width)
//! ```

use super::PixelSize;
use serde::{Deserialize, Serialize};

/// Rotation in degrees, always a multiple of 90.
///
/// Serialized as a bare integer to match the backend's `rotate` field.
/// Deserialized values are snapped like [`Rotation::new`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(into = "i32", from = "i32")]
pub struct Rotation(i32);

impl Rotation {
    /// Size of one rotation step in degrees.
    pub const STEP: i32 = 90;

    /// Create a rotation, snapping `degrees` to the nearest multiple of 90.
    pub fn new(degrees: i32) -> Self {
        let snapped = (degrees as f64 / Self::STEP as f64).round() * Self::STEP as f64;
        Self(snapped as i32)
    }

    /// Raw degree count as sent to the backend (may be negative or >= 360).
    pub fn degrees(self) -> i32 {
        self.0
    }

    /// Degrees normalized into `[0, 360)` for display.
    pub fn normalized(self) -> i32 {
        self.0.rem_euclid(360)
    }

    /// Rotate a quarter turn counter-clockwise.
    pub fn rotate_left(self) -> Self {
        Self(self.0.saturating_sub(Self::STEP))
    }

    /// Rotate a quarter turn clockwise.
    pub fn rotate_right(self) -> Self {
        Self(self.0.saturating_add(Self::STEP))
    }

    /// True for odd multiples of 90, where width and height trade places.
    pub fn swaps_axes(self) -> bool {
        self.0.rem_euclid(180) == Self::STEP
    }

    /// Source dimensions as seen after applying this rotation.
    pub fn rotated_dims(self, source: PixelSize) -> PixelSize {
        if self.swaps_axes() {
            PixelSize::new(source.height, source.width)
        } else {
            source
        }
    }
}

impl From<i32> for Rotation {
    fn from(degrees: i32) -> Self {
        Rotation::new(degrees)
    }
}

impl From<Rotation> for i32 {
    fn from(rotation: Rotation) -> Self {
        rotation.degrees()
    }
}
