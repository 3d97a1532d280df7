//! Pointer frame placement.
//!
//! The pointer frame is the fixed-aspect crop window drawn over the preview.
//! It is centered in the viewport, fills 80% of the constraining axis, and
//! always stays `inset` units away from every viewport edge.

use super::{Rect, Size};

/// Fraction of the constraining viewport axis covered by the frame.
pub const DEFAULT_FRAME_FILL: f64 = 0.8;

/// Minimum distance between the frame and the viewport edge.
pub const DEFAULT_FRAME_INSET: f64 = 4.0;

/// Tunable frame placement parameters.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FrameParams {
    /// Fraction (0.0, 1.0] of the constraining axis the frame covers
    pub fill: f64,
    /// Margin kept free on each side of the frame
    pub inset: f64,
}

impl Default for FrameParams {
    fn default() -> Self {
        Self {
            fill: DEFAULT_FRAME_FILL,
            inset: DEFAULT_FRAME_INSET,
        }
    }
}

/// Compute the pointer frame for a viewport and target aspect ratio using
/// the default fill and inset.
///
/// Returns `None` until the viewport has been measured.
pub fn compute_pointer_frame(viewport: Size, aspect: f64) -> Option<Rect> {
    compute_pointer_frame_with(viewport, aspect, &FrameParams::default())
}

/// Compute the pointer frame with explicit placement parameters.
///
/// # Algorithm
///
/// 1. If the viewport is wider than `aspect`, the height is constrained:
///    `height = viewport.height * fill`, `width = height * aspect`.
///    Otherwise `width = viewport.width * fill`, `height = width / aspect`.
/// 2. Each dimension is capped at `viewport - 2 * inset`.
/// 3. The frame is centered and every component rounded to an integer.
///
/// A non-finite or non-positive `aspect` is treated as square.
pub fn compute_pointer_frame_with(viewport: Size, aspect: f64, params: &FrameParams) -> Option<Rect> {
    if !viewport.is_measured() {
        return None;
    }

    let aspect = if aspect.is_finite() && aspect > 0.0 {
        aspect
    } else {
        1.0
    };
    let (width, height) = (viewport.width, viewport.height);

    let (frame_width, frame_height) = if width / height > aspect {
        let h = height * params.fill;
        (h * aspect, h)
    } else {
        let w = width * params.fill;
        (w, w / aspect)
    };

    // Tiny viewports can leave no room inside the inset at all.
    let frame_width = frame_width.min((width - params.inset * 2.0).max(0.0));
    let frame_height = frame_height.min((height - params.inset * 2.0).max(0.0));

    Some(Rect {
        x: ((width - frame_width) / 2.0).round(),
        y: ((height - frame_height) / 2.0).round(),
        width: frame_width.round(),
        height: frame_height.round(),
    })
}


// ============================================================================
// Property-Based Tests
// ============================================================================
