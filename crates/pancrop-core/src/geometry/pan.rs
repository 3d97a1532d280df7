//! Pan clamping and centering.
//!
//! The preview image is scaled by `zoom` from its top-left corner and then
//! offset by `pan`. These helpers keep that offset inside the range where
//! the pointer frame is fully covered by image pixels.

use super::{clamp_f64, Point, Rect, Size};

/// Clamp a pan offset so the frame never shows space outside the image.
///
/// With the image scaled to `viewport * zoom`, the valid horizontal range is
/// `[frame.right() - scaled_width, frame.x]` and likewise vertically. Bounds
/// are ordered with min/max first because a scaled image narrower than the
/// frame inverts them.
///
/// Returns `pan` unchanged while the viewport is unmeasured.
pub fn clamp_pan(pan: Point, frame: &Rect, viewport: Size, zoom: f64) -> Point {
    if !viewport.is_measured() {
        return pan;
    }

    let scaled_width = viewport.width * zoom;
    let scaled_height = viewport.height * zoom;

    let min_x = frame.right() - scaled_width;
    let max_x = frame.x;
    let min_y = frame.bottom() - scaled_height;
    let max_y = frame.y;

    Point {
        x: clamp_f64(pan.x, min_x.min(max_x), min_x.max(max_x)),
        y: clamp_f64(pan.y, min_y.min(max_y), min_y.max(max_y)),
    }
}

/// Pan that centers the scaled image on the viewport, then clamped.
///
/// Used to establish a deterministic starting view whenever the source image,
/// its rotation, or the viewport changes.
pub fn centered_pan(frame: &Rect, viewport: Size, zoom: f64) -> Point {
    let centered = Point {
        x: (viewport.width - viewport.width * zoom) / 2.0,
        y: (viewport.height - viewport.height * zoom) / 2.0,
    };
    clamp_pan(centered, frame, viewport, zoom)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::compute_pointer_frame;

    fn frame_400x300() -> Rect {
        compute_pointer_frame(Size::new(400.0, 300.0), 2.5 / 3.5).unwrap()
    }

    #[test]
    fn test_clamp_pan_unmeasured_passthrough() {
        let pan = Point::new(123.0, -45.0);
        let frame = Rect::new(10.0, 10.0, 20.0, 20.0);
        assert_eq!(clamp_pan(pan, &frame, Size::default(), 1.0), pan);
    }

    #[test]
    fn test_zoom_one_clamps_to_frame_edges() {
        let viewport = Size::new(400.0, 300.0);
        let frame = frame_400x300();
        let pan = clamp_pan(Point::new(500.0, 500.0), &frame, viewport, 1.0);
        assert_eq!(pan, Point::new(frame.x, frame.y));

        let pan = clamp_pan(Point::new(-500.0, -500.0), &frame, viewport, 1.0);
        assert_eq!(pan, Point::new(frame.right() - 400.0, frame.bottom() - 300.0));
    }

    #[test]
    fn test_centered_pan_at_zoom_one_is_origin() {
        let viewport = Size::new(400.0, 300.0);
        let pan = centered_pan(&frame_400x300(), viewport, 1.0);
        assert_eq!(pan, Point::ORIGIN);
    }

    #[test]
    fn test_centered_pan_at_zoom_two() {
        let viewport = Size::new(400.0, 300.0);
        let pan = centered_pan(&frame_400x300(), viewport, 2.0);
        assert_eq!(pan, Point::new(-200.0, -150.0));
    }

    #[test]
    fn test_pan_within_range_untouched() {
        let viewport = Size::new(400.0, 300.0);
        let frame = frame_400x300();
        let pan = Point::new(-100.0, -50.0);
        assert_eq!(clamp_pan(pan, &frame, viewport, 2.0), pan);
    }

    #[test]
    fn test_inverted_bounds_do_not_panic() {
        // Zoom below 1 makes the scaled image smaller than the frame.
        let viewport = Size::new(400.0, 300.0);
        let frame = frame_400x300();
        let pan = clamp_pan(Point::new(0.0, 0.0), &frame, viewport, 0.1);
        assert!(pan.x.is_finite());
        assert!(pan.y.is_finite());
    }
}

// ============================================================================
// Property-Based Tests
// ============================================================================
