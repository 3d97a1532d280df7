//! Mapping the pointer frame into source-image pixels.
//!
//! The crop rectangle handed to the render backend is expressed in the pixel
//! space of the image *after* rotation, because the backend rotates first and
//! crops second.
//!
//! # Example
//!
//! ```ignore
//! let frame = compute_pointer_frame(viewport, aspect).unwrap();
//! let rotated = rotation.rotated_dims(source);
//! let crop = compute_crop(&frame, viewport, rotated, pan, zoom);
//! ```

use super::{clamp_f64, PixelSize, Point, Rect, Size};
use serde::{Deserialize, Serialize};

/// Crop rectangle in rotated source-pixel coordinates.
///
/// Always non-empty and inside `[0, width) x [0, height)` of the rotated
/// source image it was computed for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CropRect {
    pub x: u32,
    pub y: u32,
    pub width: u32,
    pub height: u32,
}

impl CropRect {
    pub fn new(x: u32, y: u32, width: u32, height: u32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    pub fn area(&self) -> u64 {
        self.width as u64 * self.height as u64
    }
}

/// Derive the crop rectangle from the current frame, pan and zoom.
///
/// # Arguments
///
/// * `frame` - Pointer frame in viewport space
/// * `viewport` - Rendered size of the preview image
/// * `rotated` - Source dimensions after rotation (swapped for 90/270)
/// * `pan` - Current pan offset in viewport space
/// * `zoom` - Current zoom factor
///
/// # Returns
///
/// `None` when any of the dimensions are unknown or `zoom` is not a positive
/// finite number.
///
/// # Behavior
///
/// - The frame is mapped back through the pan and zoom transform, then scaled
///   per axis from viewport units to source pixels
/// - `x` and `y` are clamped into the image and `width`/`height` to the
///   remaining extent, with a 1 pixel floor
pub fn compute_crop(
    frame: &Rect,
    viewport: Size,
    rotated: PixelSize,
    pan: Point,
    zoom: f64,
) -> Option<CropRect> {
    if !frame.is_usable() || !viewport.is_measured() || rotated.is_empty() {
        return None;
    }
    if !zoom.is_finite() || zoom <= 0.0 {
        return None;
    }

    let src_w = rotated.width as f64;
    let src_h = rotated.height as f64;

    let scale_x = src_w / viewport.width;
    let scale_y = src_h / viewport.height;

    let left = (frame.x - pan.x) / zoom;
    let top = (frame.y - pan.y) / zoom;
    let width = frame.width / zoom;
    let height = frame.height / zoom;

    let x = clamp_f64(left * scale_x, 0.0, src_w - 1.0).round();
    let y = clamp_f64(top * scale_y, 0.0, src_h - 1.0).round();
    // Upper bounds are integral here, so rounding cannot overshoot them.
    let w = clamp_f64(width * scale_x, 1.0, src_w - x).round();
    let h = clamp_f64(height * scale_y, 1.0, src_h - y).round();

    if !(x.is_finite() && y.is_finite() && w.is_finite() && h.is_finite()) {
        return None;
    }

    Some(CropRect {
        x: x as u32,
        y: y as u32,
        width: w as u32,
        height: h as u32,
    })
}

/// Percentage of the rotated image covered by `crop`, clamped to `[0, 100]`.
///
/// Display only; no minimum coverage is enforced anywhere.
pub fn crop_coverage_pct(crop: &CropRect, rotated: PixelSize) -> Option<f64> {
    let total = rotated.area();
    if total == 0 {
        return None;
    }
    let pct = crop.area() as f64 / total as f64 * 100.0;
    Some(pct.clamp(0.0, 100.0))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::{centered_pan, compute_pointer_frame, Rotation};

    #[test]
    fn test_missing_inputs_return_none() {
        let frame = Rect::new(10.0, 10.0, 50.0, 50.0);
        let viewport = Size::new(100.0, 100.0);
        let src = PixelSize::new(100, 100);

        assert!(compute_crop(&Rect::default(), viewport, src, Point::ORIGIN, 1.0).is_none());
        assert!(compute_crop(&frame, Size::default(), src, Point::ORIGIN, 1.0).is_none());
        assert!(compute_crop(&frame, viewport, PixelSize::new(0, 100), Point::ORIGIN, 1.0).is_none());
        assert!(compute_crop(&frame, viewport, src, Point::ORIGIN, 0.0).is_none());
        assert!(compute_crop(&frame, viewport, src, Point::ORIGIN, f64::NAN).is_none());
    }

    #[test]
    fn test_identity_maps_frame_one_to_one() {
        // Viewport equals natural size, zoom 1, centered pan
        let viewport = Size::new(400.0, 300.0);
        let frame = compute_pointer_frame(viewport, 2.5 / 3.5).unwrap();
        let pan = centered_pan(&frame, viewport, 1.0);
        let crop = compute_crop(&frame, viewport, PixelSize::new(400, 300), pan, 1.0).unwrap();

        assert_eq!(crop, CropRect::new(114, 30, 171, 240));
    }

    #[test]
    fn test_scales_to_source_pixels() {
        // Preview rendered at half the natural size
        let viewport = Size::new(400.0, 300.0);
        let frame = Rect::new(100.0, 50.0, 200.0, 200.0);
        let crop = compute_crop(&frame, viewport, PixelSize::new(800, 600), Point::ORIGIN, 1.0).unwrap();

        assert_eq!(crop, CropRect::new(200, 100, 400, 400));
    }

    #[test]
    fn test_zoom_and_pan_invert() {
        let viewport = Size::new(400.0, 400.0);
        let frame = Rect::new(100.0, 100.0, 200.0, 200.0);
        // Zoom 2 centered: image spans [-200, 600], frame shows the middle quarter
        let pan = Point::new(-200.0, -200.0);
        let crop = compute_crop(&frame, viewport, PixelSize::new(400, 400), pan, 2.0).unwrap();

        assert_eq!(crop, CropRect::new(150, 150, 100, 100));
    }

    #[test]
    fn test_rotated_dimensions_drive_scaling() {
        let source = PixelSize::new(800, 1200);
        let rotated = Rotation::new(90).rotated_dims(source);
        assert_eq!(rotated, PixelSize::new(1200, 800));

        // Preview of the rotated image at 600x400
        let viewport = Size::new(600.0, 400.0);
        let frame = Rect::new(0.0, 0.0, 600.0, 400.0);
        let crop = compute_crop(&frame, viewport, rotated, Point::ORIGIN, 1.0).unwrap();

        assert_eq!(crop, CropRect::new(0, 0, 1200, 800));
    }

    #[test]
    fn test_out_of_bounds_pan_is_clamped() {
        let viewport = Size::new(100.0, 100.0);
        let frame = Rect::new(10.0, 10.0, 80.0, 80.0);
        let crop = compute_crop(&frame, viewport, PixelSize::new(100, 100), Point::new(5000.0, 5000.0), 1.0)
            .unwrap();

        assert_eq!(crop.x, 0);
        assert_eq!(crop.y, 0);
        assert!(crop.width >= 1);

        let crop = compute_crop(&frame, viewport, PixelSize::new(100, 100), Point::new(-5000.0, -5000.0), 1.0)
            .unwrap();
        assert_eq!(crop.x, 99);
        assert_eq!(crop.y, 99);
        assert_eq!(crop.width, 1);
        assert_eq!(crop.height, 1);
    }

    #[test]
    fn test_single_pixel_source() {
        let viewport = Size::new(100.0, 100.0);
        let frame = Rect::new(10.0, 10.0, 80.0, 80.0);
        let crop = compute_crop(&frame, viewport, PixelSize::new(1, 1), Point::ORIGIN, 3.0).unwrap();
        assert_eq!(crop, CropRect::new(0, 0, 1, 1));
    }

    #[test]
    fn test_coverage() {
        let crop = CropRect::new(0, 0, 50, 50);
        let pct = crop_coverage_pct(&crop, PixelSize::new(100, 100)).unwrap();
        assert!((pct - 25.0).abs() < 1e-9);
        assert!(crop_coverage_pct(&crop, PixelSize::new(0, 100)).is_none());
    }
}

// ============================================================================
// Property-Based Tests
// ============================================================================
