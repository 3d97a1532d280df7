//! Geometry WASM bindings.
//!
//! Stateless versions of the editor's geometry, for callers that keep their
//! own state. Rectangles and points are passed as `{x, y, width, height}` and
//! `{x, y}` objects; viewport sizes as two numbers.

use crate::types::{from_js, js_parse, parse_artifact, to_js};
use pancrop_core::geometry::{self, PixelSize, Point, Rect, Rotation, Size};
use wasm_bindgen::prelude::*;

/// Compute the pointer frame for a measured preview.
///
/// # Arguments
/// * `viewport_width` - Rendered preview width in CSS pixels
/// * `viewport_height` - Rendered preview height in CSS pixels
/// * `aspect` - Target width/height ratio
///
/// # Returns
/// A `{x, y, width, height}` object, or `null` while unmeasured.
#[wasm_bindgen]
pub fn compute_pointer_frame(
    viewport_width: f64,
    viewport_height: f64,
    aspect: f64,
) -> Result<JsValue, JsValue> {
    let frame = geometry::compute_pointer_frame(Size::new(viewport_width, viewport_height), aspect);
    to_js(&frame)
}

/// Clamp a pan offset so the zoomed image still covers the frame.
#[wasm_bindgen]
pub fn clamp_pan(
    pan: JsValue,
    frame: JsValue,
    viewport_width: f64,
    viewport_height: f64,
    zoom: f64,
) -> Result<JsValue, JsValue> {
    let pan: Point = from_js(pan)?;
    let frame: Rect = from_js(frame)?;
    let clamped = geometry::clamp_pan(pan, &frame, Size::new(viewport_width, viewport_height), zoom);
    to_js(&clamped)
}

/// Pan offset that centers the zoomed image, clamped.
#[wasm_bindgen]
pub fn centered_pan(
    frame: JsValue,
    viewport_width: f64,
    viewport_height: f64,
    zoom: f64,
) -> Result<JsValue, JsValue> {
    let frame: Rect = from_js(frame)?;
    to_js(&geometry::centered_pan(
        &frame,
        Size::new(viewport_width, viewport_height),
        zoom,
    ))
}

/// Crop rectangle in source pixels.
///
/// # Arguments
/// * `frame` - Pointer frame object
/// * `viewport_width`, `viewport_height` - Rendered preview size
/// * `rotated_width`, `rotated_height` - Source size after rotation
/// * `pan` - Current pan offset object
/// * `zoom` - Current zoom factor
///
/// # Returns
/// A `{x, y, width, height}` object of integers, or `null`.
#[wasm_bindgen]
#[allow(clippy::too_many_arguments)]
pub fn compute_crop(
    frame: JsValue,
    viewport_width: f64,
    viewport_height: f64,
    rotated_width: u32,
    rotated_height: u32,
    pan: JsValue,
    zoom: f64,
) -> Result<JsValue, JsValue> {
    let frame: Rect = from_js(frame)?;
    let pan: Point = from_js(pan)?;
    let crop = geometry::compute_crop(
        &frame,
        Size::new(viewport_width, viewport_height),
        PixelSize::new(rotated_width, rotated_height),
        pan,
        zoom,
    );
    to_js(&crop)
}

/// Source dimensions after rotating by `rotate` degrees, as `{width, height}`.
#[wasm_bindgen]
pub fn rotated_dims(width: u32, height: u32, rotate: i32) -> Result<JsValue, JsValue> {
    to_js(&Rotation::new(rotate).rotated_dims(PixelSize::new(width, height)))
}

/// Frame aspect ratio for an artifact type (`photograph`, `signature`, `document`).
#[wasm_bindgen]
pub fn target_aspect(artifact: &str) -> Result<f64, JsValue> {
    Ok(js_parse(parse_artifact(artifact))?.target_aspect())
}

/// Rendered output size for an artifact type, or `null` for documents.
#[wasm_bindgen]
pub fn target_pixels(artifact: &str) -> Result<JsValue, JsValue> {
    to_js(&js_parse(parse_artifact(artifact))?.target_pixels())
}

/// Output description shown next to the editor, e.g. `197 x 276px`.
#[wasm_bindgen]
pub fn target_label(artifact: &str) -> Result<String, JsValue> {
    Ok(js_parse(parse_artifact(artifact))?.target_label())
}
