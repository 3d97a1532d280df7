//! Editor session WASM bindings.
//!
//! Wraps the core `EditorSession` so the presentation layer only forwards
//! events (measure, wheel, pointer, buttons) and reads back derived state.
//! Derived values are recomputed from canonical state on every read.

use crate::types::{
    core_error, from_js, from_js_or_default, js_parse, parse_application, parse_artifact,
    parse_mode, parse_resize_mode, to_js,
};
use pancrop_core::editor::ImageMeta;
use pancrop_core::geometry::{PixelSize, Point, Rotation, Size};
use pancrop_core::{download_filename, EditorConfig, EditorMode, Requirements, UploadResponse};
use wasm_bindgen::prelude::*;

/// Crop editor session for JavaScript
#[wasm_bindgen]
pub struct EditorSession {
    inner: pancrop_core::EditorSession,
}

impl EditorSession {
    pub(crate) fn inner(&self) -> &pancrop_core::EditorSession {
        &self.inner
    }
}

#[wasm_bindgen]
impl EditorSession {
    /// Create a session from an optional, partial configuration object.
    #[wasm_bindgen(constructor)]
    pub fn new(config: JsValue) -> Result<EditorSession, JsValue> {
        let config: EditorConfig = from_js_or_default(config)?;
        let inner = pancrop_core::EditorSession::new(config).map_err(core_error)?;
        Ok(Self { inner })
    }

    // ------------------------------------------------------------------
    // Mode and requirements
    // ------------------------------------------------------------------

    /// Switch between `pan`, `kb` and `pdf`
    pub fn set_mode(&mut self, mode: &str) -> Result<(), JsValue> {
        let mode = js_parse(parse_mode(mode))?;
        self.inner.set_mode(mode);
        Ok(())
    }

    #[wasm_bindgen(getter)]
    pub fn mode(&self) -> String {
        match self.inner.mode() {
            EditorMode::Pan => "pan",
            EditorMode::Kb => "kb",
            EditorMode::Pdf => "pdf",
        }
        .to_string()
    }

    /// Current requirements as `{application, type, resizeMode, maxKb}`
    pub fn requirements(&self) -> Result<JsValue, JsValue> {
        to_js(self.inner.requirements())
    }

    /// Replace the requirements wholesale
    pub fn set_requirements(&mut self, requirements: JsValue) -> Result<(), JsValue> {
        let requirements: Requirements = from_js(requirements)?;
        self.inner.set_requirements(requirements);
        Ok(())
    }

    pub fn set_application(&mut self, application: &str) -> Result<(), JsValue> {
        let application = js_parse(parse_application(application))?;
        let next = self.inner.requirements().with_application(application);
        self.inner.set_requirements(next);
        Ok(())
    }

    pub fn set_artifact(&mut self, artifact: &str) -> Result<(), JsValue> {
        let artifact = js_parse(parse_artifact(artifact))?;
        let next = self.inner.requirements().with_artifact(artifact);
        self.inner.set_requirements(next);
        Ok(())
    }

    pub fn set_resize_mode(&mut self, resize_mode: &str) -> Result<(), JsValue> {
        let resize_mode = js_parse(parse_resize_mode(resize_mode))?;
        let next = self.inner.requirements().with_resize_mode(resize_mode);
        self.inner.set_requirements(next);
        Ok(())
    }

    /// Set the size limit, clamped to the current mode's bounds
    pub fn set_max_kb(&mut self, max_kb: u32) {
        let next = self.inner.requirements().with_max_kb(self.inner.mode(), max_kb);
        self.inner.set_requirements(next);
    }

    // ------------------------------------------------------------------
    // Image and viewport
    // ------------------------------------------------------------------

    /// Load the files from an upload response (`{files: [...]}`)
    pub fn set_upload(&mut self, response: JsValue) -> Result<(), JsValue> {
        let response: UploadResponse = from_js(response)?;
        self.inner.set_upload(response).map_err(core_error)
    }

    /// Load a single image directly
    pub fn set_image(&mut self, file_id: String, width: u32, height: u32) {
        self.inner
            .set_image(ImageMeta::new(file_id, PixelSize::new(width, height)));
    }

    /// Report the rendered size of the preview image
    pub fn set_viewport(&mut self, width: f64, height: f64) {
        self.inner.set_viewport(Size::new(width, height));
    }

    // ------------------------------------------------------------------
    // Transform
    // ------------------------------------------------------------------

    pub fn rotate_left(&mut self) {
        self.inner.rotate_left();
    }

    pub fn rotate_right(&mut self) {
        self.inner.rotate_right();
    }

    pub fn set_rotation(&mut self, degrees: i32) {
        self.inner.set_rotation(Rotation::new(degrees));
    }

    pub fn set_zoom(&mut self, zoom: f64) {
        self.inner.set_zoom(zoom);
    }

    pub fn zoom_in(&mut self) {
        self.inner.zoom_in();
    }

    pub fn zoom_out(&mut self) {
        self.inner.zoom_out();
    }

    /// Handle a wheel event. Returns true if the event was consumed and the
    /// page should not scroll.
    pub fn wheel_zoom(&mut self, delta_y: f64) -> bool {
        self.inner.wheel_zoom(delta_y)
    }

    /// Returns true if a drag started (call `setPointerCapture` then)
    pub fn begin_drag(&mut self, x: f64, y: f64) -> bool {
        self.inner.begin_drag(Point::new(x, y))
    }

    pub fn drag_to(&mut self, x: f64, y: f64) -> bool {
        self.inner.drag_to(Point::new(x, y))
    }

    pub fn end_drag(&mut self) {
        self.inner.end_drag();
    }

    pub fn cancel_drag(&mut self) {
        self.inner.cancel_drag();
    }

    /// Back to rotation 0, zoom 1, default filters
    pub fn reset(&mut self) {
        self.inner.reset();
    }

    // ------------------------------------------------------------------
    // Preview filters
    // ------------------------------------------------------------------

    pub fn set_bw(&mut self, bw: bool) {
        self.inner.filter_mut().bw = bw;
    }

    pub fn set_filters_enabled(&mut self, enabled: bool) {
        self.inner.filter_mut().enabled = enabled;
    }

    pub fn set_brightness(&mut self, value: u32) {
        self.inner.filter_mut().set_brightness(value);
    }

    pub fn set_contrast(&mut self, value: u32) {
        self.inner.filter_mut().set_contrast(value);
    }

    pub fn set_saturation(&mut self, value: u32) {
        self.inner.filter_mut().set_saturation(value);
    }

    // ------------------------------------------------------------------
    // Derived state
    // ------------------------------------------------------------------

    #[wasm_bindgen(getter)]
    pub fn zoom(&self) -> f64 {
        self.inner.transform().zoom
    }

    /// Accumulated rotation in degrees (may be negative or beyond 360)
    #[wasm_bindgen(getter)]
    pub fn rotate(&self) -> i32 {
        self.inner.transform().rotation.degrees()
    }

    /// Rotation in `[0, 360)` for display
    #[wasm_bindgen(getter)]
    pub fn display_rotate(&self) -> i32 {
        self.inner.display_rotation()
    }

    #[wasm_bindgen(getter)]
    pub fn has_frame(&self) -> bool {
        self.inner.has_frame()
    }

    #[wasm_bindgen(getter)]
    pub fn css_filter(&self) -> String {
        self.inner.css_filter()
    }

    #[wasm_bindgen(getter)]
    pub fn download_filename(&self) -> String {
        download_filename(self.inner.mode(), self.inner.requirements())
    }

    pub fn pan(&self) -> Result<JsValue, JsValue> {
        to_js(&self.inner.transform().pan)
    }

    pub fn pointer_frame(&self) -> Result<JsValue, JsValue> {
        to_js(&self.inner.pointer_frame())
    }

    pub fn crop(&self) -> Result<JsValue, JsValue> {
        to_js(&self.inner.crop())
    }

    pub fn crop_coverage_pct(&self) -> Option<f64> {
        self.inner.crop_coverage_pct()
    }

    /// Everything the editor view renders, in one object
    pub fn snapshot(&self) -> Result<JsValue, JsValue> {
        to_js(&self.inner.snapshot())
    }

    /// Body of the next preview request
    pub fn preview_request(&self) -> Result<JsValue, JsValue> {
        let (_, request) = self.inner.preview_request().map_err(core_error)?;
        to_js(&request)
    }

    /// Body of the next size-estimate request
    pub fn size_request(&self) -> Result<JsValue, JsValue> {
        let (_, request) = self.inner.size_request().map_err(core_error)?;
        to_js(&request)
    }

    /// Body of the final render request
    pub fn render_request(&self) -> Result<JsValue, JsValue> {
        let plan = self.inner.render_plan().map_err(core_error)?;
        to_js(&plan.body)
    }
}
