//! Crop editor session.
//!
//! [`EditorSession`] owns the canonical editing state for one uploaded
//! artifact: image metadata, the measured preview size, requirements, and
//! the rotate/zoom/pan transform. The pointer frame and crop rectangle are
//! never stored. They are recomputed from canonical state on every read, so
//! they cannot drift out of sync with it.
//!
//! # View States
//!
//! ```text
//!   Unset ──(image + measured viewport)──> Centered
//!   Centered ──(zoom / drag)──> Interacting
//!   Interacting ──(rotate / new image / resize / reset)──> Centered
//! ```
//!
//! The machine is re-entered from `Centered` for every new image; there is no
//! terminal state.

use std::cell::Cell;

use crate::artifact::{download_filename, ArtifactType, EditorMode, Requirements};
use crate::config::EditorConfig;
use crate::error::{PancropError, Result};
use crate::filter::PreviewFilter;
use crate::geometry::{
    centered_pan, clamp_f64, clamp_pan, compute_crop, compute_pointer_frame_with,
    crop_coverage_pct, CropRect, FrameParams, PixelSize, Point, Rect, Rotation, Size,
};
use crate::wire::{
    DocumentsRequest, Endpoint, FileMeta, PreviewRequest, RenderBody, RenderPlan, RenderRequest,
    SizeRequest, UploadResponse,
};
use serde::Serialize;

/// Source image known to the backend.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageMeta {
    pub file_id: String,
    /// Natural size of the file as uploaded, before rotation
    pub natural: PixelSize,
}

impl ImageMeta {
    pub fn new(file_id: impl Into<String>, natural: PixelSize) -> Self {
        Self {
            file_id: file_id.into(),
            natural,
        }
    }

    /// Build from an upload entry; `None` for files without pixel
    /// dimensions (PDFs).
    pub fn from_file(file: &FileMeta) -> Option<Self> {
        file.dimensions()
            .map(|natural| Self::new(file.file_id.clone(), natural))
    }
}

/// User-controlled transform of the preview.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct TransformState {
    pub rotation: Rotation,
    pub zoom: f64,
    pub pan: Point,
}

impl Default for TransformState {
    fn default() -> Self {
        Self {
            rotation: Rotation::default(),
            zoom: 1.0,
            pan: Point::ORIGIN,
        }
    }
}

/// Pointer drag in progress, if any.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum DragState {
    #[default]
    Idle,
    Dragging { start_point: Point, start_pan: Point },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ViewState {
    /// No frame yet: image, measurement, or a framed artifact is missing
    #[default]
    Unset,
    /// Pan has just been recentered
    Centered,
    /// The user has zoomed or dragged since the last recenter
    Interacting,
}

/// Cached pointer frame, keyed on every input it depends on.
#[derive(Debug, Clone, Copy)]
struct FrameMemo {
    viewport: Size,
    aspect: f64,
    params: FrameParams,
    frame: Option<Rect>,
}

/// Read-only snapshot for the presentation layer.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EditorSnapshot {
    pub view_state: ViewState,
    pub has_frame: bool,
    pub frame: Option<Rect>,
    pub crop: Option<CropRect>,
    pub crop_coverage_pct: Option<f64>,
    pub rotate: i32,
    pub display_rotate: i32,
    pub zoom: f64,
    pub pan: Point,
    pub dragging: bool,
    pub css_filter: String,
    pub target_label: String,
}

#[derive(Debug)]
pub struct EditorSession {
    config: EditorConfig,
    mode: EditorMode,
    requirements: Requirements,
    files: Vec<FileMeta>,
    image: Option<ImageMeta>,
    viewport: Size,
    transform: TransformState,
    drag: DragState,
    view: ViewState,
    filter: PreviewFilter,
    frame_memo: Cell<Option<FrameMemo>>,
}

impl Default for EditorSession {
    fn default() -> Self {
        Self::with_config(EditorConfig::default())
    }
}

impl EditorSession {
    /// Create a session after validating `config`.
    ///
    /// # Errors
    ///
    /// Returns `PancropError::InvalidConfig` if the configuration is unusable.
    pub fn new(config: EditorConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self::with_config(config))
    }

    fn with_config(config: EditorConfig) -> Self {
        Self {
            config,
            mode: EditorMode::default(),
            requirements: Requirements::default(),
            files: Vec::new(),
            image: None,
            viewport: Size::default(),
            transform: TransformState::default(),
            drag: DragState::Idle,
            view: ViewState::Unset,
            filter: PreviewFilter::default(),
            frame_memo: Cell::new(None),
        }
    }

    pub fn config(&self) -> &EditorConfig {
        &self.config
    }

    pub fn mode(&self) -> EditorMode {
        self.mode
    }

    pub fn requirements(&self) -> &Requirements {
        &self.requirements
    }

    pub fn image(&self) -> Option<&ImageMeta> {
        self.image.as_ref()
    }

    pub fn files(&self) -> &[FileMeta] {
        &self.files
    }

    pub fn viewport(&self) -> Size {
        self.viewport
    }

    pub fn transform(&self) -> TransformState {
        self.transform
    }

    pub fn drag(&self) -> DragState {
        self.drag
    }

    pub fn view_state(&self) -> ViewState {
        self.view
    }

    pub fn filter(&self) -> &PreviewFilter {
        &self.filter
    }

    pub fn filter_mut(&mut self) -> &mut PreviewFilter {
        &mut self.filter
    }

    // ------------------------------------------------------------------
    // Canonical state changes
    // ------------------------------------------------------------------

    /// Switch editor mode, applying that mode's requirement defaults.
    ///
    /// Uploads from the previous mode are dropped.
    pub fn set_mode(&mut self, mode: EditorMode) {
        if mode == self.mode {
            return;
        }
        tracing::debug!(?mode, "switching editor mode");
        self.mode = mode;
        self.requirements = self.requirements.for_mode(mode);
        self.files.clear();
        self.image = None;
        self.transform = TransformState::default();
        self.filter = PreviewFilter::default();
        self.recenter();
    }

    /// Replace the requirements. A new artifact type changes the frame
    /// aspect, so the view is recentered.
    pub fn set_requirements(&mut self, requirements: Requirements) {
        if requirements == self.requirements {
            return;
        }
        let reframe = requirements.artifact != self.requirements.artifact
            || requirements.has_frame() != self.requirements.has_frame();
        self.requirements = requirements;
        if reframe {
            self.recenter();
        }
    }

    /// Register the files returned by an upload and load the first one.
    ///
    /// # Errors
    ///
    /// Returns `PancropError::EmptyUpload` if the response has no files.
    pub fn set_upload(&mut self, upload: UploadResponse) -> Result<()> {
        let image = ImageMeta::from_file(upload.primary()?);
        self.files = upload.files;
        match image {
            Some(image) => self.set_image(image),
            None => {
                self.image = None;
                self.reset_transform();
                self.recenter();
            }
        }
        Ok(())
    }

    /// Load a new source image with an identity transform.
    pub fn set_image(&mut self, image: ImageMeta) {
        if self.image.as_ref() == Some(&image) {
            return;
        }
        tracing::debug!(file_id = %image.file_id, width = image.natural.width, height = image.natural.height, "new source image");
        self.image = Some(image);
        self.reset_transform();
        self.recenter();
    }

    /// Record the rendered size of the preview image.
    ///
    /// A size change moves the frame, so the pan is recentered at the
    /// current zoom.
    pub fn set_viewport(&mut self, viewport: Size) {
        if viewport == self.viewport {
            return;
        }
        tracing::trace!(width = viewport.width, height = viewport.height, "viewport resized");
        self.viewport = viewport;
        self.drag = DragState::Idle;
        self.recenter();
    }

    pub fn rotate_left(&mut self) {
        self.set_rotation(self.transform.rotation.rotate_left());
    }

    pub fn rotate_right(&mut self) {
        self.set_rotation(self.transform.rotation.rotate_right());
    }

    /// Change rotation. Zoom returns to 1 and the view is recentered.
    pub fn set_rotation(&mut self, rotation: Rotation) {
        if rotation == self.transform.rotation {
            return;
        }
        tracing::debug!(rotate = rotation.degrees(), "rotation changed");
        self.transform.rotation = rotation;
        self.transform.zoom = clamp_f64(1.0, self.config.zoom_min, self.config.zoom_max);
        self.drag = DragState::Idle;
        self.recenter();
    }

    /// Set zoom, clamped to the configured bounds. Non-finite input is
    /// ignored. The pan is re-clamped, not recentered.
    pub fn set_zoom(&mut self, zoom: f64) {
        if !zoom.is_finite() {
            return;
        }
        let zoom = clamp_f64(zoom, self.config.zoom_min, self.config.zoom_max);
        if zoom == self.transform.zoom {
            return;
        }
        self.transform.zoom = zoom;
        if let Some(frame) = self.pointer_frame() {
            self.transform.pan = clamp_pan(self.transform.pan, &frame, self.viewport, zoom);
            self.view = ViewState::Interacting;
        }
    }

    /// Change zoom by `delta`, rounded to two decimals.
    pub fn zoom_by(&mut self, delta: f64) {
        self.set_zoom(round2(self.transform.zoom + delta));
    }

    pub fn zoom_in(&mut self) {
        self.zoom_by(self.config.button_step);
    }

    pub fn zoom_out(&mut self) {
        self.zoom_by(-self.config.button_step);
    }

    /// Apply one mouse wheel notch. Scrolling down zooms out.
    ///
    /// Returns false (and does nothing) when no frame is shown, so the
    /// caller can let the page scroll instead.
    pub fn wheel_zoom(&mut self, delta_y: f64) -> bool {
        if !self.has_frame() {
            return false;
        }
        let step = self.config.wheel_step;
        self.zoom_by(if delta_y > 0.0 { -step } else { step });
        true
    }

    /// Start a pan drag at `point` (viewport coordinates).
    ///
    /// Returns false when there is no frame to pan under.
    pub fn begin_drag(&mut self, point: Point) -> bool {
        if self.pointer_frame().is_none() {
            return false;
        }
        self.drag = DragState::Dragging {
            start_point: point,
            start_pan: self.transform.pan,
        };
        self.view = ViewState::Interacting;
        true
    }

    /// Move an active drag to `point`. Returns false when no drag is active.
    pub fn drag_to(&mut self, point: Point) -> bool {
        let DragState::Dragging {
            start_point,
            start_pan,
        } = self.drag
        else {
            return false;
        };
        let Some(frame) = self.pointer_frame() else {
            return false;
        };
        let next = Point::new(
            start_pan.x + (point.x - start_point.x),
            start_pan.y + (point.y - start_point.y),
        );
        self.transform.pan = clamp_pan(next, &frame, self.viewport, self.transform.zoom);
        true
    }

    /// Finish or cancel a drag, keeping the pan reached so far.
    pub fn end_drag(&mut self) {
        self.drag = DragState::Idle;
    }

    /// Abandon a drag (pointer cancelled), returning to the pan it started at.
    pub fn cancel_drag(&mut self) {
        if let DragState::Dragging { start_pan, .. } = self.drag {
            self.transform.pan = start_pan;
        }
        self.drag = DragState::Idle;
    }

    /// Return rotation, zoom and filters to their defaults and recenter.
    pub fn reset(&mut self) {
        tracing::debug!("editor reset");
        self.reset_transform();
        self.filter = PreviewFilter::default();
        self.recenter();
    }

    fn reset_transform(&mut self) {
        self.transform = TransformState {
            zoom: clamp_f64(1.0, self.config.zoom_min, self.config.zoom_max),
            ..TransformState::default()
        };
        self.drag = DragState::Idle;
    }

    /// Re-establish the deterministic centered view for the current state.
    fn recenter(&mut self) {
        match self.pointer_frame() {
            Some(frame) => {
                self.transform.pan = centered_pan(&frame, self.viewport, self.transform.zoom);
                self.view = ViewState::Centered;
                tracing::trace!(x = self.transform.pan.x, y = self.transform.pan.y, "pan recentered");
            }
            None => {
                self.transform.pan = Point::ORIGIN;
                self.view = ViewState::Unset;
            }
        }
    }

    // ------------------------------------------------------------------
    // Derived state
    // ------------------------------------------------------------------

    /// True when the crop editor shows a frame for this mode and artifact.
    pub fn has_frame(&self) -> bool {
        self.mode == EditorMode::Pan && self.requirements.has_frame()
    }

    /// Current pointer frame, or `None` when no frame is shown or the
    /// viewport has not been measured.
    pub fn pointer_frame(&self) -> Option<Rect> {
        if !self.has_frame() || self.image.is_none() {
            return None;
        }
        let aspect = self.requirements.target_aspect();
        let params = self.config.frame_params();

        if let Some(memo) = self.frame_memo.get() {
            if memo.viewport == self.viewport && memo.aspect == aspect && memo.params == params {
                return memo.frame;
            }
        }

        let frame = compute_pointer_frame_with(self.viewport, aspect, &params);
        self.frame_memo.set(Some(FrameMemo {
            viewport: self.viewport,
            aspect,
            params,
            frame,
        }));
        frame
    }

    /// Source dimensions after rotation.
    pub fn rotated_dims(&self) -> Option<PixelSize> {
        self.image
            .as_ref()
            .map(|image| self.transform.rotation.rotated_dims(image.natural))
    }

    /// Crop rectangle in rotated source pixels for the current view.
    pub fn crop(&self) -> Option<CropRect> {
        let frame = self.pointer_frame()?;
        let rotated = self.rotated_dims()?;
        compute_crop(
            &frame,
            self.viewport,
            rotated,
            self.transform.pan,
            self.transform.zoom,
        )
    }

    pub fn crop_coverage_pct(&self) -> Option<f64> {
        crop_coverage_pct(&self.crop()?, self.rotated_dims()?)
    }

    /// Rotation in `[0, 360)` for display.
    pub fn display_rotation(&self) -> i32 {
        self.transform.rotation.normalized()
    }

    pub fn css_filter(&self) -> String {
        self.filter.css()
    }

    pub fn snapshot(&self) -> EditorSnapshot {
        EditorSnapshot {
            view_state: self.view,
            has_frame: self.has_frame(),
            frame: self.pointer_frame(),
            crop: self.crop(),
            crop_coverage_pct: self.crop_coverage_pct(),
            rotate: self.transform.rotation.degrees(),
            display_rotate: self.display_rotation(),
            zoom: self.transform.zoom,
            pan: self.transform.pan,
            dragging: matches!(self.drag, DragState::Dragging { .. }),
            css_filter: self.css_filter(),
            target_label: self.requirements.artifact.target_label(),
        }
    }

    // ------------------------------------------------------------------
    // Backend payloads
    // ------------------------------------------------------------------

    fn require_image(&self) -> Result<&ImageMeta> {
        self.image.as_ref().ok_or(PancropError::NoImage)
    }

    /// Rotation sent to the backend. The KB editor always works on the
    /// upright source.
    fn backend_rotation(&self) -> Rotation {
        match self.mode {
            EditorMode::Kb => Rotation::default(),
            _ => self.transform.rotation,
        }
    }

    /// Preview of the rotated source. The backend preview is always
    /// unzoomed and uncropped; zoom and pan are applied on screen.
    pub fn preview_request(&self) -> Result<(Endpoint, PreviewRequest)> {
        let image = self.require_image()?;
        Ok((
            Endpoint::preview(self.mode),
            PreviewRequest {
                file_id: image.file_id.clone(),
                rotate: self.backend_rotation(),
                zoom: 1.0,
                crop: None,
            },
        ))
    }

    /// Size estimate for the KB editor's current limit.
    pub fn size_request(&self) -> Result<(Endpoint, SizeRequest)> {
        let image = self.require_image()?;
        Ok((
            Endpoint::KbSizePhoto,
            SizeRequest {
                file_id: image.file_id.clone(),
                rotate: self.backend_rotation(),
                crop: self.crop(),
                max_kb: self.requirements.max_kb,
            },
        ))
    }

    /// Request for the final download in the current mode.
    ///
    /// # Errors
    ///
    /// - `PancropError::EmptyUpload` for document renders with no uploads
    /// - `PancropError::NoImage` for image renders without a source image
    pub fn render_plan(&self) -> Result<RenderPlan> {
        let filename = download_filename(self.mode, &self.requirements);
        let artifact = self.requirements.artifact;

        let documents = |max_kb: Option<u32>| -> Result<RenderBody> {
            if self.files.is_empty() {
                return Err(PancropError::EmptyUpload);
            }
            Ok(RenderBody::Documents(DocumentsRequest {
                file_ids: self.files.iter().map(|f| f.file_id.clone()).collect(),
                max_kb,
            }))
        };

        let (endpoint, body) = match (self.mode, artifact) {
            (EditorMode::Pdf, _) => (
                Endpoint::PdfRenderDocuments,
                documents(Some(self.requirements.max_kb))?,
            ),
            (_, ArtifactType::Document) => (Endpoint::RenderDocumentImage, documents(None)?),
            (mode, artifact) => {
                let image = self.require_image()?;
                let is_signature = artifact == ArtifactType::Signature;
                (
                    Endpoint::render(mode, artifact),
                    RenderBody::Image(RenderRequest {
                        file_id: image.file_id.clone(),
                        rotate: self.backend_rotation(),
                        crop: self.crop(),
                        max_kb: (!is_signature).then_some(self.requirements.max_kb),
                        bw: is_signature.then_some(self.filter.bw),
                    }),
                )
            }
        };

        Ok(RenderPlan {
            endpoint,
            body,
            filename,
        })
    }
}

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::artifact::{ResizeMode, Requirements};

    fn photo_session(viewport: Size, natural: PixelSize) -> EditorSession {
        let mut session = EditorSession::default();
        session.set_image(ImageMeta::new("img-1", natural));
        session.set_viewport(viewport);
        session
    }

    #[test]
    fn test_unset_until_measured() {
        let mut session = EditorSession::default();
        assert_eq!(session.view_state(), ViewState::Unset);
        assert!(session.pointer_frame().is_none());

        session.set_image(ImageMeta::new("a", PixelSize::new(400, 300)));
        assert_eq!(session.view_state(), ViewState::Unset);
        assert!(session.crop().is_none());

        session.set_viewport(Size::new(400.0, 300.0));
        assert_eq!(session.view_state(), ViewState::Centered);
        assert!(session.crop().is_some());
    }

    #[test]
    fn test_identity_crop_matches_frame() {
        let session = photo_session(Size::new(400.0, 300.0), PixelSize::new(400, 300));
        assert_eq!(
            session.pointer_frame(),
            Some(Rect::new(114.0, 30.0, 171.0, 240.0))
        );
        assert_eq!(session.crop(), Some(CropRect::new(114, 30, 171, 240)));
    }

    #[test]
    fn test_zoom_clamps_and_interacts() {
        let mut session = photo_session(Size::new(400.0, 300.0), PixelSize::new(800, 600));
        session.set_zoom(10.0);
        assert_eq!(session.transform().zoom, 3.0);
        assert_eq!(session.view_state(), ViewState::Interacting);

        session.set_zoom(0.2);
        assert_eq!(session.transform().zoom, 1.0);

        session.set_zoom(f64::NAN);
        assert_eq!(session.transform().zoom, 1.0);
    }

    #[test]
    fn test_wheel_zoom_steps() {
        let mut session = photo_session(Size::new(400.0, 300.0), PixelSize::new(800, 600));
        assert!(session.wheel_zoom(-1.0));
        assert_eq!(session.transform().zoom, 1.08);
        assert!(session.wheel_zoom(-1.0));
        assert_eq!(session.transform().zoom, 1.16);
        assert!(session.wheel_zoom(1.0));
        assert_eq!(session.transform().zoom, 1.08);

        session.zoom_in();
        assert_eq!(session.transform().zoom, 1.18);
        session.zoom_out();
        assert_eq!(session.transform().zoom, 1.08);
    }

    #[test]
    fn test_wheel_ignored_without_frame() {
        let mut session = photo_session(Size::new(400.0, 300.0), PixelSize::new(800, 600));
        session.set_requirements(Requirements::default().with_resize_mode(ResizeMode::Original));
        assert!(!session.wheel_zoom(-1.0));
        assert_eq!(session.transform().zoom, 1.0);
        assert!(session.crop().is_none());
        assert_eq!(session.view_state(), ViewState::Unset);
    }

    #[test]
    fn test_drag_pans_and_clamps() {
        let mut session = photo_session(Size::new(400.0, 300.0), PixelSize::new(400, 300));
        session.set_zoom(2.0);
        let start = session.transform().pan;

        assert!(session.begin_drag(Point::new(200.0, 150.0)));
        assert!(session.drag_to(Point::new(230.0, 140.0)));
        let pan = session.transform().pan;
        assert_eq!(pan, Point::new(start.x + 30.0, start.y - 10.0));

        // Dragging far right is stopped at the frame's left edge
        assert!(session.drag_to(Point::new(5000.0, 150.0)));
        let frame = session.pointer_frame().unwrap();
        assert_eq!(session.transform().pan.x, frame.x);

        session.end_drag();
        assert!(!session.drag_to(Point::new(0.0, 0.0)));
        assert_eq!(session.drag(), DragState::Idle);
    }

    #[test]
    fn test_cancel_drag_restores_start_pan() {
        let mut session = photo_session(Size::new(400.0, 300.0), PixelSize::new(400, 300));
        session.set_zoom(2.0);
        let start = session.transform().pan;

        session.begin_drag(Point::new(10.0, 10.0));
        session.drag_to(Point::new(60.0, 40.0));
        assert_ne!(session.transform().pan, start);

        session.cancel_drag();
        assert_eq!(session.transform().pan, start);
        assert_eq!(session.drag(), DragState::Idle);
    }

    #[test]
    fn test_drag_refused_without_frame() {
        let mut session = EditorSession::default();
        assert!(!session.begin_drag(Point::ORIGIN));
        assert_eq!(session.drag(), DragState::Idle);
    }

    #[test]
    fn test_drag_moves_crop() {
        let mut session = photo_session(Size::new(400.0, 300.0), PixelSize::new(400, 300));
        session.set_zoom(2.0);
        let before = session.crop().unwrap();

        session.begin_drag(Point::new(100.0, 100.0));
        session.drag_to(Point::new(80.0, 100.0));
        session.end_drag();
        let after = session.crop().unwrap();

        // Moving the image left by 20 viewport px at zoom 2 shifts the
        // crop right by 10 source px
        assert_eq!(after.x, before.x + 10);
        assert_eq!(after.y, before.y);
    }

    #[test]
    fn test_rotation_resets_zoom_and_recenters() {
        let mut session = photo_session(Size::new(400.0, 300.0), PixelSize::new(800, 600));
        session.set_zoom(2.5);
        session.begin_drag(Point::ORIGIN);
        session.drag_to(Point::new(40.0, 40.0));

        session.rotate_right();
        assert_eq!(session.transform().rotation.degrees(), 90);
        assert_eq!(session.transform().zoom, 1.0);
        assert_eq!(session.view_state(), ViewState::Centered);
        assert_eq!(session.drag(), DragState::Idle);
        assert_eq!(session.rotated_dims(), Some(PixelSize::new(600, 800)));
    }

    #[test]
    fn test_rotate_round_trip_restores_centered_pan() {
        let mut session = photo_session(Size::new(400.0, 300.0), PixelSize::new(800, 600));
        let initial_pan = session.transform().pan;

        session.rotate_right();
        // The re-rendered preview comes back with swapped proportions
        session.set_viewport(Size::new(225.0, 300.0));
        session.rotate_left();
        session.set_viewport(Size::new(400.0, 300.0));

        assert_eq!(session.transform().rotation.degrees(), 0);
        assert_eq!(session.transform().pan, initial_pan);
        assert_eq!(session.crop(), photo_session(Size::new(400.0, 300.0), PixelSize::new(800, 600)).crop());
    }

    #[test]
    fn test_crop_after_rotation_uses_swapped_dims() {
        let mut session = photo_session(Size::new(300.0, 200.0), PixelSize::new(800, 1200));
        session.rotate_right();
        session.set_viewport(Size::new(300.0, 200.0));
        assert_eq!(session.rotated_dims(), Some(PixelSize::new(1200, 800)));

        let crop = session.crop().unwrap();
        assert!(crop.x + crop.width <= 1200);
        assert!(crop.y + crop.height <= 800);
        // Frame height 160 of 200 viewport px -> 640 of 800 source px
        assert_eq!(crop.height, 640);
    }

    #[test]
    fn test_display_rotation() {
        let mut session = EditorSession::default();
        session.rotate_left();
        assert_eq!(session.transform().rotation.degrees(), -90);
        assert_eq!(session.display_rotation(), 270);
    }

    #[test]
    fn test_reset() {
        let mut session = photo_session(Size::new(400.0, 300.0), PixelSize::new(800, 600));
        session.rotate_right();
        session.set_zoom(2.0);
        session.filter_mut().bw = true;

        session.reset();
        assert_eq!(session.transform().rotation.degrees(), 0);
        assert_eq!(session.transform().zoom, 1.0);
        assert_eq!(session.transform().pan, Point::ORIGIN);
        assert_eq!(session.view_state(), ViewState::Centered);
        assert_eq!(session.css_filter(), "none");
    }

    #[test]
    fn test_new_image_resets_transform() {
        let mut session = photo_session(Size::new(400.0, 300.0), PixelSize::new(800, 600));
        session.rotate_right();
        session.set_zoom(2.0);

        session.set_image(ImageMeta::new("img-2", PixelSize::new(1000, 1000)));
        assert_eq!(session.transform(), TransformState::default());
        assert_eq!(session.view_state(), ViewState::Centered);
    }

    #[test]
    fn test_resize_recenters_at_current_zoom() {
        let mut session = photo_session(Size::new(400.0, 300.0), PixelSize::new(800, 600));
        session.set_zoom(2.0);
        session.set_viewport(Size::new(800.0, 600.0));
        assert_eq!(session.transform().zoom, 2.0);
        assert_eq!(session.transform().pan, Point::new(-400.0, -300.0));
        assert_eq!(session.view_state(), ViewState::Centered);
    }

    #[test]
    fn test_frame_is_memoized_and_tracks_inputs() {
        let mut session = photo_session(Size::new(400.0, 300.0), PixelSize::new(800, 600));
        let photo = session.pointer_frame().unwrap();
        assert_eq!(session.pointer_frame(), Some(photo));

        session.set_requirements(Requirements::default().with_artifact(ArtifactType::Signature));
        let signature = session.pointer_frame().unwrap();
        assert_ne!(photo, signature);
        assert!(signature.width > signature.height);
    }

    #[test]
    fn test_invalid_config_rejected() {
        let config = EditorConfig {
            zoom_max: 0.5,
            ..Default::default()
        };
        assert!(EditorSession::new(config).is_err());
        assert!(EditorSession::new(EditorConfig::default()).is_ok());
    }

    #[test]
    fn test_preview_request() {
        let mut session = photo_session(Size::new(400.0, 300.0), PixelSize::new(800, 600));
        session.rotate_left();
        session.set_zoom(2.0);
        let (endpoint, req) = session.preview_request().unwrap();
        assert_eq!(endpoint, Endpoint::Preview);
        assert_eq!(req.file_id, "img-1");
        assert_eq!(req.rotate.degrees(), -90);
        assert_eq!(req.zoom, 1.0);
        assert_eq!(req.crop, None);

        assert!(matches!(
            EditorSession::default().preview_request(),
            Err(PancropError::NoImage)
        ));
    }

    #[test]
    fn test_render_plan_photograph() {
        let session = photo_session(Size::new(400.0, 300.0), PixelSize::new(400, 300));
        let plan = session.render_plan().unwrap();
        assert_eq!(plan.endpoint, Endpoint::RenderPhoto);
        assert_eq!(plan.filename, "pan-photo.jpg");
        match plan.body {
            RenderBody::Image(req) => {
                assert_eq!(req.crop, Some(CropRect::new(114, 30, 171, 240)));
                assert_eq!(req.max_kb, Some(50));
                assert_eq!(req.bw, None);
            }
            other => panic!("unexpected body {:?}", other),
        }
    }

    #[test]
    fn test_render_plan_signature_sends_bw() {
        let mut session = photo_session(Size::new(400.0, 300.0), PixelSize::new(400, 300));
        session.set_requirements(Requirements::default().with_artifact(ArtifactType::Signature));
        session.filter_mut().bw = true;
        let plan = session.render_plan().unwrap();
        assert_eq!(plan.endpoint, Endpoint::RenderSignature);
        match plan.body {
            RenderBody::Image(req) => {
                assert_eq!(req.bw, Some(true));
                assert_eq!(req.max_kb, None);
                assert!(req.crop.is_some());
            }
            other => panic!("unexpected body {:?}", other),
        }
    }

    #[test]
    fn test_render_plan_original_sends_null_crop() {
        let mut session = photo_session(Size::new(400.0, 300.0), PixelSize::new(400, 300));
        session.set_requirements(Requirements::default().with_resize_mode(ResizeMode::Original));
        match session.render_plan().unwrap().body {
            RenderBody::Image(req) => assert_eq!(req.crop, None),
            other => panic!("unexpected body {:?}", other),
        }
    }

    fn upload(files: &[(&str, Option<(u32, u32)>)]) -> UploadResponse {
        UploadResponse {
            files: files
                .iter()
                .map(|(id, dims)| FileMeta {
                    file_id: id.to_string(),
                    original_name: format!("{}.bin", id),
                    width: dims.map(|d| d.0),
                    height: dims.map(|d| d.1),
                })
                .collect(),
        }
    }

    #[test]
    fn test_render_plan_pdf_mode() {
        let mut session = EditorSession::default();
        session.set_mode(EditorMode::Pdf);
        session
            .set_upload(upload(&[("a", None), ("b", Some((100, 100)))]))
            .unwrap();

        let plan = session.render_plan().unwrap();
        assert_eq!(plan.endpoint, Endpoint::PdfRenderDocuments);
        assert_eq!(plan.filename, "pan-documents-250kb.pdf");
        assert_eq!(
            plan.body,
            RenderBody::Documents(DocumentsRequest {
                file_ids: vec!["a".to_string(), "b".to_string()],
                max_kb: Some(250),
            })
        );
    }

    #[test]
    fn test_render_plan_document_image() {
        let mut session = EditorSession::default();
        session.set_requirements(Requirements::default().with_artifact(ArtifactType::Document));
        assert!(matches!(session.render_plan(), Err(PancropError::EmptyUpload)));

        session.set_upload(upload(&[("d", None)])).unwrap();
        let plan = session.render_plan().unwrap();
        assert_eq!(plan.endpoint, Endpoint::RenderDocumentImage);
        assert_eq!(plan.filename, "pan-document.jpg");
    }

    #[test]
    fn test_kb_mode_has_no_frame() {
        let mut session = EditorSession::default();
        session.set_mode(EditorMode::Kb);
        session
            .set_upload(upload(&[("k", Some((640, 480)))]))
            .unwrap();
        session.set_viewport(Size::new(640.0, 480.0));

        assert!(!session.has_frame());
        let (endpoint, req) = session.size_request().unwrap();
        assert_eq!(endpoint, Endpoint::KbSizePhoto);
        assert_eq!(req.crop, None);
        assert_eq!(req.max_kb, 50);

        let plan = session.render_plan().unwrap();
        assert_eq!(plan.endpoint, Endpoint::KbRenderPhoto);
        assert_eq!(plan.filename, "pan-photo-50kb.jpg");
    }

    #[test]
    fn test_kb_mode_sends_upright_source() {
        let mut session = EditorSession::default();
        session.set_mode(EditorMode::Kb);
        session
            .set_upload(upload(&[("k", Some((640, 480)))]))
            .unwrap();
        session.rotate_right();
        assert_eq!(session.transform().rotation.degrees(), 90);

        let (_, req) = session.size_request().unwrap();
        assert_eq!(req.rotate, Rotation::default());
        let (_, preview) = session.preview_request().unwrap();
        assert_eq!(preview.rotate, Rotation::default());
        match session.render_plan().unwrap().body {
            RenderBody::Image(body) => assert_eq!(body.rotate, Rotation::default()),
            other => panic!("expected image render, got {:?}", other),
        }
    }

    #[test]
    fn test_mode_switch_drops_uploads() {
        let mut session = photo_session(Size::new(400.0, 300.0), PixelSize::new(800, 600));
        session.set_mode(EditorMode::Kb);
        assert!(session.image().is_none());
        assert!(session.files().is_empty());
        assert_eq!(session.view_state(), ViewState::Unset);
    }

    #[test]
    fn test_snapshot() {
        let session = photo_session(Size::new(400.0, 300.0), PixelSize::new(400, 300));
        let snap = session.snapshot();
        assert!(snap.has_frame);
        assert_eq!(snap.view_state, ViewState::Centered);
        assert_eq!(snap.crop, Some(CropRect::new(114, 30, 171, 240)));
        assert_eq!(snap.target_label, "197 x 276px");
        assert!(!snap.dragging);

        let json = serde_json::to_value(&snap).unwrap();
        assert_eq!(json["viewState"], "centered");
        assert_eq!(json["displayRotate"], 0);
    }
}

// ============================================================================
// Property-Based Tests
// ============================================================================
