//! Artifact types and upload requirements.
//!
//! The artifact type decides the crop frame's aspect ratio and the pixel
//! dimensions the backend renders to. Target sizes are physical card sizes
//! printed at 200 DPI:
//!
//! | Artifact   | Size          | Pixels  |
//! |------------|---------------|---------|
//! | Photograph | 2.5 x 3.5 cm  | 197x276 |
//! | Signature  | 4.5 x 2.0 cm  | 354x157 |
//! | Document   | fit to content (PDF) | - |

use crate::geometry::PixelSize;
use serde::{Deserialize, Serialize};

/// Output resolution for photographs and signatures.
pub const TARGET_DPI: f64 = 200.0;

const CM_PER_INCH: f64 = 2.54;

/// Limits for the KB editor's target size slider.
pub const KB_MODE_MIN_KB: u32 = 10;
pub const KB_MODE_MAX_KB: u32 = 500;

/// Limits for the PDF editor's target size slider.
pub const PDF_MODE_MIN_KB: u32 = 50;
pub const PDF_MODE_MAX_KB: u32 = 2048;

/// Default size limit for photographs and signatures.
pub const DEFAULT_MAX_KB: u32 = 50;

/// Convert a physical length to pixels at [`TARGET_DPI`].
fn cm_to_px(cm: f64) -> u32 {
    (cm / CM_PER_INCH * TARGET_DPI).round() as u32
}

/// What the user is preparing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum ArtifactType {
    #[default]
    Photograph,
    Signature,
    Document,
}

impl ArtifactType {
    /// Physical size in centimetres (width, height), if fixed.
    pub fn physical_cm(self) -> Option<(f64, f64)> {
        match self {
            ArtifactType::Photograph => Some((2.5, 3.5)),
            ArtifactType::Signature => Some((4.5, 2.0)),
            ArtifactType::Document => None,
        }
    }

    /// Width/height ratio of the crop frame. Documents are unconstrained and
    /// use a square frame.
    pub fn target_aspect(self) -> f64 {
        match self.physical_cm() {
            Some((w, h)) => w / h,
            None => 1.0,
        }
    }

    /// Rendered output size in pixels, if fixed.
    pub fn target_pixels(self) -> Option<PixelSize> {
        self.physical_cm()
            .map(|(w, h)| PixelSize::new(cm_to_px(w), cm_to_px(h)))
    }

    /// Human readable description of the output, e.g. `197 x 276px`.
    pub fn target_label(self) -> String {
        match self.target_pixels() {
            Some(px) => format!("{} x {}px", px.width, px.height),
            None => "PDF (A4/fit-to-content)".to_string(),
        }
    }
}

/// Government portal the artifact is prepared for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Application {
    #[default]
    #[serde(rename = "NSDL")]
    Nsdl,
    #[serde(rename = "UTI")]
    Uti,
}

/// Whether to resize the whole image or only the framed selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum ResizeMode {
    Original,
    #[default]
    Selected,
}

/// Top-level editor mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EditorMode {
    /// Photograph/signature/document preparation with the crop editor
    #[default]
    Pan,
    /// Single image compressed to a chosen size
    Kb,
    /// Several files combined into one PDF of a chosen size
    Pdf,
}

/// The user's output requirements.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Requirements {
    pub application: Application,
    #[serde(rename = "type")]
    pub artifact: ArtifactType,
    pub resize_mode: ResizeMode,
    pub max_kb: u32,
}

impl Default for Requirements {
    fn default() -> Self {
        Self {
            application: Application::Nsdl,
            artifact: ArtifactType::Photograph,
            resize_mode: ResizeMode::Selected,
            max_kb: DEFAULT_MAX_KB,
        }
    }
}

impl Requirements {
    /// True when the crop frame is shown and a crop rectangle is sent.
    pub fn has_frame(&self) -> bool {
        self.artifact != ArtifactType::Document && self.resize_mode == ResizeMode::Selected
    }

    pub fn target_aspect(&self) -> f64 {
        self.artifact.target_aspect()
    }

    /// Requirements after switching the editor into `mode`.
    pub fn for_mode(self, mode: EditorMode) -> Self {
        match mode {
            EditorMode::Pan => self,
            EditorMode::Kb => Self {
                artifact: ArtifactType::Photograph,
                resize_mode: ResizeMode::Selected,
                max_kb: if self.max_kb > 0 { self.max_kb } else { 100 },
                ..self
            },
            EditorMode::Pdf => Self {
                artifact: ArtifactType::Document,
                resize_mode: ResizeMode::Original,
                max_kb: 250,
                ..self
            },
        }
    }

    /// Select a portal. NSDL only accepts the default size limit.
    pub fn with_application(self, application: Application) -> Self {
        let max_kb = match application {
            Application::Nsdl => DEFAULT_MAX_KB,
            Application::Uti => self.max_kb,
        };
        Self {
            application,
            max_kb,
            ..self
        }
    }

    /// Select an artifact type, resetting the size limit to one the portal
    /// accepts for it.
    pub fn with_artifact(self, artifact: ArtifactType) -> Self {
        let max_kb = match artifact {
            ArtifactType::Document => PDF_MODE_MAX_KB,
            ArtifactType::Photograph => safe_photo_max_kb(self.max_kb, self.application),
            ArtifactType::Signature => DEFAULT_MAX_KB,
        };
        Self {
            artifact,
            max_kb,
            ..self
        }
    }

    pub fn with_resize_mode(self, resize_mode: ResizeMode) -> Self {
        Self {
            resize_mode,
            ..self
        }
    }

    /// Set the size limit within the bounds of `mode`.
    ///
    /// KB and PDF modes clamp the value and force their artifact type; the
    /// PAN editor only offers fixed presets, so the value is taken as is.
    pub fn with_max_kb(self, mode: EditorMode, max_kb: u32) -> Self {
        match mode {
            EditorMode::Kb => Self {
                artifact: ArtifactType::Photograph,
                max_kb: max_kb.clamp(KB_MODE_MIN_KB, KB_MODE_MAX_KB),
                ..self
            },
            EditorMode::Pdf => Self {
                artifact: ArtifactType::Document,
                max_kb: max_kb.clamp(PDF_MODE_MIN_KB, PDF_MODE_MAX_KB),
                ..self
            },
            EditorMode::Pan => Self { max_kb, ..self },
        }
    }
}

/// UTI accepts 30 KB or 50 KB photographs; NSDL only 50 KB.
fn safe_photo_max_kb(current: u32, application: Application) -> u32 {
    match application {
        Application::Nsdl => DEFAULT_MAX_KB,
        Application::Uti if current == 30 || current == 50 => current,
        Application::Uti => DEFAULT_MAX_KB,
    }
}

/// File name offered for a downloaded render.
pub fn download_filename(mode: EditorMode, requirements: &Requirements) -> String {
    match mode {
        EditorMode::Kb => format!("pan-photo-{}kb.jpg", requirements.max_kb),
        EditorMode::Pdf => format!("pan-documents-{}kb.pdf", requirements.max_kb),
        EditorMode::Pan => match requirements.artifact {
            ArtifactType::Photograph => "pan-photo.jpg".to_string(),
            ArtifactType::Signature => "pan-signature.jpg".to_string(),
            ArtifactType::Document => "pan-document.jpg".to_string(),
        },
    }
}

/// Whether a selected file may be uploaded in `mode`.
///
/// The KB editor takes a single JPEG or PNG image; the other modes also
/// accept PDFs.
pub fn accepts_upload(mode: EditorMode, file_name: &str, mime: &str) -> bool {
    let name = file_name.to_ascii_lowercase();
    let is_image = mime.starts_with("image/")
        || name.ends_with(".jpg")
        || name.ends_with(".jpeg")
        || name.ends_with(".png");
    let is_pdf = mime == "application/pdf" || name.ends_with(".pdf");

    match mode {
        EditorMode::Kb => is_image,
        EditorMode::Pan | EditorMode::Pdf => is_image || is_pdf,
    }
}

/// Maximum number of files selectable in `mode`.
pub fn max_upload_files(mode: EditorMode) -> Option<usize> {
    match mode {
        EditorMode::Kb => Some(1),
        EditorMode::Pan | EditorMode::Pdf => None,
    }
}
