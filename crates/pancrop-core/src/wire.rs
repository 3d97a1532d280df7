//! Request and response bodies for the render backend.
//!
//! Field names are camelCase on the wire and must not change: the backend
//! is a separate service. A missing crop is sent as an explicit `null`,
//! whereas optional limits (`maxKb`, `bw`) are left out entirely.

use crate::artifact::{ArtifactType, EditorMode};
use crate::error::{PancropError, Result};
use crate::geometry::{CropRect, PixelSize, Rotation};
use serde::{Deserialize, Serialize};

/// Backend endpoints, relative to the configured API base.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Endpoint {
    Upload,
    KbUpload,
    Preview,
    KbPreview,
    RenderPhoto,
    KbRenderPhoto,
    KbSizePhoto,
    RenderSignature,
    RenderDocuments,
    RenderDocumentImage,
    PdfRenderDocuments,
}

impl Endpoint {
    pub fn path(self) -> &'static str {
        match self {
            Endpoint::Upload => "/api/upload",
            Endpoint::KbUpload => "/api/kb/upload",
            Endpoint::Preview => "/api/preview",
            Endpoint::KbPreview => "/api/kb/preview",
            Endpoint::RenderPhoto => "/api/render/photo",
            Endpoint::KbRenderPhoto => "/api/kb/render/photo",
            Endpoint::KbSizePhoto => "/api/kb/size/photo",
            Endpoint::RenderSignature => "/api/render/signature",
            Endpoint::RenderDocuments => "/api/render/documents",
            Endpoint::RenderDocumentImage => "/api/render/document-image",
            Endpoint::PdfRenderDocuments => "/api/pdf/render/documents",
        }
    }

    pub fn upload(mode: EditorMode) -> Self {
        match mode {
            EditorMode::Kb => Endpoint::KbUpload,
            EditorMode::Pan | EditorMode::Pdf => Endpoint::Upload,
        }
    }

    pub fn preview(mode: EditorMode) -> Self {
        match mode {
            EditorMode::Kb => Endpoint::KbPreview,
            EditorMode::Pan | EditorMode::Pdf => Endpoint::Preview,
        }
    }

    /// Render endpoint for a single-image artifact in the crop editor.
    pub fn render(mode: EditorMode, artifact: ArtifactType) -> Self {
        match (mode, artifact) {
            (_, ArtifactType::Signature) => Endpoint::RenderSignature,
            (_, ArtifactType::Document) => Endpoint::RenderDocumentImage,
            (EditorMode::Kb, ArtifactType::Photograph) => Endpoint::KbRenderPhoto,
            (_, ArtifactType::Photograph) => Endpoint::RenderPhoto,
        }
    }
}

/// Low-resolution preview of the rotated source.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PreviewRequest {
    pub file_id: String,
    pub rotate: Rotation,
    pub zoom: f64,
    pub crop: Option<CropRect>,
}

/// Final render of a photograph or signature.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RenderRequest {
    pub file_id: String,
    pub rotate: Rotation,
    pub crop: Option<CropRect>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_kb: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bw: Option<bool>,
}

/// Combine several uploads into one document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DocumentsRequest {
    pub file_ids: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_kb: Option<u32>,
}

/// Body of a final render request.
///
/// Untagged, so each variant serializes as its own object.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum RenderBody {
    Image(RenderRequest),
    Documents(DocumentsRequest),
}

/// Everything needed to request and save a final render.
#[derive(Debug, Clone, PartialEq)]
pub struct RenderPlan {
    pub endpoint: Endpoint,
    pub body: RenderBody,
    /// Suggested download file name
    pub filename: String,
}

/// Ask the backend how large a render would be.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SizeRequest {
    pub file_id: String,
    pub rotate: Rotation,
    pub crop: Option<CropRect>,
    pub max_kb: u32,
}

/// Backend size estimate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SizeEstimate {
    pub size_bytes: u64,
    /// False when the backend could not hit the limit and returned its best effort
    pub exact: bool,
}

impl SizeEstimate {
    /// Size in kilobytes with one decimal, e.g. `"48.7"`.
    pub fn kilobytes(&self) -> String {
        format!("{:.1}", self.size_bytes as f64 / 1024.0)
    }
}

/// One uploaded file as registered by the backend.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FileMeta {
    pub file_id: String,
    #[serde(default)]
    pub original_name: String,
    /// Natural width in pixels; absent for PDFs
    #[serde(default)]
    pub width: Option<u32>,
    /// Natural height in pixels; absent for PDFs
    #[serde(default)]
    pub height: Option<u32>,
}

impl FileMeta {
    /// Natural dimensions, when the backend reported both.
    pub fn dimensions(&self) -> Option<PixelSize> {
        match (self.width, self.height) {
            (Some(w), Some(h)) if w > 0 && h > 0 => Some(PixelSize::new(w, h)),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct UploadResponse {
    #[serde(default)]
    pub files: Vec<FileMeta>,
}

impl UploadResponse {
    /// The file edited by the crop editor.
    ///
    /// # Errors
    ///
    /// Returns `PancropError::EmptyUpload` when no file was registered.
    pub fn primary(&self) -> Result<&FileMeta> {
        self.files.first().ok_or(PancropError::EmptyUpload)
    }

    pub fn file_ids(&self) -> Vec<String> {
        self.files.iter().map(|f| f.file_id.clone()).collect()
    }
}

/// JSON error body some endpoints return alongside a failure status.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ErrorBody {
    #[serde(default)]
    pub message: Option<String>,
}

impl ErrorBody {
    /// Extract a non-empty `message` from an error body, tolerating empty or
    /// non-JSON payloads.
    pub fn message_from(body: &str) -> Option<String> {
        serde_json::from_str::<ErrorBody>(body)
            .ok()
            .and_then(|b| b.message)
            .filter(|m| !m.trim().is_empty())
    }
}

/// Decode and sanity-check the body of an upload reply.
///
/// # Errors
///
/// - `PancropError::Json` if the body is not a valid upload response
/// - `PancropError::EmptyUpload` if no files were registered
/// - `PancropError::MalformedResponse` if a file has no id
pub fn decode_upload(body: &str) -> Result<UploadResponse> {
    let response: UploadResponse = serde_json::from_str(body)?;
    if response.files.is_empty() {
        return Err(PancropError::EmptyUpload);
    }
    if let Some(bad) = response.files.iter().find(|f| f.file_id.is_empty()) {
        return Err(PancropError::MalformedResponse(format!(
            "file '{}' has no fileId",
            bad.original_name
        )));
    }
    Ok(response)
}

/// Decode the body of a size-estimate reply.
pub fn decode_size_estimate(body: &str) -> Result<SizeEstimate> {
    Ok(serde_json::from_str(body)?)
}

/// Encode a request body as JSON text.
pub fn encode<T: Serialize>(request: &T) -> Result<String> {
    Ok(serde_json::to_string(request)?)
}
