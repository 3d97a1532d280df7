//! Error types for the crop editor core.
//!
//! Geometry never fails; it degrades to `None`. Errors only come from
//! configuration, from building backend payloads before an image is known,
//! and from decoding backend responses.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum PancropError {
    /// A configuration value is out of range.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// An operation needs an uploaded image but none is loaded.
    #[error("No image has been uploaded")]
    NoImage,

    /// The upload response listed no files.
    #[error("Upload response contained no files")]
    EmptyUpload,

    /// A backend response body could not be decoded.
    #[error("Malformed backend response: {0}")]
    MalformedResponse(String),

    /// JSON encoding or decoding failed.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, PancropError>;
