//! Pancrop Core - PAN card photo preparation library
//!
//! This crate provides the platform-independent half of the PAN card crop
//! editor: crop frame geometry, the editor session state machine, backend
//! request payloads, and debounced request bookkeeping. Browser bindings
//! live in `pancrop-wasm`.

pub mod artifact;
pub mod config;
pub mod editor;
pub mod error;
pub mod filter;
pub mod geometry;
pub mod request;
pub mod wire;

pub use artifact::{
    accepts_upload, download_filename, max_upload_files, Application, ArtifactType, EditorMode,
    Requirements, ResizeMode,
};
pub use config::EditorConfig;
pub use editor::{DragState, EditorSession, EditorSnapshot, ImageMeta, TransformState, ViewState};
pub use error::{PancropError, Result};
pub use filter::PreviewFilter;
pub use geometry::{
    centered_pan, clamp_pan, compute_crop, compute_pointer_frame, crop_coverage_pct, CropRect,
    PixelSize, Point, Rect, Rotation, Size,
};
pub use request::{Operation, RequestError, RequestSlot, Settled, Ticket};
pub use wire::{
    Endpoint, FileMeta, PreviewRequest, RenderBody, RenderPlan, SizeEstimate, SizeRequest,
    UploadResponse,
};

/// Crate version, reported by the bindings.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
