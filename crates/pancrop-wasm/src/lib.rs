//! Pancrop WASM - WebAssembly bindings for the PAN card crop editor
//!
//! This crate exposes the pancrop-core editor session and geometry to the
//! browser, together with the backend client that uploads files, fetches
//! previews and downloads final renders.
//!
//! # Module Structure
//!
//! - `geometry` - Pointer frame, pan and crop calculations as free functions
//! - `editor` - The `EditorSession` class driving the crop editor
//! - `api` - `ApiClient`, a thin `fetch` wrapper for the render backend
//! - `scheduler` - Debounced preview and size-estimate requests
//! - `preview_url` - Object URL ownership for preview images
//! - `types` - JS <-> core conversions
//!
//! # Usage
//!
//! ```typescript
//! import init, { ApiClient, EditorSession, PreviewScheduler, PreviewUrl } from '@pancrop/wasm';
//!
//! await init();
//!
//! const session = new EditorSession({ apiBase: "https://api.example.com" });
//! const client = new ApiClient({ apiBase: "https://api.example.com" });
//! session.set_upload(await client.upload([file], "pan"));
//!
//! const previews = new PreviewScheduler(client);
//! const preview = new PreviewUrl();
//! const blob = await previews.request(session);
//! if (blob) img.src = preview.replace(blob);
//! ```

use wasm_bindgen::prelude::*;

mod api;
mod editor;
mod geometry;
mod preview_url;
mod scheduler;
mod types;

// Re-export public types
pub use api::ApiClient;
pub use editor::EditorSession;
pub use geometry::{
    centered_pan, clamp_pan, compute_crop, compute_pointer_frame, rotated_dims, target_aspect,
    target_label, target_pixels,
};
pub use preview_url::PreviewUrl;
pub use scheduler::{PreviewScheduler, SizeScheduler};

/// Initialize the WASM module (called automatically on load)
#[wasm_bindgen(start)]
pub fn init() {
    console_error_panic_hook::set_once();
}

/// Get the version of the WASM module
#[wasm_bindgen]
pub fn version() -> String {
    pancrop_core::VERSION.to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version() {
        assert!(!version().is_empty());
        assert_eq!(version(), env!("CARGO_PKG_VERSION"));
    }
}
