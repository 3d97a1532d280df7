//! Object URL ownership for preview images.
//!
//! Every preview blob shown in an `<img>` needs an object URL, and each one
//! pins its blob in memory until revoked. `PreviewUrl` holds at most one URL
//! and revokes it when replaced, released or freed.

use wasm_bindgen::prelude::*;
use web_sys::{Blob, Url};

/// Owner of the current preview object URL
#[wasm_bindgen]
#[derive(Debug, Default)]
pub struct PreviewUrl {
    url: Option<String>,
}

#[wasm_bindgen]
impl PreviewUrl {
    #[wasm_bindgen(constructor)]
    pub fn new() -> PreviewUrl {
        Self::default()
    }

    /// Create a URL for `blob`, revoking the previous one.
    ///
    /// # Returns
    /// The new URL, ready for `img.src`.
    pub fn replace(&mut self, blob: &Blob) -> Result<String, JsValue> {
        let url = Url::create_object_url_with_blob(blob)?;
        self.release();
        self.url = Some(url.clone());
        Ok(url)
    }

    /// Current URL, if any
    #[wasm_bindgen(getter)]
    pub fn url(&self) -> Option<String> {
        self.url.clone()
    }

    /// Revoke the current URL now
    pub fn release(&mut self) {
        if let Some(url) = self.url.take() {
            if let Err(err) = Url::revoke_object_url(&url) {
                web_sys::console::warn_2(&JsValue::from_str("failed to revoke preview URL"), &err);
            }
        }
    }
}

impl Drop for PreviewUrl {
    fn drop(&mut self) {
        self.release();
    }
}


#[cfg(all(test, target_arch = "wasm32"))]
mod wasm_tests {
    use super::*;
    use wasm_bindgen_test::*;

    fn blob() -> Blob {
        let parts = js_sys::Array::of1(&JsValue::from_str("preview"));
        Blob::new_with_str_sequence(&parts).unwrap()
    }

    #[wasm_bindgen_test]
    fn test_replace_swaps_url() {
        let mut preview = PreviewUrl::new();
        let first = preview.replace(&blob()).unwrap();
        assert!(first.starts_with("blob:"));

        let second = preview.replace(&blob()).unwrap();
        assert_ne!(first, second);
        assert_eq!(preview.url().as_deref(), Some(second.as_str()));

        preview.release();
        assert_eq!(preview.url(), None);
    }
}
