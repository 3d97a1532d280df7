//! Conversions between JavaScript values and core types.
//!
//! Structured values cross the boundary through `serde-wasm-bindgen` in
//! JSON-compatible mode, so absent options arrive in JavaScript as `null`
//! rather than `undefined` and maps become plain objects. Enum arguments are
//! passed as the same lowercase/uppercase strings the backend uses.

use pancrop_core::request::RequestError;
use pancrop_core::{Application, ArtifactType, EditorMode, PancropError, ResizeMode};
use serde::de::DeserializeOwned;
use serde::Serialize;
use wasm_bindgen::prelude::*;

/// Serialize a value into a plain JavaScript object.
pub(crate) fn to_js<T: Serialize + ?Sized>(value: &T) -> Result<JsValue, JsValue> {
    value
        .serialize(&serde_wasm_bindgen::Serializer::json_compatible())
        .map_err(JsValue::from)
}

/// Deserialize a JavaScript object into a core type.
pub(crate) fn from_js<T: DeserializeOwned>(value: JsValue) -> Result<T, JsValue> {
    serde_wasm_bindgen::from_value(value).map_err(JsValue::from)
}

/// Like [`from_js`], but `undefined` and `null` give the default value.
pub(crate) fn from_js_or_default<T: DeserializeOwned + Default>(value: JsValue) -> Result<T, JsValue> {
    if value.is_undefined() || value.is_null() {
        Ok(T::default())
    } else {
        from_js(value)
    }
}

pub(crate) fn core_error(err: PancropError) -> JsValue {
    JsValue::from_str(&err.to_string())
}

/// Turn a failed request into the `Error` a promise rejects with.
///
/// The message is the one meant for the user; the technical detail only goes
/// to the console.
pub(crate) fn request_error(err: &RequestError) -> JsValue {
    web_sys::console::warn_1(&JsValue::from_str(&err.to_string()));
    let message = err
        .user_message()
        .unwrap_or_else(|| err.to_string());
    js_sys::Error::new(&message).into()
}

pub(crate) fn parse_mode(name: &str) -> Result<EditorMode, String> {
    match name.to_ascii_lowercase().as_str() {
        "pan" => Ok(EditorMode::Pan),
        "kb" => Ok(EditorMode::Kb),
        "pdf" => Ok(EditorMode::Pdf),
        other => Err(format!("Unknown editor mode: {}", other)),
    }
}

pub(crate) fn parse_artifact(name: &str) -> Result<ArtifactType, String> {
    match name.to_ascii_lowercase().as_str() {
        "photograph" | "photo" => Ok(ArtifactType::Photograph),
        "signature" => Ok(ArtifactType::Signature),
        "document" => Ok(ArtifactType::Document),
        other => Err(format!("Unknown artifact type: {}", other)),
    }
}

pub(crate) fn parse_application(name: &str) -> Result<Application, String> {
    match name.to_ascii_uppercase().as_str() {
        "NSDL" => Ok(Application::Nsdl),
        "UTI" => Ok(Application::Uti),
        other => Err(format!("Unknown application: {}", other)),
    }
}

pub(crate) fn parse_resize_mode(name: &str) -> Result<ResizeMode, String> {
    match name.to_ascii_lowercase().as_str() {
        "original" => Ok(ResizeMode::Original),
        "selected" => Ok(ResizeMode::Selected),
        other => Err(format!("Unknown resize mode: {}", other)),
    }
}

/// Adapt a `parse_*` helper for use in a binding.
pub(crate) fn js_parse<T>(parsed: Result<T, String>) -> Result<T, JsValue> {
    parsed.map_err(|msg| JsValue::from_str(&msg))
}
