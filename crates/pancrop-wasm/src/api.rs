//! Backend client WASM bindings.
//!
//! `ApiClient` posts JSON (or multipart uploads) to the render backend with
//! `fetch`. Every method returns a `Promise`; failures reject with an `Error`
//! whose message is fit to show the user. The crate-internal async functions
//! take an optional `AbortSignal` so the schedulers can cancel superseded
//! requests.

use crate::editor::EditorSession;
use crate::types::{
    core_error, from_js, from_js_or_default, js_parse, parse_mode, request_error, to_js,
};
use js_sys::{Array, Object, Promise, Reflect};
use pancrop_core::request::{Operation, RequestError};
use pancrop_core::wire::{self, DocumentsRequest, ErrorBody};
use pancrop_core::{
    accepts_upload, max_upload_files, EditorConfig, EditorMode, Endpoint, SizeEstimate,
};
use serde::Serialize;
use std::rc::Rc;
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use wasm_bindgen_futures::{future_to_promise, JsFuture};
use web_sys::{AbortSignal, Blob, File, FormData, Request, RequestInit, RequestMode, Response};

/// Size estimate as handed to JavaScript
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct SizeReport {
    size_bytes: u64,
    exact: bool,
    /// Kilobytes with one decimal
    kilobytes: String,
}

impl From<SizeEstimate> for SizeReport {
    fn from(estimate: SizeEstimate) -> Self {
        Self {
            size_bytes: estimate.size_bytes,
            exact: estimate.exact,
            kilobytes: estimate.kilobytes(),
        }
    }
}

/// Render backend client for JavaScript
#[wasm_bindgen]
#[derive(Clone)]
pub struct ApiClient {
    config: Rc<EditorConfig>,
}

impl ApiClient {
    pub(crate) fn config(&self) -> &EditorConfig {
        &self.config
    }

    fn url(&self, endpoint: Endpoint) -> String {
        self.config.endpoint_url(endpoint)
    }

    /// POST a JSON body and wait for a successful response.
    pub(crate) async fn post_json(
        &self,
        endpoint: Endpoint,
        body: &str,
        operation: Operation,
        signal: Option<&AbortSignal>,
    ) -> Result<Response, RequestError> {
        let opts = RequestInit::new();
        opts.set_method("POST");
        opts.set_mode(RequestMode::Cors);
        opts.set_body(&JsValue::from_str(body));
        opts.set_signal(signal);

        let request = Request::new_with_str_and_init(&self.url(endpoint), &opts)
            .map_err(|e| js_failure(operation, e))?;
        request
            .headers()
            .set("Content-Type", "application/json")
            .map_err(|e| js_failure(operation, e))?;

        send(&request, endpoint, operation).await
    }

    pub(crate) async fn fetch_blob(
        &self,
        endpoint: Endpoint,
        body: &str,
        operation: Operation,
        signal: Option<&AbortSignal>,
    ) -> Result<Blob, RequestError> {
        let response = self.post_json(endpoint, body, operation, signal).await?;
        let blob = JsFuture::from(response.blob().map_err(|e| js_failure(operation, e))?)
            .await
            .map_err(|e| js_failure(operation, e))?;
        blob.dyn_into::<Blob>().map_err(|e| js_failure(operation, e))
    }

    pub(crate) async fn fetch_size(
        &self,
        body: &str,
        signal: Option<&AbortSignal>,
    ) -> Result<SizeReport, RequestError> {
        let operation = Operation::SizeCheck;
        let response = self
            .post_json(Endpoint::KbSizePhoto, body, operation, signal)
            .await?;
        let text = read_text(&response)
            .await
            .map_err(|e| js_failure(operation, e))?;
        let estimate = wire::decode_size_estimate(&text)
            .map_err(|e| RequestError::failed(operation, e.to_string()))?;
        Ok(estimate.into())
    }

    async fn upload_form(
        &self,
        mode: EditorMode,
        form: FormData,
    ) -> Result<JsValue, RequestError> {
        let operation = Operation::Upload;
        let endpoint = Endpoint::upload(mode);

        let opts = RequestInit::new();
        opts.set_method("POST");
        opts.set_mode(RequestMode::Cors);
        opts.set_body(&form);
        let request = Request::new_with_str_and_init(&self.url(endpoint), &opts)
            .map_err(|e| js_failure(operation, e))?;

        let response = send(&request, endpoint, operation).await?;
        let text = read_text(&response)
            .await
            .map_err(|e| js_failure(operation, e))?;
        let upload = wire::decode_upload(&text)
            .map_err(|e| RequestError::failed(operation, e.to_string()))?;
        to_js(&upload).map_err(|e| js_failure(operation, e))
    }
}

#[wasm_bindgen]
impl ApiClient {
    /// Create a client from an optional, partial configuration object
    /// (only `apiBase` matters here).
    #[wasm_bindgen(constructor)]
    pub fn new(config: JsValue) -> Result<ApiClient, JsValue> {
        let config: EditorConfig = from_js_or_default(config)?;
        config.validate().map_err(core_error)?;
        Ok(Self {
            config: Rc::new(config),
        })
    }

    #[wasm_bindgen(getter)]
    pub fn api_base(&self) -> String {
        self.config.api_base.clone()
    }

    /// Upload files for `mode` (`pan`, `kb` or `pdf`).
    ///
    /// Files are checked against the mode's accepted types before anything
    /// is sent. Resolves to the parsed `{files: [...]}` response.
    pub fn upload(&self, files: Array, mode: &str) -> Result<Promise, JsValue> {
        let mode = js_parse(parse_mode(mode))?;

        let files: Vec<File> = files
            .iter()
            .map(|value| value.dyn_into::<File>())
            .collect::<Result<_, _>>()
            .map_err(|_| JsValue::from_str("upload expects an array of File objects"))?;

        let described: Vec<(String, String)> =
            files.iter().map(|f| (f.name(), f.type_())).collect();
        check_upload(mode, &described)
            .map_err(|msg| JsValue::from(js_sys::Error::new(&msg)))?;

        let form = FormData::new()?;
        for file in &files {
            form.append_with_blob_and_filename("files", file, &file.name())?;
        }

        let client = self.clone();
        Ok(future_to_promise(async move {
            client
                .upload_form(mode, form)
                .await
                .map_err(|e| request_error(&e))
        }))
    }

    /// Fetch a preview for the session's image right away (no debounce).
    pub fn preview(&self, session: &EditorSession) -> Result<Promise, JsValue> {
        let (endpoint, request) = session.inner().preview_request().map_err(core_error)?;
        let body = wire::encode(&request).map_err(core_error)?;

        let client = self.clone();
        Ok(future_to_promise(async move {
            client
                .fetch_blob(endpoint, &body, Operation::Preview, None)
                .await
                .map(JsValue::from)
                .map_err(|e| request_error(&e))
        }))
    }

    /// Render the final artifact. Resolves to `{blob, filename}`.
    pub fn render(&self, session: &EditorSession) -> Result<Promise, JsValue> {
        let plan = session.inner().render_plan().map_err(core_error)?;
        let body = wire::encode(&plan.body).map_err(core_error)?;

        let client = self.clone();
        Ok(future_to_promise(async move {
            let blob = client
                .fetch_blob(plan.endpoint, &body, Operation::Render, None)
                .await
                .map_err(|e| request_error(&e))?;

            let result = Object::new();
            Reflect::set(&result, &"blob".into(), &blob)?;
            Reflect::set(&result, &"filename".into(), &plan.filename.into())?;
            Ok(result.into())
        }))
    }

    /// Combine uploaded files into one document without a size target.
    pub fn render_documents(&self, file_ids: JsValue) -> Result<Promise, JsValue> {
        let file_ids: Vec<String> = from_js(file_ids)?;
        let body = wire::encode(&DocumentsRequest {
            file_ids,
            max_kb: None,
        })
        .map_err(core_error)?;

        let client = self.clone();
        Ok(future_to_promise(async move {
            client
                .fetch_blob(Endpoint::RenderDocuments, &body, Operation::Render, None)
                .await
                .map(JsValue::from)
                .map_err(|e| request_error(&e))
        }))
    }

    /// Ask for the size of the KB render right away (no debounce).
    /// Resolves to `{sizeBytes, exact, kilobytes}`.
    pub fn size_estimate(&self, session: &EditorSession) -> Result<Promise, JsValue> {
        let (_, request) = session.inner().size_request().map_err(core_error)?;
        let body = wire::encode(&request).map_err(core_error)?;

        let client = self.clone();
        Ok(future_to_promise(async move {
            let report = client
                .fetch_size(&body, None)
                .await
                .map_err(|e| request_error(&e))?;
            to_js(&report)
        }))
    }
}

/// Validate a file selection before uploading.
///
/// `files` holds `(name, mime type)` pairs.
pub(crate) fn check_upload(mode: EditorMode, files: &[(String, String)]) -> Result<(), String> {
    if files.is_empty() {
        return Err("Select at least one file".to_string());
    }
    if let Some(max) = max_upload_files(mode) {
        if files.len() > max {
            return Err(format!("Select at most {} file(s)", max));
        }
    }
    if let Some((name, _)) = files
        .iter()
        .find(|(name, mime)| !accepts_upload(mode, name, mime))
    {
        return Err(match mode {
            EditorMode::Kb => format!("{} is not a JPG or PNG image", name),
            EditorMode::Pan | EditorMode::Pdf => {
                format!("{} is not a JPG, PNG or PDF file", name)
            }
        });
    }
    Ok(())
}

/// Run a prepared request and check the status.
///
/// PDF renders report a reason in their error body, which is kept for the
/// user.
async fn send(
    request: &Request,
    endpoint: Endpoint,
    operation: Operation,
) -> Result<Response, RequestError> {
    let window = web_sys::window().ok_or_else(|| RequestError::failed(operation, "no window"))?;
    let value = JsFuture::from(window.fetch_with_request(request))
        .await
        .map_err(|e| js_failure(operation, e))?;
    let response: Response = value.dyn_into().map_err(|e| js_failure(operation, e))?;

    if response.ok() {
        return Ok(response);
    }

    let backend_message = if endpoint == Endpoint::PdfRenderDocuments {
        read_text(&response)
            .await
            .ok()
            .and_then(|body| ErrorBody::message_from(&body))
    } else {
        None
    };
    Err(RequestError::Failed {
        operation,
        detail: format!("HTTP {} from {}", response.status(), endpoint.path()),
        backend_message,
    })
}

async fn read_text(response: &Response) -> Result<String, JsValue> {
    let text = JsFuture::from(response.text()?).await?;
    text.as_string()
        .ok_or_else(|| JsValue::from_str("response body is not text"))
}

/// Map a rejected JS promise. Aborted fetches reject with an `AbortError`.
fn js_failure(operation: Operation, err: JsValue) -> RequestError {
    let name = Reflect::get(&err, &JsValue::from_str("name"))
        .ok()
        .and_then(|name| name.as_string());
    if name.as_deref() == Some("AbortError") {
        return RequestError::Cancelled(operation);
    }
    RequestError::failed(operation, format!("{:?}", err))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn files(list: &[(&str, &str)]) -> Vec<(String, String)> {
        list.iter()
            .map(|(n, m)| (n.to_string(), m.to_string()))
            .collect()
    }

    #[test]
    fn test_check_upload_kb_single_image() {
        assert!(check_upload(EditorMode::Kb, &files(&[("a.jpg", "image/jpeg")])).is_ok());
        assert_eq!(
            check_upload(
                EditorMode::Kb,
                &files(&[("a.jpg", "image/jpeg"), ("b.png", "image/png")])
            ),
            Err("Select at most 1 file(s)".to_string())
        );
        assert_eq!(
            check_upload(EditorMode::Kb, &files(&[("scan.pdf", "application/pdf")])),
            Err("scan.pdf is not a JPG or PNG image".to_string())
        );
    }

    #[test]
    fn test_check_upload_pdf_mode_mixed() {
        let selection = files(&[
            ("scan.pdf", "application/pdf"),
            ("front.PNG", ""),
            ("back.jpeg", "image/jpeg"),
        ]);
        assert!(check_upload(EditorMode::Pdf, &selection).is_ok());
        assert!(check_upload(EditorMode::Pan, &selection).is_ok());
        assert_eq!(
            check_upload(EditorMode::Pdf, &files(&[("notes.txt", "text/plain")])),
            Err("notes.txt is not a JPG, PNG or PDF file".to_string())
        );
    }

    #[test]
    fn test_check_upload_empty() {
        assert!(check_upload(EditorMode::Pan, &[]).is_err());
    }

    #[test]
    fn test_size_report_from_estimate() {
        let report = SizeReport::from(SizeEstimate {
            size_bytes: 51200,
            exact: true,
        });
        assert_eq!(report.kilobytes, "50.0");
        let json = serde_json::to_value(&report).unwrap();
        assert_eq!(json["sizeBytes"], 51200);
        assert_eq!(json["exact"], true);
    }
}
