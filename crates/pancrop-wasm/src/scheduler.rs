//! Debounced request scheduling.
//!
//! Preview refreshes and KB size estimates follow user input closely, so
//! each one goes through a [`RequestSlot`]: every call to `request()` starts
//! the debounce window over, aborts whatever request the slot had in flight,
//! and only the latest call ever talks to the backend. Promises for
//! superseded calls resolve to `undefined`.
//!
//! ```text
//! request() ──> schedule ──> sleep until due ──> fetch (AbortSignal) ──> settle
//!                  │                                      ▲
//!                  └── aborts previous controller ────────┘
//! ```

use crate::api::ApiClient;
use crate::editor::EditorSession;
use crate::types::{core_error, request_error, to_js};
use js_sys::Promise;
use pancrop_core::request::{Operation, RequestError, RequestSlot, Settled, Ticket};
use pancrop_core::{wire, Endpoint};
use std::cell::RefCell;
use std::future::Future;
use std::rc::Rc;
use wasm_bindgen::prelude::*;
use wasm_bindgen_futures::{future_to_promise, JsFuture};
use web_sys::{AbortController, AbortSignal};

/// Encoded request waiting in a slot.
struct Job {
    endpoint: Endpoint,
    body: String,
}

/// A request slot plus the abort handle of its in-flight fetch.
struct Debounced {
    slot: RefCell<RequestSlot<Job>>,
    controller: RefCell<Option<AbortController>>,
}

impl Debounced {
    fn new(name: &'static str, delay_ms: u64) -> Rc<Self> {
        Rc::new(Self {
            slot: RefCell::new(RequestSlot::new(name, delay_ms)),
            controller: RefCell::new(None),
        })
    }

    fn abort_in_flight(&self) {
        if let Some(controller) = self.controller.borrow_mut().take() {
            controller.abort();
        }
    }

    fn supersede(&self, job: Job) -> Ticket {
        self.abort_in_flight();
        self.slot.borrow_mut().schedule(now_ms(), job)
    }

    fn cancel(&self) {
        self.abort_in_flight();
        if self.slot.borrow_mut().cancel() {
            web_sys::console::debug_1(&JsValue::from_str("pending request cancelled"));
        }
    }

    /// Wait out the debounce window. `None` if the ticket was superseded.
    async fn wait_turn(&self, ticket: Ticket) -> Result<Option<Job>, JsValue> {
        loop {
            if !self.slot.borrow().is_current(ticket) {
                return Ok(None);
            }
            let now = now_ms();
            let due = self.slot.borrow_mut().take_due(now);
            if let Some((due_ticket, job)) = due {
                return Ok((due_ticket == ticket).then_some(job));
            }
            let wait = self.slot.borrow().time_until_due(now).unwrap_or(0).max(1);
            sleep(wait).await?;
        }
    }

    /// Create the abort handle for the fetch about to start.
    fn arm(&self) -> Result<AbortSignal, JsValue> {
        let controller = AbortController::new()?;
        let signal = controller.signal();
        *self.controller.borrow_mut() = Some(controller);
        Ok(signal)
    }

    fn settle<T>(
        &self,
        ticket: Ticket,
        result: Result<T, RequestError>,
    ) -> Settled<T, RequestError> {
        let settled = self.slot.borrow_mut().settle(ticket, result);
        match &settled {
            Settled::Discard => {
                web_sys::console::debug_1(&JsValue::from_str("superseded request discarded"));
            }
            Settled::Apply(_) | Settled::Fail(_) => {
                self.controller.borrow_mut().take();
            }
        }
        settled
    }

    /// Schedule `job` and run `fetch` for it once it is due, unless a newer
    /// job replaced it first.
    fn run<F, Fut>(self: Rc<Self>, job: Job, fetch: F) -> Promise
    where
        F: FnOnce(Job, AbortSignal) -> Fut + 'static,
        Fut: Future<Output = Result<JsValue, RequestError>> + 'static,
    {
        let ticket = self.supersede(job);

        future_to_promise(async move {
            let Some(job) = self.wait_turn(ticket).await? else {
                return Ok(JsValue::UNDEFINED);
            };
            let signal = self.arm()?;
            let result = fetch(job, signal).await;

            match self.settle(ticket, result) {
                Settled::Apply(value) => Ok(value),
                Settled::Fail(err) if err.is_cancelled() => Ok(JsValue::UNDEFINED),
                Settled::Fail(err) => Err(request_error(&err)),
                Settled::Discard => Ok(JsValue::UNDEFINED),
            }
        })
    }
}

/// Debounced preview refreshes for JavaScript
#[wasm_bindgen]
pub struct PreviewScheduler {
    client: ApiClient,
    inner: Rc<Debounced>,
}

#[wasm_bindgen]
impl PreviewScheduler {
    /// Use the client's configured preview debounce
    #[wasm_bindgen(constructor)]
    pub fn new(client: &ApiClient) -> PreviewScheduler {
        let delay_ms = client.config().preview_debounce_ms;
        Self {
            client: client.clone(),
            inner: Debounced::new("preview", delay_ms),
        }
    }

    /// Request a preview of the session's current rotation.
    ///
    /// Resolves to a `Blob`, or `undefined` if a later call superseded this
    /// one.
    pub fn request(&self, session: &EditorSession) -> Result<Promise, JsValue> {
        let (endpoint, request) = session.inner().preview_request().map_err(core_error)?;
        let body = wire::encode(&request).map_err(core_error)?;

        let client = self.client.clone();
        Ok(Rc::clone(&self.inner).run(Job { endpoint, body }, move |job, signal| async move {
            client
                .fetch_blob(job.endpoint, &job.body, Operation::Preview, Some(&signal))
                .await
                .map(JsValue::from)
        }))
    }

    /// Drop the pending or in-flight preview, e.g. when the editor closes
    pub fn cancel(&self) {
        self.inner.cancel();
    }

    #[wasm_bindgen(getter)]
    pub fn busy(&self) -> bool {
        self.inner.slot.borrow().is_busy()
    }
}

/// Debounced KB size estimates for JavaScript
#[wasm_bindgen]
pub struct SizeScheduler {
    client: ApiClient,
    inner: Rc<Debounced>,
}

#[wasm_bindgen]
impl SizeScheduler {
    /// Use the client's configured size-estimate debounce
    #[wasm_bindgen(constructor)]
    pub fn new(client: &ApiClient) -> SizeScheduler {
        let delay_ms = client.config().size_debounce_ms;
        Self {
            client: client.clone(),
            inner: Debounced::new("size", delay_ms),
        }
    }

    /// Request a size estimate for the session's current limit.
    ///
    /// Resolves to `{sizeBytes, exact, kilobytes}`, or `undefined` if a
    /// later call superseded this one.
    pub fn request(&self, session: &EditorSession) -> Result<Promise, JsValue> {
        let (endpoint, request) = session.inner().size_request().map_err(core_error)?;
        let body = wire::encode(&request).map_err(core_error)?;

        let client = self.client.clone();
        Ok(Rc::clone(&self.inner).run(Job { endpoint, body }, move |job, signal| async move {
            let report = client.fetch_size(&job.body, Some(&signal)).await?;
            to_js(&report)
                .map_err(|e| RequestError::failed(Operation::SizeCheck, format!("{:?}", e)))
        }))
    }

    pub fn cancel(&self) {
        self.inner.cancel();
    }

    #[wasm_bindgen(getter)]
    pub fn busy(&self) -> bool {
        self.inner.slot.borrow().is_busy()
    }
}

fn now_ms() -> u64 {
    js_sys::Date::now().max(0.0) as u64
}

/// Resolve after `ms` milliseconds via `setTimeout`.
async fn sleep(ms: u64) -> Result<(), JsValue> {
    let timeout = ms.min(i32::MAX as u64) as i32;
    let promise = Promise::new(&mut |resolve, _reject| {
        let scheduled = web_sys::window().map(|window| {
            window.set_timeout_with_callback_and_timeout_and_arguments_0(&resolve, timeout)
        });
        if !matches!(scheduled, Some(Ok(_))) {
            let _ = resolve.call0(&JsValue::NULL);
        }
    });
    JsFuture::from(promise).await.map(|_| ())
}
