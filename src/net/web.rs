//! Browser host: binds to the global `fetch`, `AbortController` and `Uint8Array`.
//!
//! Works from a window as well as from a dedicated/shared/service worker. Promise callbacks are
//! owned by [`JsFuture`], which releases them when it is dropped, so no JS function handle outlives
//! the call on any exit path.
use async_trait::async_trait;
use js_sys::{Array, Object, Reflect, Uint8Array};
use wasm_bindgen::{JsCast, JsValue};
use wasm_bindgen_futures::JsFuture;
use web_sys::{AbortSignal, RequestInit, Window, WorkerGlobalScope};

use crate::errors::FetchError;
use crate::net::host::{AbortController, FetchInit, Host, HostResponse};
use crate::net::ResponseMeta;

enum Scope {
    Window(Window),
    Worker(WorkerGlobalScope),
}

pub struct WebHost {
    scope: Scope,
}

impl WebHost {
    /// Looks up the global scope. Fails outside a window or worker (e.g. plain Node.js).
    pub fn new() -> Result<Self, FetchError> {
        let global = js_sys::global();
        let scope = if let Some(window) = global.dyn_ref::<Window>() {
            Scope::Window(window.clone())
        } else if let Some(worker) = global.dyn_ref::<WorkerGlobalScope>() {
            Scope::Worker(worker.clone())
        } else {
            return Err(FetchError::Host("no window or worker global scope".to_string()));
        };

        Ok(Self { scope })
    }
}

/// Extracts the `message` of a rejection value, falling back to its string form.
fn error_message(value: &JsValue) -> String {
    Reflect::get(value, &JsValue::from_str("message"))
        .ok()
        .and_then(|m| m.as_string())
        .or_else(|| value.as_string())
        .unwrap_or_else(|| format!("{value:?}"))
}

fn set(target: &Object, key: &str, value: &JsValue) -> Result<(), String> {
    Reflect::set(target, &JsValue::from_str(key), value)
        .map(|_| ())
        .map_err(|e| error_message(&e))
}

/// Builds the `RequestInit` dictionary. Only fields present in `init` are set.
fn request_init(init: &FetchInit<AbortSignal>) -> Result<RequestInit, String> {
    let obj = Object::new();

    if let Some(method) = &init.method {
        set(&obj, "method", &JsValue::from_str(method))?;
    }
    if let Some(headers) = &init.headers {
        let js_headers = Object::new();
        for (key, value) in headers {
            set(&js_headers, key, &JsValue::from_str(value))?;
        }
        set(&obj, "headers", &js_headers)?;
    }
    if let Some(body) = &init.body {
        set(&obj, "body", &Uint8Array::from(body.as_slice()))?;
    }
    if let Some(mode) = init.mode {
        set(&obj, "mode", &JsValue::from_str(mode.as_str()))?;
    }
    if let Some(credentials) = init.credentials {
        set(&obj, "credentials", &JsValue::from_str(credentials.as_str()))?;
    }
    if let Some(cache) = init.cache {
        set(&obj, "cache", &JsValue::from_str(cache.as_str()))?;
    }
    if let Some(redirect) = init.redirect {
        set(&obj, "redirect", &JsValue::from_str(redirect.as_str()))?;
    }
    if let Some(referrer) = &init.referrer {
        set(&obj, "referrer", &JsValue::from_str(referrer))?;
    }
    if let Some(policy) = init.referrer_policy {
        set(&obj, "referrerPolicy", &JsValue::from_str(policy.as_str()))?;
    }
    if let Some(integrity) = &init.integrity {
        set(&obj, "integrity", &JsValue::from_str(integrity))?;
    }
    if let Some(keepalive) = init.keepalive {
        set(&obj, "keepalive", &JsValue::from_bool(keepalive))?;
    }
    if let Some(signal) = &init.signal {
        set(&obj, "signal", signal)?;
    }

    Ok(obj.unchecked_into())
}

pub struct WebAbortController {
    inner: web_sys::AbortController,
}

impl AbortController for WebAbortController {
    type Signal = AbortSignal;

    fn signal(&self) -> AbortSignal {
        self.inner.signal()
    }

    fn abort(&self) {
        self.inner.abort();
    }
}

pub struct WebResponse {
    inner: web_sys::Response,
}

#[async_trait(?Send)]
impl HostResponse for WebResponse {
    fn metadata(&self) -> Result<ResponseMeta, FetchError> {
        let iter = js_sys::try_iter(&self.inner.headers())
            .map_err(|e| FetchError::Host(error_message(&e)))?
            .ok_or_else(|| FetchError::Host("response headers are not iterable".to_string()))?;

        let mut headers = Vec::new();
        for entry in iter {
            let pair: Array = entry.map_err(|e| FetchError::Host(error_message(&e)))?.unchecked_into();
            let key = pair.get(0).as_string().unwrap_or_default();
            let value = pair.get(1).as_string().unwrap_or_default();
            headers.push((key, value));
        }

        let response_type = Reflect::get(&self.inner, &JsValue::from_str("type"))
            .ok()
            .and_then(|t| t.as_string())
            .unwrap_or_default();

        Ok(ResponseMeta {
            headers,
            ok: self.inner.ok(),
            redirected: self.inner.redirected(),
            status: self.inner.status(),
            status_text: self.inner.status_text(),
            response_type,
            url: self.inner.url(),
            body_used: self.inner.body_used(),
        })
    }

    async fn array_buffer(self) -> Result<Vec<u8>, String> {
        let promise = self.inner.array_buffer().map_err(|e| error_message(&e))?;
        let buffer = JsFuture::from(promise).await.map_err(|e| error_message(&e))?;
        Ok(Uint8Array::new(&buffer).to_vec())
    }
}

#[async_trait(?Send)]
impl Host for WebHost {
    type Controller = WebAbortController;
    type Response = WebResponse;

    fn abort_controller(&self) -> Result<WebAbortController, FetchError> {
        let inner = web_sys::AbortController::new().map_err(|e| FetchError::Host(error_message(&e)))?;
        Ok(WebAbortController { inner })
    }

    async fn fetch(&self, url: &str, init: FetchInit<AbortSignal>) -> Result<WebResponse, String> {
        let request_init = request_init(&init)?;
        let promise = match &self.scope {
            Scope::Window(window) => window.fetch_with_str_and_init(url, &request_init),
            Scope::Worker(worker) => worker.fetch_with_str_and_init(url, &request_init),
        };

        let value = JsFuture::from(promise).await.map_err(|e| error_message(&e))?;
        let inner = value
            .dyn_into::<web_sys::Response>()
            .map_err(|v| format!("fetch resolved to a non-Response value: {v:?}"))?;

        Ok(WebResponse { inner })
    }
}
