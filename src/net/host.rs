//! Host capabilities the bridge calls into.
//!
//! A [`Host`] provides the three things a fetch call needs from its environment: the fetch
//! function itself, an abort controller, and a way to read the response body into bytes. The
//! browser binding lives in `net::web`, a `reqwest` based one in `net::native`.
//!
//! On `wasm32` the traits are `?Send`: browser values live on a single thread. Everywhere else host
//! futures are `Send`, so a fetch can be spawned on a multi-threaded runtime.
use async_trait::async_trait;
use std::collections::HashMap;

use crate::errors::FetchError;
use crate::net::options::{ReferrerPolicy, RequestCache, RequestCredentials, RequestMode, RequestRedirect};
use crate::net::ResponseMeta;

/// `Send` everywhere except `wasm32`.
#[cfg(not(target_arch = "wasm32"))]
pub trait MaybeSend: Send {}
#[cfg(not(target_arch = "wasm32"))]
impl<T: Send + ?Sized> MaybeSend for T {}

/// `Send` everywhere except `wasm32`.
#[cfg(target_arch = "wasm32")]
pub trait MaybeSend {}
#[cfg(target_arch = "wasm32")]
impl<T: ?Sized> MaybeSend for T {}

/// The argument structure handed to [`Host::fetch`].
///
/// Only fields the caller set are present. The body has already been drained into memory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchInit<S> {
    pub method: Option<String>,
    pub headers: Option<HashMap<String, String>>,
    pub body: Option<Vec<u8>>,
    pub mode: Option<RequestMode>,
    pub credentials: Option<RequestCredentials>,
    pub cache: Option<RequestCache>,
    pub redirect: Option<RequestRedirect>,
    pub referrer: Option<String>,
    pub referrer_policy: Option<ReferrerPolicy>,
    pub integrity: Option<String>,
    pub keepalive: Option<bool>,
    /// Signal of the controller created for this call, when the caller passed a signal
    pub signal: Option<S>,
}

impl<S> Default for FetchInit<S> {
    fn default() -> Self {
        Self {
            method: None,
            headers: None,
            body: None,
            mode: None,
            credentials: None,
            cache: None,
            redirect: None,
            referrer: None,
            referrer_policy: None,
            integrity: None,
            keepalive: None,
            signal: None,
        }
    }
}

/// Host-native cancellation primitive.
pub trait AbortController {
    /// The value attached to [`FetchInit::signal`]
    type Signal;

    fn signal(&self) -> Self::Signal;

    /// Requests cancellation of whatever the signal is attached to. The host rejects the pending
    /// phase through its normal rejection path.
    fn abort(&self);
}

/// A live handle on the host's response object, retained between the two phases.
#[cfg_attr(target_arch = "wasm32", async_trait(?Send))]
#[cfg_attr(not(target_arch = "wasm32"), async_trait)]
pub trait HostResponse {
    /// Reads status, headers and flags. Does not touch the body.
    fn metadata(&self) -> Result<ResponseMeta, FetchError>;

    /// Reads the whole body. `Err` carries the host's rejection message.
    async fn array_buffer(self) -> Result<Vec<u8>, String>;
}

#[cfg_attr(target_arch = "wasm32", async_trait(?Send))]
#[cfg_attr(not(target_arch = "wasm32"), async_trait)]
pub trait Host {
    type Controller: AbortController;
    type Response: HostResponse;

    fn abort_controller(&self) -> Result<Self::Controller, FetchError>;

    /// Starts the request and resolves once status and headers are known. `Err` carries the host's
    /// rejection message.
    async fn fetch(
        &self,
        url: &str,
        init: FetchInit<<Self::Controller as AbortController>::Signal>,
    ) -> Result<Self::Response, String>;
}
