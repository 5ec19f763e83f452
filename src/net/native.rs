//! `reqwest` backed host for non-wasm targets.
//!
//! Lets code written against the bridge run natively (tools, tests, servers). Browser-only options
//! (mode, credentials, cache, integrity, referrer policy, keepalive) have no native meaning; they are
//! accepted and ignored.
use async_trait::async_trait;
use reqwest::header::REFERER;
use reqwest::redirect::Policy;
use tokio_util::sync::CancellationToken;

use crate::config::HostConfig;
use crate::errors::FetchError;
use crate::net::host::{AbortController, FetchInit, Host, HostResponse};
use crate::net::options::RequestRedirect;
use crate::net::ResponseMeta;

/// Rejection message used when the signal fires, same wording as Firefox.
pub const ABORTED_MESSAGE: &str = "The operation was aborted.";

/// Holds one `reqwest::Client` per redirect mode. Clients are built once, so calls share the
/// connection pool and TLS setup.
pub struct NativeHost {
    config: HostConfig,
    follow: reqwest::Client,
    manual: reqwest::Client,
    error: reqwest::Client,
}

impl NativeHost {
    /// Creates a native host. If `config` is `None`, [`HostConfig::default`] is used.
    pub fn new(config: Option<HostConfig>) -> Result<Self, FetchError> {
        let config = config.unwrap_or_default();
        let build = |policy| build_client(&config, policy).map_err(|e| FetchError::Host(e.to_string()));

        Ok(Self {
            follow: build(Policy::limited(config.max_redirects))?,
            manual: build(Policy::none())?,
            error: build(Policy::custom(|attempt| attempt.error("redirect mode is \"error\"")))?,
            config,
        })
    }

    pub fn config(&self) -> &HostConfig {
        &self.config
    }

    /// The client whose redirect policy matches `redirect`. Unset means `follow`.
    fn client(&self, redirect: Option<RequestRedirect>) -> &reqwest::Client {
        match redirect {
            None | Some(RequestRedirect::Follow) => &self.follow,
            Some(RequestRedirect::Manual) => &self.manual,
            Some(RequestRedirect::Error) => &self.error,
        }
    }
}

fn build_client(config: &HostConfig, policy: Policy) -> reqwest::Result<reqwest::Client> {
    reqwest::Client::builder()
        .user_agent(config.user_agent.as_str())
        .redirect(policy)
        .build()
}

pub struct NativeController {
    token: CancellationToken,
}

impl AbortController for NativeController {
    type Signal = CancellationToken;

    fn signal(&self) -> CancellationToken {
        self.token.clone()
    }

    fn abort(&self) {
        self.token.cancel();
    }
}

pub struct NativeResponse {
    inner: reqwest::Response,
    redirected: bool,
    manual_redirect: bool,
    signal: Option<CancellationToken>,
}

#[async_trait]
impl HostResponse for NativeResponse {
    fn metadata(&self) -> Result<ResponseMeta, FetchError> {
        let status = self.inner.status();

        // Non UTF-8 header bytes are replaced rather than dropped.
        let headers = self
            .inner
            .headers()
            .iter()
            .map(|(k, v)| (k.to_string(), String::from_utf8_lossy(v.as_bytes()).into_owned()))
            .collect();

        let response_type = if self.manual_redirect && status.is_redirection() {
            "opaqueredirect"
        } else {
            "basic"
        };

        Ok(ResponseMeta {
            headers,
            ok: status.is_success(),
            redirected: self.redirected,
            status: status.as_u16(),
            status_text: status.canonical_reason().unwrap_or_default().to_string(),
            response_type: response_type.to_string(),
            url: self.inner.url().to_string(),
            body_used: false,
        })
    }

    async fn array_buffer(self) -> Result<Vec<u8>, String> {
        let body = self.inner.bytes();
        let result = match self.signal {
            Some(signal) => tokio::select! {
                biased;
                _ = signal.cancelled() => return Err(ABORTED_MESSAGE.to_string()),
                r = body => r,
            },
            None => body.await,
        };

        result.map(|b| b.to_vec()).map_err(|e| e.to_string())
    }
}

#[async_trait]
impl Host for NativeHost {
    type Controller = NativeController;
    type Response = NativeResponse;

    fn abort_controller(&self) -> Result<NativeController, FetchError> {
        Ok(NativeController {
            token: CancellationToken::new(),
        })
    }

    async fn fetch(&self, url: &str, init: FetchInit<CancellationToken>) -> Result<NativeResponse, String> {
        if init.mode.is_some()
            || init.credentials.is_some()
            || init.cache.is_some()
            || init.integrity.is_some()
            || init.referrer_policy.is_some()
            || init.keepalive.is_some()
        {
            log::debug!("native host: ignoring browser-only request options for {url}");
        }

        let client = self.client(init.redirect);

        let method = match init.method.as_deref() {
            Some(m) => reqwest::Method::from_bytes(m.as_bytes()).map_err(|e| e.to_string())?,
            None => reqwest::Method::GET,
        };

        let mut request = client.request(method, url);
        for (key, value) in init.headers.unwrap_or_default() {
            request = request.header(key, value);
        }
        if let Some(referrer) = init.referrer.filter(|r| !r.is_empty()) {
            request = request.header(REFERER, referrer);
        }
        if let Some(body) = init.body {
            request = request.body(body);
        }

        let send = request.send();
        let result = match &init.signal {
            Some(signal) => tokio::select! {
                biased;
                _ = signal.cancelled() => return Err(ABORTED_MESSAGE.to_string()),
                r = send => r,
            },
            None => send.await,
        };
        let inner = result.map_err(|e| e.to_string())?;

        let redirected = reqwest::Url::parse(url).map(|u| &u != inner.url()).unwrap_or(false);

        Ok(NativeResponse {
            inner,
            redirected,
            manual_redirect: init.redirect == Some(RequestRedirect::Manual),
            signal: init.signal,
        })
    }
}
