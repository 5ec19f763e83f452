//! Fetch bridge.
//!
//! [`Fetcher`] drives a single request through a [`Host`] in two phases: the metadata phase
//! (status and headers) and the body phase (body bytes). On `wasm32` the host is the browser's Fetch
//! API (`WebHost`); elsewhere a `reqwest` based `NativeHost` provides the same contract.
//!
//! ```no_run
//! # async fn run() -> Result<(), fetch_bridge::FetchError> {
//! use fetch_bridge::net::{fetch, method, RequestOptions};
//! use tokio_util::sync::CancellationToken;
//!
//! let cancel = CancellationToken::new();
//! let resp = fetch(
//!     "https://example.com/some/api/call",
//!     RequestOptions::new()
//!         .method(method::POST)
//!         .header("content-type", "application/json")
//!         .body(r#"{"one": "two"}"#)
//!         .signal(cancel.clone()),
//! )
//! .await?;
//! # Ok(())
//! # }
//! ```
mod fetcher;
mod header;
pub mod host;
pub mod method;
mod options;
mod response;

#[cfg(not(target_arch = "wasm32"))]
pub mod native;
#[cfg(target_arch = "wasm32")]
pub mod web;

#[cfg(all(test, not(target_arch = "wasm32")))]
pub(crate) mod testing;

pub use fetcher::{FetchPhase, Fetcher};
pub use header::Header;
pub use host::{AbortController, FetchInit, Host, HostResponse, MaybeSend};
pub use options::{Body, BodyReader, ReferrerPolicy, RequestCache, RequestCredentials, RequestMode, RequestOptions, RequestRedirect};
pub use response::{Response, ResponseMeta};

#[cfg(not(target_arch = "wasm32"))]
pub use native::NativeHost;
#[cfg(target_arch = "wasm32")]
pub use web::WebHost;

use crate::errors::FetchError;

/// Fetches `url` with the default host of the target.
///
/// Builds a fresh host per call. Use a [`Fetcher`] to supply a configured or custom host.
pub async fn fetch(url: &str, options: RequestOptions) -> Result<Response, FetchError> {
    #[cfg(target_arch = "wasm32")]
    let host = WebHost::new()?;
    #[cfg(not(target_arch = "wasm32"))]
    let host = NativeHost::new(None)?;

    Fetcher::new(host).fetch(url, options).await
}
