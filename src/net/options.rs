//! Request descriptor passed to a fetch call.
//!
//! Every field is optional. Unset fields are left out of the host call entirely so the host's own
//! defaults apply; an empty [`RequestOptions`] performs a plain GET.
//!
//! The enum-valued options mirror the Fetch `RequestInit` dictionary. Their `as_str()` values are
//! the exact strings the Fetch API expects.
use futures::io::{AllowStdIo, AsyncRead, AsyncReadExt};
use std::collections::HashMap;
use std::fmt;
use std::pin::Pin;
use tokio_util::sync::CancellationToken;

use crate::net::host::MaybeSend;

/// Async byte source usable as a request body. `Send` except on `wasm32`.
pub trait BodyReader: AsyncRead + MaybeSend {}
impl<T: AsyncRead + MaybeSend + ?Sized> BodyReader for T {}

/// Request body source.
///
/// A body is drained to completion exactly once, before anything is handed to the host.
pub enum Body {
    /// Already in memory, used as-is
    Bytes(Vec<u8>),
    /// Streamed source, read until EOF
    Reader(Pin<Box<dyn BodyReader>>),
}

impl Body {
    pub fn from_reader(reader: impl AsyncRead + MaybeSend + 'static) -> Self {
        Body::Reader(Box::pin(reader))
    }

    /// Wraps a blocking reader. Fine for in-memory sources; anything that blocks will stall the
    /// caller's executor while draining.
    pub fn from_std_reader(reader: impl std::io::Read + MaybeSend + 'static) -> Self {
        Body::Reader(Box::pin(AllowStdIo::new(reader)))
    }

    /// Reads the whole body into a contiguous buffer.
    pub(crate) async fn drain(self) -> std::io::Result<Vec<u8>> {
        match self {
            Body::Bytes(bytes) => Ok(bytes),
            Body::Reader(mut reader) => {
                let mut buf = Vec::new();
                reader.read_to_end(&mut buf).await?;
                Ok(buf)
            }
        }
    }
}

impl fmt::Debug for Body {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Body::Bytes(bytes) => f.debug_tuple("Bytes").field(&bytes.len()).finish(),
            Body::Reader(_) => f.write_str("Reader(..)"),
        }
    }
}

impl From<Vec<u8>> for Body {
    fn from(bytes: Vec<u8>) -> Self {
        Body::Bytes(bytes)
    }
}

impl From<&[u8]> for Body {
    fn from(bytes: &[u8]) -> Self {
        Body::Bytes(bytes.to_vec())
    }
}

impl From<String> for Body {
    fn from(s: String) -> Self {
        Body::Bytes(s.into_bytes())
    }
}

impl From<&str> for Body {
    fn from(s: &str) -> Self {
        Body::Bytes(s.as_bytes().to_vec())
    }
}

macro_rules! fetch_enum {
    (
        $(#[$meta:meta])*
        pub enum $name:ident { $($variant:ident => $value:literal),+ $(,)? }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
        pub enum $name {
            $($variant),+
        }

        impl $name {
            /// The string the Fetch API uses for this value.
            pub fn as_str(&self) -> &'static str {
                match self {
                    $($name::$variant => $value),+
                }
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.as_str())
            }
        }
    };
}

fetch_enum! {
    /// <https://developer.mozilla.org/en-US/docs/Web/API/Request/mode>
    pub enum RequestMode {
        SameOrigin => "same-origin",
        NoCors => "no-cors",
        Cors => "cors",
        Navigate => "navigate",
    }
}

fetch_enum! {
    /// <https://developer.mozilla.org/en-US/docs/Web/API/Request/credentials>
    pub enum RequestCredentials {
        Omit => "omit",
        SameOrigin => "same-origin",
        Include => "include",
    }
}

fetch_enum! {
    /// <https://developer.mozilla.org/en-US/docs/Web/API/Request/cache>
    pub enum RequestCache {
        Default => "default",
        NoStore => "no-store",
        Reload => "reload",
        NoCache => "no-cache",
        ForceCache => "force-cache",
        OnlyIfCached => "only-if-cached",
    }
}

fetch_enum! {
    /// <https://developer.mozilla.org/en-US/docs/Web/API/Request/redirect>
    pub enum RequestRedirect {
        Follow => "follow",
        Error => "error",
        Manual => "manual",
    }
}

fetch_enum! {
    /// <https://developer.mozilla.org/en-US/docs/Web/API/Request/referrerPolicy>
    pub enum ReferrerPolicy {
        Empty => "",
        NoReferrer => "no-referrer",
        NoReferrerWhenDowngrade => "no-referrer-when-downgrade",
        Origin => "origin",
        OriginWhenCrossOrigin => "origin-when-cross-origin",
        UnsafeUrl => "unsafe-url",
        SameOrigin => "same-origin",
        StrictOrigin => "strict-origin",
        StrictOriginWhenCrossOrigin => "strict-origin-when-cross-origin",
    }
}

/// Options for a single fetch call.
#[derive(Debug, Default)]
pub struct RequestOptions {
    /// HTTP verb, see [`crate::net::method`]
    pub method: Option<String>,
    /// Request headers. Multi-valued headers must be pre-joined (see [`Header`](crate::net::Header))
    pub headers: Option<HashMap<String, String>>,
    pub body: Option<Body>,
    pub mode: Option<RequestMode>,
    pub credentials: Option<RequestCredentials>,
    pub cache: Option<RequestCache>,
    pub redirect: Option<RequestRedirect>,
    pub referrer: Option<String>,
    pub referrer_policy: Option<ReferrerPolicy>,
    /// Subresource integrity hash, e.g. `sha256-...`
    pub integrity: Option<String>,
    pub keepalive: Option<bool>,
    /// Cancelling this token aborts the request while it is in flight
    pub signal: Option<CancellationToken>,
}

impl RequestOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn method(mut self, method: impl AsRef<str>) -> Self {
        self.method = Some(method.as_ref().to_string());
        self
    }

    /// Sets a single request header, creating the header map when needed.
    pub fn header(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers
            .get_or_insert_with(HashMap::new)
            .insert(key.into(), value.into());
        self
    }

    /// Replaces the request headers. Accepts a plain map or a [`Header`](crate::net::Header).
    pub fn headers(mut self, headers: impl Into<HashMap<String, String>>) -> Self {
        self.headers = Some(headers.into());
        self
    }

    pub fn body(mut self, body: impl Into<Body>) -> Self {
        self.body = Some(body.into());
        self
    }

    pub fn mode(mut self, mode: RequestMode) -> Self {
        self.mode = Some(mode);
        self
    }

    pub fn credentials(mut self, credentials: RequestCredentials) -> Self {
        self.credentials = Some(credentials);
        self
    }

    pub fn cache(mut self, cache: RequestCache) -> Self {
        self.cache = Some(cache);
        self
    }

    pub fn redirect(mut self, redirect: RequestRedirect) -> Self {
        self.redirect = Some(redirect);
        self
    }

    pub fn referrer(mut self, referrer: impl Into<String>) -> Self {
        self.referrer = Some(referrer.into());
        self
    }

    pub fn referrer_policy(mut self, policy: ReferrerPolicy) -> Self {
        self.referrer_policy = Some(policy);
        self
    }

    pub fn integrity(mut self, integrity: impl Into<String>) -> Self {
        self.integrity = Some(integrity.into());
        self
    }

    pub fn keepalive(mut self, keepalive: bool) -> Self {
        self.keepalive = Some(keepalive);
        self
    }

    pub fn signal(mut self, signal: CancellationToken) -> Self {
        self.signal = Some(signal);
        self
    }
}
