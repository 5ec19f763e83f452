//! Fully buffered response returned by a fetch call.
//!
//! Every field mirrors the host's `Response` object as it was when the metadata phase resolved,
//! plus the body bytes read in the body phase.
//!
//! ## Notes
//! - The body is stored as raw `Vec<u8>`. Use [`Response::text`] or [`Response::json`] to decode.
//! - `headers` keeps names as the host reported them (browsers report lowercase names).
//! - `body_used` is the host's flag *before* the bridge read the body, so it is normally `false`.
use http::HeaderMap;
use serde::de::DeserializeOwned;

use crate::errors::FetchError;
use crate::net::Header;

/// Response metadata as reported by the host, before the body is read.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ResponseMeta {
    /// Header pairs in host iteration order. Repeated names may appear.
    pub headers: Vec<(String, String)>,
    pub ok: bool,
    pub redirected: bool,
    pub status: u16,
    pub status_text: String,
    pub response_type: String,
    pub url: String,
    pub body_used: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Response {
    /// Response headers; a name maps to every value the host reported for it.
    pub headers: Header,

    /// True for a status in the 200-299 range.
    pub ok: bool,

    /// True when the request followed one or more redirects.
    pub redirected: bool,

    /// Numeric HTTP status code (e.g., `200`, `404`).
    pub status: u16,

    /// Reason phrase (e.g., `"OK"`, `"Not Found"`).
    ///
    /// Empty when there is none: browsers report `""` over HTTP/2, and the native host, which
    /// only knows canonical reasons, reports `""` for non-standard codes instead of a placeholder.
    pub status_text: String,

    /// Response type as classified by the host: `basic`, `cors`, `error`, `opaque`,
    /// `opaqueredirect`.
    pub response_type: String,

    /// Final URL of the response (after redirects, if any).
    pub url: String,

    pub body_used: bool,

    /// Raw response body bytes.
    pub body: Vec<u8>,
}

impl Response {
    /// Builds the partial response of the metadata phase. The body is filled in later.
    pub(crate) fn from_meta(meta: ResponseMeta) -> Self {
        Self {
            headers: meta.headers.into_iter().collect(),
            ok: meta.ok,
            redirected: meta.redirected,
            status: meta.status,
            status_text: meta.status_text,
            response_type: meta.response_type,
            url: meta.url,
            body_used: meta.body_used,
            body: Vec::new(),
        }
    }

    /// Body decoded as UTF-8, replacing invalid sequences.
    pub fn text(&self) -> String {
        String::from_utf8_lossy(&self.body).into_owned()
    }

    /// Body parsed as JSON.
    pub fn json<T: DeserializeOwned>(&self) -> serde_json::Result<T> {
        serde_json::from_slice(&self.body)
    }

    /// Headers as a case-insensitive `http::HeaderMap`.
    pub fn header_map(&self) -> Result<HeaderMap, FetchError> {
        self.headers.to_header_map()
    }

    /// Final URL parsed. Opaque responses report an empty URL, which fails to parse.
    pub fn parsed_url(&self) -> Result<url::Url, url::ParseError> {
        url::Url::parse(&self.url)
    }
}
