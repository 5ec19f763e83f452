/// Errors produced by a single fetch call.
///
/// Host rejections keep the host's `message` verbatim as their display text, so a rejected
/// `fetch()` with `"NetworkError"` formats as exactly `NetworkError`.
#[derive(Debug, thiserror::Error)]
pub enum FetchError {
    /// The request body source could not be drained. No host call was made.
    #[error("failed to read request body: {0}")]
    RequestBody(#[from] std::io::Error),

    /// The host rejected the metadata phase (network failure, CORS, invalid URL, ...).
    #[error("{0}")]
    Network(String),

    /// The host rejected the body phase (body already consumed, decoding error, ...).
    #[error("{0}")]
    BodyRead(String),

    /// A phase was rejected after the caller's signal fired.
    #[error("{0}")]
    Aborted(String),

    /// A host capability was missing or returned something unexpected.
    #[error("host error: {0}")]
    Host(String),
}

impl FetchError {
    /// Returns the human-readable message of this error.
    ///
    /// For host rejections this is the rejection's `message` field, unchanged.
    pub fn message(&self) -> String {
        match self {
            FetchError::RequestBody(e) => e.to_string(),
            FetchError::Network(msg)
            | FetchError::BodyRead(msg)
            | FetchError::Aborted(msg)
            | FetchError::Host(msg) => msg.clone(),
        }
    }

    /// True when the call failed because the caller cancelled it.
    pub fn is_aborted(&self) -> bool {
        matches!(self, FetchError::Aborted(_))
    }

    /// Reclassifies a host rejection as caused by the caller's cancellation.
    pub(crate) fn into_aborted(self) -> Self {
        match self {
            FetchError::Network(msg) | FetchError::BodyRead(msg) => FetchError::Aborted(msg),
            other => other,
        }
    }
}
