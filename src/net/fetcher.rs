use futures::channel::oneshot;
use futures::future::{self, Either};
use std::fmt;
use std::pin::pin;
use tokio_util::sync::CancellationToken;

use crate::errors::FetchError;
use crate::net::host::{AbortController, FetchInit, Host, HostResponse};
use crate::net::{RequestOptions, Response};

/// Where a fetch call is in its life. Transitions are strictly linear; `Complete` and `Failed` are
/// terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FetchPhase {
    NotStarted,
    MetadataPending,
    MetadataResolved,
    BodyPending,
    Complete,
    Failed,
}

impl fmt::Display for FetchPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            FetchPhase::NotStarted => "not-started",
            FetchPhase::MetadataPending => "metadata-pending",
            FetchPhase::MetadataResolved => "metadata-resolved",
            FetchPhase::BodyPending => "body-pending",
            FetchPhase::Complete => "complete",
            FetchPhase::Failed => "failed",
        };
        f.write_str(s)
    }
}

/// Issues requests through a [`Host`].
///
/// The fetcher holds no state besides the host. Concurrent calls on the same fetcher are
/// independent of each other.
///
/// ```no_run
/// # async fn run() -> Result<(), fetch_bridge::FetchError> {
/// use fetch_bridge::net::{method, Fetcher, NativeHost, RequestOptions};
///
/// let fetcher = Fetcher::new(NativeHost::new(None)?);
/// let resp = fetcher
///     .fetch("https://example.com/api/ping", RequestOptions::new().method(method::GET))
///     .await?;
/// println!("{} {}", resp.status, resp.text());
/// # Ok(())
/// # }
/// ```
pub struct Fetcher<H> {
    host: H,
}

impl<H: Host> Fetcher<H> {
    pub fn new(host: H) -> Self {
        Self { host }
    }

    pub fn host(&self) -> &H {
        &self.host
    }

    /// Fetches `url` and returns the fully buffered response.
    ///
    /// The URL is passed to the host verbatim. Either a response or an error is returned, never a
    /// partially filled response. When `options.signal` is cancelled while the call is in flight,
    /// the host's abort controller fires and the call fails with [`FetchError::Aborted`].
    pub async fn fetch(&self, url: &str, mut options: RequestOptions) -> Result<Response, FetchError> {
        let signal = options.signal.take();
        let mut init = map_options(options).await?;

        let Some(signal) = signal else {
            return self.round_trip(url, init).await;
        };

        let controller = self.host.abort_controller()?;
        init.signal = Some(controller.signal());

        // Cancelled before the call: the host gets a signal that is already aborted, as with a
        // browser `fetch` handed an aborted `AbortSignal`.
        if signal.is_cancelled() {
            log::debug!("fetch {url}: signal already cancelled, aborting before the host call");
            controller.abort();
            return self.round_trip(url, init).await.map_err(FetchError::into_aborted);
        }

        let (done_tx, done_rx) = oneshot::channel();
        let call = async {
            let result = self.round_trip(url, init).await;
            let _ = done_tx.send(());
            result
        };
        let (result, aborted) = futures::join!(call, forward_abort(&signal, &controller, done_rx));

        result.map_err(|e| if aborted { e.into_aborted() } else { e })
    }

    async fn round_trip(
        &self,
        url: &str,
        init: FetchInit<<H::Controller as AbortController>::Signal>,
    ) -> Result<Response, FetchError> {
        log::debug!("fetch {url}: {}", init.method.as_deref().unwrap_or("GET"));

        let result = self.phases(url, init).await;
        match &result {
            Ok(resp) => log::trace!("fetch {url}: {} ({})", FetchPhase::Complete, resp.status),
            Err(e) => log::trace!("fetch {url}: {} ({e})", FetchPhase::Failed),
        }
        result
    }

    async fn phases(
        &self,
        url: &str,
        init: FetchInit<<H::Controller as AbortController>::Signal>,
    ) -> Result<Response, FetchError> {
        log::trace!("fetch {url}: {}", FetchPhase::MetadataPending);
        let handle = self.host.fetch(url, init).await.map_err(FetchError::Network)?;

        let mut response = Response::from_meta(handle.metadata()?);
        log::trace!("fetch {url}: {}", FetchPhase::MetadataResolved);

        log::trace!("fetch {url}: {}", FetchPhase::BodyPending);
        response.body = handle.array_buffer().await.map_err(FetchError::BodyRead)?;

        Ok(response)
    }
}

/// Builds the host-call arguments from the caller's options, draining the body.
///
/// The signal is not carried over; the caller wires up a host controller instead.
pub(crate) async fn map_options<S>(options: RequestOptions) -> Result<FetchInit<S>, FetchError> {
    let body = match options.body {
        Some(body) => Some(body.drain().await?),
        None => None,
    };

    Ok(FetchInit {
        method: options.method,
        headers: options.headers,
        body,
        mode: options.mode,
        credentials: options.credentials,
        cache: options.cache,
        redirect: options.redirect,
        referrer: options.referrer,
        referrer_policy: options.referrer_policy,
        integrity: options.integrity,
        keepalive: options.keepalive,
        signal: None,
    })
}

/// Forwards the caller's cancellation to the host controller until `done` fires. Returns whether
/// the controller was aborted.
///
/// `done` is polled first so a cancel racing the call's completion never reaches the host.
async fn forward_abort<C: AbortController>(
    signal: &CancellationToken,
    controller: &C,
    done: oneshot::Receiver<()>,
) -> bool {
    let cancelled = pin!(signal.cancelled());
    match future::select(done, cancelled).await {
        Either::Left(_) => false,
        Either::Right(_) => {
            log::debug!("fetch cancelled by caller, aborting host request");
            controller.abort();
            true
        }
    }
}
