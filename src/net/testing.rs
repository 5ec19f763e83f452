//! Scripted host for unit tests.
use async_trait::async_trait;
use std::io::Read;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex, MutexGuard};
use tokio_util::sync::CancellationToken;

use crate::errors::FetchError;
use crate::net::host::{AbortController, FetchInit, Host, HostResponse};
use crate::net::ResponseMeta;

pub(crate) const ABORT_MESSAGE: &str = "The user aborted a request.";

/// How a scripted phase settles.
#[derive(Debug, Clone)]
pub(crate) enum Outcome<T> {
    Resolve(T),
    Reject(String),
    /// Stays pending until the call's abort signal fires, then rejects with [`ABORT_MESSAGE`].
    WaitForAbort,
}

impl<T: Clone> Outcome<T> {
    /// Settles like a browser would: a signal that is already aborted rejects straight away.
    async fn settle(&self, signal: Option<&CancellationToken>) -> Result<T, String> {
        if signal.is_some_and(|s| s.is_cancelled()) {
            return Err(ABORT_MESSAGE.to_string());
        }
        match self {
            Outcome::Resolve(value) => Ok(value.clone()),
            Outcome::Reject(msg) => Err(msg.clone()),
            Outcome::WaitForAbort => {
                match signal {
                    Some(signal) => signal.cancelled().await,
                    None => std::future::pending::<()>().await,
                }
                Err(ABORT_MESSAGE.to_string())
            }
        }
    }
}

/// A recorded host call. The signal is reduced to whether one was attached.
#[derive(Debug)]
pub(crate) struct RecordedCall {
    pub url: String,
    pub init: FetchInit<()>,
    pub had_signal: bool,
}

#[derive(Default)]
struct Counters {
    aborts: AtomicUsize,
    body_reads: AtomicUsize,
    controllers: AtomicUsize,
}

type Hook = Box<dyn Fn() + Send + Sync>;

pub(crate) struct MockHost {
    meta: Outcome<ResponseMeta>,
    body: Outcome<Vec<u8>>,
    on_fetch: Option<Hook>,
    calls: Mutex<Vec<RecordedCall>>,
    counters: Arc<Counters>,
}

impl MockHost {
    pub fn new(meta: Outcome<ResponseMeta>, body: Outcome<Vec<u8>>) -> Self {
        Self {
            meta,
            body,
            on_fetch: None,
            calls: Mutex::new(Vec::new()),
            counters: Arc::new(Counters::default()),
        }
    }

    /// Runs `hook` inside every host fetch, before the metadata phase settles.
    pub fn on_fetch(&mut self, hook: impl Fn() + Send + Sync + 'static) {
        self.on_fetch = Some(Box::new(hook));
    }

    pub fn calls(&self) -> MutexGuard<'_, Vec<RecordedCall>> {
        self.calls.lock().unwrap()
    }

    pub fn aborts(&self) -> usize {
        self.counters.aborts.load(Ordering::SeqCst)
    }

    pub fn body_reads(&self) -> usize {
        self.counters.body_reads.load(Ordering::SeqCst)
    }

    pub fn controllers_created(&self) -> usize {
        self.counters.controllers.load(Ordering::SeqCst)
    }
}

pub(crate) struct MockController {
    token: CancellationToken,
    counters: Arc<Counters>,
}

impl AbortController for MockController {
    type Signal = CancellationToken;

    fn signal(&self) -> CancellationToken {
        self.token.clone()
    }

    fn abort(&self) {
        self.counters.aborts.fetch_add(1, Ordering::SeqCst);
        self.token.cancel();
    }
}

pub(crate) struct MockResponse {
    meta: ResponseMeta,
    body: Outcome<Vec<u8>>,
    signal: Option<CancellationToken>,
    counters: Arc<Counters>,
}

#[async_trait]
impl HostResponse for MockResponse {
    fn metadata(&self) -> Result<ResponseMeta, FetchError> {
        Ok(self.meta.clone())
    }

    async fn array_buffer(self) -> Result<Vec<u8>, String> {
        self.counters.body_reads.fetch_add(1, Ordering::SeqCst);
        self.body.settle(self.signal.as_ref()).await
    }
}

#[async_trait]
impl Host for MockHost {
    type Controller = MockController;
    type Response = MockResponse;

    fn abort_controller(&self) -> Result<MockController, FetchError> {
        self.counters.controllers.fetch_add(1, Ordering::SeqCst);
        Ok(MockController {
            token: CancellationToken::new(),
            counters: self.counters.clone(),
        })
    }

    async fn fetch(&self, url: &str, init: FetchInit<CancellationToken>) -> Result<MockResponse, String> {
        let signal = init.signal.clone();
        self.calls.lock().unwrap().push(RecordedCall {
            url: url.to_string(),
            had_signal: signal.is_some(),
            init: FetchInit {
                method: init.method,
                headers: init.headers,
                body: init.body,
                mode: init.mode,
                credentials: init.credentials,
                cache: init.cache,
                redirect: init.redirect,
                referrer: init.referrer,
                referrer_policy: init.referrer_policy,
                integrity: init.integrity,
                keepalive: init.keepalive,
                signal: None,
            },
        });

        if let Some(hook) = &self.on_fetch {
            hook();
        }

        let meta = self.meta.settle(signal.as_ref()).await?;
        Ok(MockResponse {
            meta,
            body: self.body.clone(),
            signal,
            counters: self.counters.clone(),
        })
    }
}

/// Reader that counts how often it reported end of stream.
pub(crate) struct CountingReader {
    inner: std::io::Cursor<Vec<u8>>,
    eof_hits: Arc<AtomicUsize>,
}

impl CountingReader {
    pub fn new(data: Vec<u8>) -> Self {
        Self {
            inner: std::io::Cursor::new(data),
            eof_hits: Arc::new(AtomicUsize::new(0)),
        }
    }

    pub fn eof_hits(&self) -> Arc<AtomicUsize> {
        self.eof_hits.clone()
    }
}

impl Read for CountingReader {
    fn read(&mut self, buf: &mut [u8]) -> std::io::Result<usize> {
        let n = self.inner.read(buf)?;
        if n == 0 && !buf.is_empty() {
            self.eof_hits.fetch_add(1, Ordering::SeqCst);
        }
        Ok(n)
    }
}

pub(crate) struct FailingReader;

impl Read for FailingReader {
    fn read(&mut self, _buf: &mut [u8]) -> std::io::Result<usize> {
        Err(std::io::Error::new(std::io::ErrorKind::ConnectionReset, "source went away"))
    }
}
