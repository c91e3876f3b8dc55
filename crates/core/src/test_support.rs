//! Test doubles for the core ports.

use std::collections::{HashMap, VecDeque};
use std::time::Duration;

use async_trait::async_trait;
use http::StatusCode;
use parking_lot::Mutex;
use shopwire_domain::{RequestConfig, TransportError, TransportResponse};

use crate::session::SessionHost;
use crate::transport_ports::Transport;

/// Canned transport outcome.
#[derive(Debug, Clone)]
pub(crate) enum Reply {
    Status(StatusCode, String),
    Error(TransportError),
}

impl Reply {
    pub(crate) fn status(code: u16, body: &str) -> Self {
        Self::Status(StatusCode::from_u16(code).unwrap(), body.to_string())
    }
}

#[derive(Default)]
struct Route {
    queued: VecDeque<Reply>,
    fallback: Option<Reply>,
    delay: Option<Duration>,
}

/// Transport answering from per-path scripts and recording every call.
///
/// Queued replies are consumed first, then the fallback repeats. Unknown
/// paths answer 404.
#[derive(Default)]
pub(crate) struct MockTransport {
    routes: Mutex<HashMap<String, Route>>,
    calls: Mutex<Vec<RequestConfig>>,
}

impl MockTransport {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) fn on(&self, path: &str, reply: Reply) {
        self.routes.lock().entry(path.to_string()).or_default().fallback = Some(reply);
    }

    pub(crate) fn once(&self, path: &str, reply: Reply) {
        self.routes.lock().entry(path.to_string()).or_default().queued.push_back(reply);
    }

    pub(crate) fn delay(&self, path: &str, delay: Duration) {
        self.routes.lock().entry(path.to_string()).or_default().delay = Some(delay);
    }

    pub(crate) fn calls_to(&self, path: &str) -> usize {
        self.calls.lock().iter().filter(|request| request.path() == path).count()
    }

    pub(crate) fn requests(&self) -> Vec<RequestConfig> {
        self.calls.lock().clone()
    }
}

#[async_trait]
impl Transport for MockTransport {
    async fn call(&self, request: &RequestConfig) -> Result<TransportResponse, TransportError> {
        self.calls.lock().push(request.clone());

        let (reply, delay) = {
            let mut routes = self.routes.lock();
            match routes.get_mut(request.path()) {
                Some(route) => {
                    let reply = route.queued.pop_front().or_else(|| route.fallback.clone());
                    (reply, route.delay)
                }
                None => (None, None),
            }
        };

        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }

        match reply {
            Some(Reply::Status(status, body)) => Ok(TransportResponse::new(status, body)),
            Some(Reply::Error(e)) => Err(e),
            None => Ok(TransportResponse::new(StatusCode::NOT_FOUND, Vec::new())),
        }
    }
}

/// Host that records navigations and follows them.
pub(crate) struct RecordingHost {
    current: Mutex<String>,
    navigations: Mutex<Vec<String>>,
}

impl RecordingHost {
    pub(crate) fn at(path: &str) -> Self {
        Self { current: Mutex::new(path.to_string()), navigations: Mutex::new(Vec::new()) }
    }

    pub(crate) fn navigations(&self) -> Vec<String> {
        self.navigations.lock().clone()
    }
}

impl SessionHost for RecordingHost {
    fn current_path(&self) -> String {
        self.current.lock().clone()
    }

    fn navigate(&self, path: &str) {
        self.navigations.lock().push(path.to_string());
        *self.current.lock() = path.to_string();
    }
}
