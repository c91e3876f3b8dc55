//! Single-flight session refresh
//!
//! However many requests discover an expired session at the same time, the
//! refresh endpoint is called once. The first caller starts the refresh; every
//! caller that arrives while it is outstanding awaits the same shared outcome.
//!
//! ```text
//!            ensure_refreshed()            refresh settles
//!   Idle ─────────────────────────▶ Refreshing ─────────────────▶ Idle
//!                                     │   ▲
//!                    ensure_refreshed()│   │ joins the shared outcome
//!                                     └───┘
//! ```
//!
//! The `Idle → Refreshing` decision and joining an in-flight refresh happen
//! inside one mutex critical section with no `.await`, so two callers can
//! never both start a refresh. The refresh itself runs on a spawned task:
//! callers that give up waiting do not cancel it for the others.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use futures::future::{BoxFuture, FutureExt, Shared};
use parking_lot::Mutex;
use shopwire_domain::RequestConfig;
use tracing::{debug, error, info, instrument, warn};

use crate::transport_ports::Transport;

type SharedOutcome = Shared<BoxFuture<'static, bool>>;

#[derive(Default)]
struct RefreshState {
    generation: u64,
    in_flight: Option<SharedOutcome>,
}

/// Owns the session refresh protocol.
pub struct RefreshCoordinator {
    transport: Arc<dyn Transport>,
    refresh_path: String,
    state: Arc<Mutex<RefreshState>>,
    refresh_calls: AtomicU64,
}

impl RefreshCoordinator {
    /// Create a coordinator calling `refresh_path` through `transport`.
    ///
    /// `transport` must be the raw transport, never something that routes
    /// back through the dispatcher, or a 401 from the refresh endpoint could
    /// trigger another refresh.
    pub fn new(transport: Arc<dyn Transport>, refresh_path: impl Into<String>) -> Self {
        Self {
            transport,
            refresh_path: refresh_path.into(),
            state: Arc::new(Mutex::new(RefreshState::default())),
            refresh_calls: AtomicU64::new(0),
        }
    }

    /// Endpoint the refresh call is POSTed to.
    pub fn refresh_path(&self) -> &str {
        &self.refresh_path
    }

    /// Whether a refresh call is currently outstanding.
    pub fn is_refreshing(&self) -> bool {
        self.state.lock().in_flight.is_some()
    }

    /// Number of refresh calls issued so far.
    pub fn refresh_count(&self) -> u64 {
        self.refresh_calls.load(Ordering::SeqCst)
    }

    /// Make sure the session has been refreshed, sharing any refresh already
    /// in flight.
    ///
    /// Returns `true` if the refresh endpoint answered 2xx. Any other status
    /// or a transport failure yields `false` for every caller of that wave;
    /// nobody retries the refresh on their own.
    #[instrument(skip(self))]
    pub async fn ensure_refreshed(&self) -> bool {
        let outcome = {
            let mut state = self.state.lock();
            match &state.in_flight {
                Some(outcome) => {
                    debug!("Session refresh already in flight, waiting for outcome");
                    outcome.clone()
                }
                None => {
                    state.generation += 1;
                    let outcome = self.start_refresh(state.generation);
                    state.in_flight = Some(outcome.clone());
                    outcome
                }
            }
        };

        outcome.await
    }

    /// Spawn the refresh call. Must be called with the state lock held.
    fn start_refresh(&self, generation: u64) -> SharedOutcome {
        self.refresh_calls.fetch_add(1, Ordering::SeqCst);
        info!(generation, path = %self.refresh_path, "Starting session refresh");

        let transport = Arc::clone(&self.transport);
        let request = RequestConfig::post(self.refresh_path.clone());
        let state = Arc::clone(&self.state);

        let task = {
            let state = Arc::clone(&state);
            tokio::spawn(async move {
                let refreshed = match transport.call(&request).await {
                    Ok(response) if response.is_success() => {
                        info!(generation, status = %response.status, "Session refreshed");
                        true
                    }
                    Ok(response) => {
                        warn!(generation, status = %response.status, "Session refresh rejected");
                        false
                    }
                    Err(e) => {
                        warn!(generation, error = %e, "Session refresh failed");
                        false
                    }
                };

                settle(&state, generation);
                refreshed
            })
        };

        async move {
            match task.await {
                Ok(refreshed) => refreshed,
                Err(e) => {
                    error!(generation, error = %e, "Session refresh task aborted");
                    settle(&state, generation);
                    false
                }
            }
        }
        .boxed()
        .shared()
    }
}

/// Back to `Idle`. Waiters already holding the shared outcome still receive
/// it; later callers start a new refresh.
fn settle(state: &Mutex<RefreshState>, generation: u64) {
    let mut state = state.lock();
    if state.generation == generation {
        state.in_flight = None;
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use shopwire_domain::TransportError;

    use super::*;
    use crate::test_support::{MockTransport, Reply};

    const REFRESH: &str = "/auth/refresh";

    fn coordinator(transport: &Arc<MockTransport>) -> Arc<RefreshCoordinator> {
        Arc::new(RefreshCoordinator::new(Arc::clone(transport) as Arc<dyn Transport>, REFRESH))
    }

    #[tokio::test]
    async fn single_caller_gets_success() {
        let transport = Arc::new(MockTransport::new());
        transport.on(REFRESH, Reply::status(200, ""));
        let coordinator = coordinator(&transport);

        assert!(coordinator.ensure_refreshed().await);
        assert!(!coordinator.is_refreshing());
        assert_eq!(transport.calls_to(REFRESH), 1);

        let request = transport.requests().remove(0);
        assert_eq!(request.method, http::Method::POST);
        assert!(request.body.is_none());
        assert!(request.with_credentials);
    }

    #[tokio::test]
    async fn non_success_and_transport_errors_are_false() {
        let transport = Arc::new(MockTransport::new());
        transport.once(REFRESH, Reply::status(500, "{}"));
        transport.once(REFRESH, Reply::status(401, ""));
        transport.once(REFRESH, Reply::Error(TransportError::Timeout));
        let coordinator = coordinator(&transport);

        assert!(!coordinator.ensure_refreshed().await);
        assert!(!coordinator.ensure_refreshed().await);
        assert!(!coordinator.ensure_refreshed().await);
        assert_eq!(coordinator.refresh_count(), 3);
    }

    #[tokio::test]
    async fn concurrent_callers_share_one_refresh() {
        let transport = Arc::new(MockTransport::new());
        transport.on(REFRESH, Reply::status(200, ""));
        transport.delay(REFRESH, Duration::from_millis(50));
        let coordinator = coordinator(&transport);

        let outcomes = futures::future::join_all(
            (0..5).map(|_| {
                let coordinator = Arc::clone(&coordinator);
                async move { coordinator.ensure_refreshed().await }
            }),
        )
        .await;

        assert_eq!(outcomes, vec![true; 5]);
        assert_eq!(transport.calls_to(REFRESH), 1);
        assert_eq!(coordinator.refresh_count(), 1);
    }

    #[tokio::test]
    async fn failed_refresh_is_delivered_to_every_waiter() {
        let transport = Arc::new(MockTransport::new());
        transport.on(REFRESH, Reply::status(500, ""));
        transport.delay(REFRESH, Duration::from_millis(50));
        let coordinator = coordinator(&transport);

        let (a, b, c) = tokio::join!(
            coordinator.ensure_refreshed(),
            coordinator.ensure_refreshed(),
            coordinator.ensure_refreshed()
        );

        assert!(!a && !b && !c);
        assert_eq!(transport.calls_to(REFRESH), 1);
    }

    #[tokio::test]
    async fn settled_refresh_allows_a_new_one() {
        let transport = Arc::new(MockTransport::new());
        transport.on(REFRESH, Reply::status(204, ""));
        let coordinator = coordinator(&transport);

        assert!(coordinator.ensure_refreshed().await);
        assert!(coordinator.ensure_refreshed().await);
        assert_eq!(transport.calls_to(REFRESH), 2);
    }

    #[tokio::test]
    async fn abandoned_caller_does_not_cancel_the_refresh() {
        let transport = Arc::new(MockTransport::new());
        transport.on(REFRESH, Reply::status(200, ""));
        transport.delay(REFRESH, Duration::from_millis(50));
        let coordinator = coordinator(&transport);

        let owner = {
            let coordinator = Arc::clone(&coordinator);
            tokio::spawn(async move { coordinator.ensure_refreshed().await })
        };
        tokio::time::sleep(Duration::from_millis(10)).await;
        assert!(coordinator.is_refreshing());
        owner.abort();

        assert!(coordinator.ensure_refreshed().await);
        assert_eq!(transport.calls_to(REFRESH), 1);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn single_flight_holds_across_worker_threads() {
        let transport = Arc::new(MockTransport::new());
        transport.on(REFRESH, Reply::status(200, ""));
        transport.delay(REFRESH, Duration::from_millis(200));
        let coordinator = coordinator(&transport);

        let handles: Vec<_> = (0..16)
            .map(|_| {
                let coordinator = Arc::clone(&coordinator);
                tokio::spawn(async move { coordinator.ensure_refreshed().await })
            })
            .collect();

        for handle in handles {
            assert!(handle.await.unwrap());
        }
        assert_eq!(transport.calls_to(REFRESH), 1);
    }
}
