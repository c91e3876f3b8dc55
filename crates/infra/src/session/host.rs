//! Watch-channel session host
//!
//! Embedding applications that route on their own (a TUI, a desktop shell,
//! a headless worker) subscribe to path changes instead of implementing
//! [`SessionHost`] themselves.

use shopwire_core::SessionHost;
use tokio::sync::watch;
use tracing::info;

/// [`SessionHost`] publishing the current path on a `tokio::sync::watch` channel.
#[derive(Debug, Clone)]
pub struct WatchSessionHost {
    tx: watch::Sender<String>,
}

impl WatchSessionHost {
    pub fn new(initial_path: impl Into<String>) -> Self {
        let (tx, _rx) = watch::channel(initial_path.into());
        Self { tx }
    }

    /// Receiver that observes every navigation.
    pub fn subscribe(&self) -> watch::Receiver<String> {
        self.tx.subscribe()
    }

    /// Record a navigation performed by the application itself.
    pub fn set_path(&self, path: impl Into<String>) {
        self.tx.send_replace(path.into());
    }
}

impl Default for WatchSessionHost {
    fn default() -> Self {
        Self::new("/")
    }
}

impl SessionHost for WatchSessionHost {
    fn current_path(&self) -> String {
        self.tx.borrow().clone()
    }

    fn navigate(&self, path: &str) {
        info!(path, "Navigating host");
        self.tx.send_replace(path.to_string());
    }
}
