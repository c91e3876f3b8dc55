//! Session teardown

use std::sync::Arc;

use parking_lot::Mutex;
use tracing::{debug, info, warn};

use super::ports::SessionHost;
use crate::scope::ScopedContextStore;

/// Clears the active shop and sends the host to the login path.
///
/// Navigation is idempotent: when several requests fail at once only the
/// first one redirects, the rest find the host already on the login path.
pub struct SessionTerminator {
    scope: Arc<ScopedContextStore>,
    host: Arc<dyn SessionHost>,
    login_path: String,
    // Serializes check-then-navigate across threads.
    gate: Mutex<()>,
}

impl SessionTerminator {
    /// Teardown clearing `scope` and sending `host` to `login_path`.
    pub fn new(
        scope: Arc<ScopedContextStore>,
        host: Arc<dyn SessionHost>,
        login_path: impl Into<String>,
    ) -> Self {
        Self { scope, host, login_path: login_path.into(), gate: Mutex::new(()) }
    }

    /// Path the host is sent to on teardown.
    pub fn login_path(&self) -> &str {
        &self.login_path
    }

    /// Tear the session down. Returns `true` if a redirect was issued.
    pub fn terminate(&self) -> bool {
        if let Err(e) = self.scope.clear() {
            warn!(error = %e, "Failed to clear scope during session teardown");
        }

        let _gate = self.gate.lock();
        let current = self.host.current_path();
        if same_path(&current, &self.login_path) {
            debug!(path = %current, "Host already on login path, skipping redirect");
            return false;
        }

        info!(from = %current, to = %self.login_path, "Session ended, redirecting to login");
        self.host.navigate(&self.login_path);
        true
    }
}

fn same_path(current: &str, target: &str) -> bool {
    let current = current.split(|c| c == '?' || c == '#').next().unwrap_or_default();
    current.trim_end_matches('/') == target.trim_end_matches('/')
}
