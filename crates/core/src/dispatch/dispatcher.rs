//! Authenticated request dispatch
//!
//! `send` injects the active shop header, performs the call, and on a 401
//! drives at most one refresh-and-replay before giving up. The 401 checks run
//! in a fixed order: refresh endpoint first (a failed refresh must never
//! trigger another refresh), then the replay flag (never replay twice), then
//! the refresh itself.

use std::sync::Arc;

use http::header::{HeaderName, HeaderValue};
use serde::de::DeserializeOwned;
use serde_json::Value;
use shopwire_domain::{
    ClientConfig, Envelope, FailureCause, NormalizedError, RequestConfig, Result, ShopwireError,
    TransportError, TransportResponse,
};
use tracing::{debug, instrument, warn};

use super::normalizer::ErrorNormalizer;
use crate::scope::ScopedContextStore;
use crate::session::{RefreshCoordinator, SessionTerminator};
use crate::transport_ports::Transport;

/// Fixed wire names the dispatcher needs.
#[derive(Debug, Clone)]
pub struct DispatchSettings {
    /// Header carrying the active shop id
    pub scope_header: HeaderName,
    /// Session refresh endpoint, as a `/`-rooted path or an absolute URL
    pub refresh_path: String,
    // Path component of the base URL relative requests are resolved against.
    base_path: String,
}

impl DispatchSettings {
    /// Build settings from client configuration.
    ///
    /// # Errors
    /// Returns `ShopwireError::Config` if the scope header name is invalid.
    pub fn from_config(config: &ClientConfig) -> Result<Self> {
        let scope_header = HeaderName::from_bytes(config.scope_header.as_bytes()).map_err(|e| {
            ShopwireError::Config(format!("invalid scope header {}: {e}", config.scope_header))
        })?;

        let refresh_path = if is_absolute(&config.refresh_path) {
            config.refresh_path.trim().trim_end_matches('/').to_string()
        } else {
            rooted(&config.refresh_path)
        };

        Ok(Self { scope_header, refresh_path, base_path: rooted(url_path(&config.base_url)) })
    }

    /// Whether `target` (relative path or absolute URL, query already
    /// stripped) is the refresh endpoint.
    ///
    /// Paths are compared whole: `/partners/auth/refresh` is not
    /// `/auth/refresh`.
    pub fn is_refresh_endpoint(&self, target: &str) -> bool {
        if self.refresh_path.is_empty() {
            return false;
        }

        if is_absolute(&self.refresh_path) {
            return target.trim().trim_end_matches('/') == self.refresh_path;
        }

        if is_absolute(target) {
            let path = rooted(url_path(target));
            return path == self.refresh_path
                || path == format!("{}{}", self.base_path, self.refresh_path);
        }

        rooted(target) == self.refresh_path
    }
}

fn is_absolute(target: &str) -> bool {
    target.contains("://")
}

/// Path component of an absolute URL; relative input is returned as is.
fn url_path(url: &str) -> &str {
    match url.split_once("://") {
        Some((_, rest)) => rest.find('/').map_or("", |i| &rest[i..]),
        None => url,
    }
}

/// `auth/refresh/` -> `/auth/refresh`; blank or `/` -> empty.
fn rooted(path: &str) -> String {
    let trimmed = path.trim().trim_matches('/');
    if trimmed.is_empty() {
        String::new()
    } else {
        format!("/{trimmed}")
    }
}

/// Entry point for every API call made by the application.
pub struct RequestDispatcher {
    transport: Arc<dyn Transport>,
    scope: Arc<ScopedContextStore>,
    refresh: Arc<RefreshCoordinator>,
    terminator: Arc<SessionTerminator>,
    normalizer: ErrorNormalizer,
    settings: DispatchSettings,
}

impl RequestDispatcher {
    /// Wire a dispatcher from its collaborators. `refresh` must share
    /// `transport` (or another raw transport), never this dispatcher.
    pub fn new(
        transport: Arc<dyn Transport>,
        scope: Arc<ScopedContextStore>,
        refresh: Arc<RefreshCoordinator>,
        terminator: Arc<SessionTerminator>,
        settings: DispatchSettings,
    ) -> Self {
        Self {
            transport,
            scope,
            refresh,
            terminator,
            normalizer: ErrorNormalizer::default(),
            settings,
        }
    }

    /// Replace the default error normalizer.
    pub fn with_normalizer(mut self, normalizer: ErrorNormalizer) -> Self {
        self.normalizer = normalizer;
        self
    }

    /// Active shop store read on every request.
    pub fn scope(&self) -> &Arc<ScopedContextStore> {
        &self.scope
    }

    /// Coordinator driving session refresh on 401.
    pub fn refresh(&self) -> &Arc<RefreshCoordinator> {
        &self.refresh
    }

    /// Teardown run when the session cannot be recovered.
    pub fn terminator(&self) -> &Arc<SessionTerminator> {
        &self.terminator
    }

    /// Normalizer every failure goes through.
    pub fn normalizer(&self) -> &ErrorNormalizer {
        &self.normalizer
    }

    /// Send a request and return the unwrapped envelope `data`.
    ///
    /// # Errors
    /// Returns a [`NormalizedError`] for any failure that could not be
    /// recovered by a single session refresh.
    pub async fn send<T: DeserializeOwned>(
        &self,
        config: RequestConfig,
    ) -> std::result::Result<T, NormalizedError> {
        self.send_enveloped(config).await.map(|envelope| envelope.data)
    }

    /// Like [`send`](Self::send) but keeps the envelope, for callers that
    /// want the success `message`.
    ///
    /// # Errors
    /// Same as [`send`](Self::send).
    #[instrument(skip(self, config), fields(method = %config.method, url = %config.url))]
    pub async fn send_enveloped<T: DeserializeOwned>(
        &self,
        mut config: RequestConfig,
    ) -> std::result::Result<Envelope<T>, NormalizedError> {
        self.inject_scope(&mut config);

        let mut outcome = self.transport.call(&config).await;
        loop {
            let response = match outcome {
                Ok(response) => response,
                Err(e) => return Err(self.fail(e.into())),
            };

            if response.is_success() {
                return self.unwrap_envelope(response);
            }

            if !response.is_unauthorized() {
                return Err(self.fail(status_cause(response)));
            }

            if self.settings.is_refresh_endpoint(config.path()) {
                warn!("Refresh endpoint answered 401, session is gone");
                return Err(self.fail_session(status_cause(response)));
            }

            if !config.mark_retried() {
                warn!("Request still unauthorized after session refresh");
                return Err(self.fail_session(status_cause(response)));
            }

            if !self.refresh.ensure_refreshed().await {
                return Err(self.fail_session(status_cause(response)));
            }

            debug!("Session refreshed, replaying request");
            outcome = self.transport.call(&config).await;
        }
    }

    /// Add the scope header unless the caller already set one.
    fn inject_scope(&self, config: &mut RequestConfig) {
        if config.headers.contains_key(&self.settings.scope_header) {
            return;
        }

        let Some(scope) = self.scope.get() else {
            return;
        };

        match HeaderValue::from_str(scope.as_str()) {
            Ok(value) => {
                config.headers.insert(self.settings.scope_header.clone(), value);
            }
            Err(e) => warn!(scope = %scope, error = %e, "Scope id is not a valid header value"),
        }
    }

    fn unwrap_envelope<T: DeserializeOwned>(
        &self,
        response: TransportResponse,
    ) -> std::result::Result<Envelope<T>, NormalizedError> {
        let envelope = Envelope::<Value>::from_body(&response.body)
            .map_err(|e| self.fail(TransportError::MalformedResponse(e.to_string()).into()))?;

        if !envelope.success {
            return Err(self.fail(FailureCause::Rejected {
                status: response.status,
                body: response.text(),
            }));
        }

        envelope
            .into_typed()
            .map_err(|e| self.fail(TransportError::MalformedResponse(e.to_string()).into()))
    }

    fn fail(&self, cause: FailureCause) -> NormalizedError {
        let error = self.normalizer.normalize(cause);
        warn!(
            kind = error.label(),
            status = ?error.status().map(|s| s.as_u16()),
            error = %error,
            "Request failed"
        );
        error
    }

    /// Unrecoverable session failure: normalize, then tear the session down.
    fn fail_session(&self, cause: FailureCause) -> NormalizedError {
        let error = self.fail(cause);
        self.terminator.terminate();
        error
    }
}

fn status_cause(response: TransportResponse) -> FailureCause {
    let body = response.text();
    FailureCause::Status { status: response.status, body }
}
