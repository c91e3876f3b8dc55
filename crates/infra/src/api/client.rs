//! API client
//!
//! Composition root for the request pipeline: owns the transport, the scope
//! store, the refresh coordinator, and the dispatcher, so every client (and
//! every test) gets its own independent state.

use std::sync::Arc;

use serde::de::DeserializeOwned;
use serde::Serialize;
use shopwire_core::{
    DispatchSettings, ErrorNormalizer, RefreshCoordinator, RequestDispatcher, ScopeStorage,
    ScopedContextStore, SessionHost, SessionTerminator, Transport,
};
use shopwire_domain::{
    ClientConfig, Envelope, FailureCause, NormalizedError, RequestConfig, Result, ScopeId,
    ShopwireError,
};
use tracing::info;

use crate::http::HttpTransport;
use crate::session::WatchSessionHost;
use crate::storage::FileScopeStorage;

/// Result of an API call.
pub type ApiResult<T> = std::result::Result<T, NormalizedError>;

/// Authenticated API client
pub struct ApiClient {
    config: ClientConfig,
    dispatcher: RequestDispatcher,
    host: Arc<dyn SessionHost>,
}

impl ApiClient {
    /// Create a builder for fluent configuration
    pub fn builder() -> ApiClientBuilder {
        ApiClientBuilder::default()
    }

    /// Client with the reqwest transport, file-backed scope storage, and a
    /// watch-channel host, all derived from `config`.
    ///
    /// # Errors
    /// Returns `ShopwireError::Config` if the configuration is invalid.
    pub fn from_config(config: ClientConfig) -> Result<Self> {
        Self::builder().config(config).build()
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    pub fn dispatcher(&self) -> &RequestDispatcher {
        &self.dispatcher
    }

    pub fn refresh(&self) -> &Arc<RefreshCoordinator> {
        self.dispatcher.refresh()
    }

    pub fn session_host(&self) -> &Arc<dyn SessionHost> {
        &self.host
    }

    /// Send a fully specified request and return the envelope `data`.
    ///
    /// # Errors
    /// Returns a [`NormalizedError`] for any failure not recovered by a
    /// single session refresh.
    pub async fn send<T: DeserializeOwned>(&self, request: RequestConfig) -> ApiResult<T> {
        self.dispatcher.send(request).await
    }

    /// Send a request and keep the whole envelope.
    ///
    /// # Errors
    /// Same as [`send`](Self::send).
    pub async fn send_raw<T: DeserializeOwned>(
        &self,
        request: RequestConfig,
    ) -> ApiResult<Envelope<T>> {
        self.dispatcher.send_enveloped(request).await
    }

    /// # Errors
    /// Same as [`send`](Self::send).
    pub async fn get<T: DeserializeOwned>(&self, path: &str) -> ApiResult<T> {
        self.send(RequestConfig::get(path)).await
    }

    /// # Errors
    /// Same as [`send`](Self::send); also fails if `body` cannot be serialized.
    pub async fn post<B, T>(&self, path: &str, body: &B) -> ApiResult<T>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        self.send_json(RequestConfig::post(path), body).await
    }

    /// # Errors
    /// Same as [`post`](Self::post).
    pub async fn put<B, T>(&self, path: &str, body: &B) -> ApiResult<T>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        self.send_json(RequestConfig::put(path), body).await
    }

    /// # Errors
    /// Same as [`post`](Self::post).
    pub async fn patch<B, T>(&self, path: &str, body: &B) -> ApiResult<T>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        self.send_json(RequestConfig::patch(path), body).await
    }

    /// # Errors
    /// Same as [`send`](Self::send).
    pub async fn delete<T: DeserializeOwned>(&self, path: &str) -> ApiResult<T> {
        self.send(RequestConfig::delete(path)).await
    }

    /// The active shop, if one is selected.
    pub fn scope(&self) -> Option<ScopeId> {
        self.dispatcher.scope().get()
    }

    /// Select the active shop for all subsequent requests.
    ///
    /// # Errors
    /// Returns `ShopwireError::Storage` if the selection cannot be persisted.
    pub fn select_scope(&self, scope: impl Into<ScopeId>) -> Result<()> {
        let scope = scope.into();
        info!(scope = %scope, "Selecting shop");
        self.dispatcher.scope().set(Some(scope))
    }

    /// Forget the active shop (e.g. on logout).
    ///
    /// # Errors
    /// Returns `ShopwireError::Storage` if the stored entry cannot be removed.
    pub fn clear_scope(&self) -> Result<()> {
        self.dispatcher.scope().clear()
    }

    async fn send_json<B, T>(&self, request: RequestConfig, body: &B) -> ApiResult<T>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let request = request.json(body).map_err(|e| self.invalid_request(&e))?;
        self.send(request).await
    }

    /// The request never left the client, so this is neither a transport
    /// nor a server failure.
    fn invalid_request(&self, err: &ShopwireError) -> NormalizedError {
        self.dispatcher.normalizer().normalize(FailureCause::Other(err.to_string()))
    }
}

/// Builder for [`ApiClient`]
///
/// Every collaborator defaults to the production adapter derived from the
/// configuration; tests override the ones they need to observe.
#[derive(Default)]
pub struct ApiClientBuilder {
    config: Option<ClientConfig>,
    transport: Option<Arc<dyn Transport>>,
    storage: Option<Arc<dyn ScopeStorage>>,
    host: Option<Arc<dyn SessionHost>>,
    normalizer: Option<ErrorNormalizer>,
}

impl ApiClientBuilder {
    pub fn config(mut self, config: ClientConfig) -> Self {
        self.config = Some(config);
        self
    }

    /// Use a custom transport instead of [`HttpTransport`].
    pub fn transport(mut self, transport: Arc<dyn Transport>) -> Self {
        self.transport = Some(transport);
        self
    }

    /// Use custom scope storage instead of [`FileScopeStorage`].
    pub fn storage(mut self, storage: Arc<dyn ScopeStorage>) -> Self {
        self.storage = Some(storage);
        self
    }

    /// Host to navigate on session teardown. Defaults to a
    /// [`WatchSessionHost`] at `/`.
    pub fn host(mut self, host: Arc<dyn SessionHost>) -> Self {
        self.host = Some(host);
        self
    }

    pub fn normalizer(mut self, normalizer: ErrorNormalizer) -> Self {
        self.normalizer = Some(normalizer);
        self
    }

    /// Build the API client
    ///
    /// # Errors
    /// Returns `ShopwireError::Config` if the base URL or scope header in the
    /// configuration is invalid.
    pub fn build(self) -> Result<ApiClient> {
        let config = self.config.unwrap_or_default();
        let settings = DispatchSettings::from_config(&config)?;

        let transport: Arc<dyn Transport> = match self.transport {
            Some(transport) => transport,
            None => Arc::new(HttpTransport::from_config(&config)?),
        };
        let storage = self
            .storage
            .unwrap_or_else(|| Arc::new(FileScopeStorage::from_config(&config)));
        let host = self.host.unwrap_or_else(|| Arc::new(WatchSessionHost::default()));

        let scope = Arc::new(ScopedContextStore::new(storage));
        // The coordinator talks to the raw transport so the refresh call is
        // never intercepted by the dispatcher.
        let refresh =
            Arc::new(RefreshCoordinator::new(Arc::clone(&transport), config.refresh_path.clone()));
        let terminator = Arc::new(SessionTerminator::new(
            Arc::clone(&scope),
            Arc::clone(&host),
            config.login_path.clone(),
        ));

        let mut dispatcher =
            RequestDispatcher::new(transport, scope, refresh, terminator, settings);
        if let Some(normalizer) = self.normalizer {
            dispatcher = dispatcher.with_normalizer(normalizer);
        }

        info!(base_url = %config.base_url, "API client ready");
        Ok(ApiClient { config, dispatcher, host })
    }
}
