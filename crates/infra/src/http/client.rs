use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::cookie::Jar;
use reqwest::Client as ReqwestClient;
use shopwire_core::Transport;
use shopwire_domain::{ClientConfig, RequestConfig, Result, TransportError, TransportResponse};
use tracing::debug;
use url::Url;

use crate::errors::conversions::config_error;
use crate::errors::InfraError;

/// One-shot HTTP transport.
///
/// Holds two reqwest clients: a credentialed one sharing the session cookie
/// jar, and an anonymous one without a cookie store, selected per request by
/// `RequestConfig::with_credentials`. No retries happen here.
#[derive(Clone)]
pub struct HttpTransport {
    base_url: String,
    credentialed: ReqwestClient,
    anonymous: ReqwestClient,
    cookies: Arc<Jar>,
}

impl HttpTransport {
    /// Start building a new transport.
    pub fn builder() -> HttpTransportBuilder {
        HttpTransportBuilder::default()
    }

    /// Transport configured from client settings.
    ///
    /// # Errors
    /// Returns `ShopwireError::Config` if the base URL or client settings are
    /// invalid.
    pub fn from_config(config: &ClientConfig) -> Result<Self> {
        let mut builder = Self::builder()
            .base_url(config.base_url.clone())
            .timeout(Duration::from_secs(config.timeout_secs));

        if let Some(agent) = &config.user_agent {
            builder = builder.user_agent(agent.clone());
        }

        builder.build()
    }

    /// Session cookie jar used for credentialed calls.
    pub fn cookie_jar(&self) -> &Arc<Jar> {
        &self.cookies
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Resolve a request URL: absolute URLs pass through, anything else is a
    /// path appended to the base URL.
    pub fn resolve(&self, target: &str) -> std::result::Result<Url, InfraError> {
        if let Ok(url) = Url::parse(target) {
            return Ok(url);
        }

        let joined = format!(
            "{}/{}",
            self.base_url.trim_end_matches('/'),
            target.trim_start_matches('/')
        );
        Ok(Url::parse(&joined)?)
    }
}

#[async_trait]
impl Transport for HttpTransport {
    async fn call(
        &self,
        request: &RequestConfig,
    ) -> std::result::Result<TransportResponse, TransportError> {
        let url = self.resolve(&request.url)?;
        let client = if request.with_credentials { &self.credentialed } else { &self.anonymous };

        let mut builder =
            client.request(request.method.clone(), url.clone()).headers(request.headers.clone());
        if !request.query.is_empty() {
            builder = builder.query(&request.query);
        }
        if let Some(body) = &request.body {
            builder = builder.json(body);
        }

        let method = &request.method;
        debug!(%method, %url, credentials = request.with_credentials, "sending HTTP request");

        let response = builder.send().await.map_err(InfraError::from)?;
        let status = response.status();
        let body = response.bytes().await.map_err(InfraError::from)?;

        debug!(%method, %url, %status, bytes = body.len(), "received HTTP response");
        Ok(TransportResponse::new(status, body.to_vec()))
    }
}

/// Builder for [`HttpTransport`].
#[derive(Debug)]
pub struct HttpTransportBuilder {
    base_url: String,
    timeout: Duration,
    user_agent: Option<String>,
    default_headers: Option<reqwest::header::HeaderMap>,
    cookies: Option<Arc<Jar>>,
}

impl Default for HttpTransportBuilder {
    fn default() -> Self {
        let defaults = ClientConfig::default();
        Self {
            base_url: defaults.base_url,
            timeout: Duration::from_secs(defaults.timeout_secs),
            user_agent: None,
            default_headers: None,
            cookies: None,
        }
    }
}

impl HttpTransportBuilder {
    pub fn base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn user_agent(mut self, agent: impl Into<String>) -> Self {
        self.user_agent = Some(agent.into());
        self
    }

    pub fn default_headers(mut self, headers: reqwest::header::HeaderMap) -> Self {
        self.default_headers = Some(headers);
        self
    }

    /// Share an existing cookie jar (e.g. one restored from a previous run).
    pub fn cookie_jar(mut self, jar: Arc<Jar>) -> Self {
        self.cookies = Some(jar);
        self
    }

    pub fn build(mut self) -> Result<HttpTransport> {
        Url::parse(&self.base_url).map_err(|e| config_error("invalid base URL", e))?;

        let cookies = self.cookies.take().unwrap_or_default();
        let credentialed = self
            .client_builder()
            .cookie_provider(Arc::clone(&cookies))
            .build()
            .map_err(|e| config_error("failed to build HTTP client", e))?;
        let anonymous = self
            .client_builder()
            .build()
            .map_err(|e| config_error("failed to build HTTP client", e))?;

        Ok(HttpTransport { base_url: self.base_url, credentialed, anonymous, cookies })
    }

    fn client_builder(&self) -> reqwest::ClientBuilder {
        let mut builder = ReqwestClient::builder().timeout(self.timeout).no_proxy();

        if let Some(agent) = &self.user_agent {
            builder = builder.user_agent(agent.clone());
        }

        if let Some(headers) = &self.default_headers {
            builder = builder.default_headers(headers.clone());
        }

        builder
    }
}
