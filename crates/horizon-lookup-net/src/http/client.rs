//! The HTTP client used to load lookup payloads.

use std::sync::Arc;
use std::time::Duration;

use horizon_lookup_core::logging::targets;
use http::header::{HeaderMap, HeaderName, HeaderValue};
use reqwest::redirect::Policy;

use super::request::HttpRequestBuilder;
use crate::error::{NetworkError, Result};

/// Client settings.
#[derive(Clone, Debug)]
pub struct HttpClientConfig {
    /// Total time allowed per request.
    pub timeout: Option<Duration>,
    /// Time allowed to establish a connection.
    pub connect_timeout: Option<Duration>,
    /// Redirects to follow; `0` stops at the first redirect.
    pub redirect_limit: usize,
    /// `User-Agent` header value.
    pub user_agent: String,
    /// Proxy for all requests.
    pub proxy: Option<String>,
    /// Whether [`HttpClient::get_json`] adds the cache-busting parameter.
    pub bypass_cache: bool,
}

impl Default for HttpClientConfig {
    fn default() -> Self {
        Self {
            timeout: Some(Duration::from_secs(30)),
            connect_timeout: Some(Duration::from_secs(10)),
            redirect_limit: 10,
            user_agent: concat!("horizon-lookup/", env!("CARGO_PKG_VERSION")).to_string(),
            proxy: None,
            bypass_cache: true,
        }
    }
}

/// Builds an [`HttpClient`].
#[derive(Debug, Default)]
pub struct HttpClientBuilder {
    config: HttpClientConfig,
    headers: HeaderMap,
}

impl HttpClientBuilder {
    /// Start from the default settings.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the per-request timeout.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.config.timeout = Some(timeout);
        self
    }

    /// Let requests run as long as they take.
    pub fn without_timeout(mut self) -> Self {
        self.config.timeout = None;
        self
    }

    /// Set the connect timeout.
    pub fn connect_timeout(mut self, timeout: Duration) -> Self {
        self.config.connect_timeout = Some(timeout);
        self
    }

    /// Set how many redirects to follow.
    pub fn redirect_limit(mut self, limit: usize) -> Self {
        self.config.redirect_limit = limit;
        self
    }

    /// Set the `User-Agent`.
    pub fn user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.config.user_agent = user_agent.into();
        self
    }

    /// Route requests through a proxy.
    pub fn proxy(mut self, url: impl Into<String>) -> Self {
        self.config.proxy = Some(url.into());
        self
    }

    /// Whether JSON fetches bypass caches (on by default).
    pub fn bypass_cache(mut self, bypass: bool) -> Self {
        self.config.bypass_cache = bypass;
        self
    }

    /// Send a header with every request, such as an API key.
    pub fn header(mut self, name: &str, value: &str) -> Result<Self> {
        self.headers
            .insert(HeaderName::try_from(name)?, HeaderValue::try_from(value)?);
        Ok(self)
    }

    /// Build the client.
    pub fn build(self) -> Result<HttpClient> {
        let Self { config, headers } = self;

        let redirect = match config.redirect_limit {
            0 => Policy::none(),
            limit => Policy::limited(limit),
        };
        let mut builder = reqwest::Client::builder()
            .redirect(redirect)
            .user_agent(config.user_agent.as_str())
            .default_headers(headers);

        if let Some(timeout) = config.timeout {
            builder = builder.timeout(timeout);
        }
        if let Some(timeout) = config.connect_timeout {
            builder = builder.connect_timeout(timeout);
        }
        if let Some(proxy) = &config.proxy {
            let proxy = reqwest::Proxy::all(proxy).map_err(|e| NetworkError::Proxy(e.to_string()))?;
            builder = builder.proxy(proxy);
        }

        let client = builder.build()?;
        tracing::debug!(target: targets::HTTP, ?config, "built HTTP client");

        Ok(HttpClient {
            inner: Arc::new(ClientInner { client, config }),
        })
    }
}

struct ClientInner {
    client: reqwest::Client,
    config: HttpClientConfig,
}

/// A GET client for lookup payloads.
///
/// Clones share one connection pool.
///
/// ```no_run
/// # async fn load() -> horizon_lookup_net::Result<()> {
/// use horizon_lookup_net::HttpClient;
///
/// let client = HttpClient::new();
/// let payload = client.get_json("https://club.example/api/sailors").await?;
/// # let _ = payload;
/// # Ok(())
/// # }
/// ```
#[derive(Clone)]
pub struct HttpClient {
    inner: Arc<ClientInner>,
}

impl Default for HttpClient {
    fn default() -> Self {
        Self::new()
    }
}

impl HttpClient {
    /// Create a client with the default settings.
    ///
    /// # Panics
    ///
    /// Panics if the TLS backend cannot be initialized.
    pub fn new() -> Self {
        HttpClientBuilder::new()
            .build()
            .expect("default HTTP client configuration is valid")
    }

    /// Start configuring a client.
    pub fn builder() -> HttpClientBuilder {
        HttpClientBuilder::new()
    }

    /// The client's settings.
    pub fn config(&self) -> &HttpClientConfig {
        &self.inner.config
    }

    /// Prepare a GET request.
    pub fn get(&self, url: impl Into<String>) -> HttpRequestBuilder {
        HttpRequestBuilder::new(self.clone(), url.into())
    }

    /// Fetch `url` and decode the body as JSON.
    ///
    /// Non-2xx responses fail with [`NetworkError::HttpStatus`].
    pub async fn get_json(&self, url: impl Into<String>) -> Result<serde_json::Value> {
        let mut request = self.get(url).accept_json();
        if self.inner.config.bypass_cache {
            request = request.bypass_cache();
        }
        request.send().await?.into_success().await?.json().await
    }

    pub(crate) fn reqwest_client(&self) -> &reqwest::Client {
        &self.inner.client
    }
}

impl std::fmt::Debug for HttpClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HttpClient")
            .field("config", &self.inner.config)
            .finish_non_exhaustive()
    }
}
