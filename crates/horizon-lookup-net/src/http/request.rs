//! GET requests for lookup payloads.

use std::time::Duration;

use horizon_lookup_core::logging::targets;
use http::header::{ACCEPT, HeaderMap, HeaderName, HeaderValue};
use url::Url;

use super::client::HttpClient;
use super::response::HttpResponse;
use crate::error::Result;

/// Query parameter carrying the cache-busting timestamp.
pub const CACHE_BUSTER_PARAM: &str = "_";

/// A GET request being prepared.
///
/// Header and URL problems are reported when the request is sent, so
/// builder calls can be chained freely.
#[derive(Debug)]
pub struct HttpRequestBuilder {
    client: HttpClient,
    url: String,
    query: Vec<(String, String)>,
    headers: Result<HeaderMap>,
    timeout: Option<Duration>,
}

impl HttpRequestBuilder {
    pub(crate) fn new(client: HttpClient, url: String) -> Self {
        Self {
            client,
            url,
            query: Vec::new(),
            headers: Ok(HeaderMap::new()),
            timeout: None,
        }
    }

    /// Set a header.
    pub fn header(mut self, name: &str, value: &str) -> Self {
        self.headers = self.headers.and_then(|mut headers| {
            headers.insert(HeaderName::try_from(name)?, HeaderValue::try_from(value)?);
            Ok(headers)
        });
        self
    }

    /// Ask for a JSON response.
    pub fn accept_json(self) -> Self {
        self.header(ACCEPT.as_str(), "application/json")
    }

    /// Append a query parameter.
    pub fn query(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.query.push((key.into(), value.into()));
        self
    }

    /// Append `_=<unix millis>` so no cache along the way can answer.
    pub fn bypass_cache(self) -> Self {
        let stamp = chrono::Utc::now().timestamp_millis();
        self.query(CACHE_BUSTER_PARAM, stamp.to_string())
    }

    /// Override the client's timeout for this request.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// The URL that will be requested, query parameters included.
    pub fn url(&self) -> Result<Url> {
        let mut url = Url::parse(&self.url)?;
        if !self.query.is_empty() {
            url.query_pairs_mut().extend_pairs(&self.query);
        }
        Ok(url)
    }

    /// Send the request.
    pub async fn send(self) -> Result<HttpResponse> {
        let url = self.url()?;
        let headers = self.headers?;

        let mut request = self.client.reqwest_client().get(url.clone()).headers(headers);
        if let Some(timeout) = self.timeout {
            request = request.timeout(timeout);
        }

        tracing::debug!(target: targets::HTTP, %url, "GET");
        let response = request.send().await?;
        tracing::debug!(target: targets::HTTP, %url, status = response.status().as_u16(), "response received");
        Ok(HttpResponse::new(response))
    }
}
