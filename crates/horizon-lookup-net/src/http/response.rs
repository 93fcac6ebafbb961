//! Responses to lookup fetches.

use horizon_lookup_core::logging::targets;
use serde::de::DeserializeOwned;

use crate::error::{NetworkError, Result};

/// Longest error body kept in [`NetworkError::HttpStatus`], in characters.
const MAX_ERROR_BODY: usize = 256;

/// A received response whose body has not been read yet.
pub struct HttpResponse {
    inner: reqwest::Response,
}

impl HttpResponse {
    pub(crate) fn new(inner: reqwest::Response) -> Self {
        Self { inner }
    }

    /// Status code.
    pub fn status(&self) -> u16 {
        self.inner.status().as_u16()
    }

    /// Whether the status is 2xx.
    pub fn is_success(&self) -> bool {
        self.inner.status().is_success()
    }

    /// A header value, if present and valid UTF-8.
    pub fn header(&self, name: &str) -> Option<&str> {
        self.inner.headers().get(name)?.to_str().ok()
    }

    /// The URL that answered, after redirects.
    pub fn url(&self) -> &str {
        self.inner.url().as_str()
    }

    /// Read the body as text.
    pub async fn text(self) -> Result<String> {
        Ok(self.inner.text().await?)
    }

    /// Read and decode a JSON body.
    pub async fn json<T: DeserializeOwned>(self) -> Result<T> {
        let body = self.inner.bytes().await?;
        tracing::trace!(target: targets::HTTP, bytes = body.len(), "decoding JSON body");
        Ok(serde_json::from_slice(&body)?)
    }

    /// Pass 2xx responses through; turn anything else into
    /// [`NetworkError::HttpStatus`] carrying the start of the body.
    pub async fn into_success(self) -> Result<Self> {
        if self.is_success() {
            return Ok(self);
        }

        let status = self.status();
        let message = self.text().await.ok().and_then(|body| error_excerpt(&body));
        tracing::debug!(target: targets::HTTP, status, ?message, "error response");
        Err(NetworkError::HttpStatus { status, message })
    }
}

fn error_excerpt(body: &str) -> Option<String> {
    let body = body.trim();
    if body.is_empty() {
        return None;
    }
    match body.char_indices().nth(MAX_ERROR_BODY) {
        Some((cut, _)) => Some(format!("{}...", &body[..cut])),
        None => Some(body.to_string()),
    }
}

impl std::fmt::Debug for HttpResponse {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HttpResponse")
            .field("status", &self.status())
            .field("url", &self.url())
            .finish()
    }
}
