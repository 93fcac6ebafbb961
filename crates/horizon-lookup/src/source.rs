//! Record sources.
//!
//! A [`DataSource`] produces the raw JSON payload for a URL. [`fetch_records`]
//! turns that payload into a [`RecordSet`], unwrapping the configured data
//! property first.

use futures_util::future::BoxFuture;
use horizon_lookup_core::logging::targets;
use horizon_lookup_net::{HttpClient, NetworkError};
use serde_json::Value;

use crate::error::{LookupError, Result};
use crate::record::{RecordSet, records_from_value};

/// Something that can fetch a JSON payload by URL.
pub trait DataSource: Send + Sync {
    /// Fetch the payload at `url`.
    fn fetch(&self, url: &str) -> BoxFuture<'static, std::result::Result<Value, NetworkError>>;
}

/// Fetches payloads over HTTP, bypassing caches.
#[derive(Debug, Clone, Default)]
pub struct HttpDataSource {
    client: HttpClient,
}

impl HttpDataSource {
    /// Create a source with a default client.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a source using `client`.
    pub fn with_client(client: HttpClient) -> Self {
        Self { client }
    }

    /// The underlying client.
    pub fn client(&self) -> &HttpClient {
        &self.client
    }
}

impl DataSource for HttpDataSource {
    fn fetch(&self, url: &str) -> BoxFuture<'static, std::result::Result<Value, NetworkError>> {
        let client = self.client.clone();
        let url = url.to_string();
        Box::pin(async move { client.get_json(url).await })
    }
}

/// A source that always answers with the same payload.
#[derive(Debug, Clone)]
pub struct StaticSource {
    payload: std::result::Result<Value, NetworkError>,
}

impl StaticSource {
    /// Answer every fetch with `payload`.
    pub fn new(payload: Value) -> Self {
        Self {
            payload: Ok(payload),
        }
    }

    /// Fail every fetch with `error`.
    pub fn failing(error: NetworkError) -> Self {
        Self {
            payload: Err(error),
        }
    }

    /// An empty record list.
    pub fn empty() -> Self {
        Self::new(Value::Array(Vec::new()))
    }
}

impl DataSource for StaticSource {
    fn fetch(&self, _url: &str) -> BoxFuture<'static, std::result::Result<Value, NetworkError>> {
        let payload = self.payload.clone();
        Box::pin(async move { payload })
    }
}

/// Fetch `url` from `source` and decode it into records.
///
/// When `data_property` is set the records are read from that property of
/// the payload object; otherwise the payload itself must be the record array.
pub async fn fetch_records(
    source: &dyn DataSource,
    url: &str,
    data_property: Option<&str>,
) -> Result<RecordSet> {
    tracing::debug!(target: targets::SOURCE, url, ?data_property, "fetching records");
    let payload = source.fetch(url).await?;
    let records = records_from_value(unwrap_data_property(payload, data_property)?)?;
    tracing::debug!(target: targets::SOURCE, url, count = records.len(), "decoded records");
    Ok(records)
}

fn unwrap_data_property(payload: Value, data_property: Option<&str>) -> Result<Value> {
    let Some(property) = data_property.filter(|p| !p.is_empty()) else {
        return Ok(payload);
    };

    match payload {
        Value::Object(mut fields) => fields
            .remove(property)
            .ok_or_else(|| LookupError::MissingDataProperty(property.to_string())),
        _ => Err(LookupError::MissingDataProperty(property.to_string())),
    }
}
