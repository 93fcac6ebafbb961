//! A small GET-only HTTP client for loading lookup record sets.
//!
//! [`HttpClient::get_json`] covers the common case. Use
//! [`HttpClient::get`] to add headers or query parameters first:
//!
//! ```no_run
//! # async fn load() -> horizon_lookup_net::Result<()> {
//! use horizon_lookup_net::http::HttpClient;
//!
//! let client = HttpClient::new();
//! let response = client
//!     .get("https://club.example/api/sailors")
//!     .query("fleet", "laser")
//!     .accept_json()
//!     .bypass_cache()
//!     .send()
//!     .await?
//!     .into_success()
//!     .await?;
//! let payload: serde_json::Value = response.json().await?;
//! # let _ = payload;
//! # Ok(())
//! # }
//! ```

mod client;
mod request;
mod response;

pub use client::{HttpClient, HttpClientBuilder, HttpClientConfig};
pub use request::{CACHE_BUSTER_PARAM, HttpRequestBuilder};
pub use response::HttpResponse;
