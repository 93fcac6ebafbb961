//! Networking module for Horizon Lookup.
//!
//! This crate provides what the lookup engine needs to load record sets from
//! a remote source:
//!
//! - **HTTP Client**: A GET-oriented client with cache busting
//! - **Runtime**: The shared tokio runtime used by hosts that do not run one
//!
//! # Example
//!
//! ```no_run
//! # async fn load() -> horizon_lookup_net::Result<()> {
//! use std::time::Duration;
//! use horizon_lookup_net::HttpClient;
//!
//! let client = HttpClient::builder()
//!     .timeout(Duration::from_secs(10))
//!     .user_agent("RegattaDesk/2.0")
//!     .build()?;
//!
//! // Runs on the caller's tokio runtime, or the shared one outside tokio
//! let fetch = horizon_lookup_net::runtime::spawn_detached(async move {
//!     client.get_json("https://club.example/api/sailors").await
//! });
//! # let _ = fetch;
//! # Ok(())
//! # }
//! ```

mod error;
pub mod http;
pub mod runtime;

pub use error::{NetworkError, Result};
pub use http::{HttpClient, HttpClientBuilder, HttpClientConfig, HttpRequestBuilder, HttpResponse};
