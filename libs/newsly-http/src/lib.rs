#![cfg_attr(coverage_nightly, feature(coverage_attribute))]
#![warn(warnings)]

//! HTTP transport used by the Newsly API client.
//!
//! A hyper client behind a small tower stack:
//! - TLS via rustls (HTTPS only unless insecure HTTP is allowed explicitly)
//! - per-request timeout
//! - `User-Agent` injection
//! - transparent gzip/brotli/deflate decompression, with body limits applied
//!   to the decompressed bytes
//! - a `tower::buffer::Buffer` front so the client is `Clone + Send + Sync`
//!
//! There is deliberately no retry layer: every call is a single attempt and the
//! caller decides what a failure means.
//!
//! # Example
//!
//! ```ignore
//! use newsly_http::HttpClient;
//! use std::time::Duration;
//!
//! let client = HttpClient::builder()
//!     .timeout(Duration::from_secs(10))
//!     .user_agent("newsly/0.3")
//!     .build()?;
//!
//! let stats: Stats = client
//!     .get("https://api.newsly.example/stats")
//!     .bearer_auth(token)
//!     .send()
//!     .await?
//!     .json()
//!     .await?;
//! ```

mod builder;
mod client;
mod config;
mod error;
mod request;
mod response;
mod tls;
mod user_agent;

pub use builder::HttpClientBuilder;
pub use client::HttpClient;
pub use config::{DEFAULT_USER_AGENT, HttpClientConfig, TlsRootConfig, TransportSecurity};
pub use error::{HttpError, InvalidUriKind, format_http_error};
pub use request::RequestBuilder;
pub use response::{ERROR_BODY_PREVIEW_LIMIT, HttpResponse, ResponseBody};
pub use user_agent::{UserAgentLayer, UserAgentService};
