#![cfg_attr(coverage_nightly, feature(coverage_attribute))]

//! Newsly client.
//!
//! The onboarding wizard, the feed, auth and account pages, expressed as
//! services that produce view models. Persistence goes through the
//! [`KeyValueStore`](domain::store::KeyValueStore) trait and the Newsly API
//! through [`NewslyApi`](newsly_sdk::NewslyApi); `infra` provides the file and
//! memory stores and the REST client.

pub mod config;
pub mod domain;
pub mod infra;

pub use config::NewslyConfig;
pub use domain::Route;
pub use infra::client::{ClientInitError, NewslyClient};
pub use infra::storage::{FileStore, MemoryStore};
