#![cfg_attr(coverage_nightly, feature(coverage_attribute))]

//! Small helpers shared across the Newsly crates.

pub mod humantime_serde;
pub mod secret_string;

pub use secret_string::SecretString;
