#![cfg_attr(coverage_nightly, feature(coverage_attribute))]

//! Newsly API contract.
//!
//! Transport-agnostic models, the [`NewslyApi`] trait implemented by the REST
//! client in the `newsly` crate, and the [`ApiError`] taxonomy shared by both.

pub mod api;
pub mod errors;
pub mod models;

pub use api::NewslyApi;
pub use errors::{ApiError, ApiOperation};
pub use models::{
    AuthResponse, GenerateResponse, Health, Interaction, InteractionAck, InteractionKind, Location,
    MessageResponse, PasswordCheck, ProfileUpdate, Recommendation, User, UserProfile, UserStats,
};
