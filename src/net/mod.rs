//! Backend access.
//!
//! `types` holds the JSON wire contract and [`ApiError`]; `api` holds the
//! [`Backend`] trait and its reqwest implementation; `failure` turns
//! provider errors into user-facing messages.

pub mod api;
pub mod failure;
#[cfg(test)]
pub(crate) mod mock;
pub mod types;

pub use api::{Backend, HttpBackend};
pub use failure::ProviderFailure;
pub use types::ApiError;
