//! Typed input rejections.
//!
//! These travel inside `anyhow::Error` like every other failure, but they are
//! raised before any mutation happens, so callers that care can
//! `downcast_ref::<StoreError>()` and tell "bad input" from an I/O failure.

use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StoreError {
    /// Country name normalizes to an empty/unusable key.
    #[error("malformed country name: {0:?}")]
    MalformedCountryName(String),

    #[error("address must not be empty")]
    EmptyAddress,

    #[error("activation code must not be empty")]
    EmptyCode,

    #[error("endpoint host must not be empty")]
    EmptyEndpoint,
}
