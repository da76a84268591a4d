//! Core error type.
//!
//! Sub-crates define their own error enums (`GridError`, `SpatialError`,
//! `SimError`) and either convert `CoreError` via `From` or wrap it as one
//! variant.  Both patterns are acceptable; prefer whichever keeps error
//! sites clean.

use thiserror::Error;

/// Errors produced by `ct-core` itself — currently only configuration
/// validation.
#[derive(Debug, Error)]
pub enum CoreError {
    #[error("configuration error: {0}")]
    Config(String),
}

/// Shorthand result type for `ct-core`.
pub type CoreResult<T> = Result<T, CoreError>;
