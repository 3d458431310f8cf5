//! Core error type.
//!
//! Only configuration problems are errors in the `Result` sense.  Safety
//! violations during a run are reported through the crossing crate's abort
//! signal instead, because they end the whole simulation rather than a
//! single call.

use thiserror::Error;

/// The top-level error type for `lz-core`.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum LzError {
    #[error("configuration error: {field} must be at least {min}, got {got}")]
    OutOfRange {
        field: &'static str,
        min:   u64,
        got:   u64,
    },

    #[error("configuration error: {0}")]
    Config(String),
}

/// Shorthand result type for all `lz-*` crates.
pub type LzResult<T> = Result<T, LzError>;
