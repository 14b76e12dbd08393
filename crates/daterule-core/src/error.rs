//! Error types for schema construction.

use thiserror::Error;

/// Errors raised while building or deserializing a field schema.
///
/// Validation itself never returns these — a validation failure is an
/// ordinary [`Violation`](crate::rules::Violation), not an error.
#[derive(Error, Debug)]
pub enum SchemaError {
    #[error("Invalid timezone: {0}")]
    InvalidTimezone(String),

    #[error("Invalid truncation unit: {0}")]
    InvalidUnit(String),
}

pub type Result<T> = std::result::Result<T, SchemaError>;
