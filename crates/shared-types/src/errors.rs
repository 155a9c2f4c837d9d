//! # Error Types
//!
//! Errors raised while parsing shared identifiers.

use thiserror::Error;

/// Errors parsing a hex-encoded identifier.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum IdParseError {
    /// The input is not valid hex.
    #[error("Invalid hex: {0}")]
    Hex(String),

    /// The decoded bytes have the wrong width.
    #[error("Invalid length: expected {expected} bytes, got {actual}")]
    Length { expected: usize, actual: usize },
}
