//! Form error types.

use thiserror::Error;

/// Errors raised while building or mutating a form.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FormError {
    /// Issue is not part of the closed vocabulary.
    #[error("Unknown issue: {0}")]
    UnknownIssue(String),

    /// Location is empty or whitespace.
    #[error("Location must not be empty")]
    EmptyLocation,

    /// The description mentions a detail with an option outside its set.
    #[error("Invalid option for detail '{detail}'")]
    InvalidDetailOption { detail: &'static str },

    /// Submitter is present but not a 64-character hex identity.
    #[error("Invalid submitter: expected 64 hex characters, got {0}")]
    InvalidSubmitter(usize),

    /// The timestamp is empty.
    #[error("Submission timestamp must not be empty")]
    MissingTimestamp,

    /// `resolve` was called on a resolved form.
    #[error("Form already resolved")]
    AlreadyResolved,

    /// `resolve` was called with an empty time or resolver.
    #[error("Resolution requires both a time and a resolver")]
    MissingResolution,
}
