//! Stateless envelope validation.

use super::tx::TxInput;
use shared_types::ResultCode;
use thiserror::Error;

/// Required address width.
pub const ADDRESS_LEN: usize = 20;

/// One violation per invariant class.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("Invalid address length: {0}")]
    InvalidAddressLength(usize),

    #[error("Sequence must be greater than 0")]
    InvalidSequence,

    #[error("PubKey must be present when Sequence == 1")]
    MissingPubKey,

    #[error("PubKey must be nil when Sequence > 1")]
    UnexpectedPubKey,
}

impl ValidationError {
    pub fn code(&self) -> ResultCode {
        ResultCode::InvalidInput
    }
}

/// Check the input invariants, in order: address, sequence, key presence.
pub fn validate_basic(input: &TxInput) -> Result<(), ValidationError> {
    if input.address.len() != ADDRESS_LEN {
        return Err(ValidationError::InvalidAddressLength(input.address.len()));
    }
    if input.sequence == 0 {
        return Err(ValidationError::InvalidSequence);
    }
    if input.sequence == 1 && input.public_key.is_none() {
        return Err(ValidationError::MissingPubKey);
    }
    if input.sequence > 1 && input.public_key.is_some() {
        return Err(ValidationError::UnexpectedPubKey);
    }
    Ok(())
}
