//! Host error types.
//!
//! Every variant maps onto exactly one result code, so a failure always
//! reaches the submitter as a `HostResult { code, log }`.

use cc_02_transactions::{PayloadError, TxError};
use shared_types::{FormId, HostResult, ResultCode};
use thiserror::Error;

/// Host failures.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum HostError {
    /// Envelope decoding, validation or signature failure.
    #[error(transparent)]
    Tx(#[from] TxError),

    /// Payload does not have the shape its transaction kind requires.
    #[error(transparent)]
    Payload(#[from] PayloadError),

    #[error("Invalid sequence: expected {expected}, got {actual}")]
    InvalidSequence { expected: u64, actual: u64 },

    #[error("Unknown address: {0}")]
    UnknownAddress(String),

    #[error("Account already exists: {0}")]
    AccountAlreadyExists(String),

    #[error("Address does not match public key")]
    AddressMismatch,

    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    #[error("Error finding form {0}")]
    FormNotFound(FormId),

    #[error("Form {0} already resolved")]
    FormAlreadyResolved(FormId),

    #[error("Invalid resolution: {0}")]
    InvalidResolution(String),

    #[error("Mempool full: capacity {0}")]
    MempoolFull(usize),

    /// Committed history could not be read or written.
    #[error("History error: {0}")]
    History(String),

    /// Replayed state diverged from the recorded app hash.
    #[error("Replay diverged at height {height}")]
    ReplayMismatch { height: u64 },

    #[error("Transport error: {0}")]
    Transport(String),
}

impl HostError {
    pub fn code(&self) -> ResultCode {
        match self {
            HostError::Tx(e) => e.code(),
            HostError::Payload(e) => e.code(),
            HostError::InvalidSequence { .. } => ResultCode::InvalidSequence,
            HostError::UnknownAddress(_) => ResultCode::UnknownAddress,
            HostError::AccountAlreadyExists(_) => ResultCode::AccountAlreadyExists,
            HostError::AddressMismatch | HostError::InvalidResolution(_) => {
                ResultCode::InvalidInput
            }
            HostError::Unauthorized(_) => ResultCode::Unauthorized,
            HostError::FormNotFound(_) => ResultCode::FindForm,
            HostError::FormAlreadyResolved(_) => ResultCode::FormAlreadyResolved,
            HostError::MempoolFull(_) => ResultCode::MempoolFull,
            HostError::History(_) | HostError::ReplayMismatch { .. } | HostError::Transport(_) => {
                ResultCode::InternalError
            }
        }
    }

    pub fn to_result(&self) -> HostResult {
        HostResult::error(self.code(), self.to_string())
    }
}

impl From<HostError> for HostResult {
    fn from(err: HostError) -> Self {
        err.to_result()
    }
}

impl From<bincode::Error> for HostError {
    fn from(err: bincode::Error) -> Self {
        HostError::History(err.to_string())
    }
}

impl From<std::io::Error> for HostError {
    fn from(err: std::io::Error) -> Self {
        HostError::History(err.to_string())
    }
}
