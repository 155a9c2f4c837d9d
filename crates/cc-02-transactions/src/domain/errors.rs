//! Transaction error types.
//!
//! Every variant maps onto exactly one host result code.

use super::validation::ValidationError;
use super::wire::WireError;
use shared_types::ResultCode;
use thiserror::Error;

/// Envelope-level failures.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TxError {
    /// Bytes do not decode as a transaction.
    #[error("Encoding error: {0}")]
    Wire(#[from] WireError),

    /// Leading type byte is not a known transaction kind.
    #[error("Unknown transaction type: 0x{0:02x}")]
    UnknownTxType(u8),

    /// Basic validation failed.
    #[error("Invalid input: {0}")]
    Invalid(#[from] ValidationError),

    /// The envelope carries no signature.
    #[error("Missing signature")]
    MissingSignature,

    /// The public key is not a valid Ed25519 point.
    #[error("Invalid public key")]
    InvalidPublicKey,

    /// The signature does not verify against the sign-bytes.
    #[error("Invalid signature")]
    InvalidSignature,

    /// A hex-encoded secret key could not be parsed.
    #[error("Invalid secret key: {0}")]
    InvalidSecretKey(String),
}

impl TxError {
    pub fn code(&self) -> ResultCode {
        match self {
            TxError::Wire(_) => ResultCode::EncodingError,
            TxError::UnknownTxType(_) => ResultCode::UnknownTxType,
            TxError::Invalid(_) => ResultCode::InvalidInput,
            TxError::MissingSignature | TxError::InvalidPublicKey | TxError::InvalidSignature => {
                ResultCode::InvalidSignature
            }
            TxError::InvalidSecretKey(_) => ResultCode::InvalidInput,
        }
    }
}

/// Payload decoding failures, one per payload kind.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PayloadError {
    /// Submit payload is not a valid form.
    #[error("Error decoding form: {0}")]
    DecodeForm(String),

    /// Resolve payload does not carry a form id.
    #[error("Error decoding form ID: {0}")]
    DecodingFormId(String),

    /// Account payload has an unexpected shape.
    #[error("Unexpected data: {0}")]
    UnexpectedData(String),
}

impl PayloadError {
    pub fn code(&self) -> ResultCode {
        match self {
            PayloadError::DecodeForm(_) => ResultCode::DecodeForm,
            PayloadError::DecodingFormId(_) => ResultCode::DecodingFormId,
            PayloadError::UnexpectedData(_) => ResultCode::UnexpectedData,
        }
    }
}
